#![allow(dead_code)]

use chrono::NaiveDate;
use dcatrader::domain::config::StrategyConfig;
use dcatrader::domain::error::DcaError;
pub use dcatrader::domain::market::{Bar, Quote, Timeframe};
use dcatrader::domain::order::{OrderHandle, OrderIntent};
use dcatrader::ports::broker_port::BrokerPort;
use dcatrader::ports::market_data_port::MarketDataPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockMarketData {
    pub closes: HashMap<String, Vec<f64>>,
    pub quotes: HashMap<String, Quote>,
    pub bar_errors: HashMap<String, String>,
    pub quote_errors: HashMap<String, String>,
    pub bar_requests: RefCell<Vec<String>>,
    pub quote_requests: RefCell<Vec<String>>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            closes: HashMap::new(),
            quotes: HashMap::new(),
            bar_errors: HashMap::new(),
            quote_errors: HashMap::new(),
            bar_requests: RefCell::new(Vec::new()),
            quote_requests: RefCell::new(Vec::new()),
        }
    }

    /// SPY oscillating (RSI 50) and VIX at 15.
    pub fn calm() -> Self {
        Self::new()
            .with_closes("SPY", oscillating(30, 500.0))
            .with_last("VIX", 15.0)
    }

    pub fn with_closes(mut self, symbol: &str, closes: Vec<f64>) -> Self {
        self.closes.insert(symbol.to_string(), closes);
        self
    }

    pub fn with_quote(
        mut self,
        symbol: &str,
        last: Option<f64>,
        ask: Option<f64>,
        bid: Option<f64>,
    ) -> Self {
        self.quotes.insert(
            symbol.to_string(),
            Quote {
                symbol: symbol.to_string(),
                last_price: last,
                ask_price: ask,
                bid_price: bid,
            },
        );
        self
    }

    pub fn with_last(self, symbol: &str, last: f64) -> Self {
        self.with_quote(symbol, Some(last), None, None)
    }

    pub fn with_bar_error(mut self, symbol: &str, reason: &str) -> Self {
        self.bar_errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn with_quote_error(mut self, symbol: &str, reason: &str) -> Self {
        self.quote_errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn bar_requests_for(&self, symbol: &str) -> usize {
        self.bar_requests.borrow().iter().filter(|s| *s == symbol).count()
    }
}

impl MarketDataPort for MockMarketData {
    fn get_bars(
        &self,
        symbol: &str,
        _timeframe: Timeframe,
        start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<Bar>, DcaError> {
        self.bar_requests.borrow_mut().push(symbol.to_string());
        if let Some(reason) = self.bar_errors.get(symbol) {
            return Err(DcaError::market_data(symbol, reason.clone()));
        }
        let closes = self.closes.get(symbol).cloned().unwrap_or_default();
        Ok(closes
            .into_iter()
            .enumerate()
            .map(|(i, close)| make_bar(symbol, start + chrono::Duration::days(i as i64), close))
            .collect())
    }

    fn get_latest_quote(&self, symbol: &str) -> Result<Option<Quote>, DcaError> {
        self.quote_requests.borrow_mut().push(symbol.to_string());
        if let Some(reason) = self.quote_errors.get(symbol) {
            return Err(DcaError::market_data(symbol, reason.clone()));
        }
        Ok(self.quotes.get(symbol).cloned())
    }
}

#[derive(Default)]
pub struct RecordingBroker {
    pub submitted: RefCell<Vec<OrderIntent>>,
    pub reject: Vec<String>,
}

impl RecordingBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(symbol: &str) -> Self {
        Self {
            submitted: RefCell::new(Vec::new()),
            reject: vec![symbol.to_string()],
        }
    }

    pub fn submitted(&self) -> Vec<OrderIntent> {
        self.submitted.borrow().clone()
    }
}

impl BrokerPort for RecordingBroker {
    fn submit_order(&self, intent: &OrderIntent) -> Result<Option<OrderHandle>, DcaError> {
        if self.reject.contains(&intent.symbol) {
            return Err(DcaError::broker(&intent.symbol, "insufficient buying power"));
        }
        let mut submitted = self.submitted.borrow_mut();
        submitted.push(intent.clone());
        Ok(Some(OrderHandle {
            id: format!("ORD-{:04}", submitted.len()),
        }))
    }
}

pub fn make_bar(symbol: &str, date: NaiveDate, close: f64) -> Bar {
    Bar {
        symbol: symbol.to_string(),
        date,
        open: close - 0.5,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1_000,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn today() -> NaiveDate {
    date(2024, 6, 14)
}

/// Steady climb: last close above its 20-bar mean.
pub fn rising(count: usize, start: f64) -> Vec<f64> {
    (0..count).map(|i| start + i as f64 * 0.5).collect()
}

/// Steady decline: last close below its 20-bar mean.
pub fn falling(count: usize, start: f64) -> Vec<f64> {
    (0..count).map(|i| start - i as f64 * 0.5).collect()
}

/// Alternating +1/-1 moves, RSI exactly 50.
pub fn oscillating(count: usize, base: f64) -> Vec<f64> {
    (0..count)
        .map(|i| if i % 2 == 0 { base } else { base + 1.0 })
        .collect()
}

pub fn single_symbol_config(symbol: &str) -> StrategyConfig {
    universe_config(&[symbol])
}

pub fn universe_config(symbols: &[&str]) -> StrategyConfig {
    StrategyConfig {
        universe: symbols.iter().map(|s| s.to_string()).collect(),
        ..StrategyConfig::default()
    }
}
