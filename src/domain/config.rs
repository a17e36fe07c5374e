//! Immutable strategy configuration.
//!
//! Built once from a [`ConfigPort`] and handed to the runner; nothing reads
//! configuration after that point.

use chrono::{Duration, NaiveDate};

use crate::domain::config_validation::validate_strategy_config;
use crate::domain::error::DcaError;
use crate::domain::market::{PriceSource, DEFAULT_PRICE_PRIORITY};
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;

pub const STRATEGY_SECTION: &str = "strategy";

pub const DEFAULT_UNIVERSE: [&str; 5] = ["NVDA", "TSLA", "AMD", "QBTS", "RKLB"];
pub const DEFAULT_DCA_AMOUNT: f64 = 100.0;
pub const DEFAULT_SMA_PERIOD: usize = 20;
pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_RSI_THRESHOLD: f64 = 75.0;
pub const DEFAULT_VOLATILITY_THRESHOLD: f64 = 25.0;
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;
pub const DEFAULT_LOOKBACK_PADDING_DAYS: u32 = 10;
pub const DEFAULT_BENCHMARK: &str = "SPY";
pub const DEFAULT_VOLATILITY_INDEX: &str = "VIX";

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub name: String,
    /// Evaluated in this order every run.
    pub universe: Vec<String>,
    /// Dollars spent per qualifying symbol per run.
    pub dca_amount: f64,
    pub sma_period: usize,
    pub rsi_period: usize,
    /// Benchmark RSI strictly above this pauses buying.
    pub rsi_threshold: f64,
    /// Volatility index level strictly above this pauses buying.
    pub volatility_threshold: f64,
    pub lookback_days: u32,
    /// Extra calendar days fetched so weekends and holidays still leave
    /// enough trading days in the window.
    pub lookback_padding_days: u32,
    pub benchmark: String,
    pub volatility_index: String,
    pub price_priority: Vec<PriceSource>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            name: "Growth Momentum DCA".to_string(),
            universe: DEFAULT_UNIVERSE.iter().map(|s| s.to_string()).collect(),
            dca_amount: DEFAULT_DCA_AMOUNT,
            sma_period: DEFAULT_SMA_PERIOD,
            rsi_period: DEFAULT_RSI_PERIOD,
            rsi_threshold: DEFAULT_RSI_THRESHOLD,
            volatility_threshold: DEFAULT_VOLATILITY_THRESHOLD,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            lookback_padding_days: DEFAULT_LOOKBACK_PADDING_DAYS,
            benchmark: DEFAULT_BENCHMARK.to_string(),
            volatility_index: DEFAULT_VOLATILITY_INDEX.to_string(),
            price_priority: DEFAULT_PRICE_PRIORITY.to_vec(),
        }
    }
}

impl StrategyConfig {
    /// Inclusive `(start, end)` calendar window for daily history ending `today`.
    pub fn history_window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let days = i64::from(self.lookback_days) + i64::from(self.lookback_padding_days);
        (today - Duration::days(days), today)
    }
}

/// Parse a comma-separated price priority such as `last,ask,bid`.
pub fn parse_price_priority(input: &str) -> Result<Vec<PriceSource>, DcaError> {
    let mut sources = Vec::new();
    for token in input.split(',') {
        let source = PriceSource::parse(token).ok_or_else(|| {
            DcaError::invalid(
                STRATEGY_SECTION,
                "price_priority",
                format!("unknown price source '{}' (expected last, ask or bid)", token.trim()),
            )
        })?;
        if sources.contains(&source) {
            return Err(DcaError::invalid(
                STRATEGY_SECTION,
                "price_priority",
                format!("duplicate price source '{}'", source),
            ));
        }
        sources.push(source);
    }
    Ok(sources)
}

pub fn build_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, DcaError> {
    validate_strategy_config(config)?;

    let defaults = StrategyConfig::default();
    let s = STRATEGY_SECTION;

    let universe = match config.get_string(s, "symbols") {
        Some(list) => parse_symbols(&list)?,
        None => defaults.universe,
    };
    let price_priority = match config.get_string(s, "price_priority") {
        Some(list) => parse_price_priority(&list)?,
        None => defaults.price_priority,
    };

    Ok(StrategyConfig {
        name: config.get_string(s, "name").unwrap_or(defaults.name),
        universe,
        dca_amount: config.get_double(s, "dca_amount", defaults.dca_amount),
        sma_period: config.get_int(s, "sma_period", defaults.sma_period as i64) as usize,
        rsi_period: config.get_int(s, "rsi_period", defaults.rsi_period as i64) as usize,
        rsi_threshold: config.get_double(s, "rsi_threshold", defaults.rsi_threshold),
        volatility_threshold: config.get_double(
            s,
            "volatility_threshold",
            defaults.volatility_threshold,
        ),
        lookback_days: config.get_int(s, "lookback_days", i64::from(defaults.lookback_days)) as u32,
        lookback_padding_days: config.get_int(
            s,
            "lookback_padding_days",
            i64::from(defaults.lookback_padding_days),
        ) as u32,
        benchmark: config
            .get_string(s, "benchmark")
            .map(|b| b.trim().to_uppercase())
            .unwrap_or(defaults.benchmark),
        volatility_index: config
            .get_string(s, "volatility_index")
            .map(|v| v.trim().to_uppercase())
            .unwrap_or(defaults.volatility_index),
        price_priority,
    })
}
