//! Per-symbol trend gate.
//!
//! A symbol is eligible when its latest close is strictly above its SMA.
//! Missing or short history blocks the buy (fail-closed).

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::config::StrategyConfig;
use crate::domain::gate::GateOutcome;
use crate::domain::indicator::Indicator;
use crate::domain::market::{closes, Timeframe};
use crate::ports::market_data_port::MarketDataPort;

/// Fail-closed default.
const UNDECIDED_IS_UPTREND: bool = false;

#[derive(Debug, Clone, PartialEq)]
pub struct Trend {
    pub symbol: String,
    pub outcome: GateOutcome,
    pub last_close: Option<f64>,
    pub sma: Option<f64>,
}

impl Trend {
    pub fn is_uptrend(&self) -> bool {
        self.outcome.value_or(UNDECIDED_IS_UPTREND)
    }
}

/// Decide from an already-fetched closing series.
pub fn trend_from_closes(symbol: &str, prices: &[f64], sma_period: usize) -> Trend {
    let sma = Indicator::Sma(sma_period);
    let last_close = prices.last().copied();

    if prices.len() < sma.min_prices() {
        return Trend {
            symbol: symbol.to_string(),
            outcome: GateOutcome::InsufficientData {
                have: prices.len(),
                need: sma.min_prices(),
            },
            last_close,
            sma: None,
        };
    }

    let average = sma.compute(prices);
    let current = last_close.unwrap_or_default();
    Trend {
        symbol: symbol.to_string(),
        outcome: GateOutcome::Definitive(current > average),
        last_close,
        sma: Some(average),
    }
}

pub fn assess_trend(
    market: &dyn MarketDataPort,
    symbol: &str,
    config: &StrategyConfig,
    today: NaiveDate,
) -> Trend {
    let (start, end) = config.history_window(today);
    let trend = match market.get_bars(symbol, Timeframe::Day, start, end) {
        Ok(bars) => trend_from_closes(symbol, &closes(&bars), config.sma_period),
        Err(e) => {
            warn!(%symbol, error = %e, "price history fetch failed");
            Trend {
                symbol: symbol.to_string(),
                outcome: GateOutcome::FetchError(e.to_string()),
                last_close: None,
                sma: None,
            }
        }
    };

    match (&trend.outcome, trend.last_close, trend.sma) {
        (GateOutcome::Definitive(up), Some(price), Some(sma)) => info!(
            %symbol,
            "price ${:.2}, {} ${:.2} - {}",
            price,
            Indicator::Sma(config.sma_period),
            sma,
            if *up { "UPTREND" } else { "DOWNTREND" }
        ),
        (GateOutcome::InsufficientData { have, need }, _, _) => info!(
            %symbol,
            have,
            need,
            "not enough data for {}",
            Indicator::Sma(config.sma_period)
        ),
        _ => {}
    }

    trend
}
