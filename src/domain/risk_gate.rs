//! Market risk gate.
//!
//! Two market-wide checks, OR'd together:
//! - benchmark RSI strictly above `rsi_threshold` (overextended market)
//! - volatility index level strictly above `volatility_threshold`
//!
//! The volatility check only runs when the benchmark check did not already
//! flag risk. Either check failing to decide counts as "not risky": the gate
//! is fail-open and prefers a questionable buy over halting on a data error.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::config::StrategyConfig;
use crate::domain::gate::GateOutcome;
use crate::domain::indicator::Indicator;
use crate::domain::market::{closes, Timeframe};
use crate::ports::market_data_port::MarketDataPort;

/// Fail-open default for both sub-checks.
const UNDECIDED_IS_RISKY: bool = false;

#[derive(Debug, Clone, PartialEq)]
pub struct MarketRisk {
    pub benchmark: GateOutcome,
    pub benchmark_rsi: Option<f64>,
    /// `None` when the benchmark check already flagged risk.
    pub volatility: Option<GateOutcome>,
    pub volatility_level: Option<f64>,
}

impl MarketRisk {
    pub fn benchmark_risky(&self) -> bool {
        self.benchmark.value_or(UNDECIDED_IS_RISKY)
    }

    pub fn volatility_risky(&self) -> bool {
        self.volatility
            .as_ref()
            .is_some_and(|v| v.value_or(UNDECIDED_IS_RISKY))
    }

    pub fn is_risky(&self) -> bool {
        self.benchmark_risky() || self.volatility_risky()
    }

    /// Human-readable reason when risky.
    pub fn reason(&self, config: &StrategyConfig) -> Option<String> {
        if self.benchmark_risky() {
            let rsi = self.benchmark_rsi.unwrap_or_default();
            return Some(format!(
                "{} {} is {:.1} (> {}) - market overextended",
                config.benchmark,
                Indicator::Rsi(config.rsi_period),
                rsi,
                config.rsi_threshold
            ));
        }
        if self.volatility_risky() {
            let level = self.volatility_level.unwrap_or_default();
            return Some(format!(
                "{} is {:.1} (> {}) - high volatility",
                config.volatility_index, level, config.volatility_threshold
            ));
        }
        None
    }
}

pub fn assess_market_risk(
    market: &dyn MarketDataPort,
    config: &StrategyConfig,
    today: NaiveDate,
) -> MarketRisk {
    let (benchmark, benchmark_rsi) = check_benchmark(market, config, today);

    let mut risk = MarketRisk {
        benchmark,
        benchmark_rsi,
        volatility: None,
        volatility_level: None,
    };

    if risk.benchmark_risky() {
        info!(reason = ?risk.reason(config), "market risk elevated");
        return risk;
    }

    let (volatility, level) = check_volatility(market, config);
    risk.volatility = Some(volatility);
    risk.volatility_level = level;

    if let Some(reason) = risk.reason(config) {
        info!(%reason, "market risk elevated");
    }
    risk
}

fn check_benchmark(
    market: &dyn MarketDataPort,
    config: &StrategyConfig,
    today: NaiveDate,
) -> (GateOutcome, Option<f64>) {
    let (start, end) = config.history_window(today);
    let bars = match market.get_bars(&config.benchmark, Timeframe::Day, start, end) {
        Ok(bars) => bars,
        Err(e) => {
            warn!(
                symbol = %config.benchmark,
                error = %e,
                "benchmark fetch failed, treating as not risky"
            );
            return (GateOutcome::FetchError(e.to_string()), None);
        }
    };

    let prices = closes(&bars);
    let rsi = Indicator::Rsi(config.rsi_period);
    if prices.len() < rsi.min_prices() {
        warn!(
            symbol = %config.benchmark,
            have = prices.len(),
            need = rsi.min_prices(),
            "not enough benchmark history for {}, treating as not risky",
            rsi
        );
        return (
            GateOutcome::InsufficientData {
                have: prices.len(),
                need: rsi.min_prices(),
            },
            None,
        );
    }

    let value = rsi.compute(&prices);
    debug!(symbol = %config.benchmark, indicator = %rsi, value, "benchmark momentum");
    (GateOutcome::Definitive(value > config.rsi_threshold), Some(value))
}

fn check_volatility(
    market: &dyn MarketDataPort,
    config: &StrategyConfig,
) -> (GateOutcome, Option<f64>) {
    let quote = match market.get_latest_quote(&config.volatility_index) {
        Ok(Some(q)) => q,
        Ok(None) => {
            warn!(symbol = %config.volatility_index, "no volatility quote, treating as not risky");
            return (GateOutcome::InsufficientData { have: 0, need: 1 }, None);
        }
        Err(e) => {
            warn!(
                symbol = %config.volatility_index,
                error = %e,
                "volatility fetch failed, treating as not risky"
            );
            return (GateOutcome::FetchError(e.to_string()), None);
        }
    };

    // Index level is the last trade only; ask/bid are not a level.
    match quote.last_price.filter(|p| p.is_finite()) {
        Some(level) => {
            debug!(symbol = %config.volatility_index, level, "volatility level");
            (GateOutcome::Definitive(level > config.volatility_threshold), Some(level))
        }
        None => {
            warn!(
                symbol = %config.volatility_index,
                "volatility quote has no last price, treating as not risky"
            );
            (GateOutcome::InsufficientData { have: 0, need: 1 }, None)
        }
    }
}
