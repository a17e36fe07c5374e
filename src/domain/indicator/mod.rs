//! Technical indicators over closing-price series.
//!
//! Both indicators reduce a chronological price series to a single value for
//! the most recent bar. They never fail: short series map to a documented
//! fallback value instead.

pub mod rsi;
pub mod sma;

pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

use std::fmt;

/// Indicator identity plus its period, used for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    Sma(usize),
    Rsi(usize),
}

impl Indicator {
    pub fn period(&self) -> usize {
        match self {
            Indicator::Sma(period) | Indicator::Rsi(period) => *period,
        }
    }

    /// Number of prices needed before the value is computed rather than defaulted.
    pub fn min_prices(&self) -> usize {
        match self {
            Indicator::Sma(period) => *period,
            Indicator::Rsi(period) => period + 1,
        }
    }

    pub fn compute(&self, prices: &[f64]) -> f64 {
        match self {
            Indicator::Sma(period) => calculate_sma(prices, *period),
            Indicator::Rsi(period) => calculate_rsi(prices, *period),
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indicator::Sma(period) => write!(f, "SMA({})", period),
            Indicator::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}
