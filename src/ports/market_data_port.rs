//! Market data port trait.
//!
//! Calls are blocking. Timeouts and retries belong to the implementation.

use crate::domain::error::DcaError;
use crate::domain::market::{Bar, Quote, Timeframe};
use chrono::NaiveDate;

pub trait MarketDataPort {
    /// Bars for `symbol` between `start` and `end` inclusive. May be empty.
    fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DcaError>;

    /// Latest quote, or `None` when the source has nothing for `symbol`.
    fn get_latest_quote(&self, symbol: &str) -> Result<Option<Quote>, DcaError>;
}
