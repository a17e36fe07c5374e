//! Market data shapes: daily bars, quotes and price-source priority.

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Chronological closing prices. Input bars may arrive in any order.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    let mut ordered: Vec<&Bar> = bars.iter().collect();
    ordered.sort_by_key(|b| b.date);
    ordered.into_iter().map(|b| b.close).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Day,
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Day => write!(f, "1Day"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceSource {
    Last,
    Ask,
    Bid,
}

pub const DEFAULT_PRICE_PRIORITY: [PriceSource; 3] =
    [PriceSource::Last, PriceSource::Ask, PriceSource::Bid];

impl PriceSource {
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "last" => Some(PriceSource::Last),
            "ask" => Some(PriceSource::Ask),
            "bid" => Some(PriceSource::Bid),
            _ => None,
        }
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceSource::Last => write!(f, "last"),
            PriceSource::Ask => write!(f, "ask"),
            PriceSource::Bid => write!(f, "bid"),
        }
    }
}

/// Point-in-time price observation; any side may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub last_price: Option<f64>,
    pub ask_price: Option<f64>,
    pub bid_price: Option<f64>,
}

impl Quote {
    pub fn price(&self, source: PriceSource) -> Option<f64> {
        match source {
            PriceSource::Last => self.last_price,
            PriceSource::Ask => self.ask_price,
            PriceSource::Bid => self.bid_price,
        }
    }

    /// First source in `priority` holding a finite, positive price.
    pub fn effective_price(&self, priority: &[PriceSource]) -> Option<(PriceSource, f64)> {
        priority.iter().find_map(|&source| {
            self.price(source)
                .filter(|p| p.is_finite() && *p > 0.0)
                .map(|p| (source, p))
        })
    }
}
