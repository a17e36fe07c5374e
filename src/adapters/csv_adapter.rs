//! CSV directory market data adapter.
//!
//! Layout under `base_path`:
//! - `<SYMBOL>.csv`: daily bars, header `date,open,high,low,close,volume`
//! - `quotes.csv`: latest quotes, header `symbol,last,ask,bid`; an empty cell
//!   means that side of the quote is absent

use crate::domain::error::DcaError;
use crate::domain::market::{Bar, Quote, Timeframe};
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub const QUOTES_FILE: &str = "quotes.csv";

#[derive(Debug)]
pub struct CsvMarketData {
    base_path: PathBuf,
}

impl CsvMarketData {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Setup check: the data directory must exist before a run starts.
    pub fn connect(base_path: PathBuf) -> Result<Self, DcaError> {
        if !base_path.is_dir() {
            return Err(DcaError::Io(std::io::Error::new(
                ErrorKind::NotFound,
                format!("market data directory {} not found", base_path.display()),
            )));
        }
        Ok(Self::new(base_path))
    }

    fn bars_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    /// Read a file, treating "not found" as `None`.
    fn read_optional(&self, path: &PathBuf, symbol: &str) -> Result<Option<String>, DcaError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DcaError::market_data(
                symbol,
                format!("failed to read {}: {}", path.display(), e),
            )),
        }
    }
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    symbol: &str,
) -> Result<T, DcaError>
where
    T::Err: std::fmt::Display,
{
    record
        .get(index)
        .ok_or_else(|| DcaError::market_data(symbol, format!("missing {} column", name)))?
        .trim()
        .parse()
        .map_err(|e| DcaError::market_data(symbol, format!("invalid {} value: {}", name, e)))
}

fn parse_price(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    symbol: &str,
) -> Result<Option<f64>, DcaError> {
    match record.get(index).map(str::trim) {
        None | Some("") => Ok(None),
        Some(_) => parse_field(record, index, name, symbol).map(Some),
    }
}

impl MarketDataPort for CsvMarketData {
    fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DcaError> {
        // Files hold daily bars only.
        match timeframe {
            Timeframe::Day => {}
        }

        let path = self.bars_path(symbol);
        let content = match self.read_optional(&path, symbol)? {
            Some(c) => c,
            None => return Ok(Vec::new()),
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result
                .map_err(|e| DcaError::market_data(symbol, format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(0)
                .ok_or_else(|| DcaError::market_data(symbol, "missing date column"))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                DcaError::market_data(symbol, format!("invalid date format: {}", e))
            })?;

            if date < start || date > end {
                continue;
            }

            bars.push(Bar {
                symbol: symbol.to_string(),
                date,
                open: parse_field(&record, 1, "open", symbol)?,
                high: parse_field(&record, 2, "high", symbol)?,
                low: parse_field(&record, 3, "low", symbol)?,
                close: parse_field(&record, 4, "close", symbol)?,
                volume: parse_field(&record, 5, "volume", symbol)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn get_latest_quote(&self, symbol: &str) -> Result<Option<Quote>, DcaError> {
        let path = self.base_path.join(QUOTES_FILE);
        let content = match self.read_optional(&path, symbol)? {
            Some(c) => c,
            None => return Ok(None),
        };

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        for result in rdr.records() {
            let record = result
                .map_err(|e| DcaError::market_data(symbol, format!("CSV parse error: {}", e)))?;

            let row_symbol = record.get(0).map(str::trim).unwrap_or_default();
            if !row_symbol.eq_ignore_ascii_case(symbol) {
                continue;
            }

            return Ok(Some(Quote {
                symbol: symbol.to_string(),
                last_price: parse_price(&record, 1, "last", symbol)?,
                ask_price: parse_price(&record, 2, "ask", symbol)?,
                bid_price: parse_price(&record, 3, "bid", symbol)?,
            }));
        }

        Ok(None)
    }
}
