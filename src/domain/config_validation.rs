//! Configuration validation.
//!
//! Validates all config fields before a run starts. Missing keys are fine
//! (defaults apply); present keys must hold usable values.

use crate::domain::config::{parse_price_priority, STRATEGY_SECTION};
use crate::domain::error::DcaError;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use std::str::FromStr;

pub const MARKET_DATA_SECTION: &str = "market_data";
pub const BROKER_SECTION: &str = "broker";

pub const SUPPORTED_BROKERS: [&str; 1] = ["paper"];

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), DcaError> {
    validate_symbols(config)?;
    validate_dca_amount(config)?;
    validate_period(config, "sma_period")?;
    validate_period(config, "rsi_period")?;
    validate_rsi_threshold(config)?;
    validate_volatility_threshold(config)?;
    validate_lookback(config)?;
    validate_index_symbol(config, "benchmark")?;
    validate_index_symbol(config, "volatility_index")?;
    validate_price_priority(config)?;
    Ok(())
}

pub fn validate_broker_config(config: &dyn ConfigPort) -> Result<(), DcaError> {
    match config.get_string(MARKET_DATA_SECTION, "path") {
        Some(p) if !p.trim().is_empty() => {}
        _ => {
            return Err(DcaError::ConfigMissing {
                section: MARKET_DATA_SECTION.to_string(),
                key: "path".to_string(),
            })
        }
    }

    let kind = config
        .get_string(BROKER_SECTION, "kind")
        .unwrap_or_else(|| "paper".to_string());
    if !SUPPORTED_BROKERS.contains(&kind.trim().to_lowercase().as_str()) {
        return Err(DcaError::invalid(
            BROKER_SECTION,
            "kind",
            format!("unsupported broker '{}' (supported: {})", kind, SUPPORTED_BROKERS.join(", ")),
        ));
    }
    Ok(())
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), DcaError> {
    if let Some(list) = config.get_string(STRATEGY_SECTION, "symbols") {
        parse_symbols(&list)?;
    }
    Ok(())
}

/// Parses a strategy key that is present; absent keys are `None`.
fn parse_present<T: FromStr>(config: &dyn ConfigPort, key: &str) -> Result<Option<T>, DcaError> {
    match config.get_string(STRATEGY_SECTION, key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            DcaError::invalid(
                STRATEGY_SECTION,
                key,
                format!("'{}' is not a valid number", raw.trim()),
            )
        }),
    }
}

fn validate_dca_amount(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let Some(value) = parse_present::<f64>(config, "dca_amount")? else {
        return Ok(());
    };
    if !value.is_finite() || value <= 0.0 {
        return Err(DcaError::invalid(
            STRATEGY_SECTION,
            "dca_amount",
            "dca_amount must be positive",
        ));
    }
    Ok(())
}

fn validate_period(config: &dyn ConfigPort, key: &str) -> Result<(), DcaError> {
    let Some(value) = parse_present::<i64>(config, key)? else {
        return Ok(());
    };
    if value < 1 {
        return Err(DcaError::invalid(
            STRATEGY_SECTION,
            key,
            format!("{} must be at least 1", key),
        ));
    }
    Ok(())
}

fn validate_rsi_threshold(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let Some(value) = parse_present::<f64>(config, "rsi_threshold")? else {
        return Ok(());
    };
    if !(value > 0.0 && value <= 100.0) {
        return Err(DcaError::invalid(
            STRATEGY_SECTION,
            "rsi_threshold",
            "rsi_threshold must be in (0, 100]",
        ));
    }
    Ok(())
}

fn validate_volatility_threshold(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let Some(value) = parse_present::<f64>(config, "volatility_threshold")? else {
        return Ok(());
    };
    if !value.is_finite() || value <= 0.0 {
        return Err(DcaError::invalid(
            STRATEGY_SECTION,
            "volatility_threshold",
            "volatility_threshold must be positive",
        ));
    }
    Ok(())
}

fn validate_lookback(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let days = parse_present::<i64>(config, "lookback_days")?.unwrap_or(1);
    if !(1..=i64::from(u16::MAX)).contains(&days) {
        return Err(DcaError::invalid(
            STRATEGY_SECTION,
            "lookback_days",
            "lookback_days must be between 1 and 65535",
        ));
    }
    let padding = parse_present::<i64>(config, "lookback_padding_days")?.unwrap_or(0);
    if !(0..=i64::from(u16::MAX)).contains(&padding) {
        return Err(DcaError::invalid(
            STRATEGY_SECTION,
            "lookback_padding_days",
            "lookback_padding_days must be between 0 and 65535",
        ));
    }
    Ok(())
}

fn validate_index_symbol(config: &dyn ConfigPort, key: &str) -> Result<(), DcaError> {
    match config.get_string(STRATEGY_SECTION, key) {
        Some(s) if s.trim().is_empty() => Err(DcaError::invalid(
            STRATEGY_SECTION,
            key,
            format!("{} must not be empty", key),
        )),
        _ => Ok(()),
    }
}

fn validate_price_priority(config: &dyn ConfigPort) -> Result<(), DcaError> {
    if let Some(list) = config.get_string(STRATEGY_SECTION, "price_priority") {
        parse_price_priority(&list)?;
    }
    Ok(())
}
