//! Domain error types.

use crate::domain::universe::UniverseError;

/// Top-level error type for dcatrader.
#[derive(Debug, thiserror::Error)]
pub enum DcaError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error("market data error for {symbol}: {reason}")]
    MarketData { symbol: String, reason: String },

    #[error("broker error for {symbol}: {reason}")]
    Broker { symbol: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DcaError {
    pub fn market_data(symbol: &str, reason: impl Into<String>) -> Self {
        DcaError::MarketData {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    pub fn broker(symbol: &str, reason: impl Into<String>) -> Self {
        DcaError::Broker {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        DcaError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&DcaError> for std::process::ExitCode {
    fn from(err: &DcaError) -> Self {
        let code: u8 = match err {
            DcaError::Io(_) => 1,
            DcaError::ConfigParse { .. }
            | DcaError::ConfigMissing { .. }
            | DcaError::ConfigInvalid { .. }
            | DcaError::Universe(_) => 2,
            DcaError::MarketData { .. } => 3,
            DcaError::Broker { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
