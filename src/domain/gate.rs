//! Tagged gate outcomes.
//!
//! A gate answers a yes/no question about market data. When it cannot answer
//! (too little data, a failed fetch) the outcome says so, and the caller picks
//! the default it falls back to.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    Definitive(bool),
    InsufficientData { have: usize, need: usize },
    FetchError(String),
}

impl GateOutcome {
    pub fn is_definitive(&self) -> bool {
        matches!(self, GateOutcome::Definitive(_))
    }

    /// The definitive answer, or `default` when the gate could not decide.
    pub fn value_or(&self, default: bool) -> bool {
        match self {
            GateOutcome::Definitive(value) => *value,
            _ => default,
        }
    }
}

impl fmt::Display for GateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateOutcome::Definitive(value) => write!(f, "{}", value),
            GateOutcome::InsufficientData { have, need } => {
                write!(f, "insufficient data ({} of {} points)", have, need)
            }
            GateOutcome::FetchError(reason) => write!(f, "fetch error: {}", reason),
        }
    }
}
