//! Core domain types and logic.

pub mod config;
pub mod config_validation;
pub mod error;
pub mod gate;
pub mod indicator;
pub mod market;
pub mod order;
pub mod risk_gate;
pub mod runner;
pub mod trend_gate;
pub mod universe;
