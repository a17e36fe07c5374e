//! Port traits: the boundary between domain logic and the outside world.

pub mod broker_port;
pub mod config_port;
pub mod market_data_port;
