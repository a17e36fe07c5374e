//! Order execution port trait.

use crate::domain::error::DcaError;
use crate::domain::order::{OrderHandle, OrderIntent};

pub trait BrokerPort {
    /// Submit an order. `Ok(None)` means the broker declined without an error.
    fn submit_order(&self, intent: &OrderIntent) -> Result<Option<OrderHandle>, DcaError>;
}
