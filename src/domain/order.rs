//! Order intents and dollar-budget sizing.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "market"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderIntent {
    pub symbol: String,
    pub quantity: u64,
    pub side: OrderSide,
    pub order_type: OrderType,
}

impl OrderIntent {
    pub fn market_buy(symbol: &str, quantity: u64) -> Self {
        Self {
            symbol: symbol.to_string(),
            quantity,
            side: OrderSide::Buy,
            order_type: OrderType::Market,
        }
    }
}

/// Broker acknowledgement for an accepted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderHandle {
    pub id: String,
}

/// Whole shares affordable with `budget` at `price`.
pub fn shares_for_budget(budget: f64, price: f64) -> u64 {
    if !price.is_finite() || price <= 0.0 || !budget.is_finite() || budget <= 0.0 {
        return 0;
    }
    (budget / price).floor() as u64
}
