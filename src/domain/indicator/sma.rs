//! SMA (Simple Moving Average).
//!
//! Arithmetic mean of the last `period` closes. With fewer than `period`
//! closes the most recent close is returned (0.0 for an empty series).

pub fn calculate_sma(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period {
        return prices.last().copied().unwrap_or(0.0);
    }

    let window = &prices[prices.len() - period..];
    window.iter().sum::<f64>() / period as f64
}
