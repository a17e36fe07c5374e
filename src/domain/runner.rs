//! One DCA run: market risk check, then a sequential pass over the universe.
//!
//! Run states: `RiskCheck -> Halted` when the market gate flags risk, else
//! `RiskCheck -> Evaluating -> Completed`, with each symbol ending in exactly
//! one of `Skipped`, `Bought` or `Errored`. Nothing is retained between runs,
//! so repeated runs on the same day may buy the same symbol again.

use chrono::NaiveDate;
use tracing::{error, info, info_span, warn};

use crate::domain::config::StrategyConfig;
use crate::domain::error::DcaError;
use crate::domain::gate::GateOutcome;
use crate::domain::order::{shares_for_budget, OrderIntent};
use crate::domain::risk_gate::{assess_market_risk, MarketRisk};
use crate::domain::trend_gate::assess_trend;
use crate::ports::broker_port::BrokerPort;
use crate::ports::market_data_port::MarketDataPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Market risk paused buying; no symbol was evaluated.
    Halted,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NotInUptrend(GateOutcome),
    BudgetBelowOneShare { price: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    Skipped(SkipReason),
    Bought {
        order_id: String,
        quantity: u64,
        price: f64,
    },
    Errored(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolReport {
    pub symbol: String,
    pub outcome: SymbolOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub strategy: String,
    pub date: NaiveDate,
    pub market_risk: MarketRisk,
    pub status: RunStatus,
    pub universe_size: usize,
    pub symbols: Vec<SymbolReport>,
}

impl RunReport {
    pub fn orders_placed(&self) -> usize {
        self.symbols
            .iter()
            .filter(|s| matches!(s.outcome, SymbolOutcome::Bought { .. }))
            .count()
    }

    pub fn errored(&self) -> usize {
        self.symbols
            .iter()
            .filter(|s| matches!(s.outcome, SymbolOutcome::Errored(_)))
            .count()
    }

    pub fn dollars_committed(&self) -> f64 {
        self.symbols
            .iter()
            .map(|s| match s.outcome {
                SymbolOutcome::Bought {
                    quantity, price, ..
                } => quantity as f64 * price,
                _ => 0.0,
            })
            .sum()
    }
}

pub struct DcaRunner<'a> {
    config: &'a StrategyConfig,
    market: &'a dyn MarketDataPort,
    broker: &'a dyn BrokerPort,
}

impl<'a> DcaRunner<'a> {
    pub fn new(
        config: &'a StrategyConfig,
        market: &'a dyn MarketDataPort,
        broker: &'a dyn BrokerPort,
    ) -> Self {
        Self {
            config,
            market,
            broker,
        }
    }

    pub fn run(&self, today: NaiveDate) -> RunReport {
        let config = self.config;
        info!(
            strategy = %config.name,
            %today,
            universe = %config.universe.join(", "),
            dca_amount = config.dca_amount,
            "starting DCA run"
        );

        let market_risk = assess_market_risk(self.market, config, today);
        if market_risk.is_risky() {
            warn!("market risk elevated - skipping all DCA buys");
            return RunReport {
                strategy: config.name.clone(),
                date: today,
                market_risk,
                status: RunStatus::Halted,
                universe_size: config.universe.len(),
                symbols: Vec::new(),
            };
        }
        info!("market conditions OK - proceeding with DCA");

        let symbols = config
            .universe
            .iter()
            .map(|symbol| {
                let _span = info_span!("symbol", %symbol).entered();
                let outcome = match self.evaluate_symbol(symbol, today) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        error!(error = %e, "failed to process symbol");
                        SymbolOutcome::Errored(e.to_string())
                    }
                };
                SymbolReport {
                    symbol: symbol.clone(),
                    outcome,
                }
            })
            .collect();

        let report = RunReport {
            strategy: config.name.clone(),
            date: today,
            market_risk,
            status: RunStatus::Completed,
            universe_size: config.universe.len(),
            symbols,
        };
        info!(
            orders = report.orders_placed(),
            universe = report.universe_size,
            "DCA complete: {}/{} orders placed",
            report.orders_placed(),
            report.universe_size
        );
        report
    }

    fn evaluate_symbol(&self, symbol: &str, today: NaiveDate) -> Result<SymbolOutcome, DcaError> {
        let trend = assess_trend(self.market, symbol, self.config, today);
        if !trend.is_uptrend() {
            info!("[SKIP] not in uptrend");
            return Ok(SymbolOutcome::Skipped(SkipReason::NotInUptrend(trend.outcome)));
        }

        let quote = self
            .market
            .get_latest_quote(symbol)?
            .ok_or_else(|| DcaError::market_data(symbol, "no quote available"))?;

        let (source, price) = quote
            .effective_price(&self.config.price_priority)
            .ok_or_else(|| DcaError::market_data(symbol, "quote has no positive price"))?;

        let quantity = shares_for_budget(self.config.dca_amount, price);
        if quantity == 0 {
            info!(
                "[SKIP] ${:.2} not enough for 1 share at ${:.2}",
                self.config.dca_amount, price
            );
            return Ok(SymbolOutcome::Skipped(SkipReason::BudgetBelowOneShare { price }));
        }

        info!(
            %source,
            "[BUY] {} shares at ~${:.2} (${:.2})",
            quantity,
            price,
            quantity as f64 * price
        );
        let intent = OrderIntent::market_buy(symbol, quantity);
        let handle = self
            .broker
            .submit_order(&intent)?
            .ok_or_else(|| DcaError::broker(symbol, "order was not accepted"))?;

        info!(order_id = %handle.id, "[OK] order placed");
        Ok(SymbolOutcome::Bought {
            order_id: handle.id,
            quantity,
            price,
        })
    }
}
