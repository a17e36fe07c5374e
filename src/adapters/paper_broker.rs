//! In-process paper broker.
//!
//! Accepts every order, assigns sequential ids and optionally appends each
//! order to a CSV journal. No fills, no positions.

use crate::domain::error::DcaError;
use crate::domain::order::{OrderHandle, OrderIntent};
use crate::ports::broker_port::BrokerPort;
use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::debug;

const JOURNAL_HEADER: [&str; 6] = ["id", "date", "symbol", "side", "type", "quantity"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperOrder {
    pub id: String,
    pub intent: OrderIntent,
}

pub struct PaperBroker {
    trade_date: NaiveDate,
    journal: Option<PathBuf>,
    next_id: Cell<u64>,
    orders: RefCell<Vec<PaperOrder>>,
}

impl PaperBroker {
    pub fn new(trade_date: NaiveDate) -> Self {
        Self {
            trade_date,
            journal: None,
            next_id: Cell::new(1),
            orders: RefCell::new(Vec::new()),
        }
    }

    /// Journals orders to `path`. Ids continue after the orders already in
    /// the journal so they stay unique across runs.
    pub fn with_journal(mut self, path: PathBuf) -> Result<Self, DcaError> {
        let journaled = Self::journaled_orders(&path)?;
        self.next_id.set(journaled + 1);
        self.journal = Some(path);
        Ok(self)
    }

    pub fn orders(&self) -> Vec<PaperOrder> {
        self.orders.borrow().clone()
    }

    fn journaled_orders(path: &PathBuf) -> Result<u64, DcaError> {
        if !path.exists() {
            return Ok(0);
        }
        let mut rdr = csv::Reader::from_path(path).map_err(|e| {
            DcaError::broker("paper", format!("cannot read journal {}: {}", path.display(), e))
        })?;
        let mut count = 0;
        for record in rdr.records() {
            record.map_err(|e| {
                DcaError::broker("paper", format!("corrupt journal {}: {}", path.display(), e))
            })?;
            count += 1;
        }
        Ok(count)
    }

    fn append_to_journal(&self, path: &PathBuf, order: &PaperOrder) -> Result<(), DcaError> {
        let symbol = &order.intent.symbol;
        let exists = path.exists();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = csv::Writer::from_writer(file);

        let to_err =
            |e: csv::Error| DcaError::broker(symbol, format!("journal write failed: {}", e));
        if !exists {
            writer.write_record(JOURNAL_HEADER).map_err(to_err)?;
        }
        writer
            .write_record([
                order.id.clone(),
                self.trade_date.to_string(),
                symbol.clone(),
                order.intent.side.to_string(),
                order.intent.order_type.to_string(),
                order.intent.quantity.to_string(),
            ])
            .map_err(to_err)?;
        writer.flush()?;
        Ok(())
    }
}

impl BrokerPort for PaperBroker {
    fn submit_order(&self, intent: &OrderIntent) -> Result<Option<OrderHandle>, DcaError> {
        if intent.quantity == 0 {
            return Ok(None);
        }

        let seq = self.next_id.get();
        let order = PaperOrder {
            id: format!("PAPER-{:06}", seq),
            intent: intent.clone(),
        };

        if let Some(path) = &self.journal {
            self.append_to_journal(path, &order)?;
        }

        self.next_id.set(seq + 1);
        debug!(
            order_id = %order.id,
            symbol = %intent.symbol,
            quantity = intent.quantity,
            "paper order accepted"
        );
        let handle = OrderHandle {
            id: order.id.clone(),
        };
        self.orders.borrow_mut().push(order);
        Ok(Some(handle))
    }
}
