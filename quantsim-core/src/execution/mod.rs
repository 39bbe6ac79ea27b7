//! Simulated execution: order events in, fill events out.
//!
//! The anti-lookahead rule lives here: an order derived from bar T is priced
//! from the first bar strictly after T, never from bar T itself. Which price
//! of that bar is used (open or close) is a pluggable policy, as is slippage
//! and commission. An order placed after the final bar is unfillable — it is
//! dropped by the driver and recorded, never retried.

mod commission;
mod slippage;

pub use commission::{CommissionModel, FlatFee, PerShare, ZeroCommission};
pub use slippage::{FixedBps, NoSlippage, SlippageModel};

use crate::domain::{Bar, FillEvent, IdGenerator, OrderEvent, OrderKind};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;

/// An order for which no future price data exists.
///
/// Expected at the end of every simulation that trades on the last bar;
/// the driver drops the order and continues.
#[derive(Debug, Clone, Error)]
#[error("no future price data to fill order {order_id:?} for '{symbol}' placed at {timestamp}")]
pub struct UnfillableOrder {
    pub order_id: crate::domain::OrderId,
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
}

/// Which price of the fill bar a market order executes at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPolicy {
    /// Fill at the open of the bar after the order. The canonical
    /// anti-lookahead policy.
    NextBarOpen,
    /// Fill at the close of the bar after the order.
    NextBarClose,
}

/// Order-to-fill translation contract.
pub trait ExecutionHandler {
    fn execute(
        &self,
        order: &OrderEvent,
        ids: &mut IdGenerator,
    ) -> Result<FillEvent, UnfillableOrder>;
}

/// Broker simulation over a read-only copy of the bar series.
pub struct SimulatedExecution {
    bars_by_symbol: HashMap<String, Vec<Bar>>,
    policy: FillPolicy,
    slippage: Box<dyn SlippageModel>,
    commission: Box<dyn CommissionModel>,
    venue: String,
}

impl SimulatedExecution {
    pub fn new(
        bars_by_symbol: HashMap<String, Vec<Bar>>,
        policy: FillPolicy,
        slippage: Box<dyn SlippageModel>,
        commission: Box<dyn CommissionModel>,
    ) -> Self {
        Self {
            bars_by_symbol,
            policy,
            slippage,
            commission,
            venue: "SIM".to_string(),
        }
    }

    /// First bar strictly after `timestamp` for `symbol`.
    fn next_bar(&self, symbol: &str, timestamp: DateTime<Utc>) -> Option<&Bar> {
        let bars = self.bars_by_symbol.get(symbol)?;
        let idx = bars.partition_point(|b| b.timestamp <= timestamp);
        bars.get(idx)
    }
}

impl ExecutionHandler for SimulatedExecution {
    fn execute(
        &self,
        order: &OrderEvent,
        ids: &mut IdGenerator,
    ) -> Result<FillEvent, UnfillableOrder> {
        let unfillable = || UnfillableOrder {
            order_id: order.id,
            symbol: order.symbol.clone(),
            timestamp: order.timestamp,
        };

        let bar = self
            .next_bar(&order.symbol, order.timestamp)
            .ok_or_else(unfillable)?;

        let base = match self.policy {
            FillPolicy::NextBarOpen => bar.open,
            FillPolicy::NextBarClose => bar.close,
        };

        let price = match order.kind {
            OrderKind::Market => self.slippage.adjust(base, order.direction),
            OrderKind::Limit { limit_price } => {
                // Checked against the fill bar only; a miss drops the order.
                let touched = match order.direction {
                    crate::domain::OrderDirection::Buy => bar.low <= limit_price,
                    crate::domain::OrderDirection::Sell => bar.high >= limit_price,
                };
                if !touched {
                    return Err(unfillable());
                }
                match order.direction {
                    crate::domain::OrderDirection::Buy => base.min(limit_price),
                    crate::domain::OrderDirection::Sell => base.max(limit_price),
                }
            }
        };

        let commission = self.commission.commission(order.quantity, price);

        Ok(FillEvent {
            id: ids.next_fill_id(),
            order_id: order.id,
            timestamp: bar.timestamp,
            symbol: order.symbol.clone(),
            quantity: order.quantity,
            direction: order.direction,
            price,
            commission,
            venue: self.venue.clone(),
        })
    }
}
