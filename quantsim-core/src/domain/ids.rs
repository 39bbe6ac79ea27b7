//! Typed identifiers for orders and fills.

use serde::{Deserialize, Serialize};

/// Unique order identifier within a single backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u64);

/// Unique fill identifier within a single backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FillId(pub u64);

/// Monotonic id generator owned by the driver.
///
/// Ids are assigned in creation order, so a replay of the same input produces
/// the same id sequence.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next_order: u64,
    next_fill: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_order_id(&mut self) -> OrderId {
        self.next_order += 1;
        OrderId(self.next_order)
    }

    pub fn next_fill_id(&mut self) -> FillId {
        self.next_fill += 1;
        FillId(self.next_fill)
    }
}
