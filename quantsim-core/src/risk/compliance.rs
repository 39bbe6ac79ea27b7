//! Compliance gates: final veto on externally imposed constraints.

use super::limits::extends_position;
use super::AccountView;
use crate::domain::{OrderDirection, OrderEvent};
use std::collections::HashSet;

/// Outcome of a compliance check.
#[derive(Debug, Clone, PartialEq)]
pub enum ComplianceDecision {
    Approve,
    Reject { reason: String },
}

/// Enforces trading constraints independent of sizing and risk.
pub trait ComplianceGate {
    fn check(&self, order: &OrderEvent, account: &AccountView) -> ComplianceDecision;

    fn name(&self) -> &str;
}

/// Pass-through gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRestrictions;

impl ComplianceGate for NoRestrictions {
    fn check(&self, _order: &OrderEvent, _account: &AccountView) -> ComplianceDecision {
        ComplianceDecision::Approve
    }

    fn name(&self) -> &str {
        "NoRestrictions"
    }
}

/// Disallow short selling: a sell may close a long but never open or extend
/// a short.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongOnly;

impl ComplianceGate for LongOnly {
    fn check(&self, order: &OrderEvent, account: &AccountView) -> ComplianceDecision {
        if order.direction == OrderDirection::Buy {
            return ComplianceDecision::Approve;
        }
        let held = account.position_quantity(&order.symbol);
        if extends_position(OrderDirection::Sell, held) || order.quantity > held {
            ComplianceDecision::Reject {
                reason: format!("short selling disallowed for '{}'", order.symbol),
            }
        } else {
            ComplianceDecision::Approve
        }
    }

    fn name(&self) -> &str {
        "LongOnly"
    }
}

/// Reject any order in a restricted symbol.
#[derive(Debug, Clone, Default)]
pub struct RestrictedList {
    symbols: HashSet<String>,
}

impl RestrictedList {
    pub fn new(symbols: impl IntoIterator<Item = String>) -> Self {
        Self {
            symbols: symbols.into_iter().collect(),
        }
    }
}

impl ComplianceGate for RestrictedList {
    fn check(&self, order: &OrderEvent, _account: &AccountView) -> ComplianceDecision {
        if self.symbols.contains(&order.symbol) {
            ComplianceDecision::Reject {
                reason: format!("'{}' is on the restricted list", order.symbol),
            }
        } else {
            ComplianceDecision::Approve
        }
    }

    fn name(&self) -> &str {
        "RestrictedList"
    }
}
