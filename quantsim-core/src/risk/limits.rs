//! Risk managers: veto or shrink a candidate order.

use super::AccountView;
use crate::domain::{OrderDirection, OrderEvent};

/// Outcome of a risk review.
#[derive(Debug, Clone, PartialEq)]
pub enum RiskDecision {
    Approve,
    /// Keep the order but at a reduced quantity.
    Shrink { quantity: f64 },
    Veto { reason: String },
}

/// Reviews a concrete candidate order against risk limits.
pub trait RiskManager {
    fn review(&self, order: &OrderEvent, account: &AccountView) -> RiskDecision;

    fn name(&self) -> &str;
}

/// Pass-through: every order approved as sized.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRiskLimits;

impl RiskManager for NoRiskLimits {
    fn review(&self, _order: &OrderEvent, _account: &AccountView) -> RiskDecision {
        RiskDecision::Approve
    }

    fn name(&self) -> &str {
        "NoRiskLimits"
    }
}

/// Cap gross notional exposure per symbol.
///
/// Orders that would push `|position| * price` past the cap are shrunk to
/// fit; if there is no room at all (or no known price), the order is vetoed.
/// Orders that reduce exposure always pass.
#[derive(Debug, Clone, Copy)]
pub struct MaxExposure {
    pub max_notional_per_symbol: f64,
}

impl MaxExposure {
    pub fn new(max_notional_per_symbol: f64) -> Self {
        assert!(max_notional_per_symbol > 0.0, "cap must be > 0");
        Self {
            max_notional_per_symbol,
        }
    }
}

impl RiskManager for MaxExposure {
    fn review(&self, order: &OrderEvent, account: &AccountView) -> RiskDecision {
        let held = account.position_quantity(&order.symbol);
        let signed = order.direction.sign() * order.quantity;
        let resulting = held + signed;

        // Reducing gross exposure is always allowed.
        if resulting.abs() <= held.abs() {
            return RiskDecision::Approve;
        }

        let price = match account.last_price(&order.symbol) {
            Some(p) if p > 0.0 => p,
            _ => {
                return RiskDecision::Veto {
                    reason: format!("no observed price for '{}'", order.symbol),
                }
            }
        };

        if resulting.abs() * price <= self.max_notional_per_symbol {
            return RiskDecision::Approve;
        }

        let room = self.max_notional_per_symbol / price - held.abs();
        let allowed = room.floor();
        if allowed >= 1.0 {
            RiskDecision::Shrink { quantity: allowed }
        } else {
            RiskDecision::Veto {
                reason: format!(
                    "exposure cap {:.2} reached for '{}'",
                    self.max_notional_per_symbol, order.symbol
                ),
            }
        }
    }

    fn name(&self) -> &str {
        "MaxExposure"
    }
}

/// Helper used by tests and the pipeline: does the order extend exposure?
pub(crate) fn extends_position(direction: OrderDirection, held: f64) -> bool {
    match direction {
        OrderDirection::Buy => held >= 0.0,
        OrderDirection::Sell => held <= 0.0,
    }
}
