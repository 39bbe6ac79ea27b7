//! Position sizers: turn a signal into a candidate quantity.

use super::AccountView;
use crate::domain::SignalEvent;

/// Computes an order quantity from account equity and a policy.
///
/// Sizers handle Long/Short entries only; Exit signals are sized by the
/// pipeline from the open position itself.
pub trait PositionSizer {
    fn size(&self, signal: &SignalEvent, account: &AccountView) -> f64;

    fn name(&self) -> &str;
}

/// Always trade a fixed number of shares.
#[derive(Debug, Clone, Copy)]
pub struct FixedQuantity {
    pub quantity: f64,
}

impl FixedQuantity {
    pub fn new(quantity: f64) -> Self {
        assert!(quantity > 0.0, "quantity must be > 0");
        Self { quantity }
    }
}

impl PositionSizer for FixedQuantity {
    fn size(&self, _signal: &SignalEvent, _account: &AccountView) -> f64 {
        self.quantity
    }

    fn name(&self) -> &str {
        "FixedQuantity"
    }
}

/// Allocate a fixed fraction of current equity, scaled by signal strength,
/// floored to whole shares at the last observed price.
#[derive(Debug, Clone, Copy)]
pub struct FixedFraction {
    pub fraction: f64,
}

impl FixedFraction {
    pub fn new(fraction: f64) -> Self {
        assert!(
            fraction > 0.0 && fraction <= 1.0,
            "fraction must be in (0, 1]"
        );
        Self { fraction }
    }
}

impl PositionSizer for FixedFraction {
    fn size(&self, signal: &SignalEvent, account: &AccountView) -> f64 {
        let price = match account.last_price(&signal.symbol) {
            Some(p) if p > 0.0 => p,
            _ => return 0.0,
        };
        let strength = signal.strength.unwrap_or(1.0).clamp(0.0, 1.0);
        let notional = account.equity * self.fraction * strength;
        (notional / price).floor()
    }

    fn name(&self) -> &str {
        "FixedFraction"
    }
}
