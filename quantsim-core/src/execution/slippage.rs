//! Slippage models: adjust the policy price for simulated market impact.

use crate::domain::OrderDirection;

/// Computes the executed price from the policy's base price.
///
/// Buys pay up, sells receive less; a model must never improve the price
/// for the trader.
pub trait SlippageModel {
    fn adjust(&self, base_price: f64, direction: OrderDirection) -> f64;

    fn name(&self) -> &str;
}

/// Frictionless fills at the policy price.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSlippage;

impl SlippageModel for NoSlippage {
    fn adjust(&self, base_price: f64, _direction: OrderDirection) -> f64 {
        base_price
    }

    fn name(&self) -> &str {
        "NoSlippage"
    }
}

/// Constant slippage in basis points of the base price.
#[derive(Debug, Clone, Copy)]
pub struct FixedBps {
    pub bps: f64,
}

impl FixedBps {
    pub fn new(bps: f64) -> Self {
        assert!(bps >= 0.0, "bps must be >= 0");
        Self { bps }
    }
}

impl SlippageModel for FixedBps {
    fn adjust(&self, base_price: f64, direction: OrderDirection) -> f64 {
        base_price * (1.0 + direction.sign() * self.bps / 10_000.0)
    }

    fn name(&self) -> &str {
        "FixedBps"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_slippage_is_identity() {
        let model = NoSlippage;
        assert_eq!(model.adjust(100.0, OrderDirection::Buy), 100.0);
        assert_eq!(model.adjust(100.0, OrderDirection::Sell), 100.0);
    }

    #[test]
    fn fixed_bps_buys_pay_up() {
        let model = FixedBps::new(10.0); // 10 bps = 0.10%
        assert_eq!(model.adjust(100.0, OrderDirection::Buy), 100.1);
    }

    #[test]
    fn fixed_bps_sells_receive_less() {
        let model = FixedBps::new(10.0);
        assert_eq!(model.adjust(100.0, OrderDirection::Sell), 99.9);
    }
}
