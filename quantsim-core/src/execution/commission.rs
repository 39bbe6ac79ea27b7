//! Commission models: simulated broker charges per fill.

/// Commission charged for a fill of `quantity` shares at `price`.
pub trait CommissionModel {
    fn commission(&self, quantity: f64, price: f64) -> f64;

    fn name(&self) -> &str;
}

/// No charges at all. The default for toy backtests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroCommission;

impl CommissionModel for ZeroCommission {
    fn commission(&self, _quantity: f64, _price: f64) -> f64 {
        0.0
    }

    fn name(&self) -> &str {
        "ZeroCommission"
    }
}

/// Per-share rate with a minimum charge, the common US retail shape.
#[derive(Debug, Clone, Copy)]
pub struct PerShare {
    pub rate: f64,
    pub minimum: f64,
}

impl PerShare {
    pub fn new(rate: f64, minimum: f64) -> Self {
        assert!(rate >= 0.0 && minimum >= 0.0, "rates must be >= 0");
        Self { rate, minimum }
    }
}

impl CommissionModel for PerShare {
    fn commission(&self, quantity: f64, _price: f64) -> f64 {
        (quantity * self.rate).max(self.minimum)
    }

    fn name(&self) -> &str {
        "PerShare"
    }
}

/// Flat fee per executed order, the common European/UK retail shape.
#[derive(Debug, Clone, Copy)]
pub struct FlatFee {
    pub fee: f64,
}

impl FlatFee {
    pub fn new(fee: f64) -> Self {
        assert!(fee >= 0.0, "fee must be >= 0");
        Self { fee }
    }
}

impl CommissionModel for FlatFee {
    fn commission(&self, _quantity: f64, _price: f64) -> f64 {
        self.fee
    }

    fn name(&self) -> &str {
        "FlatFee"
    }
}
