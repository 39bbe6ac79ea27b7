//! Signal → order pipeline: sizing, risk checks, compliance gate.
//!
//! The three stages run in a fixed order — sizing first (risk limits need a
//! concrete candidate quantity), compliance last (final veto). Each stage is
//! swappable behind its own trait. A fully vetoed signal producing zero
//! orders is a normal outcome, recorded on the run result, not an error.

mod compliance;
mod limits;
mod pipeline;
mod sizer;

pub use compliance::{ComplianceDecision, ComplianceGate, LongOnly, NoRestrictions, RestrictedList};
pub use limits::{MaxExposure, NoRiskLimits, RiskDecision, RiskManager};
pub use pipeline::{OrderPipeline, PipelineOutput, Rejection, RejectionStage};
pub use sizer::{FixedFraction, FixedQuantity, PositionSizer};

use std::collections::HashMap;

/// Read-only account snapshot handed to pipeline stages.
///
/// This is the only window onto portfolio state the pipeline gets; it is
/// assembled by the driver before each signal is processed and carries no
/// reference back to the live ledger.
#[derive(Debug, Clone)]
pub struct AccountView {
    pub equity: f64,
    pub cash: f64,
    /// Signed position quantity per symbol (flat symbols absent).
    pub positions: HashMap<String, f64>,
    /// Last observed price per symbol.
    pub last_prices: HashMap<String, f64>,
}

impl AccountView {
    /// Signed quantity held in `symbol`, zero when flat.
    pub fn position_quantity(&self, symbol: &str) -> f64 {
        self.positions.get(symbol).copied().unwrap_or(0.0)
    }

    /// Last observed price for `symbol`, if any market event has been seen.
    pub fn last_price(&self, symbol: &str) -> Option<f64> {
        self.last_prices.get(symbol).copied()
    }
}
