//! The signal → order pipeline: sizing, then risk, then compliance.

use super::compliance::{ComplianceDecision, ComplianceGate};
use super::limits::{RiskDecision, RiskManager};
use super::sizer::PositionSizer;
use super::AccountView;
use crate::domain::{
    IdGenerator, OrderDirection, OrderEvent, OrderKind, SignalDirection, SignalEvent,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which stage of the pipeline stopped a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionStage {
    Sizing,
    Risk,
    Compliance,
}

/// Record of a signal that produced no order (or a shrunk one would have).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rejection {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub stage: RejectionStage,
    pub reason: String,
}

/// Zero-or-more orders plus the rejections accumulated on the way.
#[derive(Debug, Default)]
pub struct PipelineOutput {
    pub orders: Vec<OrderEvent>,
    pub rejections: Vec<Rejection>,
}

/// Fixed-order pipeline over swappable stages.
pub struct OrderPipeline {
    sizer: Box<dyn PositionSizer>,
    risk: Box<dyn RiskManager>,
    compliance: Box<dyn ComplianceGate>,
}

impl OrderPipeline {
    pub fn new(
        sizer: Box<dyn PositionSizer>,
        risk: Box<dyn RiskManager>,
        compliance: Box<dyn ComplianceGate>,
    ) -> Self {
        Self {
            sizer,
            risk,
            compliance,
        }
    }

    /// Transform one signal into zero-or-more sized, checked orders.
    ///
    /// Exit signals are sized from the open position (close it in full);
    /// an Exit with no open position produces nothing at all. Long/Short
    /// entries go through the configured sizer.
    pub fn process(
        &self,
        signal: &SignalEvent,
        account: &AccountView,
        ids: &mut IdGenerator,
    ) -> PipelineOutput {
        let mut output = PipelineOutput::default();

        let (direction, quantity) = match signal.direction {
            SignalDirection::Long => (OrderDirection::Buy, self.sizer.size(signal, account)),
            SignalDirection::Short => (OrderDirection::Sell, self.sizer.size(signal, account)),
            SignalDirection::Exit => {
                let held = account.position_quantity(&signal.symbol);
                if held == 0.0 {
                    return output;
                }
                let direction = if held > 0.0 {
                    OrderDirection::Sell
                } else {
                    OrderDirection::Buy
                };
                (direction, held.abs())
            }
        };

        if quantity < 1.0 {
            output.rejections.push(Rejection {
                timestamp: signal.timestamp,
                symbol: signal.symbol.clone(),
                stage: RejectionStage::Sizing,
                reason: format!("sized to {quantity} shares by {}", self.sizer.name()),
            });
            return output;
        }

        let mut order = OrderEvent {
            id: ids.next_order_id(),
            timestamp: signal.timestamp,
            symbol: signal.symbol.clone(),
            quantity,
            direction,
            kind: OrderKind::Market,
        };

        match self.risk.review(&order, account) {
            RiskDecision::Approve => {}
            RiskDecision::Shrink { quantity } => order.quantity = quantity,
            RiskDecision::Veto { reason } => {
                output.rejections.push(Rejection {
                    timestamp: signal.timestamp,
                    symbol: signal.symbol.clone(),
                    stage: RejectionStage::Risk,
                    reason,
                });
                return output;
            }
        }

        match self.compliance.check(&order, account) {
            ComplianceDecision::Approve => {}
            ComplianceDecision::Reject { reason } => {
                output.rejections.push(Rejection {
                    timestamp: signal.timestamp,
                    symbol: signal.symbol.clone(),
                    stage: RejectionStage::Compliance,
                    reason,
                });
                return output;
            }
        }

        output.orders.push(order);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::{FixedQuantity, LongOnly, MaxExposure, NoRestrictions, NoRiskLimits};
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn signal(direction: SignalDirection) -> SignalEvent {
        SignalEvent {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap(),
            symbol: "SPY".into(),
            direction,
            strength: None,
        }
    }

    fn account(held: f64, price: f64) -> AccountView {
        let mut positions = HashMap::new();
        if held != 0.0 {
            positions.insert("SPY".to_string(), held);
        }
        let mut last_prices = HashMap::new();
        last_prices.insert("SPY".to_string(), price);
        AccountView {
            equity: 100_000.0,
            cash: 100_000.0,
            positions,
            last_prices,
        }
    }

    fn pipeline(
        risk: Box<dyn RiskManager>,
        compliance: Box<dyn ComplianceGate>,
    ) -> OrderPipeline {
        OrderPipeline::new(Box::new(FixedQuantity::new(10.0)), risk, compliance)
    }

    #[test]
    fn long_signal_becomes_buy_order() {
        let pipe = pipeline(Box::new(NoRiskLimits), Box::new(NoRestrictions));
        let mut ids = IdGenerator::new();
        let out = pipe.process(&signal(SignalDirection::Long), &account(0.0, 100.0), &mut ids);
        assert_eq!(out.orders.len(), 1);
        assert_eq!(out.orders[0].direction, OrderDirection::Buy);
        assert_eq!(out.orders[0].quantity, 10.0);
        assert!(out.rejections.is_empty());
    }

    #[test]
    fn exit_signal_closes_position_in_full() {
        let pipe = pipeline(Box::new(NoRiskLimits), Box::new(NoRestrictions));
        let mut ids = IdGenerator::new();
        let out = pipe.process(&signal(SignalDirection::Exit), &account(25.0, 100.0), &mut ids);
        assert_eq!(out.orders.len(), 1);
        assert_eq!(out.orders[0].direction, OrderDirection::Sell);
        assert_eq!(out.orders[0].quantity, 25.0);
    }

    #[test]
    fn exit_without_position_is_silent() {
        let pipe = pipeline(Box::new(NoRiskLimits), Box::new(NoRestrictions));
        let mut ids = IdGenerator::new();
        let out = pipe.process(&signal(SignalDirection::Exit), &account(0.0, 100.0), &mut ids);
        assert!(out.orders.is_empty());
        assert!(out.rejections.is_empty());
    }

    #[test]
    fn risk_veto_records_rejection_and_no_order() {
        // Cap leaves room for less than one whole share, so no shrink.
        let pipe = pipeline(Box::new(MaxExposure::new(50.0)), Box::new(NoRestrictions));
        let mut ids = IdGenerator::new();
        let out = pipe.process(&signal(SignalDirection::Long), &account(0.0, 100.0), &mut ids);
        assert!(out.orders.is_empty());
        assert_eq!(out.rejections.len(), 1);
        assert_eq!(out.rejections[0].stage, RejectionStage::Risk);
    }

    #[test]
    fn risk_shrink_reduces_order_quantity() {
        let pipe = pipeline(Box::new(MaxExposure::new(500.0)), Box::new(NoRestrictions));
        let mut ids = IdGenerator::new();
        let out = pipe.process(&signal(SignalDirection::Long), &account(0.0, 100.0), &mut ids);
        assert_eq!(out.orders.len(), 1);
        assert_eq!(out.orders[0].quantity, 5.0);
    }

    #[test]
    fn compliance_rejects_short_entry_under_long_only() {
        let pipe = pipeline(Box::new(NoRiskLimits), Box::new(LongOnly));
        let mut ids = IdGenerator::new();
        let out = pipe.process(&signal(SignalDirection::Short), &account(0.0, 100.0), &mut ids);
        assert!(out.orders.is_empty());
        assert_eq!(out.rejections[0].stage, RejectionStage::Compliance);
    }

    #[test]
    fn stages_run_sizing_before_risk_before_compliance() {
        // Sized to zero never reaches risk: the rejection stage proves order.
        let pipe = OrderPipeline::new(
            Box::new(FixedFractionZero),
            Box::new(MaxExposure::new(1.0)),
            Box::new(LongOnly),
        );
        let mut ids = IdGenerator::new();
        let out = pipe.process(&signal(SignalDirection::Short), &account(0.0, 100.0), &mut ids);
        assert_eq!(out.rejections[0].stage, RejectionStage::Sizing);
    }

    struct FixedFractionZero;

    impl PositionSizer for FixedFractionZero {
        fn size(&self, _signal: &SignalEvent, _account: &AccountView) -> f64 {
            0.0
        }

        fn name(&self) -> &str {
            "Zero"
        }
    }
}
