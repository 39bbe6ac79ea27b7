//! Portfolio — the authoritative ledger of cash, positions, and equity.
//!
//! The portfolio is purely reactive: it never initiates events. Fills are
//! the only operation that moves cash or quantities; market events only
//! re-mark. After every processed event the driver appends one equity
//! snapshot; the curve is append-only and never revised, so two replays of
//! the same input produce identical curves.

use crate::domain::{FillEvent, MarketEvent, Position};
use crate::risk::AccountView;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One point on the equity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquitySnapshot {
    pub timestamp: DateTime<Utc>,
    pub equity: f64,
    pub cash: f64,
}

/// Exclusive owner of account state.
#[derive(Debug)]
pub struct Portfolio {
    cash: f64,
    initial_cash: f64,
    positions: HashMap<String, Position>,
    /// Last observed close per symbol, held or not.
    last_prices: HashMap<String, f64>,
    equity_curve: Vec<EquitySnapshot>,
    fills: Vec<FillEvent>,
    total_commission: f64,
}

impl Portfolio {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            cash: initial_cash,
            initial_cash,
            positions: HashMap::new(),
            last_prices: HashMap::new(),
            equity_curve: Vec::new(),
            fills: Vec::new(),
            total_commission: 0.0,
        }
    }

    /// Apply a fill atomically: position quantity/cost, cash, commission.
    ///
    /// `cash_after = cash_before - signed_quantity * price - commission`.
    pub fn update_on_fill(&mut self, fill: &FillEvent) {
        let signed = fill.signed_quantity();
        let position = self
            .positions
            .entry(fill.symbol.clone())
            .or_insert_with(|| Position::new(fill.symbol.clone()));
        position.apply_fill(signed, fill.price, fill.commission);

        self.cash -= signed * fill.price + fill.commission;
        self.total_commission += fill.commission;
        self.last_prices.insert(fill.symbol.clone(), fill.price);
        self.fills.push(fill.clone());
    }

    /// Re-mark the symbol at the event's close. Never touches cash or
    /// quantities.
    pub fn update_on_market(&mut self, event: &MarketEvent) {
        self.last_prices.insert(event.symbol.clone(), event.close);
        if let Some(position) = self.positions.get_mut(&event.symbol) {
            position.update_mark(event.close);
        }
    }

    /// Total equity: cash plus mark-to-market value of all positions.
    pub fn equity(&self) -> f64 {
        let position_value: f64 = self.positions.values().map(|p| p.market_value()).sum();
        self.cash + position_value
    }

    /// Append one snapshot to the equity curve.
    pub fn snapshot(&mut self, timestamp: DateTime<Utc>) {
        self.equity_curve.push(EquitySnapshot {
            timestamp,
            equity: self.equity(),
            cash: self.cash,
        });
    }

    /// Read-only account view for the sizing/risk/compliance pipeline.
    pub fn account_view(&self) -> AccountView {
        let positions = self
            .positions
            .iter()
            .filter(|(_, p)| !p.is_flat())
            .map(|(s, p)| (s.clone(), p.quantity))
            .collect();
        AccountView {
            equity: self.equity(),
            cash: self.cash,
            positions,
            last_prices: self.last_prices.clone(),
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn initial_cash(&self) -> f64 {
        self.initial_cash
    }

    pub fn total_commission(&self) -> f64 {
        self.total_commission
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol).filter(|p| !p.is_flat())
    }

    pub fn equity_curve(&self) -> &[EquitySnapshot] {
        &self.equity_curve
    }

    pub fn fills(&self) -> &[FillEvent] {
        &self.fills
    }

    /// Consume the portfolio, returning its append-only outputs.
    pub fn into_logs(self) -> (Vec<EquitySnapshot>, Vec<FillEvent>) {
        (self.equity_curve, self.fills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FillId, OrderDirection, OrderId};
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 21, 0, 0).unwrap()
    }

    fn fill(d: u32, quantity: f64, direction: OrderDirection, price: f64, commission: f64) -> FillEvent {
        FillEvent {
            id: FillId(1),
            order_id: OrderId(1),
            timestamp: day(d),
            symbol: "SPY".into(),
            quantity,
            direction,
            price,
            commission,
            venue: "SIM".into(),
        }
    }

    fn market(d: u32, close: f64) -> MarketEvent {
        MarketEvent {
            timestamp: day(d),
            symbol: "SPY".into(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn buy_fill_moves_cash_by_notional_plus_commission() {
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.update_on_fill(&fill(2, 10.0, OrderDirection::Buy, 100.0, 2.0));
        assert_eq!(portfolio.cash(), 10_000.0 - 1000.0 - 2.0);
        assert_eq!(portfolio.position("SPY").unwrap().quantity, 10.0);
        assert_eq!(portfolio.total_commission(), 2.0);
    }

    #[test]
    fn sell_fill_credits_cash() {
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.update_on_fill(&fill(2, 10.0, OrderDirection::Buy, 100.0, 0.0));
        portfolio.update_on_fill(&fill(3, 10.0, OrderDirection::Sell, 105.0, 0.0));
        assert_eq!(portfolio.cash(), 10_000.0 + 50.0);
        assert!(portfolio.position("SPY").is_none());
    }

    #[test]
    fn market_update_changes_equity_not_cash() {
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.update_on_fill(&fill(2, 10.0, OrderDirection::Buy, 100.0, 0.0));
        let cash_before = portfolio.cash();

        portfolio.update_on_market(&market(3, 110.0));
        assert_eq!(portfolio.cash(), cash_before);
        assert_eq!(portfolio.equity(), 9_000.0 + 1_100.0);
    }

    #[test]
    fn accounting_identity_holds_per_snapshot() {
        let mut portfolio = Portfolio::new(10_000.0);

        let assert_identity = |p: &Portfolio| {
            let snap = p.equity_curve().last().unwrap();
            let position_value: f64 = p
                .position("SPY")
                .map(|pos| pos.quantity * pos.last_price)
                .unwrap_or(0.0);
            assert!((snap.equity - (snap.cash + position_value)).abs() < 1e-9);
        };

        portfolio.update_on_market(&market(2, 100.0));
        portfolio.snapshot(day(2));
        assert_identity(&portfolio);

        portfolio.update_on_fill(&fill(3, 10.0, OrderDirection::Buy, 101.0, 1.0));
        portfolio.snapshot(day(3));
        assert_identity(&portfolio);

        portfolio.update_on_market(&market(4, 99.0));
        portfolio.snapshot(day(4));
        assert_identity(&portfolio);
    }

    #[test]
    fn equity_curve_is_append_only() {
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.snapshot(day(2));
        let first = portfolio.equity_curve()[0].clone();
        portfolio.update_on_fill(&fill(3, 10.0, OrderDirection::Buy, 100.0, 0.0));
        portfolio.snapshot(day(3));
        assert_eq!(portfolio.equity_curve()[0], first);
        assert_eq!(portfolio.equity_curve().len(), 2);
    }

    #[test]
    fn account_view_excludes_flat_positions() {
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.update_on_fill(&fill(2, 10.0, OrderDirection::Buy, 100.0, 0.0));
        portfolio.update_on_fill(&fill(3, 10.0, OrderDirection::Sell, 101.0, 0.0));
        let view = portfolio.account_view();
        assert!(view.positions.is_empty());
        assert_eq!(view.last_price("SPY"), Some(101.0));
    }
}
