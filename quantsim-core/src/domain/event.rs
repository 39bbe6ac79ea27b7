//! Event taxonomy — the tagged variants that flow through the queue.
//!
//! Every event is immutable once created and carries a timestamp plus a
//! symbol. The producer/consumer pairing is strict:
//! - `MarketEvent`: produced by the market event source, consumed by the
//!   portfolio (mark-to-market) and the strategy.
//! - `SignalEvent`: produced by a strategy, consumed by the order pipeline.
//! - `OrderEvent`: produced by the order pipeline, consumed by execution.
//! - `FillEvent`: produced by execution, consumed by the portfolio.

use super::bar::Bar;
use super::ids::{FillId, OrderId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a strategy signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalDirection {
    Long,
    Short,
    /// Close whatever position is currently open in the symbol.
    Exit,
}

/// Side of an order or fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDirection {
    Buy,
    Sell,
}

impl OrderDirection {
    /// +1.0 for buys, -1.0 for sells.
    pub fn sign(&self) -> f64 {
        match self {
            OrderDirection::Buy => 1.0,
            OrderDirection::Sell => -1.0,
        }
    }
}

/// What kind of order the pipeline produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OrderKind {
    /// Fill at the next available price per the execution handler's policy.
    Market,
    /// Fill at the limit price or better, against the next bar only.
    Limit { limit_price: f64 },
}

/// A market data update for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketEvent {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl From<&Bar> for MarketEvent {
    fn from(bar: &Bar) -> Self {
        Self {
            timestamp: bar.timestamp,
            symbol: bar.symbol.clone(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

/// A strategy's directional opinion on a symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalEvent {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub direction: SignalDirection,
    /// Optional conviction in (0, 1]; sizers may scale by it.
    pub strength: Option<f64>,
}

/// A sized, risk-checked order awaiting simulated execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    pub id: OrderId,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    /// Always positive; `direction` carries the side.
    pub quantity: f64,
    pub direction: OrderDirection,
    pub kind: OrderKind,
}

/// Confirmation that an order executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillEvent {
    pub id: FillId,
    pub order_id: OrderId,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub quantity: f64,
    pub direction: OrderDirection,
    pub price: f64,
    pub commission: f64,
    pub venue: String,
}

impl FillEvent {
    /// Signed quantity: positive for buys, negative for sells.
    pub fn signed_quantity(&self) -> f64 {
        self.direction.sign() * self.quantity
    }
}

/// Tagged variant over everything that can appear in the event queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Market(MarketEvent),
    Signal(SignalEvent),
    Order(OrderEvent),
    Fill(FillEvent),
}

impl Event {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Event::Market(e) => e.timestamp,
            Event::Signal(e) => e.timestamp,
            Event::Order(e) => e.timestamp,
            Event::Fill(e) => e.timestamp,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Event::Market(e) => &e.symbol,
            Event::Signal(e) => &e.symbol,
            Event::Order(e) => &e.symbol,
            Event::Fill(e) => &e.symbol,
        }
    }
}
