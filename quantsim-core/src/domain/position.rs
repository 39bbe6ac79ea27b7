//! Position — signed holding in one symbol with VWAP book cost.

use serde::{Deserialize, Serialize};

/// A signed position in a single symbol.
///
/// `quantity` is positive for longs, negative for shorts. `avg_cost` is the
/// volume-weighted book cost per share, with commissions folded in while the
/// position is open. Only the portfolio mutates positions, and only through
/// fill processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: f64,
    pub avg_cost: f64,
    pub realized_pnl: f64,
    /// Most recent observed price, updated on market events.
    pub last_price: f64,
}

impl Position {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            quantity: 0.0,
            avg_cost: 0.0,
            realized_pnl: 0.0,
            last_price: 0.0,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.quantity == 0.0
    }

    pub fn is_long(&self) -> bool {
        self.quantity > 0.0
    }

    pub fn is_short(&self) -> bool {
        self.quantity < 0.0
    }

    /// Signed market value at the last observed price.
    pub fn market_value(&self) -> f64 {
        self.quantity * self.last_price
    }

    /// Unrealized P&L at the last observed price.
    pub fn unrealized_pnl(&self) -> f64 {
        self.quantity * (self.last_price - self.avg_cost)
    }

    /// Apply a fill to this position.
    ///
    /// `signed_quantity` is positive for buys and negative for sells.
    /// Increasing fills re-average the book cost; reducing fills realize
    /// P&L against it; a flip realizes the closed leg and restarts the book
    /// cost at the fill price. Commission is folded into the book cost per
    /// share while a position remains open, otherwise charged to realized
    /// P&L directly.
    pub fn apply_fill(&mut self, signed_quantity: f64, price: f64, commission: f64) {
        let prior = self.quantity;
        let total = prior + signed_quantity;

        if prior == 0.0 || prior.signum() == signed_quantity.signum() {
            // Opening or increasing: VWAP the book cost.
            let prior_cost = self.avg_cost * prior.abs();
            let fill_cost = price * signed_quantity.abs();
            if total != 0.0 {
                self.avg_cost = (prior_cost + fill_cost) / total.abs();
            }
        } else {
            // Reducing, closing, or flipping.
            let closed = prior.abs().min(signed_quantity.abs());
            self.realized_pnl += (price - self.avg_cost) * closed * prior.signum();
            if signed_quantity.abs() > prior.abs() {
                // Flipped through flat: remainder opens at the fill price.
                self.avg_cost = price;
            } else if total == 0.0 {
                self.avg_cost = 0.0;
            }
        }

        self.quantity = total;
        self.last_price = price;

        if commission != 0.0 {
            if self.quantity != 0.0 {
                // Share the commission across the open quantity, as book cost.
                self.avg_cost = (self.avg_cost * self.quantity + commission) / self.quantity;
            } else {
                self.realized_pnl -= commission;
            }
        }
    }

    /// Update the mark price without touching quantity or cost.
    pub fn update_mark(&mut self, price: f64) {
        self.last_price = price;
    }
}
