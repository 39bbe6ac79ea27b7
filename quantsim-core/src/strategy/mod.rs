//! Strategy contract and bundled reference strategies.

mod buy_and_hold;
mod ma_crossover;

pub use buy_and_hold::BuyAndHold;
pub use ma_crossover::MaCrossover;

use crate::domain::{MarketEvent, SignalEvent};

/// Decision unit: market events in, signal events out.
///
/// A strategy is a function of the market events it has seen plus whatever
/// state it privately owns (indicator history, flags). It receives no
/// reference to the portfolio, the queue, or the execution handler, so it
/// cannot observe unrealized fills or available capital. Emitted signals
/// must carry the triggering event's timestamp.
pub trait Strategy {
    fn calculate_signals(&mut self, event: &MarketEvent) -> Vec<SignalEvent>;

    fn name(&self) -> &str;
}
