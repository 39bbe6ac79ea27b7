//! Buy and Hold — go long each symbol on its first bar, never exit.
//!
//! Mostly useful as a benchmark and as the simplest possible exercise of the
//! signal → order → fill path.

use super::Strategy;
use crate::domain::{MarketEvent, SignalDirection, SignalEvent};
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct BuyAndHold {
    signalled: HashSet<String>,
}

impl BuyAndHold {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Strategy for BuyAndHold {
    fn calculate_signals(&mut self, event: &MarketEvent) -> Vec<SignalEvent> {
        if !self.signalled.insert(event.symbol.clone()) {
            return Vec::new();
        }
        vec![SignalEvent {
            timestamp: event.timestamp,
            symbol: event.symbol.clone(),
            direction: SignalDirection::Long,
            strength: None,
        }]
    }

    fn name(&self) -> &str {
        "BuyAndHold"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(day: u32, symbol: &str) -> MarketEvent {
        MarketEvent {
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, 21, 0, 0).unwrap(),
            symbol: symbol.into(),
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 100.0,
            volume: 1000.0,
        }
    }

    #[test]
    fn signals_long_once_per_symbol() {
        let mut strategy = BuyAndHold::new();
        let first = strategy.calculate_signals(&event(2, "SPY"));
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].direction, SignalDirection::Long);
        assert_eq!(first[0].symbol, "SPY");

        assert!(strategy.calculate_signals(&event(3, "SPY")).is_empty());
        assert_eq!(strategy.calculate_signals(&event(3, "QQQ")).len(), 1);
    }

    #[test]
    fn signal_carries_event_timestamp() {
        let mut strategy = BuyAndHold::new();
        let ev = event(5, "SPY");
        let signals = strategy.calculate_signals(&ev);
        assert_eq!(signals[0].timestamp, ev.timestamp);
    }
}
