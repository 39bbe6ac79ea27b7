//! Moving-average crossover — long when the short SMA crosses above the
//! long SMA, exit when it crosses back below.
//!
//! Indicator history is owned privately per symbol; nothing outside the
//! close prices this strategy has already been shown enters the calculation.

use super::Strategy;
use crate::domain::{MarketEvent, SignalDirection, SignalEvent};
use std::collections::{HashMap, VecDeque};

struct SymbolState {
    closes: VecDeque<f64>,
    /// Whether the last emitted signal for this symbol was Long.
    long: bool,
    /// Previous bar's (short SMA - long SMA), once both windows are full.
    prev_spread: Option<f64>,
}

pub struct MaCrossover {
    short_period: usize,
    long_period: usize,
    state: HashMap<String, SymbolState>,
}

impl MaCrossover {
    /// Panics if `short_period` is zero or not less than `long_period`.
    pub fn new(short_period: usize, long_period: usize) -> Self {
        assert!(short_period > 0, "short_period must be > 0");
        assert!(
            short_period < long_period,
            "short_period must be < long_period"
        );
        Self {
            short_period,
            long_period,
            state: HashMap::new(),
        }
    }

    fn sma(closes: &VecDeque<f64>, period: usize) -> f64 {
        closes.iter().rev().take(period).sum::<f64>() / period as f64
    }
}

impl Strategy for MaCrossover {
    fn calculate_signals(&mut self, event: &MarketEvent) -> Vec<SignalEvent> {
        let state = self
            .state
            .entry(event.symbol.clone())
            .or_insert_with(|| SymbolState {
                closes: VecDeque::with_capacity(self.long_period + 1),
                long: false,
                prev_spread: None,
            });

        state.closes.push_back(event.close);
        if state.closes.len() > self.long_period {
            state.closes.pop_front();
        }
        if state.closes.len() < self.long_period {
            return Vec::new();
        }

        let spread =
            Self::sma(&state.closes, self.short_period) - Self::sma(&state.closes, self.long_period);
        let prev = state.prev_spread.replace(spread);

        let mut signals = Vec::new();
        match prev {
            Some(p) if p <= 0.0 && spread > 0.0 && !state.long => {
                state.long = true;
                signals.push(SignalEvent {
                    timestamp: event.timestamp,
                    symbol: event.symbol.clone(),
                    direction: SignalDirection::Long,
                    strength: None,
                });
            }
            Some(p) if p >= 0.0 && spread < 0.0 && state.long => {
                state.long = false;
                signals.push(SignalEvent {
                    timestamp: event.timestamp,
                    symbol: event.symbol.clone(),
                    direction: SignalDirection::Exit,
                    strength: None,
                });
            }
            _ => {}
        }
        signals
    }

    fn name(&self) -> &str {
        "MaCrossover"
    }
}
