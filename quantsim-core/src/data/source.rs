//! Market event source — merges per-symbol bar series into one stream.
//!
//! The source is the only producer of `MarketEvent`s. It validates each
//! series up front, then yields a lazy k-way merge across symbols in
//! non-decreasing timestamp order. Ties at the same timestamp drain in
//! sorted-symbol order so a replay of the same data is identical. The source
//! never touches the queue or the portfolio; the driver pulls from it.

use crate::domain::{Bar, MarketEvent};
use crate::error::EngineError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug)]
struct SymbolSeries {
    symbol: String,
    bars: Vec<Bar>,
    cursor: usize,
}

/// A lazy, finite, restartable stream of market events.
#[derive(Debug)]
pub struct MarketEventSource {
    series: Vec<SymbolSeries>,
}

impl MarketEventSource {
    /// Validate and wrap per-symbol bar series.
    ///
    /// Fails with `DataGap` if any series has a non-increasing timestamp,
    /// and with `EmptySeries` if there is no data at all.
    pub fn new(bars_by_symbol: HashMap<String, Vec<Bar>>) -> Result<Self, EngineError> {
        // Sorted symbol order makes same-timestamp merging deterministic.
        let mut symbols: Vec<String> = bars_by_symbol.keys().cloned().collect();
        symbols.sort();

        let mut series = Vec::with_capacity(symbols.len());
        let mut total_bars = 0;
        for symbol in symbols {
            let bars = bars_by_symbol[&symbol].clone();
            for pair in bars.windows(2) {
                if pair[1].timestamp <= pair[0].timestamp {
                    return Err(EngineError::DataGap {
                        symbol,
                        timestamp: pair[1].timestamp,
                    });
                }
            }
            total_bars += bars.len();
            series.push(SymbolSeries {
                symbol,
                bars,
                cursor: 0,
            });
        }

        if total_bars == 0 {
            return Err(EngineError::EmptySeries);
        }

        Ok(Self { series })
    }

    /// Timestamp of the next event without consuming it.
    pub fn peek_timestamp(&self) -> Option<DateTime<Utc>> {
        self.series
            .iter()
            .filter_map(|s| s.bars.get(s.cursor).map(|b| b.timestamp))
            .min()
    }

    /// Pull the next market event, or `None` when every series is exhausted.
    pub fn next_event(&mut self) -> Option<MarketEvent> {
        let next = self
            .series
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.bars.get(s.cursor).map(|b| (b.timestamp, i)))
            .min()?;
        let series = &mut self.series[next.1];
        let bar = &series.bars[series.cursor];
        series.cursor += 1;
        Some(MarketEvent::from(bar))
    }

    /// Whether any events remain.
    pub fn is_exhausted(&self) -> bool {
        self.series.iter().all(|s| s.cursor >= s.bars.len())
    }

    /// Rewind every series to the start, so the same stream can replay.
    pub fn reset(&mut self) {
        for s in &mut self.series {
            s.cursor = 0;
        }
    }

    /// Symbols covered by this source, in merge-tie order.
    pub fn symbols(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.symbol.as_str()).collect()
    }
}
