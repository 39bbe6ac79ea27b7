//! Backtest driver — the orchestration loop.
//!
//! One iteration: admit due market events from the source, pop the earliest
//! event, dispatch it, snapshot the portfolio. The dispatch order is the
//! crux of correctness: a market event re-marks the portfolio before the
//! strategy reacts to it, and an order derived from a signal can only be
//! filled from data strictly after the instant that produced the signal.
//!
//! Market events are admitted while their timestamp is no later than the
//! earliest queued event, so at a shared timestamp market data is always
//! processed before derived events scheduled for that instant.

use crate::data::MarketEventSource;
use crate::domain::{Event, FillEvent, IdGenerator, OrderEvent, SignalEvent};
use crate::error::EngineError;
use crate::execution::ExecutionHandler;
use crate::portfolio::{EquitySnapshot, Portfolio};
use crate::risk::{OrderPipeline, Rejection};
use crate::strategy::Strategy;
use chrono::{DateTime, Utc};

use super::queue::EventQueue;

/// Immutable run configuration. No runtime reconfiguration mid-backtest.
#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub initial_cash: f64,
}

impl BacktestConfig {
    pub fn new(initial_cash: f64) -> Self {
        assert!(initial_cash > 0.0, "initial_cash must be > 0");
        Self { initial_cash }
    }
}

/// Everything a completed run yields. Diagnostics are accumulated here
/// rather than logged: vetoed signals, dropped orders, and the fill log sit
/// next to the equity curve for the reporting consumer to read.
#[derive(Debug)]
pub struct RunResult {
    pub equity_curve: Vec<EquitySnapshot>,
    pub fills: Vec<FillEvent>,
    /// Every signal a strategy emitted, vetoed or not.
    pub signals: Vec<SignalEvent>,
    /// Signals stopped by sizing, risk, or compliance.
    pub rejections: Vec<Rejection>,
    /// Orders dropped because no future price data existed.
    pub dropped_orders: Vec<OrderEvent>,
    pub event_count: usize,
    pub final_equity: f64,
}

/// The top-level simulation loop over one strategy and one dataset.
pub struct Backtest {
    source: MarketEventSource,
    queue: EventQueue,
    strategy: Box<dyn Strategy>,
    pipeline: OrderPipeline,
    execution: Box<dyn ExecutionHandler>,
    portfolio: Portfolio,
    ids: IdGenerator,
    last_timestamp: Option<DateTime<Utc>>,
    signals: Vec<SignalEvent>,
    rejections: Vec<Rejection>,
    dropped_orders: Vec<OrderEvent>,
    event_count: usize,
}

impl Backtest {
    pub fn new(
        config: &BacktestConfig,
        source: MarketEventSource,
        strategy: Box<dyn Strategy>,
        pipeline: OrderPipeline,
        execution: Box<dyn ExecutionHandler>,
    ) -> Self {
        Self {
            source,
            queue: EventQueue::new(),
            strategy,
            pipeline,
            execution,
            portfolio: Portfolio::new(config.initial_cash),
            ids: IdGenerator::new(),
            last_timestamp: None,
            signals: Vec::new(),
            rejections: Vec::new(),
            dropped_orders: Vec::new(),
            event_count: 0,
        }
    }

    /// Run to completion: queue drained and source exhausted.
    pub fn run(mut self) -> Result<RunResult, EngineError> {
        loop {
            self.admit_market_events();

            let event = match self.queue.pop() {
                Some(event) => event,
                None => break,
            };

            let timestamp = event.timestamp();
            if let Some(previous) = self.last_timestamp {
                if timestamp < previous {
                    return Err(EngineError::InvalidEventOrdering {
                        previous,
                        offending: timestamp,
                    });
                }
            }
            self.last_timestamp = Some(timestamp);
            self.event_count += 1;

            self.dispatch(event);
            self.portfolio.snapshot(timestamp);
        }

        let final_equity = self.portfolio.equity();
        let (equity_curve, fills) = self.portfolio.into_logs();
        Ok(RunResult {
            equity_curve,
            fills,
            signals: self.signals,
            rejections: self.rejections,
            dropped_orders: self.dropped_orders,
            event_count: self.event_count,
            final_equity,
        })
    }

    /// Admit market events due at or before the earliest queued event.
    fn admit_market_events(&mut self) {
        while let Some(next_ts) = self.source.peek_timestamp() {
            let due = match self.queue.peek_timestamp() {
                Some(queued_ts) => next_ts <= queued_ts,
                None => true,
            };
            if !due {
                break;
            }
            if let Some(event) = self.source.next_event() {
                self.queue.push(Event::Market(event));
            }
        }
    }

    /// Push a derived event, first admitting any market event due at or
    /// before it. This keeps market data ahead of derived events at a shared
    /// timestamp: a fill scheduled for bar T+1 enters the queue after bar
    /// T+1's market event, so the portfolio is re-marked before it applies.
    fn schedule(&mut self, event: Event) {
        while let Some(next_ts) = self.source.peek_timestamp() {
            if next_ts > event.timestamp() {
                break;
            }
            if let Some(market) = self.source.next_event() {
                self.queue.push(Event::Market(market));
            }
        }
        self.queue.push(event);
    }

    fn dispatch(&mut self, event: Event) {
        match event {
            Event::Market(market) => {
                self.portfolio.update_on_market(&market);
                for signal in self.strategy.calculate_signals(&market) {
                    self.signals.push(signal.clone());
                    self.schedule(Event::Signal(signal));
                }
            }
            Event::Signal(signal) => {
                let account = self.portfolio.account_view();
                let output = self.pipeline.process(&signal, &account, &mut self.ids);
                self.rejections.extend(output.rejections);
                for order in output.orders {
                    self.schedule(Event::Order(order));
                }
            }
            Event::Order(order) => match self.execution.execute(&order, &mut self.ids) {
                Ok(fill) => self.schedule(Event::Fill(fill)),
                Err(_) => self.dropped_orders.push(order),
            },
            Event::Fill(fill) => {
                self.portfolio.update_on_fill(&fill);
            }
        }
    }
}
