//! Engine: the event queue and the backtest driver built on top of it.

mod driver;
mod queue;

pub use driver::{Backtest, BacktestConfig, RunResult};
pub use queue::EventQueue;
