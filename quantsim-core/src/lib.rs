//! QuantSim Core — schedule-driven event simulation engine for backtesting.
//!
//! This crate contains the heart of the platform:
//! - Domain types (bars, the four event variants, positions, ids)
//! - A validated, merged market event source
//! - The `(timestamp, insertion sequence)` ordered event queue
//! - Strategy, sizing, risk, and compliance contracts with reference
//!   implementations
//! - Simulated execution with pluggable fill price, slippage, and commission
//!   policies
//! - The portfolio ledger and the backtest driver loop
//!
//! A single backtest is single-threaded: one logical order of operations,
//! no shared mutable state, identical equity curves on replay. Parameter
//! sweeps run independent engine instances in parallel (see
//! `quantsim-runner`); a run is never internally parallelized.

pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod execution;
pub mod portfolio;
pub mod risk;
pub mod strategy;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything a sweep worker moves across threads
    /// is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Event>();
        require_sync::<domain::Event>();
        require_send::<domain::MarketEvent>();
        require_sync::<domain::MarketEvent>();
        require_send::<domain::SignalEvent>();
        require_sync::<domain::SignalEvent>();
        require_send::<domain::OrderEvent>();
        require_sync::<domain::OrderEvent>();
        require_send::<domain::FillEvent>();
        require_sync::<domain::FillEvent>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();

        // Id types
        require_send::<domain::OrderId>();
        require_sync::<domain::OrderId>();
        require_send::<domain::FillId>();
        require_sync::<domain::FillId>();

        // Ledger and results
        require_send::<portfolio::EquitySnapshot>();
        require_sync::<portfolio::EquitySnapshot>();
        require_send::<engine::RunResult>();
        require_sync::<engine::RunResult>();
        require_send::<engine::BacktestConfig>();
        require_sync::<engine::BacktestConfig>();

        // Pipeline records
        require_send::<risk::Rejection>();
        require_sync::<risk::Rejection>();
        require_send::<risk::AccountView>();
        require_sync::<risk::AccountView>();
    }

    /// Architecture contract: the Strategy trait does NOT accept portfolio
    /// state.
    ///
    /// `calculate_signals()` takes only the market event; there is no
    /// parameter through which a strategy could observe cash, holdings, or
    /// pending fills. The type system enforces the no-peeking rule — this
    /// test documents it and breaks loudly if the signature ever changes.
    #[test]
    fn strategy_trait_has_no_portfolio_parameter() {
        fn _check_trait_object_builds(
            strategy: &mut dyn strategy::Strategy,
            event: &domain::MarketEvent,
        ) -> Vec<domain::SignalEvent> {
            strategy.calculate_signals(event)
        }
    }

    /// Architecture contract: pipeline stages see only the read-only
    /// `AccountView`, never the live portfolio.
    #[test]
    fn pipeline_stages_take_account_view_only() {
        fn _check_trait_object_builds(
            sizer: &dyn risk::PositionSizer,
            signal: &domain::SignalEvent,
            account: &risk::AccountView,
        ) -> f64 {
            sizer.size(signal, account)
        }
    }
}
