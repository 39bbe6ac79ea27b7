//! QuantSim Runner — backtest orchestration on top of `quantsim-core`.
//!
//! This crate provides:
//! - CSV daily-bar loading
//! - TOML run configuration with validation
//! - A single-backtest runner that assembles engine components and metrics
//! - Performance metrics (pure functions over equity curves and fills)
//! - Parallel parameter sweeps over independent engine instances

pub mod config;
pub mod data_loader;
pub mod metrics;
pub mod runner;
pub mod sweep;

pub use config::{
    CommissionConfig, ComplianceConfig, ConfigError, ExecutionConfig, FillPolicyConfig,
    RiskConfig, RunConfig, SizingConfig, SlippageConfig, StrategyConfig,
};
pub use data_loader::{load_dir, load_symbol_csv, LoadError};
pub use metrics::PerformanceMetrics;
pub use runner::{run_backtest, run_backtest_from_dir, BacktestResult, RunError};
pub use sweep::{sweep, sweep_sequential, ParamGrid, SweepEntry};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn sweep_types_cross_threads() {
        assert_send::<RunConfig>();
        assert_sync::<RunConfig>();
        assert_send::<BacktestResult>();
        assert_sync::<BacktestResult>();
        assert_send::<SweepEntry>();
        assert_sync::<SweepEntry>();
    }
}
