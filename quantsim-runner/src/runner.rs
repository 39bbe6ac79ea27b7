//! Backtest runner — wires config, data, engine, and metrics together.
//!
//! Two entry points:
//! - `run_backtest()`: takes pre-loaded bars. Used by sweeps to avoid
//!   re-reading CSVs per configuration.
//! - `run_backtest_from_dir()`: loads every CSV in a directory, then runs.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use quantsim_core::data::MarketEventSource;
use quantsim_core::domain::{Bar, FillEvent, OrderEvent};
use quantsim_core::engine::{Backtest, BacktestConfig};
use quantsim_core::error::EngineError;
use quantsim_core::execution::{
    CommissionModel, ExecutionHandler, FillPolicy, FixedBps, FlatFee, NoSlippage, PerShare,
    SimulatedExecution, SlippageModel, ZeroCommission,
};
use quantsim_core::portfolio::EquitySnapshot;
use quantsim_core::risk::{
    ComplianceGate, FixedFraction, FixedQuantity, LongOnly, MaxExposure, NoRestrictions,
    NoRiskLimits, OrderPipeline, PositionSizer, Rejection, RestrictedList, RiskManager,
};
use quantsim_core::strategy::{BuyAndHold, MaCrossover, Strategy};

use crate::config::{
    CommissionConfig, ComplianceConfig, ConfigError, FillPolicyConfig, RiskConfig, RunConfig,
    SizingConfig, SlippageConfig, StrategyConfig,
};
use crate::data_loader::{load_dir, LoadError};
use crate::metrics::PerformanceMetrics;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Data(#[from] LoadError),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Complete result of a single run: metrics plus the engine's raw outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub metrics: PerformanceMetrics,
    pub equity_curve: Vec<EquitySnapshot>,
    pub fills: Vec<FillEvent>,
    pub rejections: Vec<Rejection>,
    pub dropped_orders: Vec<OrderEvent>,
    pub signal_count: usize,
    pub event_count: usize,
    pub initial_cash: f64,
    pub final_equity: f64,
}

/// Run one backtest over pre-loaded bars.
pub fn run_backtest(
    config: &RunConfig,
    bars: HashMap<String, Vec<Bar>>,
) -> Result<BacktestResult, RunError> {
    config.validate()?;

    let source = MarketEventSource::new(bars.clone())?;
    let strategy = build_strategy(&config.strategy);
    let pipeline = build_pipeline(config);
    let execution = build_execution(config, bars);

    let backtest = Backtest::new(
        &BacktestConfig::new(config.initial_cash),
        source,
        strategy,
        pipeline,
        execution,
    );
    let result = backtest.run()?;

    let equity: Vec<f64> = result.equity_curve.iter().map(|s| s.equity).collect();
    let metrics = PerformanceMetrics::compute(&equity, &result.fills);

    Ok(BacktestResult {
        metrics,
        equity_curve: result.equity_curve,
        fills: result.fills,
        rejections: result.rejections,
        dropped_orders: result.dropped_orders,
        signal_count: result.signals.len(),
        event_count: result.event_count,
        initial_cash: config.initial_cash,
        final_equity: result.final_equity,
    })
}

/// Load every CSV in `dir`, then run.
pub fn run_backtest_from_dir(config: &RunConfig, dir: &Path) -> Result<BacktestResult, RunError> {
    let bars = load_dir(dir)?;
    run_backtest(config, bars)
}

fn build_strategy(config: &StrategyConfig) -> Box<dyn Strategy> {
    match config {
        StrategyConfig::BuyAndHold => Box::new(BuyAndHold::new()),
        StrategyConfig::MaCrossover {
            short_period,
            long_period,
        } => Box::new(MaCrossover::new(*short_period, *long_period)),
    }
}

fn build_pipeline(config: &RunConfig) -> OrderPipeline {
    let sizer: Box<dyn PositionSizer> = match config.sizing {
        SizingConfig::FixedQuantity { quantity } => Box::new(FixedQuantity::new(quantity)),
        SizingConfig::FixedFraction { fraction } => Box::new(FixedFraction::new(fraction)),
    };
    let risk: Box<dyn RiskManager> = match config.risk {
        RiskConfig::None => Box::new(NoRiskLimits),
        RiskConfig::MaxExposure {
            max_notional_per_symbol,
        } => Box::new(MaxExposure::new(max_notional_per_symbol)),
    };
    let compliance: Box<dyn ComplianceGate> = match &config.compliance {
        ComplianceConfig::None => Box::new(NoRestrictions),
        ComplianceConfig::LongOnly => Box::new(LongOnly),
        ComplianceConfig::RestrictedList { symbols } => {
            Box::new(RestrictedList::new(symbols.iter().cloned()))
        }
    };
    OrderPipeline::new(sizer, risk, compliance)
}

fn build_execution(config: &RunConfig, bars: HashMap<String, Vec<Bar>>) -> Box<dyn ExecutionHandler> {
    let policy = match config.execution.fill_policy {
        FillPolicyConfig::NextBarOpen => FillPolicy::NextBarOpen,
        FillPolicyConfig::NextBarClose => FillPolicy::NextBarClose,
    };
    let slippage: Box<dyn SlippageModel> = match config.execution.slippage {
        SlippageConfig::None => Box::new(NoSlippage),
        SlippageConfig::FixedBps { bps } => Box::new(FixedBps::new(bps)),
    };
    let commission: Box<dyn CommissionModel> = match config.execution.commission {
        CommissionConfig::None => Box::new(ZeroCommission),
        CommissionConfig::PerShare { rate, minimum } => Box::new(PerShare::new(rate, minimum)),
        CommissionConfig::FlatFee { fee } => Box::new(FlatFee::new(fee)),
    };
    Box::new(SimulatedExecution::new(bars, policy, slippage, commission))
}
