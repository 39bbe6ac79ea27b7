//! Parameter sweeps over the MA crossover grid.
//!
//! Each grid point runs a fully independent engine instance; parallelism is
//! across configurations only, never inside a run. Entries come back in
//! grid order regardless of worker scheduling, so a sweep is as
//! reproducible as a single run.

use anyhow::Result;
use quantsim_core::domain::Bar;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::{RunConfig, StrategyConfig};
use crate::runner::{run_backtest, BacktestResult};

/// Grid of MA crossover parameters to test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamGrid {
    pub short_periods: Vec<usize>,
    pub long_periods: Vec<usize>,
}

impl ParamGrid {
    /// Short 10/20/30 against long 50/100/200.
    pub fn ma_crossover_default() -> Self {
        Self {
            short_periods: vec![10, 20, 30],
            long_periods: vec![50, 100, 200],
        }
    }

    /// All valid (short < long) configurations, in grid order.
    pub fn generate_configs(&self, base: &RunConfig) -> Vec<RunConfig> {
        let mut configs = Vec::new();
        for &short in &self.short_periods {
            for &long in &self.long_periods {
                if short == 0 || short >= long {
                    continue;
                }
                let mut config = base.clone();
                config.strategy = StrategyConfig::MaCrossover {
                    short_period: short,
                    long_period: long,
                };
                configs.push(config);
            }
        }
        configs
    }

    pub fn size(&self) -> usize {
        self.short_periods
            .iter()
            .flat_map(|&s| self.long_periods.iter().map(move |&l| (s, l)))
            .filter(|&(s, l)| s > 0 && s < l)
            .count()
    }
}

/// One grid point's configuration and outcome.
#[derive(Debug)]
pub struct SweepEntry {
    pub config: RunConfig,
    pub result: BacktestResult,
}

/// Run every configuration in the grid over the same bars, in parallel.
pub fn sweep(
    grid: &ParamGrid,
    base: &RunConfig,
    bars: &HashMap<String, Vec<Bar>>,
) -> Result<Vec<SweepEntry>> {
    let configs = grid.generate_configs(base);
    let results: Vec<SweepEntry> = configs
        .into_par_iter()
        .map(|config| {
            let result = run_backtest(&config, bars.clone())?;
            Ok(SweepEntry { config, result })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(results)
}

/// Sequential variant, for comparing against the parallel path.
pub fn sweep_sequential(
    grid: &ParamGrid,
    base: &RunConfig,
    bars: &HashMap<String, Vec<Bar>>,
) -> Result<Vec<SweepEntry>> {
    let configs = grid.generate_configs(base);
    let mut results = Vec::with_capacity(configs.len());
    for config in configs {
        let result = run_backtest(&config, bars.clone())?;
        results.push(SweepEntry { config, result });
    }
    Ok(results)
}
