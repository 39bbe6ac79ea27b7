//! Serializable run configuration.
//!
//! A `RunConfig` captures everything needed to reproduce a backtest:
//! strategy choice and parameters, sizing, risk and compliance settings,
//! and the execution model. Once the backtest is constructed from it, the
//! configuration is never consulted again; there is no mid-run
//! reconfiguration path.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {reason}")]
    Invalid { reason: String },
}

/// Complete configuration for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub initial_cash: f64,
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub sizing: SizingConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub compliance: ComplianceConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
}

impl RunConfig {
    /// Parse a TOML string into a validated configuration.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_cash <= 0.0 {
            return Err(ConfigError::Invalid {
                reason: format!("initial_cash must be > 0, got {}", self.initial_cash),
            });
        }
        if let StrategyConfig::MaCrossover {
            short_period,
            long_period,
        } = self.strategy
        {
            if short_period == 0 || short_period >= long_period {
                return Err(ConfigError::Invalid {
                    reason: format!(
                        "ma_crossover requires 0 < short_period < long_period, got {short_period}/{long_period}"
                    ),
                });
            }
        }
        if let SizingConfig::FixedFraction { fraction } = self.sizing {
            if fraction <= 0.0 || fraction > 1.0 {
                return Err(ConfigError::Invalid {
                    reason: format!("sizing fraction must be in (0, 1], got {fraction}"),
                });
            }
        }
        if let SizingConfig::FixedQuantity { quantity } = self.sizing {
            if quantity <= 0.0 {
                return Err(ConfigError::Invalid {
                    reason: format!("sizing quantity must be > 0, got {quantity}"),
                });
            }
        }
        Ok(())
    }
}

/// Strategy choice (serializable enum).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// One long entry per symbol on its first bar.
    BuyAndHold,

    /// Short SMA crossing a long SMA.
    MaCrossover {
        short_period: usize,
        long_period: usize,
    },
}

/// Position sizing choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SizingConfig {
    FixedQuantity { quantity: f64 },
    FixedFraction { fraction: f64 },
}

impl Default for SizingConfig {
    fn default() -> Self {
        SizingConfig::FixedFraction { fraction: 1.0 }
    }
}

/// Risk limit choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RiskConfig {
    None,
    MaxExposure { max_notional_per_symbol: f64 },
}

impl Default for RiskConfig {
    fn default() -> Self {
        RiskConfig::None
    }
}

/// Compliance gate choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComplianceConfig {
    None,
    LongOnly,
    RestrictedList { symbols: Vec<String> },
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        ComplianceConfig::None
    }
}

/// Execution model settings: fill pricing, slippage, commission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub fill_policy: FillPolicyConfig,
    #[serde(default)]
    pub slippage: SlippageConfig,
    #[serde(default)]
    pub commission: CommissionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicyConfig {
    #[default]
    NextBarOpen,
    NextBarClose,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlippageConfig {
    #[default]
    None,
    FixedBps { bps: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommissionConfig {
    #[default]
    None,
    PerShare { rate: f64, minimum: f64 },
    FlatFee { fee: f64 },
}
