use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub storage: StorageConfig,
}

/// Tunable model assumptions. The engine itself never validates these —
/// `validate()` is the boundary check and runs before anything is computed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Target net profit per month, £
    #[serde(default = "default_target_profit")]
    pub target_profit: f64,

    /// Fixed costs per month, £
    #[serde(default = "default_fixed_costs")]
    pub fixed_costs: f64,

    /// Trailing window for the efficiency averages, months (1–12)
    #[serde(default = "default_rolling_n")]
    pub rolling_n: usize,

    /// Share of this month's spend expected to sell this month (0.1–1.0)
    #[serde(default = "default_realization")]
    pub realization: f64,

    /// Safety buffer on every spend estimate (0.0–0.5)
    #[serde(default = "default_buffer")]
    pub buffer: f64,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,

    #[serde(default = "default_purchases_path")]
    pub purchases_path: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be at least 0 (got {value})")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must be within {min}..={max} (got {value})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_profit < 0.0 {
            return Err(ConfigError::Negative { name: "target_profit", value: self.target_profit });
        }
        if self.fixed_costs < 0.0 {
            return Err(ConfigError::Negative { name: "fixed_costs", value: self.fixed_costs });
        }
        if !(1..=12).contains(&self.rolling_n) {
            return Err(ConfigError::OutOfRange {
                name: "rolling_n",
                value: self.rolling_n as f64,
                min: 1.0,
                max: 12.0,
            });
        }
        if !(0.1..=1.0).contains(&self.realization) {
            return Err(ConfigError::OutOfRange {
                name: "realization",
                value: self.realization,
                min: 0.1,
                max: 1.0,
            });
        }
        if !(0.0..=0.5).contains(&self.buffer) {
            return Err(ConfigError::OutOfRange {
                name: "buffer",
                value: self.buffer,
                min: 0.0,
                max: 0.5,
            });
        }
        Ok(())
    }
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_target_profit() -> f64 {
    4000.0
}
fn default_fixed_costs() -> f64 {
    600.0
}
fn default_rolling_n() -> usize {
    3
}
fn default_realization() -> f64 {
    0.7
}
fn default_buffer() -> f64 {
    0.10
}
fn default_history_path() -> PathBuf {
    PathBuf::from("data/history.csv")
}
fn default_purchases_path() -> PathBuf {
    PathBuf::from("data/purchases.csv")
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("FBA").separator("__"))
            .build()?;

        let app_cfg: AppConfig = match cfg.try_deserialize() {
            Ok(c) => c,
            Err(e) => {
                warn!("Config could not be deserialized ({}) — using defaults", e);
                AppConfig::default()
            }
        };

        app_cfg.engine.validate()?;
        Ok(app_cfg)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig {
                target_profit: default_target_profit(),
                fixed_costs: default_fixed_costs(),
                rolling_n: default_rolling_n(),
                realization: default_realization(),
                buffer: default_buffer(),
            },
            storage: StorageConfig {
                history_path: default_history_path(),
                purchases_path: default_purchases_path(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AppConfig::default().engine.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_parameters_rejected() {
        let mut e = AppConfig::default().engine;
        e.rolling_n = 0;
        assert!(e.validate().is_err());

        let mut e = AppConfig::default().engine;
        e.realization = 0.05;
        assert!(e.validate().is_err());

        let mut e = AppConfig::default().engine;
        e.buffer = 0.6;
        assert!(e.validate().is_err());

        let mut e = AppConfig::default().engine;
        e.target_profit = -1.0;
        assert!(e.validate().is_err());
    }
}
