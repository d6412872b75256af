//! Serializable backtest configuration, read from TOML.
//!
//! ```toml
//! [data]
//! path = "data/tradingview_CMC_EURUSD.csv"
//!
//! [signal]
//! short_period = 9
//! long_period = 21
//!
//! [backtest]
//! initial_capital = 100000.0
//! skid = 1.0
//! position_pct = 0.01
//! stop_loss_pct = 0.25
//! stop_loss_mode = "fixed"
//! ```
//!
//! Every section and field except `data.path` has a default, so an empty
//! document is a valid config for programmatic runs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use trendrule_core::data::CsvOptions;
use trendrule_core::{EmaCrossover, EngineConfig, StopMode};

/// Errors from reading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid parameter: {0}")]
    Invalid(#[from] trendrule_core::ConfigError),

    #[error("serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("config has no [data] section")]
    MissingData,
}

/// Where the bars come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    pub path: PathBuf,
    #[serde(default = "default_time_column")]
    pub time_column: String,
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i64,
}

fn default_time_column() -> String {
    CsvOptions::default().time_column
}

fn default_utc_offset() -> i64 {
    CsvOptions::default().utc_offset_hours
}

impl DataConfig {
    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            time_column: self.time_column.clone(),
            utc_offset_hours: self.utc_offset_hours,
        }
    }
}

/// EMA crossover periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub short_period: usize,
    pub long_period: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        let ema = EmaCrossover::default();
        Self {
            short_period: ema.short_period(),
            long_period: ema.long_period(),
        }
    }
}

impl SignalConfig {
    pub fn build(&self) -> Result<EmaCrossover, trendrule_core::ConfigError> {
        EmaCrossover::new(self.short_period, self.long_period)
    }
}

/// Engine parameters. Missing fields fall back to the engine defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestParams {
    pub initial_capital: f64,
    pub skid: f64,
    pub position_pct: f64,
    pub stop_loss_pct: f64,
    pub stop_loss_mode: StopMode,
}

impl Default for BacktestParams {
    fn default() -> Self {
        EngineConfig::default().into()
    }
}

impl From<EngineConfig> for BacktestParams {
    fn from(c: EngineConfig) -> Self {
        Self {
            initial_capital: c.initial_capital,
            skid: c.skid,
            position_pct: c.position_pct,
            stop_loss_pct: c.stop_loss_pct,
            stop_loss_mode: c.stop_loss_mode,
        }
    }
}

/// Complete configuration for one backtest run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataConfig>,
    #[serde(default)]
    pub signal: SignalConfig,
    #[serde(default)]
    pub backtest: BacktestParams,
}

impl BacktestConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine_config().validate()?;
        self.signal.build()?;
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        let p = &self.backtest;
        EngineConfig {
            initial_capital: p.initial_capital,
            skid: p.skid,
            position_pct: p.position_pct,
            stop_loss_pct: p.stop_loss_pct,
            stop_loss_mode: p.stop_loss_mode,
        }
    }

    pub fn data(&self) -> Result<&DataConfig, ConfigError> {
        self.data.as_ref().ok_or(ConfigError::MissingData)
    }

    /// Content hash of the config.
    ///
    /// Two configs with identical parameters share a fingerprint, so reports
    /// from different runs can be matched up.
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_vec(self)?;
        Ok(blake3::hash(&json).to_hex().to_string())
    }
}
