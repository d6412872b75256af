//! Engine configuration and parameter validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::risk::StopMode;

/// Invalid parameter in an engine, policy or signal configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} = {value} is out of range (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("invalid EMA periods: short={short}, long={long} (need 1 <= short < long)")]
    InvalidPeriods { short: usize, long: usize },

    #[error("unknown stop-loss mode '{0}' (expected 'fixed' or 'trailing')")]
    UnknownStopMode(String),
}

/// Parameters fixed for the lifetime of one engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub initial_capital: f64,
    /// Slippage factor applied to next-bar entry/exit prices, in `[0, 1]`.
    pub skid: f64,
    /// Fraction of current equity allocated per entry, in `(0, 1]`.
    pub position_pct: f64,
    /// Stop distance below the reference price, in `(0, 1)`.
    pub stop_loss_pct: f64,
    #[serde(default)]
    pub stop_loss_mode: StopMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            skid: 1.0,
            position_pct: 0.01,
            stop_loss_pct: 0.25,
            stop_loss_mode: StopMode::Fixed,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "initial_capital",
                value: self.initial_capital,
                expected: "> 0",
            });
        }
        if !(0.0..=1.0).contains(&self.skid) {
            return Err(ConfigError::OutOfRange {
                field: "skid",
                value: self.skid,
                expected: "[0, 1]",
            });
        }
        check_position_pct(self.position_pct)?;
        check_stop_loss_pct(self.stop_loss_pct)?;
        Ok(())
    }
}

pub(crate) fn check_position_pct(value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field: "position_pct",
            value,
            expected: "(0, 1]",
        })
    }
}

pub(crate) fn check_stop_loss_pct(value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field: "stop_loss_pct",
            value,
            expected: "(0, 1)",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_capital, 100_000.0);
        assert_eq!(config.stop_loss_mode, StopMode::Fixed);
    }

    #[test]
    fn rejects_non_positive_capital() {
        let config = EngineConfig {
            initial_capital: 0.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "initial_capital", .. })
        ));
    }

    #[test]
    fn skid_bounds_are_inclusive() {
        for skid in [0.0, 1.0] {
            let config = EngineConfig {
                skid,
                ..EngineConfig::default()
            };
            assert!(config.validate().is_ok());
        }
        let config = EngineConfig {
            skid: 1.2,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn stop_loss_pct_bounds_are_exclusive() {
        for pct in [0.0, 1.0, f64::NAN] {
            assert!(check_stop_loss_pct(pct).is_err());
        }
        assert!(check_position_pct(1.0).is_ok());
        assert!(check_position_pct(0.0).is_err());
    }

    #[test]
    fn deserializes_without_mode() {
        let json = r#"{"initial_capital":5000.0,"skid":0.5,"position_pct":0.1,"stop_loss_pct":0.2}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.stop_loss_mode, StopMode::Fixed);
        assert_eq!(config.skid, 0.5);
    }
}
