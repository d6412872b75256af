//! Stop-loss policy: where the stop starts, how it moves, when it fires.
//!
//! Policies are stateless after construction; the active stop lives in the
//! engine's `PositionState`. The ratchet invariant holds for every policy:
//! a stop may tighten but never loosen.

pub mod manager;

pub use manager::RiskManager;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error, PartialEq)]
pub enum RiskError {
    #[error("entry price {0} is negative; no stop can be placed")]
    NegativeEntryPrice(f64),
}

/// Whether the stop stays where it was placed or trails new highs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopMode {
    #[default]
    Fixed,
    Trailing,
}

impl fmt::Display for StopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopMode::Fixed => write!(f, "fixed"),
            StopMode::Trailing => write!(f, "trailing"),
        }
    }
}

impl FromStr for StopMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(StopMode::Fixed),
            "trailing" => Ok(StopMode::Trailing),
            other => Err(ConfigError::UnknownStopMode(other.to_string())),
        }
    }
}

/// Stop-loss capability consumed by the engine.
///
/// # Responsibilities
/// - Place the initial stop from the entry fill price
/// - Ratchet the stop from the current bar's high (trailing policies only)
/// - Decide whether a bar's low breaches the stop
///
/// # Non-Responsibilities
/// - Policies do NOT choose the exit fill price (the engine fills at the stop)
/// - Policies do NOT hold per-position state
pub trait StopPolicy: Send + Sync {
    /// Policy name for logging.
    fn name(&self) -> &str;

    /// True when the engine should call [`StopPolicy::advance`] on every open bar.
    fn trails(&self) -> bool;

    fn initial_stop(&self, entry_price: f64) -> Result<f64, RiskError>;

    /// New stop after observing `current_high`. Never below `current_stop`.
    fn advance(&self, current_stop: f64, current_high: f64) -> f64;

    fn is_triggered(&self, current_low: f64, stop_price: f64) -> bool;
}
