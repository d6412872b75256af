//! Percentage stop-loss, fixed at entry or trailing the highs.
//!
//! Initial stop: entry * (1 - stop_loss_pct).
//! Trailing:     max(current_stop, high * (1 - stop_loss_pct)).
//! Trigger:      low <= stop.

use super::{RiskError, StopMode, StopPolicy};
use crate::config::{check_stop_loss_pct, ConfigError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskManager {
    stop_loss_pct: f64,
    mode: StopMode,
}

impl RiskManager {
    pub fn new(stop_loss_pct: f64, mode: StopMode) -> Result<Self, ConfigError> {
        check_stop_loss_pct(stop_loss_pct)?;
        Ok(Self {
            stop_loss_pct,
            mode,
        })
    }

    pub fn stop_loss_pct(&self) -> f64 {
        self.stop_loss_pct
    }

    pub fn mode(&self) -> StopMode {
        self.mode
    }

    pub fn initial_stop(&self, entry_price: f64) -> Result<f64, RiskError> {
        if entry_price < 0.0 {
            return Err(RiskError::NegativeEntryPrice(entry_price));
        }
        Ok(entry_price * (1.0 - self.stop_loss_pct))
    }

    /// Only meaningful in trailing mode; the engine never calls it for fixed stops.
    pub fn advance_trailing_stop(&self, current_stop: f64, current_high: f64) -> f64 {
        let candidate = current_high * (1.0 - self.stop_loss_pct);
        current_stop.max(candidate)
    }

    pub fn is_triggered(&self, current_low: f64, stop_price: f64) -> bool {
        current_low <= stop_price
    }
}

impl StopPolicy for RiskManager {
    fn name(&self) -> &str {
        match self.mode {
            StopMode::Fixed => "fixed_stop_loss",
            StopMode::Trailing => "percent_trailing",
        }
    }

    fn trails(&self) -> bool {
        self.mode == StopMode::Trailing
    }

    fn initial_stop(&self, entry_price: f64) -> Result<f64, RiskError> {
        RiskManager::initial_stop(self, entry_price)
    }

    fn advance(&self, current_stop: f64, current_high: f64) -> f64 {
        self.advance_trailing_stop(current_stop, current_high)
    }

    fn is_triggered(&self, current_low: f64, stop_price: f64) -> bool {
        RiskManager::is_triggered(self, current_low, stop_price)
    }
}
