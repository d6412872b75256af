//! AnnotatedBar: one engine output row per input bar.

use super::bar::Bar;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction recorded on the entry bar. The engine is long-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Buy,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "Buy"),
        }
    }
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    /// Exit signal at bar `i`, filled at bar `i + 1`.
    Signal,
    /// Stop breached intrabar, filled at the stop on the same bar.
    StopLoss,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Signal => write!(f, "Signal"),
            ExitReason::StopLoss => write!(f, "StopLoss"),
        }
    }
}

/// Input bar plus everything the simulation recorded on it.
///
/// `entry_price`, `position_size` and `direction` are set only on the bar
/// after an entry signal. Exit fields are set only on the bar where the exit
/// is realized. `equity` is always resolved once a run finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedBar {
    pub bar: Bar,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub exit_reason: Option<ExitReason>,
    pub trade_return: Option<f64>,
    pub profit_loss: Option<f64>,
    pub equity: f64,
    pub position_size: Option<f64>,
    pub direction: Option<Direction>,
    /// Active stop while a position is open on this bar.
    pub stop_price: Option<f64>,
}

impl AnnotatedBar {
    /// Unannotated row with equity pre-seeded.
    pub fn seeded(bar: Bar, equity: f64) -> Self {
        Self {
            bar,
            entry_price: None,
            exit_price: None,
            exit_reason: None,
            trade_return: None,
            profit_loss: None,
            equity,
            position_size: None,
            direction: None,
            stop_price: None,
        }
    }

    pub fn is_entry(&self) -> bool {
        self.entry_price.is_some()
    }

    pub fn is_exit(&self) -> bool {
        self.exit_price.is_some()
    }
}
