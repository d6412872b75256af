//! Per-bar trade instruction produced by an external signal generator.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignalError {
    #[error("signal value {0} is outside {{-1, 0, 1}}")]
    OutOfRange(i64),
}

/// One signal per bar: enter long, exit long, or do nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Signal {
    Enter,
    Exit,
    #[default]
    None,
}

impl Signal {
    pub fn as_i8(self) -> i8 {
        match self {
            Signal::Enter => 1,
            Signal::Exit => -1,
            Signal::None => 0,
        }
    }
}

impl TryFrom<i64> for Signal {
    type Error = SignalError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Signal::Enter),
            -1 => Ok(Signal::Exit),
            0 => Ok(Signal::None),
            other => Err(SignalError::OutOfRange(other)),
        }
    }
}

impl From<Signal> for i64 {
    fn from(signal: Signal) -> Self {
        signal.as_i8() as i64
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}

/// Converts a raw integer column into signals, failing on the first bad value.
pub fn signals_from_ints(values: &[i64]) -> Result<Vec<Signal>, SignalError> {
    values.iter().map(|&v| Signal::try_from(v)).collect()
}
