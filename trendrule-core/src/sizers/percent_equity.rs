//! Percent-of-equity sizer
//!
//! Allocates a fixed fraction of current equity to each new position.

use crate::config::{check_position_pct, ConfigError};
use crate::sizers::Sizer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSizer {
    position_pct: f64,
}

impl PositionSizer {
    pub fn new(position_pct: f64) -> Result<Self, ConfigError> {
        check_position_pct(position_pct)?;
        Ok(Self { position_pct })
    }

    pub fn position_pct(&self) -> f64 {
        self.position_pct
    }
}

impl Sizer for PositionSizer {
    fn allocate(&self, entry_price: f64, current_equity: f64) -> f64 {
        if entry_price == 0.0 {
            return 0.0;
        }
        current_equity * self.position_pct / entry_price
    }

    fn name(&self) -> &str {
        "percent_equity"
    }
}
