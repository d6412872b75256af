use serde::{Deserialize, Serialize};

/// Open long position, owned by the engine state between entry and exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionState {
    /// Bar on which the entry was recorded (signal bar + 1).
    pub entry_index: usize,
    pub entry_price: f64,
    /// Units held.
    pub size: f64,
    /// Active stop; only moves up, and only under a trailing policy.
    pub stop_price: f64,
}

impl PositionState {
    /// Fractional return of closing at `exit_price`.
    ///
    /// A zero entry price (degenerate sizing) realizes a zero return.
    pub fn trade_return(&self, exit_price: f64) -> f64 {
        if self.entry_price == 0.0 {
            return 0.0;
        }
        (exit_price - self.entry_price) / self.entry_price
    }

    /// Realized profit of closing at `exit_price`: `return * size * entry_price`.
    pub fn profit(&self, exit_price: f64) -> f64 {
        self.trade_return(exit_price) * self.size * self.entry_price
    }
}
