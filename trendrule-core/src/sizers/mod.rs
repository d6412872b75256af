//! Position Sizers: determine trade quantity
//!
//! Sizers translate current equity and an entry fill price into units.
//! They are equity-aware but signal-agnostic.

pub mod percent_equity;

pub use percent_equity::PositionSizer;

/// Position sizing logic
///
/// # Responsibilities
/// - Convert equity + entry price → units to hold
///
/// # Non-Responsibilities
/// - Sizers do NOT decide entry/exit (that's the signal's job)
/// - Sizers do NOT debit capital (allocation is notional)
pub trait Sizer: Send + Sync {
    /// Units to buy at `entry_price` given `current_equity`.
    ///
    /// Returns 0.0 for a zero entry price.
    fn allocate(&self, entry_price: f64, current_equity: f64) -> f64;

    /// Sizer name for logging
    fn name(&self) -> &str;
}
