//! Signal generation: market-timing logic that feeds the engine.
//!
//! Signals must NEVER depend on position or equity state. They are computed
//! once over the whole bar series before the simulation runs.

pub mod ema_crossover;

pub use ema_crossover::EmaCrossover;

use crate::domain::{Bar, Signal};

/// Position-agnostic signal generator
///
/// # Invariants
/// - `generate()` returns exactly one signal per bar
/// - `generate()` MUST be deterministic for the same bar sequence
/// - The signal at bar `i` uses only bars `0..=i`
pub trait SignalGenerator: Send + Sync {
    fn generate(&self, bars: &[Bar]) -> Vec<Signal>;

    /// Signal name for logging
    fn name(&self) -> &str;

    /// Bars before the first index that can carry a non-`None` signal.
    fn warmup_bars(&self) -> usize;
}
