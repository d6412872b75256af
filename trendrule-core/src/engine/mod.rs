//! Simulation engine: bar-by-bar state machine and supporting pieces.
//!
//! The engine consumes a bar series plus one externally computed signal per
//! bar, applies the stop policy and sizer, and returns one annotated row per
//! input bar. Runs are synchronous and deterministic.

pub mod fill_price;
pub mod loop_runner;
pub mod state;

pub use fill_price::{entry_fill, exit_fill};
pub use loop_runner::SimulationEngine;
pub use state::{EngineError, EngineState, RunResult};
