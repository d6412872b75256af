//! Domain types for TrendRule

pub mod annotated;
pub mod bar;
pub mod position;
pub mod signal;

pub use annotated::{AnnotatedBar, Direction, ExitReason};
pub use bar::Bar;
pub use position::PositionState;
pub use signal::{signals_from_ints, Signal, SignalError};
