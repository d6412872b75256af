//! TrendRule Core: engine, domain types, stop and sizing policies, signals.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, signals, open position, annotated output rows)
//! - Stop-loss policy (fixed or trailing) behind the `StopPolicy` trait
//! - Percent-of-equity position sizing behind the `Sizer` trait
//! - Bar-by-bar FLAT/LONG simulation with next-bar fills and skid slippage
//! - EMA crossover signal generation
//! - TradingView CSV and synthetic bar loading

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod risk;
pub mod signals;
pub mod sizers;

pub use config::{ConfigError, EngineConfig};
pub use domain::{AnnotatedBar, Bar, Direction, ExitReason, PositionState, Signal};
pub use engine::{EngineError, RunResult, SimulationEngine};
pub use risk::{RiskError, RiskManager, StopMode, StopPolicy};
pub use signals::{EmaCrossover, SignalGenerator};
pub use sizers::{PositionSizer, Sizer};
