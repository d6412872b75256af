//! TrendRule Runner: backtest orchestration, statistics, trade log, sweeps.
//!
//! This crate builds on `trendrule-core` to provide:
//! - TOML backtest configuration with content fingerprints
//! - Single-backtest runner: CSV → EMA signals → engine → stats → trade log
//! - Performance statistics and the per-trade log
//! - Plain-text reports
//! - Parallel parameter sweeps over engine settings

pub mod config;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod sweep;
pub mod trade_log;

pub use config::{BacktestConfig, ConfigError};
pub use metrics::PerformanceStats;
pub use runner::{run_backtest, run_on_bars, BacktestReport, RunError};
pub use sweep::{rank_by_final_equity, run_sweep, ParamGrid, SweepResult};
pub use trade_log::{TradeLog, TradeRecord};
