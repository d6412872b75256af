//! Backtest runner: wires together data loading, signals, engine, and metrics.
//!
//! Two entry points:
//! - `run_backtest()`: loads the CSV named in the config, then runs. Used by the CLI.
//! - `run_on_bars()`: takes pre-loaded bars. Used for synthetic data and tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use trendrule_core::data::{load_tradingview_csv, DataError};
use trendrule_core::{Bar, EngineError, RunResult, SignalGenerator, SimulationEngine};

use crate::config::{BacktestConfig, ConfigError};
use crate::metrics::PerformanceStats;
use crate::trade_log::{TradeLog, TradeRecord};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

impl From<trendrule_core::ConfigError> for RunError {
    fn from(e: trendrule_core::ConfigError) -> Self {
        RunError::Config(ConfigError::Invalid(e))
    }
}

/// Complete result of a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Content hash of the config that produced this report.
    pub fingerprint: String,
    pub bar_count: usize,
    pub signal_count: usize,
    pub result: RunResult,
    pub stats: PerformanceStats,
    pub trades: Vec<TradeRecord>,
}

/// Run a backtest on the CSV named in `config.data`.
pub fn run_backtest(config: &BacktestConfig) -> Result<BacktestReport, RunError> {
    config.validate()?;
    let data = config.data()?;
    let bars = load_tradingview_csv(&data.path, &data.csv_options())?;
    info!(path = %data.path.display(), bars = bars.len(), "loaded bars");
    run_on_bars(config, &bars)
}

/// Run a backtest on pre-loaded bars: no I/O.
pub fn run_on_bars(config: &BacktestConfig, bars: &[Bar]) -> Result<BacktestReport, RunError> {
    config.validate()?;
    let fingerprint = config.fingerprint()?;
    let engine_config = config.engine_config();
    let signal = config.signal.build()?;
    let engine = SimulationEngine::new(engine_config.clone())?;

    info!(
        fingerprint = %&fingerprint[..12],
        bars = bars.len(),
        signal = signal.name(),
        short = signal.short_period(),
        long = signal.long_period(),
        stop_mode = %engine_config.stop_loss_mode,
        "starting backtest"
    );

    let signals = signal.generate(bars);
    let signal_count = signals.iter().filter(|s| s.as_i8() != 0).count();
    let result = engine.run(bars, &signals)?;

    let stats = PerformanceStats::compute(&result.bars);
    let trades = TradeLog::new(engine_config.initial_capital, engine_config.position_pct)
        .generate(&result.bars);

    info!(
        trades = trades.len(),
        final_equity = stats.final_equity,
        total_pnl = stats.total_pnl,
        open_position = result.open_position.is_some(),
        "backtest finished"
    );

    Ok(BacktestReport {
        fingerprint,
        bar_count: bars.len(),
        signal_count,
        result,
        stats,
        trades,
    })
}
