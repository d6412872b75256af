//! TrendRule CLI: run and sweep commands.
//!
//! Commands:
//! - `run`: one backtest from a TOML config and/or synthetic bars, with overrides
//! - `sweep`: evaluate a grid of engine settings in parallel and rank them
//!
//! Logs go to stderr; `RUST_LOG` controls verbosity (default `info`).

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trendrule_core::data::{load_tradingview_csv, synthetic_bars};
use trendrule_core::{Bar, SignalGenerator, StopMode};
use trendrule_runner::report::{money, percent, render_report};
use trendrule_runner::{
    rank_by_final_equity, run_backtest, run_on_bars, run_sweep, BacktestConfig, ParamGrid,
};

#[derive(Parser)]
#[command(
    name = "trendrule",
    version,
    about = "TrendRule CLI: long-only EMA crossover backtester"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one backtest and print the summary and trade log.
    Run {
        #[command(flatten)]
        source: Source,

        #[command(flatten)]
        overrides: Overrides,
    },
    /// Run a grid of engine settings over the same bars and signals.
    Sweep {
        #[command(flatten)]
        source: Source,

        #[command(flatten)]
        overrides: Overrides,

        /// Skid values, comma-separated.
        #[arg(long, value_delimiter = ',', default_value = "0,0.5,1")]
        skids: Vec<f64>,

        /// Position fractions, comma-separated.
        #[arg(long, value_delimiter = ',', default_value = "0.01")]
        position_pcts: Vec<f64>,

        /// Stop-loss fractions, comma-separated.
        #[arg(long, value_delimiter = ',', default_value = "0.02,0.05,0.1,0.25")]
        stop_loss_pcts: Vec<f64>,

        /// Stop modes, comma-separated (fixed, trailing).
        #[arg(long, value_delimiter = ',', default_value = "fixed,trailing", value_parser = parse_stop_mode)]
        stop_loss_modes: Vec<StopMode>,

        /// Show only the best N results.
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

/// Where bars and base parameters come from.
#[derive(Args)]
struct Source {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use N synthetic bars instead of the config's CSV.
    #[arg(long)]
    synthetic: Option<usize>,

    /// Symbol that seeds the synthetic series.
    #[arg(long, default_value = "SYNTH")]
    symbol: String,

    /// First synthetic bar date (YYYY-MM-DD).
    #[arg(long, default_value = "2020-01-01")]
    start: String,
}

/// Command-line values that replace the config's.
#[derive(Args)]
struct Overrides {
    #[arg(long)]
    capital: Option<f64>,

    #[arg(long)]
    skid: Option<f64>,

    #[arg(long)]
    position_pct: Option<f64>,

    #[arg(long)]
    stop_loss_pct: Option<f64>,

    #[arg(long, value_parser = parse_stop_mode)]
    stop_loss_mode: Option<StopMode>,

    /// Short EMA period.
    #[arg(long)]
    short: Option<usize>,

    /// Long EMA period.
    #[arg(long)]
    long: Option<usize>,
}

impl Overrides {
    fn apply(&self, config: &mut BacktestConfig) {
        let bt = &mut config.backtest;
        if let Some(v) = self.capital {
            bt.initial_capital = v;
        }
        if let Some(v) = self.skid {
            bt.skid = v;
        }
        if let Some(v) = self.position_pct {
            bt.position_pct = v;
        }
        if let Some(v) = self.stop_loss_pct {
            bt.stop_loss_pct = v;
        }
        if let Some(v) = self.stop_loss_mode {
            bt.stop_loss_mode = v;
        }
        if let Some(v) = self.short {
            config.signal.short_period = v;
        }
        if let Some(v) = self.long {
            config.signal.long_period = v;
        }
    }
}

fn parse_stop_mode(s: &str) -> Result<StopMode, String> {
    s.parse().map_err(|e: trendrule_core::ConfigError| e.to_string())
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { source, overrides } => run_cmd(source, overrides),
        Commands::Sweep {
            source,
            overrides,
            skids,
            position_pcts,
            stop_loss_pcts,
            stop_loss_modes,
            top,
        } => sweep_cmd(
            source,
            overrides,
            ParamGrid {
                skids,
                position_pcts,
                stop_loss_pcts,
                stop_loss_modes,
            },
            top,
        ),
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn build_config(source: &Source, overrides: &Overrides) -> Result<BacktestConfig> {
    if source.config.is_none() && source.synthetic.is_none() {
        bail!("one of --config or --synthetic is required");
    }
    let mut config = match &source.config {
        Some(path) => BacktestConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BacktestConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn synthetic(source: &Source, count: usize) -> Result<Vec<Bar>> {
    let start = NaiveDate::parse_from_str(&source.start, "%Y-%m-%d")
        .with_context(|| format!("bad --start date '{}'", source.start))?;
    info!(symbol = %source.symbol, count, "using synthetic bars");
    Ok(synthetic_bars(&source.symbol, start, count))
}

fn load_bars(source: &Source, config: &BacktestConfig) -> Result<Vec<Bar>> {
    if let Some(count) = source.synthetic {
        return synthetic(source, count);
    }
    let data = config.data()?;
    let bars = load_tradingview_csv(&data.path, &data.csv_options())?;
    info!(path = %data.path.display(), bars = bars.len(), "loaded bars");
    Ok(bars)
}

fn run_cmd(source: Source, overrides: Overrides) -> Result<()> {
    let config = build_config(&source, &overrides)?;

    let report = match source.synthetic {
        Some(count) => run_on_bars(&config, &synthetic(&source, count)?)?,
        None => run_backtest(&config)?,
    };

    print!("{}", render_report(&report));
    if source.synthetic.is_some() {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }

    Ok(())
}

fn sweep_cmd(source: Source, overrides: Overrides, grid: ParamGrid, top: usize) -> Result<()> {
    if grid.size() == 0 {
        bail!("empty sweep grid");
    }
    let config = build_config(&source, &overrides)?;
    let bars = load_bars(&source, &config)?;
    let signals = config.signal.build()?.generate(&bars);

    let mut results = run_sweep(&config.engine_config(), &bars, &signals, &grid)?;
    rank_by_final_equity(&mut results);

    println!();
    println!(
        "=== Sweep: {} configurations over {} bars ===",
        results.len(),
        bars.len()
    );
    println!(
        "{:>4}  {:>5}  {:>6}  {:>6}  {:>8}  {:>16}  {:>7}  {:>7}  {:>8}  {:>8}",
        "Rank", "Skid", "Pos", "Stop", "Mode", "Final Equity", "Trades", "Win", "Sharpe", "Max DD"
    );
    for (rank, r) in results.iter().take(top).enumerate() {
        println!(
            "{:>4}  {:>5.2}  {:>6.3}  {:>6.3}  {:>8}  {:>16}  {:>7}  {:>7}  {:>8.4}  {:>8}",
            rank + 1,
            r.config.skid,
            r.config.position_pct,
            r.config.stop_loss_pct,
            r.config.stop_loss_mode.to_string(),
            money(r.stats.final_equity),
            r.stats.total_trades,
            percent(r.stats.win_rate),
            r.stats.sharpe,
            percent(r.stats.max_drawdown),
        );
    }
    if source.synthetic.is_some() {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }

    Ok(())
}
