//! Parameter sweep over engine settings.
//!
//! Signals depend only on bars, so they are computed once and shared
//! read-only; each grid point runs its own engine in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use trendrule_core::{Bar, EngineConfig, Signal, SimulationEngine, StopMode};

use crate::metrics::PerformanceStats;
use crate::runner::RunError;

/// Parameter values to sweep.
///
/// Every combination of the listed values is evaluated. Capital comes from
/// the base config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub skids: Vec<f64>,
    pub position_pcts: Vec<f64>,
    pub stop_loss_pcts: Vec<f64>,
    pub stop_loss_modes: Vec<StopMode>,
}

impl ParamGrid {
    /// A grid that only evaluates `base`.
    pub fn single(base: &EngineConfig) -> Self {
        Self {
            skids: vec![base.skid],
            position_pcts: vec![base.position_pct],
            stop_loss_pcts: vec![base.stop_loss_pct],
            stop_loss_modes: vec![base.stop_loss_mode],
        }
    }

    /// Total number of configurations in this grid.
    pub fn size(&self) -> usize {
        self.skids.len()
            * self.position_pcts.len()
            * self.stop_loss_pcts.len()
            * self.stop_loss_modes.len()
    }

    /// All configurations, skid outermost and stop mode innermost.
    pub fn generate_configs(&self, base: &EngineConfig) -> Vec<EngineConfig> {
        let mut configs = Vec::with_capacity(self.size());
        for &skid in &self.skids {
            for &position_pct in &self.position_pcts {
                for &stop_loss_pct in &self.stop_loss_pcts {
                    for &stop_loss_mode in &self.stop_loss_modes {
                        configs.push(EngineConfig {
                            skid,
                            position_pct,
                            stop_loss_pct,
                            stop_loss_mode,
                            ..base.clone()
                        });
                    }
                }
            }
        }
        configs
    }
}

/// Outcome of one grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub config: EngineConfig,
    pub stats: PerformanceStats,
    pub open_position: bool,
}

/// Evaluate every grid point. Results come back in grid order.
///
/// Any invalid grid point fails the whole sweep before anything runs.
pub fn run_sweep(
    base: &EngineConfig,
    bars: &[Bar],
    signals: &[Signal],
    grid: &ParamGrid,
) -> Result<Vec<SweepResult>, RunError> {
    let engines = grid
        .generate_configs(base)
        .into_iter()
        .map(SimulationEngine::new)
        .collect::<Result<Vec<_>, _>>()?;

    info!(points = engines.len(), bars = bars.len(), "starting sweep");

    engines
        .par_iter()
        .map(|engine| -> Result<SweepResult, RunError> {
            let result = engine.run(bars, signals)?;
            Ok(SweepResult {
                config: engine.config().clone(),
                stats: PerformanceStats::compute(&result.bars),
                open_position: result.open_position.is_some(),
            })
        })
        .collect()
}

/// Best final equity first. Ties keep grid order.
pub fn rank_by_final_equity(results: &mut [SweepResult]) {
    results.sort_by(|a, b| b.stats.final_equity.total_cmp(&a.stats.final_equity));
}
