//! Bar-by-bar event loop: the heart of the simulation engine.
//!
//! Two states, FLAT and LONG. Decisions are taken on bar `i` for
//! `i in 0..n-1`; fills reference bar `i + 1` except stop-loss exits,
//! which fill at the stop on bar `i` itself.
//!
//! Per LONG bar, in order:
//! 1. Trailing policies ratchet the stop from the bar's high
//! 2. Stop check against the bar's low (wins over any exit signal)
//! 3. Exit signal check, filled at the next bar's open minus skid

use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::{ConfigError, EngineConfig};
use crate::domain::{Bar, Direction, ExitReason, PositionState, Signal};
use crate::risk::{RiskManager, StopPolicy};
use crate::sizers::{PositionSizer, Sizer};

use super::fill_price::{entry_fill, exit_fill};
use super::state::{EngineError, EngineState, RunResult};

/// Long-only trend-following simulator over one bar series.
///
/// Policies are shared read-only, so one engine (or clones of it) can
/// serve many runs, including concurrent ones; each `run()` owns its state.
#[derive(Clone)]
pub struct SimulationEngine {
    config: EngineConfig,
    stop_policy: Arc<dyn StopPolicy>,
    sizer: Arc<dyn Sizer>,
}

impl std::fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("config", &self.config)
            .field("stop_policy", &self.stop_policy.name())
            .field("sizer", &self.sizer.name())
            .finish()
    }
}

impl SimulationEngine {
    /// Engine with the percentage stop and percent-of-equity sizer from `config`.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let stop_policy = RiskManager::new(config.stop_loss_pct, config.stop_loss_mode)?;
        let sizer = PositionSizer::new(config.position_pct)?;
        Self::with_policies(config, Arc::new(stop_policy), Arc::new(sizer))
    }

    /// Engine with caller-supplied policies. The config's stop and sizing
    /// fields are still validated but the policies decide behavior.
    pub fn with_policies(
        config: EngineConfig,
        stop_policy: Arc<dyn StopPolicy>,
        sizer: Arc<dyn Sizer>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            stop_policy,
            sizer,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the simulation. `signals[i]` is the signal observed on `bars[i]`.
    pub fn run(&self, bars: &[Bar], signals: &[Signal]) -> Result<RunResult, EngineError> {
        if bars.len() != signals.len() {
            return Err(EngineError::LengthMismatch {
                bars: bars.len(),
                signals: signals.len(),
            });
        }

        let mut state = EngineState::new(bars, self.config.initial_capital);

        // The last bar is never a decision point: every decision needs bar i + 1.
        for i in 0..bars.len().saturating_sub(1) {
            match state.position.take() {
                None => self.on_flat_bar(&mut state, bars, signals[i], i)?,
                Some(position) => self.on_long_bar(&mut state, bars, signals[i], i, position),
            }
        }

        state.forward_fill_equity();
        let result = state.into_result(self.config.initial_capital);

        debug!(
            bars = bars.len(),
            exits = result.exit_count(),
            final_equity = result.final_equity,
            still_open = result.open_position.is_some(),
            stop_policy = self.stop_policy.name(),
            sizer = self.sizer.name(),
            "simulation finished"
        );

        Ok(result)
    }

    fn on_flat_bar(
        &self,
        state: &mut EngineState,
        bars: &[Bar],
        signal: Signal,
        i: usize,
    ) -> Result<(), EngineError> {
        // Resolve bar i's equity before it is read for sizing.
        state.rows[i].equity = state.equity;

        if signal != Signal::Enter {
            return Ok(());
        }

        let entry_index = i + 1;
        let entry_price = entry_fill(&bars[entry_index], self.config.skid);
        let capital = state.rows[i].equity;
        let size = self.sizer.allocate(entry_price, capital);
        let stop_price = self.stop_policy.initial_stop(entry_price)?;

        let row = &mut state.rows[entry_index];
        row.entry_price = Some(entry_price);
        row.direction = Some(Direction::Buy);
        row.position_size = Some(size);
        row.stop_price = Some(stop_price);

        debug!(
            signal_index = i,
            entry_index,
            entry_price,
            size,
            stop_price,
            "entry"
        );

        state.position = Some(PositionState {
            entry_index,
            entry_price,
            size,
            stop_price,
        });
        Ok(())
    }

    fn on_long_bar(
        &self,
        state: &mut EngineState,
        bars: &[Bar],
        signal: Signal,
        i: usize,
        mut position: PositionState,
    ) {
        let bar = &bars[i];

        if self.stop_policy.trails() {
            let advanced = self.stop_policy.advance(position.stop_price, bar.high);
            if advanced > position.stop_price {
                trace!(index = i, from = position.stop_price, to = advanced, "stop raised");
            }
            position.stop_price = advanced;
        }

        let row = &mut state.rows[i];
        row.stop_price = Some(position.stop_price);
        // Realized running equity, not the seeded initial capital.
        row.equity = state.equity;

        if self.stop_policy.is_triggered(bar.low, position.stop_price) {
            let exit_price = position.stop_price;
            let profit = state.close_position(&position, i, exit_price, ExitReason::StopLoss);
            debug!(
                exit_index = i,
                entry_index = position.entry_index,
                exit_price,
                profit,
                equity = state.equity,
                "stop-loss exit"
            );
            return;
        }

        if signal == Signal::Exit {
            let exit_index = i + 1;
            let exit_price = exit_fill(&bars[exit_index], self.config.skid);
            let profit =
                state.close_position(&position, exit_index, exit_price, ExitReason::Signal);
            debug!(
                signal_index = i,
                exit_index,
                entry_index = position.entry_index,
                exit_price,
                profit,
                equity = state.equity,
                "signal exit"
            );
            return;
        }

        state.position = Some(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::StopMode;
    use chrono::NaiveDate;

    fn flat_bars(n: usize, price: f64) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..n)
            .map(|i| {
                Bar::new(
                    start + chrono::Duration::days(i as i64),
                    price,
                    price,
                    price,
                    price,
                    1_000.0,
                )
            })
            .collect()
    }

    fn frictionless() -> EngineConfig {
        EngineConfig {
            initial_capital: 100_000.0,
            skid: 0.0,
            position_pct: 0.01,
            stop_loss_pct: 0.25,
            stop_loss_mode: StopMode::Fixed,
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let config = EngineConfig {
            skid: -0.1,
            ..frictionless()
        };
        assert!(SimulationEngine::new(config).is_err());
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let engine = SimulationEngine::new(frictionless()).unwrap();
        let err = engine.run(&flat_bars(3, 1.0), &[Signal::None]).unwrap_err();
        assert_eq!(err, EngineError::LengthMismatch { bars: 3, signals: 1 });
    }

    #[test]
    fn empty_series_produces_empty_output() {
        let engine = SimulationEngine::new(frictionless()).unwrap();
        let result = engine.run(&[], &[]).unwrap();
        assert!(result.bars.is_empty());
        assert_eq!(result.final_equity, 100_000.0);
    }

    #[test]
    fn single_bar_is_never_a_decision_point() {
        let engine = SimulationEngine::new(frictionless()).unwrap();
        let result = engine
            .run(&flat_bars(1, 1.0), &[Signal::Enter])
            .unwrap();
        assert_eq!(result.bars.len(), 1);
        assert!(result.bars[0].entry_price.is_none());
        assert_eq!(result.bars[0].equity, 100_000.0);
        assert!(result.open_position.is_none());
    }

    #[test]
    fn entry_on_penultimate_bar_stays_open() {
        let engine = SimulationEngine::new(frictionless()).unwrap();
        let bars = flat_bars(3, 2.0);
        let signals = [Signal::None, Signal::Enter, Signal::None];
        let result = engine.run(&bars, &signals).unwrap();
        assert_eq!(result.bars[2].entry_price, Some(2.0));
        let open = result.open_position.as_ref().expect("position must remain open");
        assert_eq!(open.entry_index, 2);
        assert_eq!(result.exit_count(), 0);
        assert!(result.bars.iter().all(|b| b.equity == 100_000.0));
    }

    #[test]
    fn exit_signal_while_flat_is_ignored() {
        let engine = SimulationEngine::new(frictionless()).unwrap();
        let bars = flat_bars(4, 1.0);
        let signals = [Signal::Exit, Signal::Exit, Signal::None, Signal::None];
        let result = engine.run(&bars, &signals).unwrap();
        assert_eq!(result.exit_count(), 0);
        assert!(result.bars.iter().all(|b| b.entry_price.is_none()));
    }

    #[test]
    fn zero_entry_price_records_zero_size_entry() {
        let engine = SimulationEngine::new(frictionless()).unwrap();
        let bars = flat_bars(4, 0.0);
        let signals = [Signal::Enter, Signal::None, Signal::None, Signal::None];
        let result = engine.run(&bars, &signals).unwrap();
        assert_eq!(result.bars[1].entry_price, Some(0.0));
        assert_eq!(result.bars[1].position_size, Some(0.0));
        // Stop at 0.0 is breached by a 0.0 low on the entry bar itself.
        assert_eq!(result.bars[1].exit_reason, Some(ExitReason::StopLoss));
        assert_eq!(result.bars[1].profit_loss, Some(0.0));
        assert!(result.bars.iter().all(|b| b.equity == 100_000.0));
    }

    #[test]
    fn engine_is_reusable_across_runs() {
        let engine = SimulationEngine::new(frictionless()).unwrap();
        let bars = flat_bars(5, 1.0);
        let signals = [Signal::Enter, Signal::None, Signal::Exit, Signal::None, Signal::None];
        let first = engine.run(&bars, &signals).unwrap();
        let second = engine.run(&bars, &signals).unwrap();
        assert_eq!(first, second);
    }
}
