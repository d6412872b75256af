//! Mutable run state, run errors and the run result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{AnnotatedBar, Bar, ExitReason, PositionState};
use crate::risk::RiskError;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("bar/signal length mismatch: {bars} bars, {signals} signals")]
    LengthMismatch { bars: usize, signals: usize },

    #[error("stop placement failed: {0}")]
    Risk(#[from] RiskError),
}

/// State that evolves bar-by-bar during one `run()` call.
///
/// Built fresh for every run, so concurrent runs never share it.
pub struct EngineState {
    /// Running realized equity.
    pub equity: f64,
    /// `Some` while LONG.
    pub position: Option<PositionState>,
    /// Index of the most recent recorded exit.
    pub last_exit_index: Option<usize>,
    pub rows: Vec<AnnotatedBar>,
}

impl EngineState {
    /// Seeds one output row per bar with `initial_capital` as its equity.
    pub fn new(bars: &[Bar], initial_capital: f64) -> Self {
        Self {
            equity: initial_capital,
            position: None,
            last_exit_index: None,
            rows: bars
                .iter()
                .cloned()
                .map(|bar| AnnotatedBar::seeded(bar, initial_capital))
                .collect(),
        }
    }

    /// Realizes the trade and records the exit on row `index`.
    pub fn close_position(
        &mut self,
        position: &PositionState,
        index: usize,
        exit_price: f64,
        reason: ExitReason,
    ) -> f64 {
        let trade_return = position.trade_return(exit_price);
        let profit = position.profit(exit_price);
        self.equity += profit;

        let row = &mut self.rows[index];
        row.exit_price = Some(exit_price);
        row.trade_return = Some(trade_return);
        row.profit_loss = Some(profit);
        row.equity = self.equity;
        row.exit_reason = Some(reason);

        self.last_exit_index = Some(index);
        profit
    }

    /// Carries the final equity from the last exit through the end of the series.
    pub fn forward_fill_equity(&mut self) {
        let from = self.last_exit_index.unwrap_or(0);
        let equity = self.equity;
        for row in self.rows.iter_mut().skip(from) {
            row.equity = equity;
        }
    }

    pub fn into_result(self, initial_capital: f64) -> RunResult {
        RunResult {
            initial_capital,
            final_equity: self.equity,
            open_position: self.position,
            bars: self.rows,
        }
    }
}

/// Result of a complete simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub initial_capital: f64,
    pub final_equity: f64,
    /// Position still open after the last bar. It is never force-closed.
    pub open_position: Option<PositionState>,
    /// One annotated row per input bar, in input order.
    pub bars: Vec<AnnotatedBar>,
}

impl RunResult {
    /// Equity value at each bar.
    pub fn equity_curve(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.equity).collect()
    }

    /// Rows on which an exit was realized.
    pub fn exits(&self) -> impl Iterator<Item = (usize, &AnnotatedBar)> {
        self.bars.iter().enumerate().filter(|(_, b)| b.is_exit())
    }

    pub fn exit_count(&self) -> usize {
        self.exits().count()
    }

    /// Sum of all recorded profit/loss values.
    pub fn realized_pnl(&self) -> f64 {
        self.bars.iter().filter_map(|b| b.profit_loss).sum()
    }
}
