//! Performance statistics: pure functions over the engine's annotated rows.
//!
//! Every metric is a pure function: equity curve and/or profit list in,
//! scalar out. No dependencies on the runner, data loading, or engine state.

use serde::{Deserialize, Serialize};
use trendrule_core::AnnotatedBar;

/// Aggregate statistics for a single backtest run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub initial_capital: f64,
    pub final_equity: f64,
    pub total_pnl: f64,
    pub total_trades: usize,
    /// Fraction of trades with positive profit, in `[0, 1]`.
    pub win_rate: f64,
    pub avg_pl: f64,
    pub sharpe: f64,
    /// Non-positive fraction, e.g. -0.15 for a 15% drawdown.
    pub max_drawdown: f64,
}

impl PerformanceStats {
    /// Compute all statistics from a finished run. Empty input yields zeros.
    pub fn compute(rows: &[AnnotatedBar]) -> Self {
        let equity: Vec<f64> = rows.iter().map(|r| r.equity).collect();
        let profits: Vec<f64> = rows
            .iter()
            .filter(|r| r.is_exit())
            .map(|r| r.profit_loss.unwrap_or(0.0))
            .collect();

        let initial_capital = equity.first().copied().unwrap_or(0.0);
        let final_equity = equity.last().copied().unwrap_or(0.0);

        Self {
            initial_capital,
            final_equity,
            total_pnl: final_equity - initial_capital,
            total_trades: profits.len(),
            win_rate: win_rate(&profits),
            avg_pl: mean_f64(&profits),
            sharpe: sharpe_ratio(&equity),
            max_drawdown: max_drawdown(&equity),
        }
    }

    /// Total return as a fraction of the starting equity.
    pub fn total_return(&self) -> f64 {
        if self.initial_capital <= 0.0 {
            return 0.0;
        }
        self.total_pnl / self.initial_capital
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Annualized Sharpe ratio from bar-to-bar equity returns.
///
/// Sharpe = mean(returns) / sample std(returns) * sqrt(252).
/// Returns 0.0 with fewer than two returns or zero variance.
pub fn sharpe_ratio(equity_curve: &[f64]) -> f64 {
    let returns = bar_returns(equity_curve);
    if returns.len() < 2 {
        return 0.0;
    }
    let std = std_dev(&returns);
    if std < 1e-15 {
        return 0.0;
    }
    (mean_f64(&returns) / std) * (252.0_f64).sqrt()
}

/// Maximum drawdown as a negative fraction (e.g., -0.15 = 15% drawdown).
///
/// Returns 0.0 if equity is constant or monotonically increasing.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for &eq in equity_curve {
        peak = peak.max(eq);
        if peak > 0.0 {
            max_dd = max_dd.min(eq / peak - 1.0);
        }
    }
    max_dd
}

/// Fraction of trades that made money. Break-even trades count as losers.
pub fn win_rate(profits: &[f64]) -> f64 {
    if profits.is_empty() {
        return 0.0;
    }
    let winners = profits.iter().filter(|&&p| p > 0.0).count();
    winners as f64 / profits.len() as f64
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Percent change between consecutive equity values.
pub fn bar_returns(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| {
            if w[0] > 0.0 {
                (w[1] - w[0]) / w[0]
            } else {
                0.0
            }
        })
        .collect()
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
