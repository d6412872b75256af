//! Trade log: one record per completed trade, rebuilt from annotated rows.
//!
//! The engine only marks entry and exit bars. Each exit is paired with the
//! nearest entry at or before it, which is unambiguous because the engine
//! holds at most one position at a time.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use trendrule_core::{AnnotatedBar, ExitReason};

/// A completed round-trip trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub entry_index: usize,
    pub entry_time: NaiveDateTime,
    pub exit_index: usize,
    pub exit_time: NaiveDateTime,
    pub entry_price: f64,
    pub exit_price: f64,
    pub exit_reason: Option<ExitReason>,
    pub trade_return: f64,
    pub profit_loss: f64,
    /// Profit in units of the notional risked per trade.
    pub r_multiple: f64,
    pub position_size: f64,
    /// Equity after the exit.
    pub equity: f64,
    /// Lowest low between entry and exit relative to the entry price, in percent.
    pub max_drawdown_pct: f64,
    pub duration_bars: usize,
}

impl TradeRecord {
    pub fn is_winner(&self) -> bool {
        self.profit_loss > 0.0
    }
}

/// Builds [`TradeRecord`]s from a finished run.
#[derive(Debug, Clone, Copy)]
pub struct TradeLog {
    capital: f64,
    position_pct: f64,
}

impl TradeLog {
    pub fn new(capital: f64, position_pct: f64) -> Self {
        Self {
            capital,
            position_pct,
        }
    }

    /// Notional risked per trade, the denominator of the R multiple.
    pub fn risk_per_trade(&self) -> f64 {
        self.capital * self.position_pct
    }

    pub fn generate(&self, rows: &[AnnotatedBar]) -> Vec<TradeRecord> {
        let mut trades = Vec::new();

        for (exit_index, exit_row) in rows.iter().enumerate() {
            let Some(exit_price) = exit_row.exit_price else {
                continue;
            };

            // Inclusive: a stop can fire on the entry bar itself.
            let entry = rows[..=exit_index]
                .iter()
                .enumerate()
                .rev()
                .find_map(|(i, r)| r.entry_price.map(|price| (i, r, price)));

            let Some((entry_index, entry_row, entry_price)) = entry else {
                warn!(exit_index, exit_price, "exit without a prior entry; skipped");
                continue;
            };

            let profit_loss = exit_row.profit_loss.unwrap_or(0.0);
            let risk = self.risk_per_trade();

            trades.push(TradeRecord {
                entry_index,
                entry_time: entry_row.bar.timestamp,
                exit_index,
                exit_time: exit_row.bar.timestamp,
                entry_price,
                exit_price,
                exit_reason: exit_row.exit_reason,
                trade_return: exit_row.trade_return.unwrap_or(0.0),
                profit_loss,
                r_multiple: if risk > 0.0 { profit_loss / risk } else { 0.0 },
                position_size: entry_row.position_size.unwrap_or(0.0),
                equity: exit_row.equity,
                max_drawdown_pct: max_adverse_pct(&rows[entry_index..=exit_index], entry_price),
                duration_bars: exit_index - entry_index,
            });
        }

        trades
    }
}

fn max_adverse_pct(held: &[AnnotatedBar], entry_price: f64) -> f64 {
    if entry_price == 0.0 {
        return 0.0;
    }
    let min_low = held
        .iter()
        .map(|r| r.bar.low)
        .fold(f64::INFINITY, f64::min);
    (min_low - entry_price) / entry_price * 100.0
}
