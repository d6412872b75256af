//! Plain-text reports.
//!
//! - **Summary**: the performance statistics table
//! - **Trade log**: one line per trade, `-` for missing values

use std::fmt::Write as _;

use crate::metrics::PerformanceStats;
use crate::runner::BacktestReport;
use crate::trade_log::TradeRecord;

// ─── Number formatting ──────────────────────────────────────────────

/// `1234.5` → `$1,234.50`; negatives keep the sign after the dollar.
pub fn money(value: f64) -> String {
    format!("${}", thousands(value, 2))
}

/// `0.1234` → `12.34%`.
pub fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Five-decimal price, or `-` when absent.
pub fn price(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.5}"))
}

fn thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // -0.00 prints as 0.00
    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

// ─── Text tables ────────────────────────────────────────────────────

pub fn render_summary(stats: &PerformanceStats) -> String {
    let rows = [
        ("Initial Capital", money(stats.initial_capital)),
        ("Final Equity", money(stats.final_equity)),
        ("Total PnL", money(stats.total_pnl)),
        ("Total Trades", stats.total_trades.to_string()),
        ("Win Rate", percent(stats.win_rate)),
        ("Avg P/L per Trade", money(stats.avg_pl)),
        ("Sharpe Ratio", format!("{:.4}", stats.sharpe)),
        ("Max Drawdown", percent(stats.max_drawdown)),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "{label:<18} {value:>16}");
    }
    out
}

const TRADE_HEADER: [&str; 12] = [
    "Entry Time",
    "Exit Time",
    "Entry",
    "Exit",
    "Reason",
    "Return",
    "P/L",
    "R",
    "Size",
    "Equity",
    "Max DD %",
    "Bars",
];

pub fn render_trade_log(trades: &[TradeRecord]) -> String {
    let mut lines: Vec<[String; 12]> = Vec::with_capacity(trades.len() + 1);
    lines.push(TRADE_HEADER.map(str::to_string));
    for t in trades {
        lines.push([
            t.entry_time.format("%Y-%m-%d %H:%M").to_string(),
            t.exit_time.format("%Y-%m-%d %H:%M").to_string(),
            price(Some(t.entry_price)),
            price(Some(t.exit_price)),
            t.exit_reason.map_or_else(|| "-".to_string(), |r| r.to_string()),
            percent(t.trade_return),
            money(t.profit_loss),
            format!("{:.2}", t.r_multiple),
            format!("{:.2}", t.position_size),
            money(t.equity),
            format!("{:.2}", t.max_drawdown_pct),
            t.duration_bars.to_string(),
        ]);
    }

    let mut widths = [0usize; 12];
    for line in &lines {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for line in &lines {
        let cells: Vec<String> = line
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{cell:>w$}"))
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }
    out
}

/// Summary, open-position note and trade log, as printed by the CLI.
pub fn render_report(report: &BacktestReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Backtest Result ===");
    let _ = writeln!(out, "Fingerprint:       {}", report.fingerprint);
    let _ = writeln!(out, "Bars:              {}", report.bar_count);
    let _ = writeln!(out, "Signals:           {}", report.signal_count);
    let _ = writeln!(out);
    let _ = writeln!(out, "--- Performance ---");
    out.push_str(&render_summary(&report.stats));
    if let Some(open) = &report.result.open_position {
        let _ = writeln!(
            out,
            "Open position:     {:.2} @ {} (stop {}) since bar {}",
            open.size,
            price(Some(open.entry_price)),
            price(Some(open.stop_price)),
            open.entry_index
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "--- Trade Log ---");
    if report.trades.is_empty() {
        let _ = writeln!(out, "(no completed trades)");
    } else {
        out.push_str(&render_trade_log(&report.trades));
    }
    out
}
