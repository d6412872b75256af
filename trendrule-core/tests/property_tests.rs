//! Property tests for engine invariants.
//!
//! Uses proptest to verify, over random bar series, signals and configs:
//! 1. Determinism: identical inputs give identical results
//! 2. Equity accounting: final equity = initial capital + realized P/L
//! 3. Forward fill: every row from the last exit carries the final equity
//! 4. Ratchet monotonicity: a trade's stop never decreases
//! 5. No look-ahead: truncating the future does not change earlier rows
//! 6. Causality: entries and signal exits follow the signal one bar earlier
//! 7. Alternation: entries and exits alternate, starting with an entry

use chrono::NaiveDate;
use proptest::prelude::*;
use trendrule_core::{
    Bar, EngineConfig, ExitReason, RunResult, Signal, SimulationEngine, StopMode,
};

// ── Strategies (proptest) ────────────────────────────────────────────

/// One bar's shape: close-to-close return, upper wick, lower wick, open gap.
fn arb_bar_shape() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (-0.05..0.05_f64, 0.0..0.03_f64, 0.0..0.03_f64, -0.01..0.01_f64)
}

fn arb_signal() -> impl Strategy<Value = Signal> {
    prop_oneof![
        3 => Just(Signal::None),
        1 => Just(Signal::Enter),
        1 => Just(Signal::Exit),
    ]
}

fn arb_series() -> impl Strategy<Value = (Vec<Bar>, Vec<Signal>)> {
    prop::collection::vec((arb_bar_shape(), arb_signal()), 2..60).prop_map(|rows| {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut price = 1.10_f64;
        let mut bars = Vec::with_capacity(rows.len());
        let mut signals = Vec::with_capacity(rows.len());
        for (i, ((ret, up, down, gap), signal)) in rows.into_iter().enumerate() {
            let open = price * (1.0 + gap);
            let close = price * (1.0 + ret);
            let high = open.max(close) * (1.0 + up);
            let low = open.min(close) * (1.0 - down);
            bars.push(Bar::new(
                start + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                1_000.0,
            ));
            signals.push(signal);
            price = close;
        }
        (bars, signals)
    })
}

fn arb_config() -> impl Strategy<Value = EngineConfig> {
    (
        1_000.0..1_000_000.0_f64,
        0.0..=1.0_f64,
        0.01..=1.0_f64,
        0.01..0.5_f64,
        any::<bool>(),
    )
        .prop_map(|(capital, skid, position_pct, stop_loss_pct, trailing)| EngineConfig {
            initial_capital: capital,
            skid,
            position_pct,
            stop_loss_pct,
            stop_loss_mode: if trailing {
                StopMode::Trailing
            } else {
                StopMode::Fixed
            },
        })
}

fn run(config: &EngineConfig, bars: &[Bar], signals: &[Signal]) -> RunResult {
    SimulationEngine::new(config.clone())
        .unwrap()
        .run(bars, signals)
        .unwrap()
}

// ── Properties ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn runs_are_deterministic((bars, signals) in arb_series(), config in arb_config()) {
        let engine = SimulationEngine::new(config).unwrap();
        let a = engine.run(&bars, &signals).unwrap();
        let b = engine.run(&bars, &signals).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn equity_equals_capital_plus_realized_pnl(
        (bars, signals) in arb_series(),
        config in arb_config(),
    ) {
        let result = run(&config, &bars, &signals);
        let expected = result.initial_capital + result.realized_pnl();
        let tolerance = 1e-9 * result.initial_capital.max(result.final_equity.abs());
        prop_assert!((result.final_equity - expected).abs() <= tolerance);
        prop_assert_eq!(result.bars.len(), bars.len());
        prop_assert!(result.bars.iter().all(|b| b.equity.is_finite()));
    }

    #[test]
    fn equity_is_forward_filled((bars, signals) in arb_series(), config in arb_config()) {
        let result = run(&config, &bars, &signals);
        let from = result.exits().map(|(i, _)| i).last().unwrap_or(0);
        for row in &result.bars[from..] {
            prop_assert_eq!(row.equity, result.final_equity);
        }
    }

    #[test]
    fn stops_never_decrease_within_a_trade(
        (bars, signals) in arb_series(),
        config in arb_config(),
    ) {
        let result = run(&config, &bars, &signals);
        let mut previous: Option<f64> = None;
        for row in &result.bars {
            if row.is_entry() {
                previous = None;
            }
            if let Some(stop) = row.stop_price {
                if let Some(prev) = previous {
                    prop_assert!(stop >= prev, "stop fell from {} to {}", prev, stop);
                    if config.stop_loss_mode == StopMode::Fixed {
                        prop_assert_eq!(stop, prev);
                    }
                }
                previous = Some(stop);
            }
            if row.is_exit() {
                previous = None;
            }
        }
    }

    #[test]
    fn no_look_ahead(
        (bars, signals) in arb_series(),
        config in arb_config(),
        cut in 0.0..1.0_f64,
    ) {
        let n = bars.len();
        let m = 2 + ((n - 2) as f64 * cut) as usize;
        let full = run(&config, &bars, &signals);
        let truncated = run(&config, &bars[..m], &signals[..m]);
        // Row m - 1 is the truncated run's final bar and is never a decision
        // point there, so only rows before it must agree.
        prop_assert_eq!(&full.bars[..m - 1], &truncated.bars[..m - 1]);
    }

    #[test]
    fn fills_follow_the_previous_bar_signal(
        (bars, signals) in arb_series(),
        config in arb_config(),
    ) {
        let result = run(&config, &bars, &signals);
        prop_assert!(!result.bars[0].is_entry());
        for (j, row) in result.bars.iter().enumerate() {
            if row.is_entry() {
                prop_assert_eq!(signals[j - 1], Signal::Enter);
                let price = row.entry_price.unwrap();
                prop_assert!(price >= bars[j].open && price <= bars[j].high + 1e-12);
            }
            match row.exit_reason {
                Some(ExitReason::Signal) => {
                    prop_assert_eq!(signals[j - 1], Signal::Exit);
                    let price = row.exit_price.unwrap();
                    prop_assert!(price <= bars[j].open && price >= bars[j].low - 1e-12);
                }
                Some(ExitReason::StopLoss) => {
                    let stop = row.stop_price.unwrap();
                    prop_assert_eq!(row.exit_price, Some(stop));
                    prop_assert!(bars[j].low <= stop);
                }
                None => {}
            }
        }
    }

    #[test]
    fn entries_and_exits_alternate((bars, signals) in arb_series(), config in arb_config()) {
        let result = run(&config, &bars, &signals);
        let mut long = false;
        for row in &result.bars {
            if row.is_entry() {
                prop_assert!(!long, "entry while already long");
                long = true;
            }
            if row.is_exit() {
                prop_assert!(long, "exit while flat");
                long = false;
            }
        }
        prop_assert_eq!(long, result.open_position.is_some());
    }
}
