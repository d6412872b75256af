//! Criterion benchmarks for TrendRule hot paths.
//!
//! Benchmarks:
//! 1. EMA crossover signal generation
//! 2. Bar event loop, fixed and trailing stops
//! 3. Signals plus simulation end to end

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use trendrule_core::data::synthetic_bars;
use trendrule_core::{EmaCrossover, EngineConfig, SignalGenerator, SimulationEngine, StopMode};

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 3).unwrap()
}

fn bench_signals(c: &mut Criterion) {
    let mut group = c.benchmark_group("ema_crossover");
    let signal = EmaCrossover::default();
    for n in SIZES {
        let bars = synthetic_bars("BENCH", start(), n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &bars, |b, bars| {
            b.iter(|| signal.generate(black_box(bars)))
        });
    }
    group.finish();
}

fn bench_event_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_loop");
    for mode in [StopMode::Fixed, StopMode::Trailing] {
        let engine = SimulationEngine::new(EngineConfig {
            stop_loss_pct: 0.05,
            stop_loss_mode: mode,
            ..EngineConfig::default()
        })
        .unwrap();
        for n in SIZES {
            let bars = synthetic_bars("BENCH", start(), n);
            let signals = EmaCrossover::new(5, 20).unwrap().generate(&bars);
            group.bench_with_input(
                BenchmarkId::new(mode.to_string(), n),
                &(bars, signals),
                |b, (bars, signals)| b.iter(|| engine.run(black_box(bars), black_box(signals))),
            );
        }
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let bars = synthetic_bars("BENCH", start(), 10_000);
    let signal = EmaCrossover::default();
    let engine = SimulationEngine::new(EngineConfig::default()).unwrap();
    c.bench_function("signals_and_run_10k", |b| {
        b.iter(|| {
            let signals = signal.generate(black_box(&bars));
            engine.run(&bars, &signals)
        })
    });
}

criterion_group!(benches, bench_signals, bench_event_loop, bench_end_to_end);
criterion_main!(benches);
