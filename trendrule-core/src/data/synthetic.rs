//! Deterministic synthetic bars for demos, tests and benchmarks.
//!
//! Random walk seeded from a BLAKE3 hash of the symbol, so the same symbol
//! always yields the same series. Results on synthetic data say nothing about
//! real markets.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::Bar;

/// Generate `count` weekday bars starting at `start`.
pub fn synthetic_bars(symbol: &str, start: NaiveDate, count: usize) -> Vec<Bar> {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::with_capacity(count);
    let mut price = 100.0_f64;
    let mut current = start;

    while bars.len() < count {
        let weekday = current.weekday();
        if weekday == Weekday::Sat || weekday == Weekday::Sun {
            current += Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64) as f64;

        if let Some(timestamp) = current.and_hms_opt(0, 0, 0) {
            bars.push(Bar::new(timestamp, open, high, low, close, volume));
        }

        price = close;
        current += Duration::days(1);
    }

    bars
}
