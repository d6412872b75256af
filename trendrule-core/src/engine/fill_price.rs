//! Fill price computation: next-bar execution with skid slippage.
//!
//! Buys pay up from the open toward the high; sells give up from the open
//! toward the low. `skid` scales how much of that range is lost.

use crate::domain::Bar;

/// Entry fill on `next`: `open + skid * |high - open|`.
pub fn entry_fill(next: &Bar, skid: f64) -> f64 {
    next.open + skid * (next.high - next.open).abs()
}

/// Signal-exit fill on `next`: `open - skid * |open - low|`.
pub fn exit_fill(next: &Bar, skid: f64) -> f64 {
    next.open - skid * (next.open - next.low).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(open: f64, high: f64, low: f64) -> Bar {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Bar::new(ts, open, high, low, open, 0.0)
    }

    #[test]
    fn frictionless_fills_at_open() {
        let b = bar(1.10, 1.12, 1.08);
        assert_eq!(entry_fill(&b, 0.0), 1.10);
        assert_eq!(exit_fill(&b, 0.0), 1.10);
    }

    #[test]
    fn full_skid_fills_at_extremes() {
        let b = bar(100.0, 104.0, 97.0);
        assert_eq!(entry_fill(&b, 1.0), 104.0);
        assert_eq!(exit_fill(&b, 1.0), 97.0);
    }

    #[test]
    fn buy_always_pays_more_sell_always_gets_less() {
        let b = bar(100.0, 103.0, 99.0);
        for skid in [0.1, 0.5, 0.9] {
            assert!(entry_fill(&b, skid) >= b.open);
            assert!(exit_fill(&b, skid) <= b.open);
        }
        assert!((entry_fill(&b, 0.5) - 101.5).abs() < 1e-12);
        assert!((exit_fill(&b, 0.5) - 99.5).abs() < 1e-12);
    }
}
