//! EMA crossover signal: golden cross enters, death cross exits.
//!
//! The short EMA starts its recursion at bar `short_period`, the long EMA at
//! bar `long_period`; both are seeded with the close at that bar. A cross is
//! detected by comparing bar `i` with bar `i - 1`, so the first possible
//! signal is at `long_period + 1`.

use crate::config::ConfigError;
use crate::domain::{Bar, Signal};
use crate::indicators::Ema;

use super::SignalGenerator;

#[derive(Debug, Clone)]
pub struct EmaCrossover {
    short: Ema,
    long: Ema,
}

impl EmaCrossover {
    pub fn new(short_period: usize, long_period: usize) -> Result<Self, ConfigError> {
        if short_period == 0 || short_period >= long_period {
            return Err(ConfigError::InvalidPeriods {
                short: short_period,
                long: long_period,
            });
        }
        Ok(Self {
            short: Ema::new(short_period),
            long: Ema::new(long_period),
        })
    }

    pub fn short_period(&self) -> usize {
        self.short.span()
    }

    pub fn long_period(&self) -> usize {
        self.long.span()
    }

    /// The short and long EMA series over the bar closes.
    pub fn lines(&self, bars: &[Bar]) -> (Vec<f64>, Vec<f64>) {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        (
            self.short.compute_closes(&closes, self.short.span()),
            self.long.compute_closes(&closes, self.long.span()),
        )
    }
}

impl Default for EmaCrossover {
    fn default() -> Self {
        Self {
            short: Ema::new(9),
            long: Ema::new(21),
        }
    }
}

impl SignalGenerator for EmaCrossover {
    fn generate(&self, bars: &[Bar]) -> Vec<Signal> {
        let (short, long) = self.lines(bars);
        let mut signals = vec![Signal::None; bars.len()];

        // NaN on either side makes every comparison false, so no signal fires
        // until both lines exist on bar i and bar i - 1.
        for i in self.short.span().max(1)..bars.len() {
            let (s, l) = (short[i], long[i]);
            let (ps, pl) = (short[i - 1], long[i - 1]);

            let crossed_up = s > l && ps <= pl;
            let crossed_down = s < l && ps >= pl;

            signals[i] = if crossed_up {
                Signal::Enter
            } else if crossed_down {
                Signal::Exit
            } else {
                Signal::None
            };
        }

        signals
    }

    fn name(&self) -> &str {
        "ema_crossover"
    }

    fn warmup_bars(&self) -> usize {
        self.long.span() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn rejects_bad_periods() {
        assert!(EmaCrossover::new(0, 5).is_err());
        assert!(EmaCrossover::new(21, 9).is_err());
        assert!(EmaCrossover::new(9, 9).is_err());
        assert!(EmaCrossover::new(9, 21).is_ok());
    }

    #[test]
    fn hand_computed_crosses() {
        // short (span 1, from bar 1): 5, 5, 6, 4, 4
        // long  (span 2, from bar 2): 5, 17/3, 41/9, 113/27
        let bars = make_bars(&[5.0, 5.0, 5.0, 6.0, 4.0, 4.0]);
        let sig = EmaCrossover::new(1, 2).unwrap();
        let signals = sig.generate(&bars);
        assert_eq!(
            signals,
            vec![
                Signal::None,
                Signal::None,
                Signal::None,
                Signal::Enter,
                Signal::Exit,
                Signal::None
            ]
        );
    }

    #[test]
    fn no_signal_during_warmup() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + ((i as f64) * 0.4).sin() * 5.0).collect();
        let bars = make_bars(&closes);
        let sig = EmaCrossover::new(3, 8).unwrap();
        let signals = sig.generate(&bars);
        assert_eq!(signals.len(), bars.len());
        assert!(signals[..sig.warmup_bars()]
            .iter()
            .all(|s| *s == Signal::None));
        assert!(signals.iter().any(|s| *s != Signal::None));
    }

    #[test]
    fn crosses_alternate() {
        let closes: Vec<f64> = (0..200).map(|i| 50.0 + ((i as f64) * 0.15).sin() * 10.0).collect();
        let bars = make_bars(&closes);
        let signals = EmaCrossover::new(3, 10).unwrap().generate(&bars);
        let fired: Vec<Signal> = signals.into_iter().filter(|s| *s != Signal::None).collect();
        assert!(fired.len() >= 4);
        for pair in fired.windows(2) {
            assert_ne!(pair[0], pair[1], "crosses must alternate");
        }
    }

    #[test]
    fn short_series_has_no_signals() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let signals = EmaCrossover::default().generate(&bars);
        assert_eq!(signals, vec![Signal::None; 3]);
    }
}
