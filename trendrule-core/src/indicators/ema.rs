//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (span + 1).
//! Seed: EMA[start] = x[start] (no SMA warm-up), indices before `start` are NaN.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ema {
    span: usize,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self { span }
    }

    pub fn span(&self) -> usize {
        self.span
    }

    /// EMA of bar closes, starting the recursion at index `start`.
    pub fn compute_closes(&self, closes: &[f64], start: usize) -> Vec<f64> {
        ema_of_series(closes, self.span, start)
    }
}

/// Compute EMA values of `values`, seeded with `values[start]`.
///
/// Output has the same length as the input. A NaN input taints every later value.
pub fn ema_of_series(values: &[f64], span: usize, start: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if span == 0 || start >= n {
        return result;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev = values[start];
    result[start] = prev;

    for i in (start + 1)..n {
        if values[i].is_nan() || prev.is_nan() {
            for val in result.iter_mut().skip(i) {
                *val = f64::NAN;
            }
            return result;
        }
        let ema = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}
