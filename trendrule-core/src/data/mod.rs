//! Bar data loading: validation happens here, not in the engine.

pub mod synthetic;
pub mod tradingview;

pub use synthetic::synthetic_bars;
pub use tradingview::{load_tradingview_csv, read_tradingview_csv, CsvOptions};

use chrono::NaiveDateTime;
use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for data loading.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("utc offset of {hours} hours is out of range")]
    UtcOffsetOutOfRange { hours: i64 },

    #[error("line {line}: bad timestamp '{value}'")]
    BadTimestamp { line: usize, value: String },

    #[error("line {line}: bad number '{value}' in column {column}")]
    BadNumber {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: timestamp {current} does not follow {previous}")]
    NonMonotonic {
        line: usize,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },

    #[error("no bars in input")]
    Empty,
}
