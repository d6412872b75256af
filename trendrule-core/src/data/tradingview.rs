//! TradingView CSV export loader.
//!
//! Expected header: `time,open,high,low,close[,Volume]` where `time` is a
//! UNIX timestamp in seconds. Column names are matched case-insensitively.
//! A fixed UTC offset is applied to every timestamp; rows with a missing or
//! non-finite price are dropped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, TimeDelta};
use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::Bar;

use super::DataError;

/// Options controlling how a TradingView export is read.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvOptions {
    /// Name of the UNIX-seconds timestamp column.
    pub time_column: String,
    /// Hours added to every UTC timestamp.
    pub utc_offset_hours: i64,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            time_column: "time".to_string(),
            utc_offset_hours: 7,
        }
    }
}

/// Load bars from a TradingView CSV file.
pub fn load_tradingview_csv(path: &Path, opts: &CsvOptions) -> Result<Vec<Bar>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bars = read_tradingview_csv(file, opts)?;
    debug!(path = %path.display(), bars = bars.len(), "loaded csv");
    Ok(bars)
}

/// Parse bars from any reader holding TradingView CSV data.
pub fn read_tradingview_csv<R: Read>(reader: R, opts: &CsvOptions) -> Result<Vec<Bar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let time_idx = column_index(&headers, &opts.time_column)?;
    let open_idx = column_index(&headers, "open")?;
    let high_idx = column_index(&headers, "high")?;
    let low_idx = column_index(&headers, "low")?;
    let close_idx = column_index(&headers, "close")?;
    let volume_idx = column_index(&headers, "volume").ok();

    let hours = opts.utc_offset_hours;
    let offset = TimeDelta::try_hours(hours).ok_or(DataError::UtcOffsetOutOfRange { hours })?;
    let mut bars: Vec<Bar> = Vec::new();
    let mut dropped = 0usize;

    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let line = row + 2;

        let raw_time = record.get(time_idx).unwrap_or_default();
        let secs: i64 = raw_time.parse().map_err(|_| DataError::BadTimestamp {
            line,
            value: raw_time.to_string(),
        })?;
        let timestamp = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| DataError::BadTimestamp {
                line,
                value: raw_time.to_string(),
            })?
            .naive_utc()
            .checked_add_signed(offset)
            .ok_or(DataError::UtcOffsetOutOfRange { hours })?;

        let prices = [
            parse_price(&record, open_idx, "open", line)?,
            parse_price(&record, high_idx, "high", line)?,
            parse_price(&record, low_idx, "low", line)?,
            parse_price(&record, close_idx, "close", line)?,
        ];
        let [Some(open), Some(high), Some(low), Some(close)] = prices else {
            dropped += 1;
            continue;
        };
        let volume = match volume_idx {
            Some(idx) => parse_price(&record, idx, "volume", line)?.unwrap_or(0.0),
            None => 0.0,
        };

        if let Some(prev) = bars.last() {
            if timestamp <= prev.timestamp {
                return Err(DataError::NonMonotonic {
                    line,
                    previous: prev.timestamp,
                    current: timestamp,
                });
            }
        }

        bars.push(Bar::new(timestamp, open, high, low, close, volume));
    }

    if dropped > 0 {
        warn!(dropped, "dropped rows with missing prices");
    }
    if bars.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(bars)
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| DataError::MissingColumn(name.to_string()))
}

/// `Ok(None)` for an empty or non-finite cell, an error for unparseable text.
fn parse_price(
    record: &StringRecord,
    idx: usize,
    column: &'static str,
    line: usize,
) -> Result<Option<f64>, DataError> {
    let raw = record.get(idx).unwrap_or_default();
    if raw.is_empty() {
        return Ok(None);
    }
    let value: f64 = raw.parse().map_err(|_| DataError::BadNumber {
        line,
        column,
        value: raw.to_string(),
    })?;
    Ok(value.is_finite().then_some(value))
}
