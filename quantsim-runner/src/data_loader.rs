//! CSV bar loading.
//!
//! One file per symbol, daily bars, header
//! `timestamp,open,high,low,close,volume`. Timestamps may be RFC 3339 or a
//! bare `YYYY-MM-DD` date; bare dates are pinned to the 21:00 UTC session
//! close. Rows are sorted by timestamp after load, so an unsorted file is
//! accepted; a duplicate timestamp is still rejected downstream by the
//! market event source.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use quantsim_core::domain::Bar;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("csv error in '{path}': {source}")]
    Csv { path: String, source: csv::Error },

    #[error("unparseable timestamp '{value}' for symbol '{symbol}'")]
    InvalidTimestamp { symbol: String, value: String },

    #[error("no rows in '{path}'")]
    EmptyFile { path: String },
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Hour (UTC) assigned to bare-date rows. Matches a US equity session close.
const SESSION_CLOSE_HOUR: u32 = 21;

fn parse_timestamp(symbol: &str, raw: &str) -> Result<DateTime<Utc>, LoadError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(ts) = date.and_hms_opt(SESSION_CLOSE_HOUR, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ts));
        }
    }
    Err(LoadError::InvalidTimestamp {
        symbol: symbol.to_string(),
        value: raw.to_string(),
    })
}

/// Load one symbol's bars from a CSV file.
pub fn load_symbol_csv(path: &Path, symbol: &str) -> Result<Vec<Bar>, LoadError> {
    let display = path.display().to_string();
    // csv wraps missing-file io errors itself.
    let mut reader = csv::Reader::from_path(path).map_err(|e| LoadError::Csv {
        path: display.clone(),
        source: e,
    })?;

    let mut bars = Vec::new();
    for row in reader.deserialize() {
        let row: CsvRow = row.map_err(|e| LoadError::Csv {
            path: display.clone(),
            source: e,
        })?;
        let timestamp = parse_timestamp(symbol, &row.timestamp)?;
        bars.push(Bar::new(
            symbol, timestamp, row.open, row.high, row.low, row.close, row.volume,
        ));
    }

    if bars.is_empty() {
        return Err(LoadError::EmptyFile { path: display });
    }
    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

/// Load every `<SYMBOL>.csv` in a directory, keyed by upper-cased file stem.
pub fn load_dir(dir: &Path) -> Result<HashMap<String, Vec<Bar>>, LoadError> {
    let entries = std::fs::read_dir(dir).map_err(|e| LoadError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut all = HashMap::new();
    for entry in entries {
        let entry = entry.map_err(|e| LoadError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let symbol = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_uppercase(),
            None => continue,
        };
        let bars = load_symbol_csv(&path, &symbol)?;
        all.insert(symbol, bars);
    }
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
        write!(file, "{body}").unwrap();
        path
    }

    #[test]
    fn loads_bare_date_rows_at_session_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "spy.csv",
            "2024-01-02,100.0,101.0,99.0,100.5,1000\n2024-01-03,100.5,102.0,100.0,101.5,1100\n",
        );

        let bars = load_symbol_csv(&path, "SPY").unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].symbol, "SPY");
        assert_eq!(
            bars[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap()
        );
        assert_eq!(bars[1].close, 101.5);
    }

    #[test]
    fn loads_rfc3339_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "spy.csv",
            "2024-01-02T14:30:00Z,100.0,101.0,99.0,100.5,1000\n",
        );

        let bars = load_symbol_csv(&path, "SPY").unwrap();
        assert_eq!(
            bars[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap()
        );
    }

    #[test]
    fn sorts_unordered_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "spy.csv",
            "2024-01-03,101.0,102.0,100.0,101.5,1100\n2024-01-02,100.0,101.0,99.0,100.5,1000\n",
        );

        let bars = load_symbol_csv(&path, "SPY").unwrap();
        assert!(bars[0].timestamp < bars[1].timestamp);
        assert_eq!(bars[0].open, 100.0);
    }

    #[test]
    fn rejects_bad_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "spy.csv", "not-a-date,1,1,1,1,1\n");
        let err = load_symbol_csv(&path, "SPY").unwrap_err();
        assert!(matches!(err, LoadError::InvalidTimestamp { .. }));
    }

    #[test]
    fn rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "spy.csv", "");
        assert!(matches!(
            load_symbol_csv(&path, "SPY").unwrap_err(),
            LoadError::EmptyFile { .. }
        ));
    }

    #[test]
    fn directory_load_keys_by_upper_stem() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "spy.csv",
            "2024-01-02,100.0,101.0,99.0,100.5,1000\n",
        );
        write_csv(
            dir.path(),
            "qqq.csv",
            "2024-01-02,200.0,201.0,199.0,200.5,1000\n",
        );
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let all = load_dir(dir.path()).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.contains_key("SPY"));
        assert!(all.contains_key("QQQ"));
    }
}
