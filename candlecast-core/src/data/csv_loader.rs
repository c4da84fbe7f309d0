//! Delimited OHLCV file loader.
//!
//! Expected layout: a header row, then `timestamp, open, high, low, close,
//! volume` in that column order. Extra trailing columns are ignored.
//! Timestamps are either epoch seconds or `YYYY-MM-DD HH:MM:SS` in UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{BarSource, DataError};
use crate::domain::Bar;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const PRICE_FIELDS: [&str; 5] = ["open", "high", "low", "close", "volume"];

#[derive(Debug, Clone, Copy)]
pub struct CsvLoader {
    delimiter: u8,
}

impl CsvLoader {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl BarSource for CsvLoader {
    fn load_file(&self, path: &Path, symbol: Option<&str>) -> Result<Vec<Bar>, DataError> {
        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let symbol = symbol
            .map(str::to_string)
            .unwrap_or_else(|| path.display().to_string());

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(file);

        let mut bars = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| DataError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            bars.push(parse_record(path, &record, &symbol)?);
        }

        let insane = bars.iter().filter(|b| !b.is_sane()).count();
        if insane > 0 {
            warn!(path = %path.display(), insane, "bars with inconsistent OHLC kept as-is");
        }

        info!(path = %path.display(), %symbol, bars = bars.len(), "loaded bars");
        Ok(bars)
    }

    /// Load every `.csv` file directly inside `dir`, in sorted path order.
    /// Each file's bars are tagged with its file stem.
    fn load_dir(&self, dir: &Path) -> Result<Vec<Bar>, DataError> {
        let io_err = |source| DataError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let is_csv = path.extension().is_some_and(|ext| ext == "csv");
            if path.is_file() && is_csv {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            warn!(dir = %dir.display(), "no .csv files found");
        }

        let mut bars = Vec::new();
        for path in &files {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            bars.extend(self.load_file(path, Some(&stem))?);
        }
        Ok(bars)
    }
}

/// All-digit input is epoch seconds; anything else must match
/// `YYYY-MM-DD HH:MM:SS` and is read as UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DataError> {
    let s = s.trim();
    let invalid = || DataError::Timestamp(s.to_string());

    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        let secs: i64 = s.parse().map_err(|_| invalid())?;
        return DateTime::from_timestamp(secs, 0).ok_or_else(invalid);
    }

    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| invalid())
}

fn parse_record(path: &Path, record: &StringRecord, symbol: &str) -> Result<Bar, DataError> {
    let line = record.position().map_or(0, |p| p.line());
    let field_err = |field: &'static str| DataError::Field {
        path: path.to_path_buf(),
        line,
        field,
    };

    let timestamp = parse_timestamp(record.get(0).ok_or_else(|| field_err("timestamp"))?)?;

    let mut values = [0.0; 5];
    for (i, (slot, name)) in values.iter_mut().zip(PRICE_FIELDS).enumerate() {
        *slot = record
            .get(i + 1)
            .and_then(|raw| raw.parse::<f64>().ok())
            .ok_or_else(|| field_err(name))?;
    }
    let [open, high, low, close, volume] = values;

    Ok(Bar {
        timestamp,
        open,
        high,
        low,
        close,
        volume,
        symbol: symbol.to_string(),
    })
}
