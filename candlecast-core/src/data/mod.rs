//! Bar ingestion: delimited-file loading and seeded synthetic series.

pub mod csv_loader;
pub mod synthetic;

pub use csv_loader::{parse_timestamp, CsvLoader};
pub use synthetic::synthetic_bars;

use crate::domain::Bar;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("unparseable timestamp {0:?}")]
    Timestamp(String),

    #[error("{}:{line}: missing or non-numeric {field}", .path.display())]
    Field {
        path: PathBuf,
        line: u64,
        field: &'static str,
    },
}

/// Source of OHLCV bars. `CsvLoader` implements it for delimited files.
pub trait BarSource {
    /// Load one file. `symbol` defaults to the path string.
    fn load_file(&self, path: &Path, symbol: Option<&str>) -> Result<Vec<Bar>, DataError>;

    /// Load every eligible file directly inside `dir`.
    fn load_dir(&self, dir: &Path) -> Result<Vec<Bar>, DataError>;

    /// Dispatch on whether `path` is a directory.
    fn load_path(&self, path: &Path) -> Result<Vec<Bar>, DataError> {
        if path.is_dir() {
            self.load_dir(path)
        } else {
            self.load_file(path, None)
        }
    }
}

/// Split a mixed-symbol series into per-symbol runs, keeping first-seen
/// symbol order and the original bar order within each symbol.
pub fn group_by_symbol(bars: Vec<Bar>) -> Vec<(String, Vec<Bar>)> {
    let mut groups: Vec<(String, Vec<Bar>)> = Vec::new();
    for bar in bars {
        match groups.iter_mut().find(|(symbol, _)| *symbol == bar.symbol) {
            Some((_, group)) => group.push(bar),
            None => groups.push((bar.symbol.clone(), vec![bar])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping_keeps_first_seen_order() {
        let mut bars = Vec::new();
        for (i, symbol) in ["BBB", "AAA", "BBB", "AAA", "CCC"].iter().enumerate() {
            let mut bar = synthetic_bars(symbol, 1, i as u64).remove(0);
            bar.close = i as f64;
            bars.push(bar);
        }

        let groups = group_by_symbol(bars);
        let names: Vec<&str> = groups.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, vec!["BBB", "AAA", "CCC"]);
        assert_eq!(
            groups[0].1.iter().map(|b| b.close).collect::<Vec<_>>(),
            vec![0.0, 2.0]
        );
        assert_eq!(
            groups[1].1.iter().map(|b| b.close).collect::<Vec<_>>(),
            vec![1.0, 3.0]
        );
    }

    #[test]
    fn error_messages_carry_location() {
        let err = DataError::Field {
            path: PathBuf::from("btc.csv"),
            line: 4,
            field: "close",
        };
        assert_eq!(err.to_string(), "btc.csv:4: missing or non-numeric close");
    }
}
