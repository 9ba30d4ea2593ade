// src/process/mod.rs
pub mod datetime;
pub mod raw_table;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

use datetime::{DateTimeFormat, Timestamp};
use raw_table::RawTable;

pub const DATE_COLUMN: &str = "Date";
pub const TIME_COLUMN: &str = "Time";
pub const TICKER_COLUMN: &str = "Ticker";
pub const DATETIME_COLUMN: &str = "DateTime";

/// Why a readable file contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("file is missing required columns ({})", .0.join(", "))]
    MissingColumns(Vec<&'static str>),
}

/// A row whose ticker matched, with its derived timestamp.
#[derive(Debug, Clone)]
pub struct FilteredRow {
    /// Field values in the order of the owning table's `headers`.
    pub values: Vec<String>,
    pub timestamp: Timestamp,
}

/// Matching rows from one source file.
#[derive(Debug, Clone)]
pub struct FilteredTable {
    pub source: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<FilteredRow>,
}

impl FilteredTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Classification of one scanned file. Logging happens elsewhere.
#[derive(Debug)]
pub enum FileOutcome {
    Matched(FilteredTable),
    NoMatches { rows_scanned: usize },
    Skipped(SkipReason),
    Failed(anyhow::Error),
}

/// Load `path`, keep rows whose `Ticker` starts with `prefix` and attach a
/// timestamp built from `Date` and `Time`. Never fails: every problem is
/// folded into the returned outcome.
#[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn process_file<P: AsRef<Path>>(path: P, prefix: &str, format: &DateTimeFormat) -> FileOutcome {
    let path = path.as_ref();
    let raw = match RawTable::load(path) {
        Ok(raw) => raw,
        Err(e) => return FileOutcome::Failed(e),
    };
    let rows_scanned = raw.rows.len();
    debug!(rows = rows_scanned, columns = raw.headers.len(), "loaded");

    match filter_table(path, raw, prefix, format) {
        Ok(table) if table.is_empty() => FileOutcome::NoMatches { rows_scanned },
        Ok(table) => FileOutcome::Matched(table),
        Err(reason) => FileOutcome::Skipped(reason),
    }
}

/// Select the rows of `raw` whose ticker starts with `prefix` (case-sensitive).
/// Empty tickers are treated as null and never match.
pub fn filter_table(
    source: &Path,
    raw: RawTable,
    prefix: &str,
    format: &DateTimeFormat,
) -> Result<FilteredTable, SkipReason> {
    let date = raw.column(DATE_COLUMN);
    let time = raw.column(TIME_COLUMN);
    let ticker = raw.column(TICKER_COLUMN);
    let (date, time, ticker) = match (date, time, ticker) {
        (Some(d), Some(t), Some(k)) => (d, t, k),
        _ => {
            let missing = [
                (DATE_COLUMN, date),
                (TIME_COLUMN, time),
                (TICKER_COLUMN, ticker),
            ]
            .into_iter()
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| name)
            .collect();
            return Err(SkipReason::MissingColumns(missing));
        }
    };

    let rows = raw
        .rows
        .into_iter()
        .filter(|row| {
            let value = &row[ticker];
            !value.is_empty() && value.starts_with(prefix)
        })
        .map(|values| {
            let timestamp = format.combine(&values[date], &values[time]);
            FilteredRow { values, timestamp }
        })
        .collect();

    Ok(FilteredTable {
        source: source.to_path_buf(),
        headers: raw.headers,
        rows,
    })
}
