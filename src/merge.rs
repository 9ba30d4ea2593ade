use chrono::NaiveDateTime;
use tracing::debug;

use crate::process::{
    datetime::format_timestamp, FilteredTable, DATETIME_COLUMN, DATE_COLUMN, TIME_COLUMN,
};

/// One output row. `values` is aligned with [`MergedTable::headers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRow {
    pub timestamp: NaiveDateTime,
    pub values: Vec<String>,
}

/// All matching rows across files, sorted by timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedTable {
    pub headers: Vec<String>,
    pub rows: Vec<MergedRow>,
    /// Matching rows discarded because their timestamp did not parse.
    pub dropped: usize,
}

/// Where an output column takes its value from in one source table.
#[derive(Clone, Copy)]
enum Source {
    Column(usize),
    Derived,
    Absent,
}

/// Column order of the consolidated table: first appearance across `tables`,
/// each table contributing its own columns then `DateTime`, minus `Date`/`Time`.
pub fn union_headers(tables: &[FilteredTable]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for table in tables.iter().filter(|t| !t.is_empty()) {
        let names = table
            .headers
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(DATETIME_COLUMN));
        for name in names {
            if name == DATE_COLUMN || name == TIME_COLUMN {
                continue;
            }
            if !headers.iter().any(|h| h == name) {
                headers.push(name.to_string());
            }
        }
    }
    headers
}

/// Concatenate `tables` in order, drop rows without a timestamp and sort the
/// rest ascending. Ties keep their concatenation order. Returns `None` when
/// no table holds a single row.
pub fn merge_tables(tables: Vec<FilteredTable>) -> Option<MergedTable> {
    if tables.iter().all(FilteredTable::is_empty) {
        return None;
    }

    let headers = union_headers(&tables);
    let mut rows = Vec::with_capacity(tables.iter().map(FilteredTable::len).sum());
    let mut dropped = 0;

    for table in tables {
        let sources: Vec<Source> = headers
            .iter()
            .map(|name| {
                if name == DATETIME_COLUMN {
                    Source::Derived
                } else {
                    table
                        .headers
                        .iter()
                        .position(|h| h == name)
                        .map_or(Source::Absent, Source::Column)
                }
            })
            .collect();

        let before = rows.len();
        for row in table.rows {
            let timestamp = match row.timestamp {
                Ok(ts) => ts,
                Err(_) => {
                    dropped += 1;
                    continue;
                }
            };
            let values = sources
                .iter()
                .map(|src| match *src {
                    Source::Column(idx) => row.values[idx].clone(),
                    Source::Derived => format_timestamp(&timestamp),
                    Source::Absent => String::new(),
                })
                .collect();
            rows.push(MergedRow { timestamp, values });
        }
        debug!(
            source = %table.source.display(),
            kept = rows.len() - before,
            "appended table"
        );
    }

    // stable: equal timestamps keep concatenation order
    rows.sort_by_key(|r| r.timestamp);

    Some(MergedTable {
        headers,
        rows,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{datetime::DateTimeFormat, FilteredRow};
    use std::path::PathBuf;

    fn table(source: &str, headers: &[&str], rows: &[&[&str]]) -> FilteredTable {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let date = headers.iter().position(|h| h == "Date").unwrap();
        let time = headers.iter().position(|h| h == "Time").unwrap();
        let fmt = DateTimeFormat::default();
        FilteredTable {
            source: PathBuf::from(source),
            rows: rows
                .iter()
                .map(|r| {
                    let values: Vec<String> = r.iter().map(|v| v.to_string()).collect();
                    let timestamp = fmt.combine(&values[date], &values[time]);
                    FilteredRow { values, timestamp }
                })
                .collect(),
            headers,
        }
    }

    #[test]
    fn no_rows_means_no_table() {
        assert!(merge_tables(vec![]).is_none());
        let empty = table("a.csv", &["Date", "Time", "Ticker"], &[]);
        assert!(merge_tables(vec![empty]).is_none());
    }

    #[test]
    fn sorts_across_files_and_drops_date_time() {
        let a = table(
            "a.csv",
            &["Date", "Time", "Ticker", "Price"],
            &[
                &["02/01/2024", "09:15:00", "RELIANCE-I", "3"],
                &["01/01/2024", "09:16:00", "RELIANCE-I", "2"],
            ],
        );
        let b = table(
            "b.csv",
            &["Date", "Time", "Ticker", "Price"],
            &[&["01/01/2024", "09:15:00", "RELIANCE-I", "1"]],
        );

        let merged = merge_tables(vec![a, b]).unwrap();
        assert_eq!(merged.headers, vec!["Ticker", "Price", "DateTime"]);
        let prices: Vec<&str> = merged.rows.iter().map(|r| r.values[1].as_str()).collect();
        assert_eq!(prices, vec!["1", "2", "3"]);
        assert_eq!(merged.rows[0].values[2], "2024-01-01 09:15:00");
        assert_eq!(merged.dropped, 0);
    }

    #[test]
    fn equal_timestamps_keep_encounter_order() {
        let a = table(
            "a.csv",
            &["Date", "Time", "Ticker", "Seq"],
            &[
                &["01/01/2024", "09:15:00", "R", "first"],
                &["01/01/2024", "09:14:00", "R", "earliest"],
            ],
        );
        let b = table(
            "b.csv",
            &["Date", "Time", "Ticker", "Seq"],
            &[&["01/01/2024", "09:15:00", "R", "second"]],
        );

        let merged = merge_tables(vec![a, b]).unwrap();
        let seq: Vec<&str> = merged.rows.iter().map(|r| r.values[1].as_str()).collect();
        assert_eq!(seq, vec!["earliest", "first", "second"]);
    }

    #[test]
    fn unparseable_rows_are_dropped_and_counted() {
        let a = table(
            "a.csv",
            &["Date", "Time", "Ticker"],
            &[
                &["31/13/2024", "25:00:00", "R"],
                &["01/01/2024", "09:15:00", "R"],
            ],
        );
        let merged = merge_tables(vec![a]).unwrap();
        assert_eq!(merged.rows.len(), 1);
        assert_eq!(merged.dropped, 1);
    }

    #[test]
    fn all_rows_unparseable_still_yields_header() {
        let a = table("a.csv", &["Date", "Time", "Ticker"], &[&["x", "y", "R"]]);
        let merged = merge_tables(vec![a]).unwrap();
        assert!(merged.rows.is_empty());
        assert_eq!(merged.headers, vec!["Ticker", "DateTime"]);
    }

    #[test]
    fn differing_schemas_are_unioned() {
        let a = table(
            "a.csv",
            &["Ticker", "Date", "Time", "Open"],
            &[&["R", "01/01/2024", "09:16:00", "10"]],
        );
        let b = table(
            "b.csv",
            &["Date", "Time", "Ticker", "Volume"],
            &[&["01/01/2024", "09:15:00", "R", "500"]],
        );

        let merged = merge_tables(vec![a, b]).unwrap();
        assert_eq!(merged.headers, vec!["Ticker", "Open", "DateTime", "Volume"]);
        assert_eq!(
            merged.rows[0].values,
            vec!["R", "", "2024-01-01 09:15:00", "500"]
        );
        assert_eq!(
            merged.rows[1].values,
            vec!["R", "10", "2024-01-01 09:16:00", ""]
        );
    }
}
