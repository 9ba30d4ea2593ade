use std::path::Path;
use tracing::{error, info, warn};

use crate::{pipeline::RunOutcome, process::FileOutcome};

/// Running tally of per-file outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub files_scanned: usize,
    pub files_matched: usize,
    pub files_without_matches: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub rows_matched: usize,
}

impl ScanReport {
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.files_scanned += 1;
        match outcome {
            FileOutcome::Matched(table) => {
                self.files_matched += 1;
                self.rows_matched += table.len();
            }
            FileOutcome::NoMatches { .. } => self.files_without_matches += 1,
            FileOutcome::Skipped(_) => self.files_skipped += 1,
            FileOutcome::Failed(_) => self.files_failed += 1,
        }
    }
}

pub fn log_search_start(root: &Path, prefix: &str) {
    info!(
        prefix,
        root = %root.display(),
        "recursively searching for tickers starting with '{}' in all CSV files",
        prefix
    );
}

pub fn log_file_outcome(path: &Path, prefix: &str, outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Matched(table) => info!(
            path = %path.display(),
            rows = table.len(),
            "found {} rows for tickers starting with {}",
            table.len(),
            prefix
        ),
        FileOutcome::NoMatches { rows_scanned } => {
            info!(path = %path.display(), rows_scanned, "no matching rows")
        }
        FileOutcome::Skipped(reason) => warn!(path = %path.display(), "SKIPPED: {}", reason),
        FileOutcome::Failed(err) => error!(path = %path.display(), "ERROR processing file: {:#}", err),
    }
}

pub fn log_run_outcome(prefix: &str, outcome: &RunOutcome) {
    match outcome {
        RunOutcome::MissingRoot { root } => {
            error!(root = %root.display(), "the directory specified does not exist");
        }
        RunOutcome::NoData { scan } => {
            log_scan_totals(scan);
            info!("PROCESSING COMPLETE: no data was found for tickers starting with '{}'", prefix);
        }
        RunOutcome::Written {
            output,
            rows_written,
            rows_dropped,
            scan,
        } => {
            log_scan_totals(scan);
            if *rows_dropped > 0 {
                warn!(rows_dropped, "dropped rows with unparseable Date/Time");
            }
            info!(
                rows_written,
                output = %output.display(),
                "SUCCESS: complete futures data for tickers starting with {} has been saved",
                prefix
            );
        }
    }
}

fn log_scan_totals(scan: &ScanReport) {
    info!(
        files_scanned = scan.files_scanned,
        files_matched = scan.files_matched,
        files_without_matches = scan.files_without_matches,
        files_skipped = scan.files_skipped,
        files_failed = scan.files_failed,
        rows_matched = scan.rows_matched,
        "scan finished"
    );
}
