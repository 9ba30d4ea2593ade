use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{
    config::Config,
    merge::merge_tables,
    process::{datetime::DateTimeFormat, process_file, FileOutcome, FilteredTable},
    report::{self, ScanReport},
    scan::csv_files,
    write::write_csv,
};

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The root directory does not exist; nothing was scanned or written.
    MissingRoot { root: PathBuf },
    /// No file produced a matching row; nothing was written.
    NoData { scan: ScanReport },
    Written {
        output: PathBuf,
        rows_written: usize,
        rows_dropped: usize,
        scan: ScanReport,
    },
}

/// Scan, filter, merge and write according to `cfg`.
///
/// Per-file problems never surface here; only a failure to write the output
/// is returned as an error.
pub fn run(cfg: &Config) -> Result<RunOutcome> {
    report::log_search_start(&cfg.root_dir, &cfg.prefix);

    let outcome = if !cfg.root_dir.is_dir() {
        RunOutcome::MissingRoot {
            root: cfg.root_dir.clone(),
        }
    } else {
        let (tables, scan) = scan_tree(&cfg.root_dir, &cfg.prefix, &cfg.datetime_format);
        consolidate(tables, scan, &cfg.output)?
    };

    report::log_run_outcome(&cfg.prefix, &outcome);
    Ok(outcome)
}

/// Process every CSV under `root` in walk order, keeping the tables that
/// matched.
pub fn scan_tree(
    root: &Path,
    prefix: &str,
    format: &DateTimeFormat,
) -> (Vec<FilteredTable>, ScanReport) {
    let mut tables = Vec::new();
    let mut scan = ScanReport::default();

    for path in csv_files(root) {
        info!(path = %path.display(), "processing file");
        let outcome = process_file(&path, prefix, format);
        scan.record(&outcome);
        report::log_file_outcome(&path, prefix, &outcome);
        if let FileOutcome::Matched(table) = outcome {
            tables.push(table);
        }
    }

    (tables, scan)
}

fn consolidate(tables: Vec<FilteredTable>, scan: ScanReport, output: &Path) -> Result<RunOutcome> {
    info!("combining all found data");
    let Some(merged) = merge_tables(tables) else {
        return Ok(RunOutcome::NoData { scan });
    };
    info!(rows = merged.rows.len(), "sorted all data by date and time");

    info!(output = %output.display(), "saving complete futures data");
    write_csv(&merged, output)?;

    Ok(RunOutcome::Written {
        output: output.to_path_buf(),
        rows_written: merged.rows.len(),
        rows_dropped: merged.dropped,
        scan,
    })
}
