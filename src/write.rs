use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::merge::MergedTable;

/// Write `table` as CSV to `path`, replacing any existing file.
///
/// The data goes to a hidden temporary sibling first and is renamed over
/// `path` once complete, so a reader never sees a half-written file.
pub fn write_csv<P: AsRef<Path>>(table: &MergedTable, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }

    let tmp_path = tmp_sibling(path);
    let result = write_to(table, &tmp_path).and_then(|()| {
        fs::rename(&tmp_path, path)
            .with_context(|| format!("renaming {:?} -> {:?}", tmp_path, path))
    });
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_to(table: &MergedTable, path: &Path) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    wtr.write_record(&table.headers)
        .context("writing header row")?;
    for row in &table.rows {
        wtr.write_record(&row.values)
            .with_context(|| format!("writing row at {}", row.timestamp))?;
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.csv".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
