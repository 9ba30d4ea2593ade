// src/scan/mod.rs
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Lazily yields every file under a root whose extension is `csv`, compared
/// case-insensitively. Directory symlinks are listed but never descended into;
/// symlinks to files are yielded like files. Entries are visited in file-name
/// order within each directory.
pub struct CsvFiles {
    entries: walkdir::IntoIter,
}

impl Iterator for CsvFiles {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match self.entries.next()? {
                Ok(entry) if is_csv_file(&entry) => return Some(entry.into_path()),
                Ok(_) => continue,
                Err(e) => {
                    // unreadable directory or entry; keep walking
                    let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                    warn!(path = %path, error = %e, "skipping unreadable entry");
                }
            }
        }
    }
}

fn is_csv_file(entry: &DirEntry) -> bool {
    let has_csv_ext = entry
        .path()
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
    if !has_csv_ext {
        return false;
    }
    let ft = entry.file_type();
    ft.is_file() || (ft.is_symlink() && entry.path().is_file())
}

/// Walk `root` recursively for `.csv` files without following directory
/// symlinks. The caller is expected to have checked that `root` is a directory.
pub fn csv_files<P: AsRef<Path>>(root: P) -> CsvFiles {
    let entries = WalkDir::new(root.as_ref())
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();
    CsvFiles { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn finds_csv_recursively_ignoring_case() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        fs::create_dir_all(root.join("2024/jan"))?;
        fs::write(root.join("top.csv"), "a\n")?;
        fs::write(root.join("2024/UPPER.CSV"), "a\n")?;
        fs::write(root.join("2024/jan/mixed.Csv"), "a\n")?;
        fs::write(root.join("2024/jan/notes.txt"), "a\n")?;
        fs::write(root.join("2024/jan/data.csv.bak"), "a\n")?;
        // a directory with a csv-looking name is not a file
        fs::create_dir_all(root.join("dir.csv"))?;

        let mut found: Vec<PathBuf> = csv_files(root)
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        found.sort();

        assert_eq!(
            found,
            vec![
                PathBuf::from("2024/UPPER.CSV"),
                PathBuf::from("2024/jan/mixed.Csv"),
                PathBuf::from("top.csv"),
            ]
        );
        Ok(())
    }

    #[test]
    fn empty_tree_yields_nothing() -> Result<()> {
        let tmp = tempdir()?;
        assert_eq!(csv_files(tmp.path()).count(), 0);
        Ok(())
    }

    #[test]
    fn walk_order_is_by_file_name() -> Result<()> {
        let tmp = tempdir()?;
        for name in ["b.csv", "a.csv", "c.csv"] {
            fs::write(tmp.path().join(name), "x\n")?;
        }
        let names: Vec<String> = csv_files(tmp.path())
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv", "c.csv"]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn directory_symlinks_are_not_followed() -> Result<()> {
        use std::os::unix::fs::symlink;

        let tmp = tempdir()?;
        let root = tmp.path();
        fs::create_dir_all(root.join("sub"))?;
        fs::write(root.join("sub/d.csv"), "a\n")?;
        symlink(root, root.join("sub/loop"))?;
        symlink(root.join("sub"), root.join("alias"))?;

        let found: Vec<PathBuf> = csv_files(root).collect();
        assert_eq!(found, vec![root.join("sub/d.csv")]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn file_symlinks_are_listed() -> Result<()> {
        use std::os::unix::fs::symlink;

        let tmp = tempdir()?;
        let data = tempdir()?;
        fs::write(data.path().join("real.csv"), "a\n")?;
        symlink(data.path().join("real.csv"), tmp.path().join("link.csv"))?;
        symlink(data.path().join("missing.csv"), tmp.path().join("dangling.csv"))?;

        let found: Vec<PathBuf> = csv_files(tmp.path()).collect();
        assert_eq!(found, vec![tmp.path().join("link.csv")]);
        Ok(())
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_root_is_walked() -> Result<()> {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempdir()?;
        let root = tmp.path().join(OsStr::from_bytes(b"data\xff"));
        fs::create_dir_all(&root)?;
        fs::write(root.join("a.csv"), "a\n")?;

        assert_eq!(csv_files(&root).count(), 1);
        Ok(())
    }
}
