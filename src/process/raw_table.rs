use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use std::{collections::HashMap, io::Read, path::Path};

/// One CSV file held in memory as text.
#[derive(Debug, Default)]
pub struct RawTable {
    /// Column names from the header row. Repeats of a name get a `.N`
    /// suffix (`Price`, `Price.1`) so every column stays addressable.
    pub headers: Vec<String>,
    /// Each data record, padded with empty strings up to `headers.len()`.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Position of the first column called `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Short records are padded; a record wider than the header, or input
    /// with no header row at all, is an error.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers().context("reading header row")?;
        if headers.is_empty() {
            bail!("no columns to parse from file");
        }
        let headers = dedup_headers(headers.iter());

        let mut rows = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result.with_context(|| format!("CSV parse error at record {}", idx))?;
            if record.len() > headers.len() {
                bail!(
                    "record {} has {} fields, header has {}",
                    idx,
                    record.len(),
                    headers.len()
                );
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }
}

/// Suffix repeated names with `.1`, `.2`, ... skipping suffixes that are
/// already taken by another column.
fn dedup_headers<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();
    for name in names {
        let mut name = name.to_string();
        let mut seen = counts.get(&name).copied().unwrap_or(0);
        while seen > 0 {
            counts.insert(name.clone(), seen + 1);
            name = format!("{}.{}", name, seen);
            seen = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), seen + 1);
        out.push(name);
    }
    out
}
