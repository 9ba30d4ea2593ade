use std::path::PathBuf;

use crate::process::datetime::DateTimeFormat;

/// Root directory scanned when nothing else is given.
pub const DEFAULT_ROOT_DIR: &str = r"D:\NSE DATA";

/// Ticker prefix selected when nothing else is given.
pub const DEFAULT_PREFIX: &str = "RELIANCE-I";

/// Consolidated output file written when nothing else is given.
pub const DEFAULT_OUTPUT: &str = "RELIANCE_Futures_Complete_Data.csv";

/// Everything a run needs to know.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory tree searched for `.csv` files.
    pub root_dir: PathBuf,
    /// Case-sensitive prefix a `Ticker` value must start with.
    pub prefix: String,
    /// Destination of the consolidated CSV; overwritten if present.
    pub output: PathBuf,
    /// How `Date` and `Time` are combined and parsed.
    pub datetime_format: DateTimeFormat,
}

impl Config {
    pub fn new(
        root_dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            root_dir: root_dir.into(),
            prefix: prefix.into(),
            output: output.into(),
            datetime_format: DateTimeFormat::default(),
        }
    }

    pub fn with_datetime_format(mut self, format: DateTimeFormat) -> Self {
        self.datetime_format = format;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_DIR, DEFAULT_PREFIX, DEFAULT_OUTPUT)
    }
}
