use chrono::NaiveDateTime;
use thiserror::Error;

/// Pattern for `"<Date> <Time>"`, e.g. `"01/01/2024 09:15:00"`.
pub const DEFAULT_DATETIME_PATTERN: &str = "%d/%m/%Y %H:%M:%S";

/// Rendering used for the derived `DateTime` column on output.
pub const OUTPUT_DATETIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Why a row's `Date`/`Time` pair did not yield a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("missing {0} value")]
    Missing(&'static str),
    #[error("`{value}` does not match `{pattern}`: {source}")]
    Unparseable {
        value: String,
        pattern: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Per-row result of combining `Date` and `Time`.
pub type Timestamp = Result<NaiveDateTime, TimestampError>;

/// Combines a date field and a time field and parses them with a fixed
/// `chrono` pattern. Parsing is exact: no trimming, no fallback formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeFormat {
    pattern: String,
}

impl DateTimeFormat {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parse `"<date> <time>"`. Empty fields count as missing.
    pub fn combine(&self, date: &str, time: &str) -> Timestamp {
        if date.is_empty() {
            return Err(TimestampError::Missing("Date"));
        }
        if time.is_empty() {
            return Err(TimestampError::Missing("Time"));
        }
        let value = format!("{} {}", date, time);
        NaiveDateTime::parse_from_str(&value, &self.pattern).map_err(|source| {
            TimestampError::Unparseable {
                value,
                pattern: self.pattern.clone(),
                source,
            }
        })
    }
}

impl Default for DateTimeFormat {
    fn default() -> Self {
        Self::new(DEFAULT_DATETIME_PATTERN)
    }
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(OUTPUT_DATETIME_PATTERN).to_string()
}
