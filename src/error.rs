/// Errors produced while loading, joining and writing the series.
///
/// Malformed-line variants carry the source name and the 1-based line number so
/// that a caller running with [`crate::csv_processor::MalformedPolicy::Skip`]
/// can report them as diagnostics instead of aborting.
#[derive(Debug, thiserror::Error)]
pub enum JoinError {
    #[error("input file not found: {}", path.display())]
    InputNotFound { path: std::path::PathBuf },

    #[error("input path is a directory: {}", path.display())]
    InputIsDirectory { path: std::path::PathBuf },

    #[error("failed to open {}", path.display())]
    Open {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create {}", path.display())]
    Create {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("{source_name} line {line}: expected 2 fields separated by '{delimiter}', found {found}: {text:?}")]
    FieldCount {
        source_name: &'static str,
        line: u64,
        delimiter: char,
        found: usize,
        text: String,
    },

    #[error("{source_name} line {line}: invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        source_name: &'static str,
        line: u64,
        value: String,
        reason: std::num::ParseIntError,
    },

    #[error("{source_name} line {line}: timestamp {value} is out of range")]
    TimestampOutOfRange {
        source_name: &'static str,
        line: u64,
        value: i64,
    },
}

impl JoinError {
    /// True for errors tied to a single bad input line.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::FieldCount { .. } | Self::InvalidTimestamp { .. } | Self::TimestampOutOfRange { .. }
        )
    }
}
