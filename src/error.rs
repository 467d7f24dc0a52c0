use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not open {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} line {line}: {reason}")]
    Format {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("Could not read {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Stop time #{row} references unknown Trip {trip_id:?}")]
    Integrity { trip_id: String, row: usize },
}

impl LoadError {
    /// Header mismatches, short rows and unreadable CSV all mean the file is off-format.
    pub fn is_format(&self) -> bool {
        matches!(self, LoadError::Format { .. } | LoadError::Csv { .. })
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
