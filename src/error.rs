use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while extracting features from one survey file.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input is unreadable as SEG-Y trace data.
    #[error("cannot decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// The input decoded fine but holds no traces or no samples.
    #[error("{} holds no trace data ({traces} traces x {samples} samples)", path.display())]
    EmptyInput {
        path: PathBuf,
        traces: usize,
        samples: usize,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write table {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ExtractError {
    pub(crate) fn decode(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ExtractError::Decode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExtractError::Io {
            path: path.into(),
            source,
        }
    }

    /// Short machine-friendly name of the error kind, used in batch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractError::Decode { .. } => "decode",
            ExtractError::EmptyInput { .. } => "empty_input",
            ExtractError::Io { .. } => "io",
            ExtractError::Csv { .. } => "csv",
        }
    }
}

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;
