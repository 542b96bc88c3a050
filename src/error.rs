use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error type returned by every pipeline stage.
///
/// All variants abort the current run; no partial results are produced. Whether the process
/// terminates is the caller's decision (the batch CLI exits, the interactive session does not).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input file does not exist.
    #[error("file not found: '{}'", path.display())]
    FileNotFound { path: PathBuf },

    /// Underlying I/O error other than a missing file (e.g. permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The delimited content could not be parsed (ragged rows, invalid UTF-8, no header, ...).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A required column is absent after label normalization.
    #[error("missing column '{column}'")]
    MissingColumn { column: String },

    /// A chart could not be drawn.
    #[error("failed to render chart '{chart}': {message}")]
    Render { chart: String, message: String },

    /// A numeric column holds a value that is not a number.
    #[error("type error at row {row} column '{column}': expected a number (raw='{raw}')")]
    TypeError {
        row: usize,
        column: String,
        raw: String,
    },
}

/// Coarse classification of a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    Io,
    Parse,
    MissingColumn,
    TypeError,
    Render,
}

impl PipelineError {
    /// The error's category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::FileNotFound { .. } => ErrorKind::FileNotFound,
            PipelineError::Io(_) => ErrorKind::Io,
            PipelineError::Parse { .. } => ErrorKind::Parse,
            PipelineError::MissingColumn { .. } => ErrorKind::MissingColumn,
            PipelineError::TypeError { .. } => ErrorKind::TypeError,
            PipelineError::Render { .. } => ErrorKind::Render,
        }
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io) => PipelineError::Io(io),
                other => PipelineError::Parse {
                    message: format!("{other:?}"),
                },
            }
        } else {
            PipelineError::Parse {
                message: err.to_string(),
            }
        }
    }
}
