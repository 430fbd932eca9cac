use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the analyzer and the chart builders.
///
/// None of these are fatal: the shell logs them and shows the message in the
/// status bar, leaving the rest of its state untouched.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The input file is missing, unreadable or not a valid score table.
    #[error("failed to load {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },

    /// A requested column does not exist (or is not numeric).
    #[error("Subject '{0}' not found!")]
    ColumnNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
