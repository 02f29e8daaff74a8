use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning Python sources for dependencies.
#[derive(Error, Debug)]
pub enum ScanError {
    /// A scan target does not exist.
    #[error("No such file or directory: {}", path.display())]
    NotFound { path: PathBuf },

    /// The file is not valid Python. Line and column are 1-indexed.
    #[error("Failed to parse {}: invalid syntax at line {line}, column {column}", path.display())]
    Parse { path: PathBuf, line: usize, column: usize },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid glob pattern '{pattern}'")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to walk directory")]
    Walk(#[from] ignore::Error),

    #[error("Tree-sitter Python language initialization failed")]
    Language,
}

/// Result type for scan operations.
pub type Result<T> = std::result::Result<T, ScanError>;

impl ScanError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument { message: message.into() }
    }
}
