//! Error types for biotable

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Biotable error types
#[derive(Error, Debug)]
pub enum Error {
    /// A referenced column is absent from the declared schema, or the
    /// declaration itself is inconsistent with the wrapped table
    #[error("Schema error: {0}")]
    Schema(String),

    /// A supplied argument is not valid for the target column's type
    #[error("Value error: {0}")]
    Value(String),

    /// Load/save boundary failure (Parquet)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow engine error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
