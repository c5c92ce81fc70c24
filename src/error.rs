//! Error types for docprep library.

use std::io;
use thiserror::Error;

/// Result type alias for docprep operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting, chunking or truncating documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A component was configured with an unsupported combination of options.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A document could not be built from the given fields.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The analysis backend failed or returned an unusable result.
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// No token budget is left for truncation.
    #[error("Truncation error: {0}")]
    Truncation(String),

    /// A tokenizer could not be loaded.
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// A separator pattern failed to compile.
    #[error("Invalid separator pattern: {0}")]
    Regex(#[from] regex::Error),

    /// Error writing table content as CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error during rendering (JSON, CSV).
    #[error("Rendering error: {0}")]
    Render(String),
}
