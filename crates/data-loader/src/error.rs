//! Error types for the data-loader crate.
//!
//! Two families of failure live here:
//! - build-time failures while reading the TMDB CSV exports (fatal for the
//!   whole offline build, no partial artifacts are published)
//! - start-up failures while loading persisted artifacts (missing files,
//!   corrupt encodings, or artifacts that are not index-aligned)

use thiserror::Error;

/// Errors that can occur while parsing source data or loading artifacts
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader rejected the file (bad quoting, ragged rows, ...)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Line in a data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A structured (JSON-encoded) column could not be decoded.
    ///
    /// The source data set is static and hand-curated, so this aborts the
    /// build instead of skipping the record.
    #[error("Malformed {field} at line {line} in {file}: {reason}")]
    MalformedField {
        file: String,
        line: usize,
        field: String,
        reason: String,
    },

    /// An artifact could not be encoded or decoded
    #[error("Serialization error in {artifact}: {reason}")]
    Serialization { artifact: String, reason: String },

    /// Persisted artifacts disagree on the number of movies
    #[error("Artifacts are misaligned: {0}")]
    Misaligned(String),

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
