//! Error types for the optlens system.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the optlens system.
///
/// Cell and column level problems never surface here; the cleaner records
/// them as [`CleanWarning`](crate::CleanWarning)s.
#[derive(Error, Debug)]
pub enum Error {
    /// Source file or table is absent.
    #[error("Missing source: {0}")]
    MissingSource(String),

    /// Source exists but could not be read as a table.
    #[error("Malformed source {source_name}: {reason}")]
    Malformed { source_name: String, reason: String },

    /// None of the datasets could be loaded.
    #[error("No datasets could be loaded")]
    NoDatasets,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data error (invalid or missing data).
    #[error("Data error: {0}")]
    Data(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a missing source error.
    pub fn missing_source(name: impl Into<String>) -> Self {
        Error::MissingSource(name.into())
    }

    /// Create a malformed source error.
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Malformed {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }
}
