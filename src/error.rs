/*!
# Errors

All fallible operations of this crate return [`Result<T>`] with a [`GraphError`].

Structural violations (duplicate identifiers, unknown identifiers, malformed arguments) are always
surfaced to the caller. Data-quality issues inside bulk imports are not errors: readers skip the
offending record and log it via `tracing`.
*/

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    /// An identifier was added that is already present in the map
    #[error("identifier {0:?} already exists")]
    DuplicateId(String),
    /// A lookup referenced an identifier that is not present in the map
    #[error("identifier {0:?} does not exist")]
    UnknownId(String),
    /// Malformed configuration or a malformed record in a reader
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// A binary archive failed validation
    #[error("corruption detected: {0}")]
    Corruption(String),
}

impl GraphError {
    /// Shorthand for [`GraphError::InvalidArgument`]
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Shorthand for [`GraphError::Corruption`]
    pub fn corrupt<S: Into<String>>(msg: S) -> Self {
        Self::Corruption(msg.into())
    }
}
