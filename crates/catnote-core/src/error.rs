//! Error types for catnote.

use thiserror::Error;

use crate::models::CategoryId;

/// Result type alias using catnote's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for catnote operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store commit or write failed outside of sqlx
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The current execution's category could not be determined
    #[error("Scope resolution failed: {0}")]
    ScopeResolution(#[from] ScopeError),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Job queue error
    #[error("Job error: {0}")]
    Job(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Reasons a category scope could not be resolved.
///
/// Cloneable so a failed resolution can be replayed for the rest of an
/// execution without consulting the store again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// The request carried no category header.
    #[error("missing '{0}' header")]
    MissingHeader(String),

    /// The category header was present but not an integer.
    #[error("invalid '{header}' header value '{value}'")]
    InvalidHeader { header: String, value: String },

    /// A job resolved its scope before a category id was assigned.
    #[error("category id was not set for this job")]
    CategoryIdNotSet,

    /// The identifier does not match any stored category.
    #[error("category {0} not found")]
    UnknownCategory(CategoryId),

    /// The store failed while looking the category up.
    #[error("category lookup failed: {0}")]
    Lookup(String),
}

impl ScopeError {
    /// Reduce an arbitrary error to the value cached for replay.
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::ScopeResolution(scope) => scope.clone(),
            other => ScopeError::Lookup(other.to_string()),
        }
    }
}
