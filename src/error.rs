//! Error types for marvel-forwarder
//!
//! This module provides error handling for both halves of the system:
//! - The sync path (upstream fetch, retry, fan-out, reconciliation)
//! - The read path, where errors become structured JSON bodies with stable
//!   machine-readable codes and an HTTP status

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for marvel-forwarder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for marvel-forwarder
///
/// Wrapping variants keep the inner error as their `source`, so the full
/// chain survives propagation up to the run's caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The environment key that caused the error (e.g., "PUBLIC_KEY")
        key: Option<String>,
    },

    /// Network-level failure talking to the upstream API
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-200 status
    #[error("upstream returned HTTP {status} for {url}")]
    UpstreamStatus {
        /// HTTP status code returned by upstream
        status: u16,
        /// Request URL with credentials stripped
        url: String,
    },

    /// Retry budget (attempt count or elapsed time) used up
    #[error("gave up after {attempts} attempt(s): {last}")]
    ExhaustedRetries {
        /// Number of attempts made, including the first one
        attempts: u32,
        /// The error returned by the final attempt
        #[source]
        last: Box<Error>,
    },

    /// The caller cancelled the operation
    #[error("operation cancelled")]
    Cancelled,

    /// Upstream body could not be decoded as a page envelope
    #[error("malformed upstream payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The first page of a run could not be fetched
    #[error("initial page fetch failed: {0}")]
    InitialFetchFailed(#[source] Box<Error>),

    /// One or more concurrent page fetches failed
    #[error("{failed} of {launched} concurrent page fetches failed, first error: {first}")]
    PartialFetchFailed {
        /// Number of page fetches that failed
        failed: usize,
        /// Number of page fetches launched after the initial page
        launched: usize,
        /// The failure with the lowest page index
        #[source]
        first: Box<Error>,
    },

    /// Page size must be strictly positive
    #[error("invalid page limit {0}: must be greater than zero")]
    InvalidLimit(i64),

    /// Reconciliation write failed (transaction rolled back)
    #[error("write error: {0}")]
    Write(#[source] sqlx::Error),

    /// Database lifecycle or query failure
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// No character stored under this identity
    #[error("character {id} not found")]
    NotFound {
        /// The external identity that was looked up
        id: i64,
    },

    /// Path segment was not a numeric character ID
    #[error("malformed character ID: {0}")]
    MalformedId(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a configuration error for a specific key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to connect to database
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to run migrations
    #[error("failed to run migrations: {0}")]
    MigrationFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),
}

/// Description returned to clients for any error that isn't meant for them
pub const INTERNAL_ERROR_DESCRIPTION: &str = "Sorry, there was a problem. Please try again later.";

/// API error response format
///
/// ```json
/// {"error": "no_such_character", "error_description": "no such character"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Machine-readable error code
    pub error: String,
    /// Human-readable description, safe to show to end users
    pub error_description: String,
}

impl ApiError {
    /// Create a new API error with code and description
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            error: code.into(),
            error_description: description.into(),
        }
    }

    /// Create the generic internal error
    pub fn internal() -> Self {
        Self::new("internal_error", INTERNAL_ERROR_DESCRIPTION)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;

    /// Get the description sent to clients
    fn error_description(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::MalformedId(_) => 400,
            // Everything else is flattened so internals never leak
            _ => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::NotFound { .. } => "no_such_character",
            Error::MalformedId(_) => "malformed_id",
            _ => "internal_error",
        }
    }

    fn error_description(&self) -> &str {
        match self {
            Error::NotFound { .. } => "no such character",
            Error::MalformedId(_) => "malformed ID",
            _ => INTERNAL_ERROR_DESCRIPTION,
        }
    }
}

impl From<&Error> for ApiError {
    fn from(error: &Error) -> Self {
        ApiError::new(error.error_code(), error.error_description())
    }
}
