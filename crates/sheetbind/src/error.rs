//! Error types for the sheetbind client

use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur talking to the spreadsheet service.
///
/// Service-side failures (auth, invalid range, throttling) surface as
/// [`ClientError::Api`] with the service's own code and message; the client
/// never retries on the caller's behalf.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Error reported by the spreadsheet service
    #[error("Service error {code} ({status}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Service status token (e.g. PERMISSION_DENIED, RESOURCE_EXHAUSTED)
        status: String,
        /// Service error message
        message: String,
    },

    /// Tab not present in the spreadsheet
    #[error("Tab not found: {0}")]
    TabNotFound(String),

    /// Credential provider failure
    #[error("Credential error: {0}")]
    Credentials(String),

    /// Field not declared by the record type
    #[error("Field '{0}' is not part of the record layout")]
    UnknownField(&'static str),

    /// Row mapping or range error
    #[error("Mapping error: {0}")]
    Core(#[from] sheetbind_core::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Response the client could not interpret
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}
