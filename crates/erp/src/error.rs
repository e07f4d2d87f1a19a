//! Adapter error taxonomy.

use thiserror::Error;

/// Failure modes when talking to the ERP.
///
/// `Auth` and `Server` are user-recoverable (re-authenticate, fix the input
/// and retry); `Network` is retriable; `Decode` means the ERP answered with
/// a shape this adapter does not understand.
#[derive(Debug, Error)]
pub enum ErpError {
    /// Connection-level failure (DNS, refused, timed out, TLS).
    #[error("network error talking to the ERP")]
    Network(#[from] reqwest::Error),

    /// Login failed or the session token was rejected (401/403).
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The ERP reported a business/validation error for the request.
    #[error("ERP rejected the request ({status}): {message}")]
    Server { status: u16, message: String },

    /// The requested record does not exist.
    #[error("record not found")]
    NotFound,

    /// The response body did not match the expected shape.
    #[error("failed to decode ERP response: {0}")]
    Decode(String),

    /// Bad adapter configuration (missing base URL, malformed ids).
    #[error("configuration error: {0}")]
    Config(String),
}

impl ErpError {
    /// Whether re-authenticating could help.
    pub fn is_auth(&self) -> bool {
        matches!(self, ErpError::Auth(_))
    }
}
