// API-facing error types
use poem_openapi::Object;

pub mod auth;
pub mod ledger;

// Re-exports for convenience
pub use auth::AuthError;
pub use ledger::LedgerError;

/// Standardized JSON error body shared by every endpoint
#[derive(Object, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            status_code,
        }
    }
}
