use thiserror::Error;

use crate::types::internal::auth::TokenKind;

#[derive(Error, Debug)]
pub enum TokenError {
    /// Signature mismatch or malformed payload
    #[error("Invalid token: {reason}")]
    Invalid { reason: String },

    #[error("Expired {0} token")]
    Expired(TokenKind),

    #[error("Token kind mismatch: expected {expected}, got {actual}")]
    KindMismatch { expected: TokenKind, actual: TokenKind },

    /// Cryptographically valid refresh token that no longer matches the stored value
    #[error("Refresh token has been revoked")]
    Revoked,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid { reason: reason.into() }
    }
}
