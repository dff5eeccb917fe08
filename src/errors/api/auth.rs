use crate::errors::api::ErrorResponse;
use crate::errors::internal::{AuditError, CredentialError, InternalError, LoanError, TokenError};
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

/// Error types for the account and session endpoints
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Malformed input or a password that fails the policy
    #[oai(status = 400)]
    ValidationFailed(Json<ErrorResponse>),

    /// Nothing changed
    #[oai(status = 400)]
    UpdateFailed(Json<ErrorResponse>),

    /// Unknown email, wrong password or unverified account
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorResponse>),

    /// Email address has not been verified yet
    #[oai(status = 401)]
    EmailNotVerified(Json<ErrorResponse>),

    /// Invalid, malformed or wrong-kind token
    #[oai(status = 401)]
    InvalidToken(Json<ErrorResponse>),

    /// Token has expired
    #[oai(status = 401)]
    ExpiredToken(Json<ErrorResponse>),

    /// Administrator role required
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// User not found
    #[oai(status = 404)]
    UserNotFound(Json<ErrorResponse>),

    /// Username already taken
    #[oai(status = 409)]
    DuplicateUsername(Json<ErrorResponse>),

    /// Email already registered
    #[oai(status = 409)]
    DuplicateEmail(Json<ErrorResponse>),

    /// The request did not finish within its time budget
    #[oai(status = 504)]
    Timeout(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AuthError {
    pub fn validation_failed(message: String) -> Self {
        AuthError::ValidationFailed(Json(ErrorResponse::new("validation_failed", message, 400)))
    }

    pub fn update_failed() -> Self {
        AuthError::UpdateFailed(Json(ErrorResponse::new("update_failed", "No changes were applied", 400)))
    }

    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(ErrorResponse::new(
            "invalid_credentials",
            "Invalid email or password",
            401,
        )))
    }

    pub fn email_not_verified() -> Self {
        AuthError::EmailNotVerified(Json(ErrorResponse::new(
            "email_not_verified",
            "Email address has not been verified",
            401,
        )))
    }

    pub fn invalid_token() -> Self {
        AuthError::InvalidToken(Json(ErrorResponse::new("invalid_token", "Invalid token", 401)))
    }

    pub fn expired_token() -> Self {
        AuthError::ExpiredToken(Json(ErrorResponse::new("expired_token", "Token has expired", 401)))
    }

    pub fn forbidden() -> Self {
        AuthError::Forbidden(Json(ErrorResponse::new(
            "forbidden",
            "Administrator role required",
            403,
        )))
    }

    pub fn user_not_found() -> Self {
        AuthError::UserNotFound(Json(ErrorResponse::new("user_not_found", "User not found", 404)))
    }

    pub fn duplicate_username() -> Self {
        AuthError::DuplicateUsername(Json(ErrorResponse::new(
            "duplicate_username",
            "Username already exists",
            409,
        )))
    }

    pub fn duplicate_email() -> Self {
        AuthError::DuplicateEmail(Json(ErrorResponse::new(
            "duplicate_email",
            "Email already exists",
            409,
        )))
    }

    pub fn timeout() -> Self {
        AuthError::Timeout(Json(ErrorResponse::new(
            "timeout",
            "The request took too long to complete",
            504,
        )))
    }

    /// Convert InternalError to AuthError
    ///
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Database(_) | InternalError::Parse { .. } | InternalError::Crypto { .. } => {
                tracing::error!("Infrastructure error in session operation: {}", err);
                Self::internal_server_error()
            }
            InternalError::Validation { field, reason } => {
                tracing::debug!("Validation failed for {}: {}", field, reason);
                Self::validation_failed(format!("{}: {}", field, reason))
            }
            InternalError::Timeout { operation, budget_ms } => {
                tracing::warn!("{} exceeded its {}ms budget", operation, budget_ms);
                Self::timeout()
            }

            InternalError::Credential(CredentialError::InvalidCredentials) => Self::invalid_credentials(),
            InternalError::Credential(CredentialError::EmailNotVerified) => Self::email_not_verified(),
            InternalError::Credential(CredentialError::DuplicateUsername(username)) => {
                tracing::debug!("Duplicate username attempt: {}", username);
                Self::duplicate_username()
            }
            InternalError::Credential(CredentialError::DuplicateEmail(_)) => {
                tracing::debug!("Duplicate email attempt");
                Self::duplicate_email()
            }
            InternalError::Credential(CredentialError::UserNotFound(_)) => Self::user_not_found(),
            InternalError::Credential(CredentialError::UpdateFailed(reason)) => {
                tracing::debug!("Update failed: {}", reason);
                Self::update_failed()
            }
            InternalError::Credential(CredentialError::PasswordHashingFailed(_)) => {
                tracing::error!("Password hashing failed: {}", err);
                Self::internal_server_error()
            }

            InternalError::Token(TokenError::Expired(kind)) => {
                tracing::debug!("Expired {} token presented", kind);
                Self::expired_token()
            }
            InternalError::Token(TokenError::Invalid { .. })
            | InternalError::Token(TokenError::KindMismatch { .. })
            | InternalError::Token(TokenError::Revoked) => {
                tracing::debug!("Token rejected: {}", err);
                Self::invalid_token()
            }
            InternalError::Token(TokenError::Signing(_)) => {
                tracing::error!("Token signing failed: {}", err);
                Self::internal_server_error()
            }

            InternalError::Audit(AuditError::NotRecorded { .. }) | InternalError::Audit(AuditError::LogWriteFailed(_)) => {
                tracing::error!("Audit failure in session operation: {}", err);
                Self::internal_server_error()
            }

            InternalError::Loan(LoanError::NotFound(_))
            | InternalError::Loan(LoanError::AlreadyProcessed { .. })
            | InternalError::Loan(LoanError::InvalidStatus(_))
            | InternalError::Loan(LoanError::InvalidOrder(_)) => {
                tracing::error!("Unexpected error in session operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Login never reveals whether the email exists or is verified
    pub fn from_login_error(err: InternalError) -> Self {
        match err {
            InternalError::Credential(CredentialError::UserNotFound(_)) => {
                tracing::debug!("Login attempt for unknown email");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::EmailNotVerified) => Self::invalid_credentials(),
            other => Self::from_internal_error(other),
        }
    }

    /// Create a generic internal server error
    fn internal_server_error() -> Self {
        AuthError::InternalError(Json(ErrorResponse::new(
            "internal_error",
            "An internal error occurred",
            500,
        )))
    }

    fn body(&self) -> &ErrorResponse {
        match self {
            AuthError::ValidationFailed(json)
            | AuthError::UpdateFailed(json)
            | AuthError::InvalidCredentials(json)
            | AuthError::EmailNotVerified(json)
            | AuthError::InvalidToken(json)
            | AuthError::ExpiredToken(json)
            | AuthError::Forbidden(json)
            | AuthError::UserNotFound(json)
            | AuthError::DuplicateUsername(json)
            | AuthError::DuplicateEmail(json)
            | AuthError::Timeout(json)
            | AuthError::InternalError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
