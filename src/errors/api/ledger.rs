use crate::errors::api::ErrorResponse;
use crate::errors::internal::{AuditError, CredentialError, InternalError, LoanError, TokenError};
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

/// Error types for the loan and audit-log endpoints
#[derive(ApiResponse, Debug)]
pub enum LedgerError {
    /// Malformed input, unknown status filter or sort order
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Missing, invalid or expired access token
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Administrator role required
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Loan not found
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Loan has already been approved or rejected
    #[oai(status = 409)]
    AlreadyProcessed(Json<ErrorResponse>),

    /// The request did not finish within its time budget
    #[oai(status = 504)]
    Timeout(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl LedgerError {
    pub fn bad_request(message: String) -> Self {
        LedgerError::BadRequest(Json(ErrorResponse::new("bad_request", message, 400)))
    }

    pub fn unauthorized() -> Self {
        LedgerError::Unauthorized(Json(ErrorResponse::new(
            "unauthorized",
            "Valid access token required",
            401,
        )))
    }

    pub fn forbidden() -> Self {
        LedgerError::Forbidden(Json(ErrorResponse::new(
            "forbidden",
            "Administrator role required",
            403,
        )))
    }

    pub fn not_found() -> Self {
        LedgerError::NotFound(Json(ErrorResponse::new("not_found", "Loan not found", 404)))
    }

    pub fn already_processed(status: &str) -> Self {
        LedgerError::AlreadyProcessed(Json(ErrorResponse::new(
            "already_processed",
            format!("Loan has already been {}", status),
            409,
        )))
    }

    pub fn timeout() -> Self {
        LedgerError::Timeout(Json(ErrorResponse::new(
            "timeout",
            "The request took too long to complete",
            504,
        )))
    }

    /// Convert InternalError to LedgerError
    ///
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Database(_) | InternalError::Parse { .. } | InternalError::Crypto { .. } => {
                tracing::error!("Infrastructure error in ledger operation: {}", err);
                Self::internal_server_error()
            }
            InternalError::Validation { field, reason } => {
                tracing::debug!("Validation failed for {}: {}", field, reason);
                Self::bad_request(format!("{}: {}", field, reason))
            }
            InternalError::Timeout { operation, budget_ms } => {
                tracing::warn!("{} exceeded its {}ms budget", operation, budget_ms);
                Self::timeout()
            }

            InternalError::Loan(LoanError::NotFound(_)) => Self::not_found(),
            InternalError::Loan(LoanError::AlreadyProcessed { status, .. }) => Self::already_processed(status),
            InternalError::Loan(LoanError::InvalidStatus(status)) => {
                Self::bad_request(format!("Invalid status parameter: {}", status))
            }
            InternalError::Loan(LoanError::InvalidOrder(order)) => {
                Self::bad_request(format!("Invalid order parameter: {}", order))
            }

            InternalError::Token(TokenError::Signing(_)) => {
                tracing::error!("Token signing failed: {}", err);
                Self::internal_server_error()
            }
            InternalError::Token(_) => {
                tracing::debug!("Token rejected: {}", err);
                Self::unauthorized()
            }

            InternalError::Audit(AuditError::NotRecorded { .. }) | InternalError::Audit(AuditError::LogWriteFailed(_)) => {
                tracing::error!("Audit failure in ledger operation: {}", err);
                Self::internal_server_error()
            }

            InternalError::Credential(_) => {
                tracing::error!("Unexpected error in ledger operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Create a generic internal server error
    fn internal_server_error() -> Self {
        LedgerError::InternalError(Json(ErrorResponse::new(
            "internal_error",
            "An internal error occurred",
            500,
        )))
    }

    fn body(&self) -> &ErrorResponse {
        match self {
            LedgerError::BadRequest(json)
            | LedgerError::Unauthorized(json)
            | LedgerError::Forbidden(json)
            | LedgerError::NotFound(json)
            | LedgerError::AlreadyProcessed(json)
            | LedgerError::Timeout(json)
            | LedgerError::InternalError(json) => &json.0,
        }
    }

    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }
}

impl From<InternalError> for LedgerError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
