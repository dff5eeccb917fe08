use thiserror::Error;

pub mod audit;
pub mod credential;
pub mod database;
pub mod loan;
pub mod token;

pub use audit::AuditError;
pub use credential::CredentialError;
pub use database::DatabaseError;
pub use loan::LoanError;
pub use token::TokenError;

/// Internal error type for store, provider and coordinator operations
///
/// Hybrid design separates infrastructure errors (shared) from domain errors (component-specific).
/// Not exposed via API - endpoints must convert to AuthError or LedgerError.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    /// Malformed caller input; never retried
    #[error("Validation failed for {field}: {reason}")]
    Validation {
        field: String,
        reason: String,
    },

    /// The per-operation persistence budget was exceeded
    #[error("{operation} timed out after {budget_ms}ms")]
    Timeout {
        operation: String,
        budget_ms: u64,
    },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Loan(#[from] LoanError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, budget: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            budget_ms: budget.as_millis() as u64,
        }
    }

    /// True when the primary mutation is known to have committed even though an error is returned
    pub fn effect_applied(&self) -> bool {
        matches!(self, InternalError::Audit(AuditError::NotRecorded { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timeout_reports_budget_in_millis() {
        let err = InternalError::timeout("login", Duration::from_secs(2));
        assert_eq!(err.to_string(), "login timed out after 2000ms");
    }

    #[test]
    fn test_domain_errors_are_transparent() {
        let err: InternalError = CredentialError::DuplicateEmail("a@b.io".to_string()).into();
        assert_eq!(err.to_string(), "Email already exists: a@b.io");

        let err: InternalError = LoanError::InvalidOrder("sideways".to_string()).into();
        assert_eq!(err.to_string(), "Invalid order parameter: sideways");
    }

    #[test]
    fn test_effect_applied_only_for_unrecorded_audit() {
        let unrecorded: InternalError = AuditError::NotRecorded {
            activity: "login success".to_string(),
            reason: "disk full".to_string(),
        }
        .into();
        assert!(unrecorded.effect_applied());

        let write_failed: InternalError = AuditError::LogWriteFailed("disk full".to_string()).into();
        assert!(!write_failed.effect_applied());
        assert!(!InternalError::validation("email", "bad").effect_applied());
    }
}
