use std::fmt;

/// Event types for audit logging
///
/// Each event carries a fixed activity description; that text is what the audit
/// trail shows to administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    UserRegistered,
    EmailVerified,
    UnverifiedLoginAttempt,
    InvalidPasswordAttempt,
    LoginSuccess,
    LoggedOut,
    PasswordResetRequested,
    PasswordResetCompleted,
    UserDeleted,
    LoanApplied,
    LoanApproved,
    LoanRejected,
    LoanDeleted,
}

impl EventType {
    /// Machine tag for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserRegistered => "user_registered",
            Self::EmailVerified => "email_verified",
            Self::UnverifiedLoginAttempt => "unverified_login_attempt",
            Self::InvalidPasswordAttempt => "invalid_password_attempt",
            Self::LoginSuccess => "login_success",
            Self::LoggedOut => "logged_out",
            Self::PasswordResetRequested => "password_reset_requested",
            Self::PasswordResetCompleted => "password_reset_completed",
            Self::UserDeleted => "user_deleted",
            Self::LoanApplied => "loan_applied",
            Self::LoanApproved => "loan_approved",
            Self::LoanRejected => "loan_rejected",
            Self::LoanDeleted => "loan_deleted",
        }
    }

    /// Human-readable activity description
    pub fn activity(&self) -> &'static str {
        match self {
            Self::UserRegistered => "user registered",
            Self::EmailVerified => "email verified",
            Self::UnverifiedLoginAttempt => "unverified login attempt",
            Self::InvalidPasswordAttempt => "invalid password attempt",
            Self::LoginSuccess => "login success",
            Self::LoggedOut => "logged out",
            Self::PasswordResetRequested => "password reset requested",
            Self::PasswordResetCompleted => "password reset completed",
            Self::UserDeleted => "user deleted by admin",
            Self::LoanApplied => "applied for a loan",
            Self::LoanApproved => "loan approved by admin",
            Self::LoanRejected => "loan rejected by admin",
            Self::LoanDeleted => "deleted a loan",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audit event structure for building and storing audit logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub event_type: EventType,
    /// Subject the entry is keyed to
    pub user_id: String,
}

impl AuditEvent {
    pub fn new(event_type: EventType, user_id: impl Into<String>) -> Self {
        Self {
            event_type,
            user_id: user_id.into(),
        }
    }
}
