use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email not verified")]
    EmailNotVerified,

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Zero rows affected: stale id or nothing to change
    #[error("Update failed: {0}")]
    UpdateFailed(String),

    #[error("Password hashing failed: {0}")]
    PasswordHashingFailed(String),
}
