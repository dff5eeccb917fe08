use thiserror::Error;
use validator::ValidateEmail;

use crate::errors::InternalError;

/// Password strength rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_symbol: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_symbol: true,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordValidationError {
    #[error("Password must be at least {0} characters")]
    TooShort(usize),

    #[error("Password must not exceed {0} characters")]
    TooLong(usize),

    #[error("Password must contain an uppercase letter")]
    MissingUppercase,

    #[error("Password must contain a lowercase letter")]
    MissingLowercase,

    #[error("Password must contain a digit")]
    MissingDigit,

    #[error("Password must contain a symbol")]
    MissingSymbol,

    #[error("Password must not contain the username")]
    ContainsUsername,
}

/// Email syntax and password strength checks applied before any credential is persisted
#[derive(Debug, Clone, Default)]
pub struct PasswordValidatorProvider {
    policy: PasswordPolicy,
}

impl PasswordValidatorProvider {
    pub fn new(policy: PasswordPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    /// Validate a password, failing on the first rule it breaks
    ///
    /// Length is counted in characters, not bytes.
    pub fn validate(&self, password: &str, username: Option<&str>) -> Result<(), PasswordValidationError> {
        let length = password.chars().count();
        if length < self.policy.min_length {
            return Err(PasswordValidationError::TooShort(self.policy.min_length));
        }
        if length > self.policy.max_length {
            return Err(PasswordValidationError::TooLong(self.policy.max_length));
        }

        if self.policy.require_uppercase && !password.chars().any(char::is_uppercase) {
            return Err(PasswordValidationError::MissingUppercase);
        }
        if self.policy.require_lowercase && !password.chars().any(char::is_lowercase) {
            return Err(PasswordValidationError::MissingLowercase);
        }
        if self.policy.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordValidationError::MissingDigit);
        }
        if self.policy.require_symbol && !password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
            return Err(PasswordValidationError::MissingSymbol);
        }

        if let Some(username) = username.filter(|u| !u.is_empty()) {
            if password.to_lowercase().contains(&username.to_lowercase()) {
                return Err(PasswordValidationError::ContainsUsername);
            }
        }

        Ok(())
    }

    /// Password check mapped onto the internal validation error
    pub fn check_password(&self, password: &str, username: Option<&str>) -> Result<(), InternalError> {
        self.validate(password, username)
            .map_err(|e| InternalError::validation("password", e.to_string()))
    }

    pub fn check_email(&self, email: &str) -> Result<(), InternalError> {
        if email.validate_email() {
            Ok(())
        } else {
            Err(InternalError::validation("email", "invalid email address"))
        }
    }

    pub fn check_username(&self, username: &str) -> Result<(), InternalError> {
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(InternalError::validation("username", "must not be empty"));
        }
        if trimmed.len() != username.len() {
            return Err(InternalError::validation("username", "must not start or end with whitespace"));
        }
        if username.chars().count() > 64 {
            return Err(InternalError::validation("username", "must not exceed 64 characters"));
        }
        Ok(())
    }
}
