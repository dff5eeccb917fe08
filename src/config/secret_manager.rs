use std::fmt;

use thiserror::Error;

use crate::config::{EnvironmentProvider, SecretConfig, SecretType, SystemEnvironment};

pub const JWT_SECRET: &str = "JWT_SECRET";
pub const PASSWORD_PEPPER: &str = "PASSWORD_PEPPER";
pub const REFRESH_TOKEN_SECRET: &str = "REFRESH_TOKEN_SECRET";

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Required secret '{secret_name}' is missing")]
    Missing { secret_name: String },

    #[error("Secret '{secret_name}' must be at least {expected} characters, got {actual}")]
    InvalidLength {
        secret_name: String,
        expected: usize,
        actual: usize,
    },
}

/// Holds the signing key, password pepper and refresh fingerprint key
///
/// Loaded once at startup; never printed.
pub struct SecretManager {
    jwt_secret: String,
    password_pepper: String,
    refresh_token_secret: String,
}

impl SecretManager {
    /// Load every secret from the process environment
    pub fn init() -> Result<Self, SecretError> {
        Self::init_with(&SystemEnvironment)
    }

    /// Load every secret through the given provider
    ///
    /// # Errors
    /// `SecretError::Missing` or `SecretError::InvalidLength` for the first secret that fails.
    pub fn init_with(env: &dyn EnvironmentProvider) -> Result<Self, SecretError> {
        let jwt_secret = Self::load_secret(env, &SecretConfig::env(JWT_SECRET).min_length(32))?;
        let password_pepper = Self::load_secret(env, &SecretConfig::env(PASSWORD_PEPPER).min_length(16))?;
        let refresh_token_secret =
            Self::load_secret(env, &SecretConfig::env(REFRESH_TOKEN_SECRET).min_length(32))?;

        Ok(Self {
            jwt_secret,
            password_pepper,
            refresh_token_secret,
        })
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    pub fn refresh_token_secret(&self) -> &str {
        &self.refresh_token_secret
    }

    pub(crate) fn load_secret(env: &dyn EnvironmentProvider, config: &SecretConfig) -> Result<String, SecretError> {
        let value = match &config.secret_type {
            SecretType::EnvVar { name } => match env.get_var(name) {
                Some(v) => v,
                None if !config.required => return Ok(String::new()),
                None => return Err(SecretError::Missing { secret_name: name.clone() }),
            },
        };

        if let Some(min_len) = config.min_length {
            if value.len() < min_len {
                return Err(SecretError::InvalidLength {
                    secret_name: config.secret_type.name().to_string(),
                    expected: min_len,
                    actual: value.len(),
                });
            }
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 3 }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;
    use crate::test::utils::{EnvGuard, ENV_TEST_MUTEX};

    const VALID_JWT: &str = "this-is-a-valid-jwt-secret-with-32-characters";
    const VALID_PEPPER: &str = "valid-pepper-16ch";
    const VALID_REFRESH: &str = "refresh-fingerprint-secret-32-characters!";

    fn valid_env() -> MockEnvironment {
        MockEnvironment::empty().with_vars(&[
            (JWT_SECRET, VALID_JWT),
            (PASSWORD_PEPPER, VALID_PEPPER),
            (REFRESH_TOKEN_SECRET, VALID_REFRESH),
        ])
    }

    #[test]
    fn test_successful_initialization_with_valid_secrets() {
        let manager = SecretManager::init_with(&valid_env()).unwrap();

        assert_eq!(manager.jwt_secret(), VALID_JWT);
        assert_eq!(manager.password_pepper(), VALID_PEPPER);
        assert_eq!(manager.refresh_token_secret(), VALID_REFRESH);
    }

    #[test]
    fn test_error_when_pepper_missing() {
        let env = MockEnvironment::empty()
            .with_vars(&[(JWT_SECRET, VALID_JWT), (REFRESH_TOKEN_SECRET, VALID_REFRESH)]);

        match SecretManager::init_with(&env).unwrap_err() {
            SecretError::Missing { secret_name } => assert_eq!(secret_name, PASSWORD_PEPPER),
            other => panic!("Expected Missing error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_when_jwt_secret_too_short() {
        let env = valid_env().with_var(JWT_SECRET, "short-secret");

        match SecretManager::init_with(&env).unwrap_err() {
            SecretError::InvalidLength { secret_name, expected, actual } => {
                assert_eq!(secret_name, JWT_SECRET);
                assert_eq!(expected, 32);
                assert_eq!(actual, 12);
            }
            other => panic!("Expected InvalidLength error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_when_refresh_secret_too_short() {
        let env = valid_env().with_var(REFRESH_TOKEN_SECRET, "short");
        assert!(matches!(
            SecretManager::init_with(&env),
            Err(SecretError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_debug_and_display_redact_secrets() {
        let manager = SecretManager::init_with(&valid_env()).unwrap();

        let debug = format!("{:?}", manager);
        let display = format!("{}", manager);

        for secret in [VALID_JWT, VALID_PEPPER, VALID_REFRESH] {
            assert!(!debug.contains(secret));
            assert!(!display.contains(secret));
        }
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_init_reads_process_environment() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let _guard = EnvGuard::new(vec![JWT_SECRET, PASSWORD_PEPPER, REFRESH_TOKEN_SECRET]);

        assert!(matches!(SecretManager::init(), Err(SecretError::Missing { .. })));

        unsafe {
            std::env::set_var(JWT_SECRET, VALID_JWT);
            std::env::set_var(PASSWORD_PEPPER, VALID_PEPPER);
            std::env::set_var(REFRESH_TOKEN_SECRET, VALID_REFRESH);
        }
        assert!(SecretManager::init().is_ok());
    }
}
