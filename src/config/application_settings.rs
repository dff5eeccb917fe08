use std::sync::Arc;
use std::time::Duration;

use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ApplicationError;
use crate::config::{EnvironmentProvider, SystemEnvironment};
use crate::providers::password_validator_provider::PasswordPolicy;
use crate::providers::token_provider::TokenSettings;

pub const DEFAULT_INTEREST_RATE: f64 = 0.05;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Business settings, read once at startup
#[derive(Debug, Clone)]
pub struct ApplicationSettings {
    token_settings: TokenSettings,
    password_policy: PasswordPolicy,
    interest_rate: f64,
    request_timeout: Duration,
}

impl ApplicationSettings {
    pub fn from_env_provider(env_provider: Arc<dyn EnvironmentProvider>) -> Result<Self, ApplicationError> {
        let load = |name: &str, default: &str| -> Result<String, ApplicationError> {
            Ok(ConfigSpec::new(env_provider.clone())
                .env_override(name)
                .default_value(default)
                .load()?
                .value)
        };

        let token_settings = TokenSettings {
            access_ttl: ConfigSpec::parse_duration_minutes(
                &load("ACCESS_TOKEN_TTL_MINUTES", "15")?,
                "ACCESS_TOKEN_TTL_MINUTES",
            )?,
            refresh_ttl: ConfigSpec::parse_duration_days(
                &load("REFRESH_TOKEN_TTL_DAYS", "7")?,
                "REFRESH_TOKEN_TTL_DAYS",
            )?,
            email_verification_ttl: ConfigSpec::parse_duration_minutes(
                &load("EMAIL_VERIFICATION_TTL_MINUTES", "60")?,
                "EMAIL_VERIFICATION_TTL_MINUTES",
            )?,
            password_reset_ttl: ConfigSpec::parse_duration_minutes(
                &load("PASSWORD_RESET_TTL_MINUTES", "30")?,
                "PASSWORD_RESET_TTL_MINUTES",
            )?,
        };
        token_settings
            .check()
            .map_err(|reason| ApplicationError::invalid("ACCESS_TOKEN_TTL_MINUTES", reason))?;

        let password_policy = PasswordPolicy {
            min_length: ConfigSpec::parse_usize(&load("PASSWORD_MIN_LENGTH", "8")?, "PASSWORD_MIN_LENGTH")?,
            max_length: ConfigSpec::parse_usize(&load("PASSWORD_MAX_LENGTH", "128")?, "PASSWORD_MAX_LENGTH")?,
            ..PasswordPolicy::default()
        };
        if password_policy.min_length == 0 || password_policy.min_length > password_policy.max_length {
            return Err(ApplicationError::invalid(
                "PASSWORD_MIN_LENGTH",
                "must be positive and not above PASSWORD_MAX_LENGTH",
            ));
        }

        let interest_rate = ConfigSpec::parse_rate(&load("LOAN_INTEREST_RATE", "0.05")?, "LOAN_INTEREST_RATE")?;

        let request_timeout = ConfigSpec::parse_duration_seconds(
            &load("REQUEST_TIMEOUT_SECONDS", "30")?,
            "REQUEST_TIMEOUT_SECONDS",
        )?;
        if request_timeout.is_zero() {
            return Err(ApplicationError::invalid("REQUEST_TIMEOUT_SECONDS", "must be at least 1 second"));
        }

        Ok(Self {
            token_settings,
            password_policy,
            interest_rate,
            request_timeout,
        })
    }

    pub fn from_env() -> Result<Self, ApplicationError> {
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn token_settings(&self) -> &TokenSettings {
        &self.token_settings
    }

    pub fn password_policy(&self) -> &PasswordPolicy {
        &self.password_policy
    }

    /// Interest rate fixed onto each loan at application time
    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            token_settings: TokenSettings::default(),
            password_policy: PasswordPolicy::default(),
            interest_rate: DEFAULT_INTEREST_RATE,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_defaults_when_environment_empty() {
        let settings = ApplicationSettings::from_env_provider(Arc::new(MockEnvironment::empty())).unwrap();

        assert_eq!(settings.token_settings().access_ttl, Duration::from_secs(15 * 60));
        assert_eq!(settings.token_settings().refresh_ttl, Duration::from_secs(7 * 24 * 60 * 60));
        assert_eq!(settings.token_settings().email_verification_ttl, Duration::from_secs(60 * 60));
        assert_eq!(settings.token_settings().password_reset_ttl, Duration::from_secs(30 * 60));
        assert_eq!(settings.password_policy().min_length, 8);
        assert_eq!(settings.interest_rate(), 0.05);
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_access_ttl_must_be_shorter_than_refresh_ttl() {
        let env = MockEnvironment::empty()
            .with_vars(&[("ACCESS_TOKEN_TTL_MINUTES", "20160"), ("REFRESH_TOKEN_TTL_DAYS", "7")]);

        let result = ApplicationSettings::from_env_provider(Arc::new(env));
        assert!(matches!(result, Err(ApplicationError::InvalidSetting { .. })));
    }

    #[test]
    fn test_overrides_are_applied() {
        let env = MockEnvironment::empty().with_vars(&[
            ("LOAN_INTEREST_RATE", "0.1"),
            ("REQUEST_TIMEOUT_SECONDS", "5"),
            ("PASSWORD_MIN_LENGTH", "12"),
        ]);

        let settings = ApplicationSettings::from_env_provider(Arc::new(env)).unwrap();
        assert_eq!(settings.interest_rate(), 0.1);
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));
        assert_eq!(settings.password_policy().min_length, 12);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let env = MockEnvironment::empty().with_var("REQUEST_TIMEOUT_SECONDS", "0");
        assert!(ApplicationSettings::from_env_provider(Arc::new(env)).is_err());
    }
}
