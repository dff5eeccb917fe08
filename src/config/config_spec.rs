use std::sync::Arc;
use std::time::Duration;

use crate::config::errors::ApplicationError;
use crate::config::EnvironmentProvider;

/// Where a loaded value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValueSource {
    EnvironmentVariable { name: String },
    Default,
}

#[derive(Debug, Clone)]
pub struct ConfigValue {
    pub value: String,
    pub source: ConfigValueSource,
}

/// Specification of one setting: environment variable, then default
pub struct ConfigSpec {
    env_provider: Arc<dyn EnvironmentProvider>,
    env_name: Option<String>,
    default_value: Option<String>,
    min_length: Option<usize>,
    validator: Option<fn(&str) -> Result<(), String>>,
}

impl ConfigSpec {
    pub fn new(env_provider: Arc<dyn EnvironmentProvider>) -> Self {
        Self {
            env_provider,
            env_name: None,
            default_value: None,
            min_length: None,
            validator: None,
        }
    }

    pub fn env_override(mut self, name: &str) -> Self {
        self.env_name = Some(name.to_string());
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn validator(mut self, f: fn(&str) -> Result<(), String>) -> Self {
        self.validator = Some(f);
        self
    }

    fn setting_name(&self) -> &str {
        self.env_name.as_deref().unwrap_or("<unnamed>")
    }

    /// Resolve the value and report its source
    ///
    /// An environment value that fails validation is an error; it never silently
    /// falls back to the default.
    pub fn load(&self) -> Result<ConfigValue, ApplicationError> {
        let from_env = self
            .env_name
            .as_ref()
            .and_then(|name| self.env_provider.get_var(name).map(|v| (name.clone(), v)));

        let loaded = match (from_env, &self.default_value) {
            (Some((name, value)), _) => ConfigValue {
                value,
                source: ConfigValueSource::EnvironmentVariable { name },
            },
            (None, Some(default)) => ConfigValue {
                value: default.clone(),
                source: ConfigValueSource::Default,
            },
            (None, None) => {
                return Err(ApplicationError::MissingSetting {
                    setting_name: self.setting_name().to_string(),
                })
            }
        };

        self.validate_value(&loaded.value)?;
        Ok(loaded)
    }

    pub fn validate_value(&self, value: &str) -> Result<(), ApplicationError> {
        if let Some(min) = self.min_length {
            if value.len() < min {
                return Err(ApplicationError::invalid(
                    self.setting_name(),
                    format!("must be at least {} characters", min),
                ));
            }
        }
        if let Some(validator) = self.validator {
            validator(value).map_err(|reason| ApplicationError::invalid(self.setting_name(), reason))?;
        }
        Ok(())
    }
}

impl ConfigSpec {
    pub fn parse_duration_minutes(value: &str, setting_name: &str) -> Result<Duration, ApplicationError> {
        let minutes = value.trim().parse::<u64>().map_err(|e| {
            ApplicationError::parse(
                setting_name,
                format!("Expected positive integer for minutes, got '{}': {}", value, e),
            )
        })?;
        Ok(Duration::from_secs(minutes * 60))
    }

    pub fn parse_duration_days(value: &str, setting_name: &str) -> Result<Duration, ApplicationError> {
        let days = value.trim().parse::<u64>().map_err(|e| {
            ApplicationError::parse(
                setting_name,
                format!("Expected positive integer for days, got '{}': {}", value, e),
            )
        })?;
        Ok(Duration::from_secs(days * 24 * 60 * 60))
    }

    pub fn parse_duration_seconds(value: &str, setting_name: &str) -> Result<Duration, ApplicationError> {
        let seconds = value.trim().parse::<u64>().map_err(|e| {
            ApplicationError::parse(
                setting_name,
                format!("Expected positive integer for seconds, got '{}': {}", value, e),
            )
        })?;
        Ok(Duration::from_secs(seconds))
    }

    pub fn parse_usize(value: &str, setting_name: &str) -> Result<usize, ApplicationError> {
        value
            .trim()
            .parse::<usize>()
            .map_err(|e| ApplicationError::parse(setting_name, format!("Expected integer, got '{}': {}", value, e)))
    }

    pub fn parse_rate(value: &str, setting_name: &str) -> Result<f64, ApplicationError> {
        let rate = value
            .trim()
            .parse::<f64>()
            .map_err(|e| ApplicationError::parse(setting_name, format!("Expected number, got '{}': {}", value, e)))?;
        if !rate.is_finite() || rate < 0.0 {
            return Err(ApplicationError::invalid(setting_name, "rate must be a finite non-negative number"));
        }
        Ok(rate)
    }

    pub fn parse_port(value: &str, setting_name: &str) -> Result<u16, ApplicationError> {
        let port = value.trim().parse::<u16>().map_err(|e| {
            ApplicationError::parse(
                setting_name,
                format!("Expected port number (1-65535), got '{}': {}", value, e),
            )
        })?;
        if port == 0 {
            return Err(ApplicationError::invalid(setting_name, "Port number must be between 1 and 65535"));
        }
        Ok(port)
    }

    /// Accepts IPv4 literals, bracketed or bare IPv6, and whitespace-free hostnames
    pub fn validate_host_address(value: &str) -> Result<(), String> {
        if value.is_empty() {
            return Err("Host address cannot be empty".to_string());
        }
        if value == "[]" {
            return Err("Invalid IPv6 address format".to_string());
        }
        if value.contains(':') {
            return Ok(());
        }

        let parts: Vec<&str> = value.split('.').collect();
        if parts.len() == 4 && parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit())) {
            return value
                .parse::<std::net::Ipv4Addr>()
                .map(|_| ())
                .map_err(|_| format!("Invalid IPv4 address '{}'", value));
        }

        if value.chars().any(char::is_whitespace) {
            return Err("Host address cannot contain whitespace characters".to_string());
        }
        Ok(())
    }
}
