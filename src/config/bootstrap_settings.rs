use std::fmt;
use std::sync::Arc;

use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ApplicationError;
use crate::config::{EnvironmentProvider, SystemEnvironment};

/// Infrastructure settings needed before anything else can start
pub struct BootstrapSettings {
    database_url: String,
    audit_database_url: String,
    server_host: String,
    server_port: u16,
    public_base_url: String,
}

impl BootstrapSettings {
    pub fn from_env_provider(env_provider: Arc<dyn EnvironmentProvider>) -> Result<Self, ApplicationError> {
        let database_url = ConfigSpec::new(env_provider.clone())
            .env_override("DATABASE_URL")
            .default_value("sqlite://loans.db?mode=rwc")
            .min_length(1)
            .load()?
            .value;

        let audit_database_url = ConfigSpec::new(env_provider.clone())
            .env_override("AUDIT_DATABASE_URL")
            .default_value("sqlite://loans_audit.db?mode=rwc")
            .min_length(1)
            .load()?
            .value;

        let server_host = ConfigSpec::new(env_provider.clone())
            .env_override("HOST")
            .default_value("0.0.0.0")
            .validator(ConfigSpec::validate_host_address)
            .load()?
            .value;

        let port_value = ConfigSpec::new(env_provider.clone())
            .env_override("PORT")
            .default_value("3000")
            .load()?
            .value;
        let server_port = ConfigSpec::parse_port(&port_value, "PORT")?;

        let default_base_url = format!("http://localhost:{}", server_port);
        let public_base_url = ConfigSpec::new(env_provider)
            .env_override("PUBLIC_BASE_URL")
            .default_value(&default_base_url)
            .min_length(1)
            .load()?
            .value;

        Ok(Self {
            database_url,
            audit_database_url,
            server_host,
            server_port,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_env() -> Result<Self, ApplicationError> {
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn audit_database_url(&self) -> &str {
        &self.audit_database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Base URL used when building links for verification and reset notifications
    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .field("audit_database_url", &self.audit_database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_bootstrap_settings_with_all_vars() {
        let env = MockEnvironment::empty().with_vars(&[
            ("DATABASE_URL", "sqlite://test.db"),
            ("AUDIT_DATABASE_URL", "sqlite://test_audit.db"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("PUBLIC_BASE_URL", "https://loans.example.com/"),
        ]);

        let settings = BootstrapSettings::from_env_provider(Arc::new(env)).unwrap();

        assert_eq!(settings.database_url(), "sqlite://test.db");
        assert_eq!(settings.audit_database_url(), "sqlite://test_audit.db");
        assert_eq!(settings.server_address(), "127.0.0.1:8080");
        assert_eq!(settings.public_base_url(), "https://loans.example.com");
    }

    #[test]
    fn test_bootstrap_settings_with_defaults() {
        let settings = BootstrapSettings::from_env_provider(Arc::new(MockEnvironment::empty())).unwrap();

        assert_eq!(settings.database_url(), "sqlite://loans.db?mode=rwc");
        assert_eq!(settings.audit_database_url(), "sqlite://loans_audit.db?mode=rwc");
        assert_eq!(settings.server_host(), "0.0.0.0");
        assert_eq!(settings.server_port(), 3000);
        assert_eq!(settings.public_base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_bootstrap_settings_invalid_port() {
        let env = MockEnvironment::empty().with_var("PORT", "not-a-port");
        let result = BootstrapSettings::from_env_provider(Arc::new(env));
        assert!(matches!(result, Err(ApplicationError::ParseError { .. })));
    }
}
