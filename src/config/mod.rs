pub mod application_settings;
pub mod bootstrap_settings;
pub mod config_spec;
mod database;
mod env_provider;
pub mod errors;
mod logging;
mod secret_config;
pub mod secret_manager;

pub use application_settings::ApplicationSettings;
pub use bootstrap_settings::BootstrapSettings;
pub use config_spec::ConfigSpec;
pub use database::{migrate_audit_database, migrate_main_database, DatabaseConnections};
pub use env_provider::{EnvironmentProvider, MockEnvironment, SystemEnvironment};
pub use errors::ApplicationError;
pub use logging::{init_logging, init_logging_with, LoggingConfig, LoggingError};
pub use secret_config::{SecretConfig, SecretType};
pub use secret_manager::{SecretError, SecretManager};
