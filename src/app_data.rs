use std::sync::Arc;

use crate::audit::AuditLogger;
use crate::config::{ApplicationSettings, DatabaseConnections, SecretManager};
use crate::errors::InternalError;
use crate::providers::{Clock, Notifier, PasswordValidatorProvider, SystemClock, TokenProvider};
use crate::stores::{AuditStore, CredentialStore, LoanStore};

/// Everything built once at startup and shared by the coordinators
///
/// ```text
/// main.rs
///   ↓
/// AppData::init()
///   ├─ connections (primary + audit)
///   ├─ clock, notifier, secret_manager, settings
///   ├─ audit_store → audit_logger
///   ├─ credential_store, loan_store
///   └─ token_provider, password_validator
///   ↓ wrapped in Arc<AppData>
///   ├─ SessionCoordinator::new(app_data)
///   └─ LoanCoordinator::new(app_data)
/// ```
pub struct AppData {
    pub connections: DatabaseConnections,
    pub clock: Arc<dyn Clock>,
    pub notifier: Arc<dyn Notifier>,
    pub secret_manager: Arc<SecretManager>,
    pub settings: Arc<ApplicationSettings>,
    pub audit_store: Arc<AuditStore>,
    pub audit_logger: Arc<AuditLogger>,
    pub credential_store: Arc<CredentialStore>,
    pub loan_store: Arc<LoanStore>,
    pub token_provider: Arc<TokenProvider>,
    pub password_validator: Arc<PasswordValidatorProvider>,
}

impl AppData {
    /// Production wiring with the wall clock
    ///
    /// Connections must already be migrated.
    pub fn init(
        connections: DatabaseConnections,
        secret_manager: Arc<SecretManager>,
        settings: ApplicationSettings,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, InternalError> {
        Self::build(connections, secret_manager, settings, Arc::new(SystemClock), notifier)
    }

    /// Wire every component around an explicit clock
    pub fn build(
        connections: DatabaseConnections,
        secret_manager: Arc<SecretManager>,
        settings: ApplicationSettings,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, InternalError> {
        tracing::debug!("Initializing AppData");

        // Audit first: every other component records through it
        let audit_store = Arc::new(AuditStore::new(connections.audit.clone()));
        let audit_logger = Arc::new(AuditLogger::new(audit_store.clone(), clock.clone()));

        let credential_store = Arc::new(CredentialStore::new(
            connections.main.clone(),
            secret_manager.password_pepper().to_string(),
            clock.clone(),
        ));
        let loan_store = Arc::new(LoanStore::new(connections.main.clone()));

        let token_provider = Arc::new(TokenProvider::new(
            secret_manager.clone(),
            settings.token_settings().clone(),
            clock.clone(),
        )?);
        let password_validator = Arc::new(PasswordValidatorProvider::new(settings.password_policy().clone()));

        tracing::info!("AppData initialization complete");

        Ok(Self {
            connections,
            clock,
            notifier,
            secret_manager,
            settings: Arc::new(settings),
            audit_store,
            audit_logger,
            credential_store,
            loan_store,
            token_provider,
            password_validator,
        })
    }
}
