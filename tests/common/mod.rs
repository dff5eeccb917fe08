// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use loan_tracker_backend::config::{ApplicationSettings, DatabaseConnections, MockEnvironment, SecretManager};
use loan_tracker_backend::providers::{Clock, InMemoryNotifier, ManualClock, NotificationKind};
use loan_tracker_backend::types::internal::user::NewUser;
use loan_tracker_backend::AppData;
use migration::{AuditMigrator, CoreMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

/// Satisfies the default password policy
pub const TEST_PASSWORD: &str = "Secur3!Pass";

pub const TEST_EPOCH: i64 = 1_750_000_000;

/// Creates the users/loans database with migrations applied
pub async fn setup_test_main_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    CoreMigrator::up(&db, None)
        .await
        .expect("Failed to run core migrations");

    db
}

/// Creates a test audit database with migrations applied
pub async fn setup_test_audit_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create audit database");

    AuditMigrator::up(&db, None)
        .await
        .expect("Failed to run audit migrations");

    db
}

pub fn test_secret_manager() -> Arc<SecretManager> {
    let env = MockEnvironment::empty().with_vars(&[
        ("JWT_SECRET", "integration-jwt-secret-with-at-least-32-chars"),
        ("PASSWORD_PEPPER", "integration-pepper-16"),
        ("REFRESH_TOKEN_SECRET", "integration-refresh-secret-at-least-32-chars"),
    ]);
    Arc::new(SecretManager::init_with(&env).expect("Failed to initialize SecretManager"))
}

/// Fully wired application with a manual clock and a recording notifier
pub struct TestApp {
    pub app_data: Arc<AppData>,
    pub clock: Arc<ManualClock>,
    pub notifier: Arc<InMemoryNotifier>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_settings(ApplicationSettings::default()).await
    }

    pub async fn with_settings(settings: ApplicationSettings) -> Self {
        let connections = DatabaseConnections {
            main: setup_test_main_db().await,
            audit: setup_test_audit_db().await,
        };
        let clock = Arc::new(ManualClock::at_timestamp(TEST_EPOCH));
        let notifier = Arc::new(InMemoryNotifier::new());

        let app_data = AppData::build(
            connections,
            test_secret_manager(),
            settings,
            clock.clone() as Arc<dyn Clock>,
            notifier.clone(),
        )
        .expect("Failed to build AppData");

        Self {
            app_data: Arc::new(app_data),
            clock,
            notifier,
        }
    }

    /// Insert an admin that can log in with `TEST_PASSWORD` right away
    pub async fn create_admin(&self, username: &str, email: &str) -> String {
        let mut new_user = NewUser::new(username, email, TEST_PASSWORD);
        new_user.is_admin = true;
        new_user.is_verified = true;
        self.app_data
            .credential_store
            .create_user(new_user)
            .await
            .expect("Failed to create admin")
            .id
    }

    pub fn verification_token(&self, email: &str) -> String {
        self.notifier
            .last_token(email, NotificationKind::EmailVerification)
            .expect("No verification token sent")
    }

    pub fn reset_token(&self, email: &str) -> String {
        self.notifier
            .last_token(email, NotificationKind::PasswordReset)
            .expect("No password reset token sent")
    }
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop,
/// ensuring test isolation when dealing with global environment state.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Global mutex for tests that modify environment variables
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
