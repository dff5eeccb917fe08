// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::{Arc, Mutex};

use migration::{AuditMigrator, CoreMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::{ApplicationSettings, DatabaseConnections, MockEnvironment, SecretManager};
use crate::providers::{Clock, InMemoryNotifier, ManualClock};
use crate::stores::{AuditStore, CredentialStore, LoanStore};
use crate::types::db::user;
use crate::types::internal::user::NewUser;

/// Satisfies the default password policy
pub const TEST_PASSWORD: &str = "Secur3!Pass";

/// Fixed start time for the manual clock
pub const TEST_EPOCH: i64 = 1_750_000_000;

async fn migrated_main_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    CoreMigrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

async fn migrated_audit_db() -> DatabaseConnection {
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
        ("JWT_SECRET", "test-secret-key-minimum-32-characters-long"),
        ("PASSWORD_PEPPER", "test-pepper-for-unit-tests"),
        ("REFRESH_TOKEN_SECRET", "test-refresh-secret-minimum-32-characters"),
    ]);
    Arc::new(SecretManager::init_with(&env).expect("Failed to initialize test SecretManager"))
}

/// Creates test databases and stores
///
/// Returns (main_db, audit_db, credential_store, audit_store); callers discard what they don't need.
pub async fn setup_test_stores() -> (
    DatabaseConnection,
    DatabaseConnection,
    Arc<CredentialStore>,
    Arc<AuditStore>,
) {
    let main_db = migrated_main_db().await;
    let audit_db = migrated_audit_db().await;

    let audit_store = Arc::new(AuditStore::new(audit_db.clone()));
    let credential_store = Arc::new(CredentialStore::new(
        main_db.clone(),
        "test-pepper-for-unit-tests".to_string(),
        Arc::new(ManualClock::at_timestamp(TEST_EPOCH)),
    ));

    (main_db, audit_db, credential_store, audit_store)
}

pub async fn setup_test_loan_store() -> LoanStore {
    LoanStore::new(migrated_main_db().await)
}

/// Fully wired application over in-memory databases
pub struct TestApp {
    pub app_data: Arc<AppData>,
    pub clock: Arc<ManualClock>,
    pub notifier: Arc<InMemoryNotifier>,
}

impl TestApp {
    /// Insert a verified, non-admin user with `TEST_PASSWORD`
    pub async fn create_verified_user(&self, username: &str, email: &str) -> user::Model {
        let mut new_user = NewUser::new(username, email, TEST_PASSWORD);
        new_user.is_verified = true;
        self.app_data
            .credential_store
            .create_user(new_user)
            .await
            .expect("Failed to create test user")
    }
}

pub async fn setup_test_app() -> TestApp {
    let connections = DatabaseConnections {
        main: migrated_main_db().await,
        audit: migrated_audit_db().await,
    };
    let clock = Arc::new(ManualClock::at_timestamp(TEST_EPOCH));
    let notifier = Arc::new(InMemoryNotifier::new());

    let app_data = AppData::build(
        connections,
        test_secret_manager(),
        ApplicationSettings::default(),
        clock.clone() as Arc<dyn Clock>,
        notifier.clone(),
    )
    .expect("Failed to build AppData");

    TestApp {
        app_data: Arc::new(app_data),
        clock,
        notifier,
    }
}

/// Helper to manage environment variables in tests
///
/// Removes the listed variables on creation and on drop.
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

/// Global mutex for tests that modify process environment variables
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
