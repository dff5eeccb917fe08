use std::sync::Arc;
use std::time::Duration;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::coordinators::with_timeout;
use crate::errors::internal::{CredentialError, TokenError};
use crate::errors::InternalError;
use crate::providers::{NotificationKind, Notifier, PasswordValidatorProvider, TokenProvider};
use crate::stores::CredentialStore;
use crate::types::db::user;
use crate::types::internal::audit::EventType;
use crate::types::internal::auth::{Subject, TokenKind, TokenPair};
use crate::types::internal::user::{NewUser, ProfileUpdate, UserProfile};

fn subject_of(user: &user::Model) -> Subject {
    Subject {
        user_id: user.id.clone(),
        email: user.email.clone(),
        is_admin: user.is_admin,
    }
}

/// Account and session lifecycle
///
/// ```text
/// Unregistered → Registered(unverified) → Verified → LoggedIn → LoggedOut(=Verified)
/// ```
///
/// Every operation runs under the configured request timeout.
pub struct SessionCoordinator {
    credential_store: Arc<CredentialStore>,
    token_provider: Arc<TokenProvider>,
    password_validator: Arc<PasswordValidatorProvider>,
    audit_logger: Arc<AuditLogger>,
    notifier: Arc<dyn Notifier>,
    timeout: Duration,
}

impl SessionCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            credential_store: app_data.credential_store.clone(),
            token_provider: app_data.token_provider.clone(),
            password_validator: app_data.password_validator.clone(),
            audit_logger: app_data.audit_logger.clone(),
            notifier: app_data.notifier.clone(),
            timeout: app_data.settings.request_timeout(),
        }
    }

    pub fn token_provider(&self) -> Arc<TokenProvider> {
        self.token_provider.clone()
    }

    /// Create an unverified account and send its verification token
    ///
    /// # Errors
    /// * `InternalError::Validation` - bad email, username or weak password
    /// * `CredentialError::DuplicateUsername` / `DuplicateEmail`
    /// * `AuditError::NotRecorded` - the account exists but "user registered" is missing
    pub async fn register(&self, username: String, email: String, password: String) -> Result<UserProfile, InternalError> {
        with_timeout(self.timeout, "register", async {
            self.password_validator.check_username(&username)?;
            self.password_validator.check_email(&email)?;
            self.password_validator.check_password(&password, Some(&username))?;

            let user = self
                .credential_store
                .create_user(NewUser::new(username, email, password))
                .await?;
            tracing::info!(user_id = %user.id, "User registered");

            let token = self.token_provider.issue_email_verification(&subject_of(&user))?;
            self.notifier
                .send(NotificationKind::EmailVerification, &user.email, &token)
                .await;

            self.audit_logger
                .record_committed(EventType::UserRegistered, &user.id)
                .await?;

            Ok(user.into())
        })
        .await
    }

    pub async fn verify_email(&self, token: &str) -> Result<(), InternalError> {
        with_timeout(self.timeout, "verify_email", async {
            let claims = self.token_provider.verify(token, TokenKind::EmailVerify)?;
            let user = self.credential_store.find_by_email(&claims.email).await?;

            self.credential_store.set_verified(&user.id).await?;
            tracing::info!(user_id = %user.id, "Email verified");

            self.audit_logger
                .record_committed(EventType::EmailVerified, &user.id)
                .await
        })
        .await
    }

    /// Exchange email and password for an access/refresh pair
    ///
    /// The new refresh token's fingerprint replaces any earlier one, so only the
    /// latest refresh token stays usable.
    ///
    /// # Errors
    /// * `CredentialError::UserNotFound` - unknown email
    /// * `CredentialError::EmailNotVerified` - audited as "unverified login attempt"
    /// * `CredentialError::InvalidCredentials` - audited as "invalid password attempt"
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, InternalError> {
        with_timeout(self.timeout, "login", async {
            let user = self.credential_store.find_by_email(email).await?;

            if !user.is_verified {
                tracing::warn!(user_id = %user.id, "Login attempt on unverified account");
                self.audit_logger
                    .record_best_effort(EventType::UnverifiedLoginAttempt, &user.id)
                    .await;
                return Err(CredentialError::EmailNotVerified.into());
            }

            if !self.credential_store.verify_password(&user, password)? {
                tracing::warn!(user_id = %user.id, "Login attempt with invalid password");
                self.audit_logger
                    .record_best_effort(EventType::InvalidPasswordAttempt, &user.id)
                    .await;
                return Err(CredentialError::InvalidCredentials.into());
            }

            let subject = subject_of(&user);
            let access_token = self.token_provider.issue_access(&subject)?;
            let refresh_token = self.token_provider.issue_refresh(&subject)?;

            let fingerprint = self.token_provider.fingerprint(&refresh_token)?;
            self.credential_store
                .set_refresh_token(&user.id, Some(fingerprint))
                .await?;
            tracing::info!(user_id = %user.id, "Login succeeded");

            self.audit_logger
                .record_committed(EventType::LoginSuccess, &user.id)
                .await?;

            Ok(TokenPair {
                access_token,
                refresh_token,
            })
        })
        .await
    }

    /// Issue a fresh access token for a live refresh token
    ///
    /// # Errors
    /// `TokenError::Revoked` when the token is genuine but no longer the stored one
    /// (logged out, superseded by a newer login, or the account was deleted).
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, InternalError> {
        with_timeout(self.timeout, "refresh", async {
            let claims = self.token_provider.verify(refresh_token, TokenKind::Refresh)?;

            let user = match self.credential_store.find_by_id(&claims.sub).await {
                Ok(user) => user,
                Err(InternalError::Credential(CredentialError::UserNotFound(_))) => {
                    return Err(TokenError::Revoked.into())
                }
                Err(e) => return Err(e),
            };

            let presented = self.token_provider.fingerprint(refresh_token)?;
            if user.refresh_token_hash.as_deref() != Some(presented.as_str()) {
                tracing::warn!(user_id = %user.id, "Refresh with revoked token");
                return Err(TokenError::Revoked.into());
            }

            self.token_provider.issue_access(&claims.subject())
        })
        .await
    }

    /// Clear the stored refresh fingerprint; every earlier refresh token stops working
    pub async fn logout(&self, user_id: &str) -> Result<(), InternalError> {
        with_timeout(self.timeout, "logout", async {
            self.credential_store.set_refresh_token(user_id, None).await?;
            tracing::info!(user_id = %user_id, "Logged out");

            self.audit_logger
                .record_committed(EventType::LoggedOut, user_id)
                .await
        })
        .await
    }

    /// Send a password reset token to a known email
    ///
    /// The audit entry is written before the token leaves, so an audit failure
    /// means nothing was sent.
    pub async fn forgot_password(&self, email: &str) -> Result<(), InternalError> {
        with_timeout(self.timeout, "forgot_password", async {
            let user = self.credential_store.find_by_email(email).await?;
            let token = self.token_provider.issue_password_reset(&subject_of(&user))?;

            self.audit_logger
                .record(EventType::PasswordResetRequested, &user.id)
                .await?;

            self.notifier
                .send(NotificationKind::PasswordReset, &user.email, &token)
                .await;
            tracing::info!(user_id = %user.id, "Password reset requested");
            Ok(())
        })
        .await
    }

    /// Set a new password using a reset token
    ///
    /// Also clears the refresh fingerprint so sessions opened with the old password end.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), InternalError> {
        with_timeout(self.timeout, "reset_password", async {
            let claims = self.token_provider.verify(token, TokenKind::PasswordReset)?;
            let user = self.credential_store.find_by_email(&claims.email).await?;

            self.password_validator
                .check_password(new_password, Some(&user.username))?;

            let password_hash = self.credential_store.hash_password(new_password)?;
            self.credential_store
                .set_password_hash(&user.id, password_hash)
                .await?;
            self.credential_store.set_refresh_token(&user.id, None).await?;
            tracing::info!(user_id = %user.id, "Password reset completed");

            self.audit_logger
                .record_committed(EventType::PasswordResetCompleted, &user.id)
                .await
        })
        .await
    }

    pub async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<UserProfile, InternalError> {
        with_timeout(self.timeout, "update_profile", async {
            if let Some(username) = &update.username {
                self.password_validator.check_username(username)?;
            }
            let user = self.credential_store.update_profile(user_id, update).await?;
            tracing::debug!(user_id = %user_id, "Profile updated");
            Ok(user.into())
        })
        .await
    }

    pub async fn profile(&self, user_id: &str) -> Result<UserProfile, InternalError> {
        with_timeout(self.timeout, "profile", async {
            Ok(self.credential_store.find_by_id(user_id).await?.into())
        })
        .await
    }

    pub async fn list_users(&self) -> Result<Vec<UserProfile>, InternalError> {
        with_timeout(self.timeout, "list_users", async {
            let users = self.credential_store.list_users().await?;
            Ok(users.into_iter().map(UserProfile::from).collect())
        })
        .await
    }

    /// Remove an account; removing a missing one is a silent success
    ///
    /// The audit entry is keyed to the acting admin.
    pub async fn delete_user(&self, user_id: &str, actor_id: &str) -> Result<(), InternalError> {
        with_timeout(self.timeout, "delete_user", async {
            if !self.credential_store.delete_user(user_id).await? {
                tracing::debug!(user_id = %user_id, "Delete of missing user ignored");
                return Ok(());
            }
            tracing::info!(user_id = %user_id, actor_id = %actor_id, "User deleted");

            self.audit_logger
                .record_committed(EventType::UserDeleted, actor_id)
                .await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{setup_test_app, TEST_PASSWORD};

    #[tokio::test]
    async fn test_register_sends_verification_and_audits() {
        let app = setup_test_app().await;
        let session = SessionCoordinator::new(app.app_data.clone());

        let profile = session
            .register("ada".to_string(), "ada@example.com".to_string(), TEST_PASSWORD.to_string())
            .await
            .unwrap();

        assert!(!profile.is_verified);
        assert!(!profile.is_admin);
        assert!(app
            .notifier
            .last_token("ada@example.com", NotificationKind::EmailVerification)
            .is_some());

        let entries = app.app_data.audit_logger.entries_for_user(&profile.id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].activity, "user registered");
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let app = setup_test_app().await;
        let session = SessionCoordinator::new(app.app_data.clone());

        let bad_email = session
            .register("ada".to_string(), "nope".to_string(), TEST_PASSWORD.to_string())
            .await;
        assert!(matches!(bad_email, Err(InternalError::Validation { ref field, .. }) if field == "email"));

        let weak = session
            .register("ada".to_string(), "ada@example.com".to_string(), "weak".to_string())
            .await;
        assert!(matches!(weak, Err(InternalError::Validation { ref field, .. }) if field == "password"));

        assert!(app.app_data.credential_store.list_users().await.unwrap().is_empty());
        assert!(app.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_verification_token_cannot_log_in_or_refresh() {
        let app = setup_test_app().await;
        let session = SessionCoordinator::new(app.app_data.clone());
        session
            .register("ada".to_string(), "ada@example.com".to_string(), TEST_PASSWORD.to_string())
            .await
            .unwrap();
        let token = app
            .notifier
            .last_token("ada@example.com", NotificationKind::EmailVerification)
            .unwrap();

        assert!(matches!(
            session.refresh(&token).await,
            Err(InternalError::Token(TokenError::KindMismatch { .. }))
        ));
        assert!(matches!(
            session.reset_password(&token, "N3w!Password").await,
            Err(InternalError::Token(TokenError::KindMismatch { .. }))
        ));
    }

    #[tokio::test]
    async fn test_logout_revokes_refresh_token() {
        let app = setup_test_app().await;
        let session = SessionCoordinator::new(app.app_data.clone());
        let user = app.create_verified_user("ada", "ada@example.com").await;

        let pair = session.login("ada@example.com", TEST_PASSWORD).await.unwrap();
        assert!(session.refresh(&pair.refresh_token).await.is_ok());

        session.logout(&user.id).await.unwrap();

        assert!(matches!(
            session.refresh(&pair.refresh_token).await,
            Err(InternalError::Token(TokenError::Revoked))
        ));
    }

    #[tokio::test]
    async fn test_newer_login_supersedes_older_refresh_token() {
        let app = setup_test_app().await;
        let session = SessionCoordinator::new(app.app_data.clone());
        app.create_verified_user("ada", "ada@example.com").await;

        let first = session.login("ada@example.com", TEST_PASSWORD).await.unwrap();
        let second = session.login("ada@example.com", TEST_PASSWORD).await.unwrap();

        assert!(matches!(
            session.refresh(&first.refresh_token).await,
            Err(InternalError::Token(TokenError::Revoked))
        ));
        assert!(session.refresh(&second.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_after_expiry_fails() {
        let app = setup_test_app().await;
        let session = SessionCoordinator::new(app.app_data.clone());
        app.create_verified_user("ada", "ada@example.com").await;

        let pair = session.login("ada@example.com", TEST_PASSWORD).await.unwrap();
        app.clock.advance(chrono::Duration::days(8));

        assert!(matches!(
            session.refresh(&pair.refresh_token).await,
            Err(InternalError::Token(TokenError::Expired(TokenKind::Refresh)))
        ));
    }

    #[tokio::test]
    async fn test_update_profile_and_read_back() {
        let app = setup_test_app().await;
        let session = SessionCoordinator::new(app.app_data.clone());
        let user = app.create_verified_user("ada", "ada@example.com").await;

        let updated = session
            .update_profile(
                &user.id,
                ProfileUpdate {
                    contact: Some("+44 20 0000 0000".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.contact, "+44 20 0000 0000");

        let profile = session.profile(&user.id).await.unwrap();
        assert_eq!(profile, updated);
    }

    #[tokio::test]
    async fn test_delete_user_audits_under_actor() {
        let app = setup_test_app().await;
        let session = SessionCoordinator::new(app.app_data.clone());
        let user = app.create_verified_user("ada", "ada@example.com").await;

        session.delete_user(&user.id, "admin-1").await.unwrap();
        session.delete_user(&user.id, "admin-1").await.unwrap();

        let entries = app.app_data.audit_logger.entries_for_user("admin-1").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].activity, "user deleted by admin");
        assert!(session.list_users().await.unwrap().is_empty());
    }
}
