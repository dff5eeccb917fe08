use std::fmt;
use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use sea_orm::sea_query::{Expr, SimpleExpr};
use uuid::Uuid;

use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::providers::clock::Clock;
use crate::types::db::user::{self, ActiveModel, Entity as User};
use crate::types::internal::user::{NewUser, ProfileUpdate};

/// Persists user accounts and their credentials
///
/// Passwords are stored as Argon2id hashes keyed with the pepper; refresh tokens
/// only as fingerprints supplied by the caller.
pub struct CredentialStore {
    db: DatabaseConnection,
    password_pepper: String,
    clock: Arc<dyn Clock>,
}

impl CredentialStore {
    pub fn new(db: DatabaseConnection, password_pepper: String, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            password_pepper,
            clock,
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| CredentialError::PasswordHashingFailed(format!("argon2 init: {}", e)).into())
    }

    /// Hash a plaintext password with Argon2id and the pepper
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError::PasswordHashingFailed(e.to_string()).into())
    }

    /// Check a plaintext password against the user's stored hash
    ///
    /// A stored hash that cannot be parsed counts as a mismatch.
    pub fn verify_password(&self, user: &user::Model, password: &str) -> Result<bool, InternalError> {
        let parsed = match PasswordHash::new(&user.password_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(user_id = %user.id, "Unparseable password hash: {}", e);
                return Ok(false);
            }
        };
        Ok(self.argon2()?.verify_password(password.as_bytes(), &parsed).is_ok())
    }

    async fn username_taken(&self, username: &str) -> Result<bool, InternalError> {
        let existing = User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))?;
        Ok(existing.is_some())
    }

    async fn email_taken(&self, email: &str) -> Result<bool, InternalError> {
        let existing = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))?;
        Ok(existing.is_some())
    }

    /// Insert a new user after checking username, then email
    ///
    /// # Errors
    /// * `CredentialError::DuplicateUsername` / `DuplicateEmail` - from the pre-check or the unique index
    pub async fn create_user(&self, new_user: NewUser) -> Result<user::Model, InternalError> {
        if self.username_taken(&new_user.username).await? {
            return Err(CredentialError::DuplicateUsername(new_user.username).into());
        }
        if self.email_taken(&new_user.email).await? {
            return Err(CredentialError::DuplicateEmail(new_user.email).into());
        }

        let password_hash = self.hash_password(&new_user.password)?;
        let now = self.clock.now().timestamp();

        let model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            username: Set(new_user.username.clone()),
            email: Set(new_user.email.clone()),
            password_hash: Set(password_hash),
            is_admin: Set(new_user.is_admin),
            is_verified: Set(new_user.is_verified),
            refresh_token_hash: Set(None),
            bio: Set(new_user.bio),
            image_uri: Set(new_user.image_uri),
            contact: Set(new_user.contact),
            joined_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| Self::map_unique_violation(e, &new_user.username, &new_user.email, "insert_user"))
    }

    /// A concurrent insert can slip past the pre-check; the unique index names the column
    fn map_unique_violation(err: DbErr, username: &str, email: &str, operation: &str) -> InternalError {
        let message = err.to_string();
        if message.contains("UNIQUE") {
            if message.contains("users.email") {
                return CredentialError::DuplicateEmail(email.to_string()).into();
            }
            return CredentialError::DuplicateUsername(username.to_string()).into();
        }
        InternalError::database(operation, err)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<user::Model, InternalError> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))?
            .ok_or_else(|| CredentialError::UserNotFound(email.to_string()).into())
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<user::Model, InternalError> {
        User::find_by_id(user_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))?
            .ok_or_else(|| CredentialError::UserNotFound(user_id.to_string()).into())
    }

    async fn update_column(
        &self,
        user_id: &str,
        column: user::Column,
        value: SimpleExpr,
        operation: &str,
    ) -> Result<(), InternalError> {
        let result = User::update_many()
            .col_expr(column, value)
            .col_expr(user::Column::UpdatedAt, Expr::value(self.clock.now().timestamp()))
            .filter(user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database(operation, e))?;

        if result.rows_affected == 0 {
            return Err(CredentialError::UpdateFailed(format!("{}: no user {}", operation, user_id)).into());
        }
        Ok(())
    }

    pub async fn set_verified(&self, user_id: &str) -> Result<(), InternalError> {
        self.update_column(user_id, user::Column::IsVerified, Expr::value(true), "set_verified")
            .await
    }

    /// Replace (or with `None`, clear) the stored refresh token fingerprint
    pub async fn set_refresh_token(&self, user_id: &str, fingerprint: Option<String>) -> Result<(), InternalError> {
        self.update_column(
            user_id,
            user::Column::RefreshTokenHash,
            Expr::value(fingerprint),
            "set_refresh_token",
        )
        .await
    }

    pub async fn set_password_hash(&self, user_id: &str, password_hash: String) -> Result<(), InternalError> {
        self.update_column(
            user_id,
            user::Column::PasswordHash,
            Expr::value(password_hash),
            "set_password_hash",
        )
        .await
    }

    /// Apply the fields of `update` that differ from the stored values
    ///
    /// # Errors
    /// * `CredentialError::UpdateFailed` - nothing supplied, or nothing would change
    /// * `CredentialError::DuplicateUsername` - the new username belongs to someone else
    pub async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<user::Model, InternalError> {
        let current = self.find_by_id(user_id).await?;

        let username = update.username.filter(|v| *v != current.username);
        let bio = update.bio.filter(|v| *v != current.bio);
        let image_uri = update.image_uri.filter(|v| *v != current.image_uri);
        let contact = update.contact.filter(|v| *v != current.contact);

        if username.is_none() && bio.is_none() && image_uri.is_none() && contact.is_none() {
            return Err(CredentialError::UpdateFailed("no profile fields changed".to_string()).into());
        }

        if let Some(new_username) = &username {
            if self.username_taken(new_username).await? {
                return Err(CredentialError::DuplicateUsername(new_username.clone()).into());
            }
        }

        let email = current.email.clone();
        let mut model: ActiveModel = current.into();
        if let Some(v) = username.clone() {
            model.username = Set(v);
        }
        if let Some(v) = bio {
            model.bio = Set(v);
        }
        if let Some(v) = image_uri {
            model.image_uri = Set(v);
        }
        if let Some(v) = contact {
            model.contact = Set(v);
        }
        model.updated_at = Set(self.clock.now().timestamp());

        model.update(&self.db).await.map_err(|e| {
            Self::map_unique_violation(e, username.as_deref().unwrap_or_default(), &email, "update_profile")
        })
    }

    /// All users, oldest first
    pub async fn list_users(&self) -> Result<Vec<user::Model>, InternalError> {
        User::find()
            .order_by_asc(user::Column::JoinedAt)
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    /// Returns whether a row was removed
    pub async fn delete_user(&self, user_id: &str) -> Result<bool, InternalError> {
        let result = User::delete_by_id(user_id.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;
        Ok(result.rows_affected > 0)
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
