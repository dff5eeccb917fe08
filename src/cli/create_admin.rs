// Creates a verified administrator account with a generated password

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::providers::CryptoProvider;
use crate::types::internal::audit::EventType;
use crate::types::internal::user::{NewUser, UserProfile};

/// The new account plus the one-time plaintext password
pub struct CreatedAdmin {
    pub profile: UserProfile,
    pub password: String,
}

impl std::fmt::Debug for CreatedAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatedAdmin")
            .field("profile", &self.profile)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Create a verified admin; the generated password is returned once and never stored
///
/// # Errors
/// * `InternalError::Validation` - bad username or email
/// * `CredentialError::DuplicateUsername` / `DuplicateEmail`
pub async fn create_admin(app_data: &AppData, username: &str, email: &str) -> Result<CreatedAdmin, InternalError> {
    app_data.password_validator.check_username(username)?;
    app_data.password_validator.check_email(email)?;

    let password = generate_password(app_data, username)?;

    let mut new_user = NewUser::new(username, email, password.clone());
    new_user.is_admin = true;
    new_user.is_verified = true;

    let user = app_data.credential_store.create_user(new_user).await?;
    tracing::info!(user_id = %user.id, "Administrator created from CLI");

    app_data
        .audit_logger
        .record_committed(EventType::UserRegistered, &user.id)
        .await?;

    Ok(CreatedAdmin {
        profile: user.into(),
        password,
    })
}

/// A generated password that satisfies the configured policy
///
/// Short usernames can occur by chance inside a random password, so a few
/// attempts are allowed before giving up.
fn generate_password(app_data: &AppData, username: &str) -> Result<String, InternalError> {
    const ATTEMPTS: usize = 8;
    let crypto = CryptoProvider::new();

    let mut last_error = None;
    for _ in 0..ATTEMPTS {
        let candidate = crypto.generate_secure_password();
        match app_data.password_validator.check_password(&candidate, Some(username)) {
            Ok(()) => return Ok(candidate),
            Err(e) => last_error = Some(e),
        }
    }
    Err(last_error.unwrap_or_else(|| InternalError::validation("password", "could not generate a password")))
}

pub fn print_credentials(created: &CreatedAdmin) {
    println!("\n=== Administrator created ===\n");
    println!("User ID:  {}", created.profile.id);
    println!("Username: {}", created.profile.username);
    println!("Email:    {}", created.profile.email);
    println!("Password: {}", created.password);
    println!("\nStore this password now; it will not be shown again.\n");
}
