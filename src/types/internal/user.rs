/// Input for creating a user record; `password` is plaintext and hashed by the store
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
    pub is_verified: bool,
    pub bio: String,
    pub image_uri: String,
    pub contact: String,
}

impl NewUser {
    /// A regular, unverified account with an empty profile
    pub fn new(username: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            is_admin: false,
            is_verified: false,
            bio: String::new(),
            image_uri: String::new(),
            contact: String::new(),
        }
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("is_admin", &self.is_admin)
            .field("is_verified", &self.is_verified)
            .finish()
    }
}

/// Partial update of display fields; `None` leaves a field untouched
///
/// Email, password and the admin flag are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub image_uri: Option<String>,
    pub contact: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.bio.is_none() && self.image_uri.is_none() && self.contact.is_none()
    }
}

/// Public view of a user account; never carries the password or refresh fingerprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub is_verified: bool,
    pub bio: String,
    pub image_uri: String,
    pub contact: String,
    pub joined_at: i64,
}

impl From<crate::types::db::user::Model> for UserProfile {
    fn from(model: crate::types::db::user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            is_admin: model.is_admin,
            is_verified: model.is_verified,
            bio: model.bio,
            image_uri: model.image_uri,
            contact: model.contact,
            joined_at: model.joined_at,
        }
    }
}
