use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::internal::user::{ProfileUpdate, UserProfile};

/// Request model for account registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,

    pub email: String,

    /// Plaintext password, checked against the password policy
    pub password: String,
}

/// Request model for user login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address the account was registered with
    pub email: String,

    /// Password for authentication
    pub password: String,
}

/// Response model containing authentication tokens
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Refresh token for obtaining new access tokens
    pub refresh_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,
}

/// Request model for token refresh
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token to exchange for a new access token
    pub refresh_token: String,
}

/// Response model for token refresh
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    /// New JWT access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request model for completing a password reset
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    /// Password reset token delivered by email
    pub token: String,

    pub new_password: String,
}

/// Partial profile update; omitted fields stay unchanged
#[derive(Object, Debug, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub image_uri: Option<String>,
    pub contact: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileUpdate {
            username: req.username,
            bio: req.bio,
            image_uri: req.image_uri,
            contact: req.contact,
        }
    }
}

/// Public account view
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UserProfileResponse {
    /// User ID (UUID)
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub is_verified: bool,
    pub bio: String,
    pub image_uri: String,
    pub contact: String,

    /// Registration time (Unix timestamp)
    pub joined_at: i64,
}

impl From<UserProfile> for UserProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            email: profile.email,
            is_admin: profile.is_admin,
            is_verified: profile.is_verified,
            bio: profile.bio,
            image_uri: profile.image_uri,
            contact: profile.contact,
            joined_at: profile.joined_at,
        }
    }
}
