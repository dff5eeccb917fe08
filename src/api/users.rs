use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Query;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::helpers::create_request_context;
use crate::api::BearerAuth;
use crate::app_data::AppData;
use crate::coordinators::SessionCoordinator;
use crate::errors::AuthError;
use crate::types::dto::common::MessageResponse;
use crate::types::dto::user::{
    AccessTokenResponse, ForgotPasswordRequest, LoginRequest, RefreshRequest, RegisterRequest,
    ResetPasswordRequest, TokenResponse, UpdateProfileRequest, UserProfileResponse,
};
use crate::types::internal::context::RequestContext;

/// Account and session endpoints
pub struct UsersApi {
    session: SessionCoordinator,
}

impl UsersApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            session: SessionCoordinator::new(app_data),
        }
    }

    fn authenticate(&self, req: &Request, auth: &BearerAuth) -> Result<RequestContext, AuthError> {
        Ok(create_request_context(req, &auth.0, &self.session.token_provider())?)
    }
}

#[derive(Tags)]
enum UserTags {
    /// Registration, login and token refresh
    Authentication,
    /// Profile of the signed-in user
    Profile,
}

#[OpenApi(prefix_path = "/users")]
impl UsersApi {
    /// Register a new account; a verification link is sent to the email
    #[oai(path = "/register", method = "post", tag = "UserTags::Authentication")]
    async fn register(&self, body: Json<RegisterRequest>) -> Result<Json<UserProfileResponse>, AuthError> {
        let body = body.0;
        let profile = self
            .session
            .register(body.username, body.email, body.password)
            .await?;
        Ok(Json(profile.into()))
    }

    #[oai(path = "/verify-email", method = "post", tag = "UserTags::Authentication")]
    async fn verify_email(&self, token: Query<String>) -> Result<Json<MessageResponse>, AuthError> {
        self.session.verify_email(&token.0).await?;
        Ok(Json(MessageResponse::new("Email verified")))
    }

    /// Login with email and password to receive authentication tokens
    #[oai(path = "/login", method = "post", tag = "UserTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, AuthError> {
        let tokens = self
            .session
            .login(&body.email, &body.password)
            .await
            .map_err(AuthError::from_login_error)?;

        Ok(Json(TokenResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.session.token_provider().access_ttl_seconds(),
        }))
    }

    /// Exchange the latest refresh token for a new access token
    #[oai(path = "/token-refresh", method = "post", tag = "UserTags::Authentication")]
    async fn token_refresh(&self, body: Json<RefreshRequest>) -> Result<Json<AccessTokenResponse>, AuthError> {
        let access_token = self.session.refresh(&body.refresh_token).await?;

        Ok(Json(AccessTokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.session.token_provider().access_ttl_seconds(),
        }))
    }

    #[oai(path = "/profile", method = "get", tag = "UserTags::Profile")]
    async fn profile(&self, req: &Request, auth: BearerAuth) -> Result<Json<UserProfileResponse>, AuthError> {
        let ctx = self.authenticate(req, &auth)?;
        let profile = self.session.profile(ctx.actor_id()).await?;
        Ok(Json(profile.into()))
    }

    /// Change username, bio, image or contact; email and password are not editable here
    #[oai(path = "/profile", method = "put", tag = "UserTags::Profile")]
    async fn update_profile(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<UpdateProfileRequest>,
    ) -> Result<Json<UserProfileResponse>, AuthError> {
        let ctx = self.authenticate(req, &auth)?;
        let profile = self.session.update_profile(ctx.actor_id(), body.0.into()).await?;
        Ok(Json(profile.into()))
    }

    /// Revoke the current refresh token
    #[oai(path = "/logout", method = "post", tag = "UserTags::Authentication")]
    async fn logout(&self, req: &Request, auth: BearerAuth) -> Result<Json<MessageResponse>, AuthError> {
        let ctx = self.authenticate(req, &auth)?;
        self.session.logout(ctx.actor_id()).await?;
        Ok(Json(MessageResponse::new("Logged out")))
    }

    /// Request a password reset link
    #[oai(path = "/password-reset", method = "post", tag = "UserTags::Authentication")]
    async fn password_reset(&self, body: Json<ForgotPasswordRequest>) -> Result<Json<MessageResponse>, AuthError> {
        self.session.forgot_password(&body.email).await?;
        Ok(Json(MessageResponse::new("Password reset link sent")))
    }

    #[oai(path = "/password-update", method = "post", tag = "UserTags::Authentication")]
    async fn password_update(&self, body: Json<ResetPasswordRequest>) -> Result<Json<MessageResponse>, AuthError> {
        self.session.reset_password(&body.token, &body.new_password).await?;
        Ok(Json(MessageResponse::new("Password updated")))
    }
}
