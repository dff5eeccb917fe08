use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::DateTime;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;

use crate::config::SecretManager;
use crate::errors::internal::TokenError;
use crate::errors::InternalError;
use crate::providers::clock::Clock;
use crate::providers::crypto_provider::CryptoProvider;
use crate::types::internal::auth::{Claims, Subject, TokenKind};

/// Validity window for each token kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSettings {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub email_verification_ttl: Duration,
    pub password_reset_ttl: Duration,
}

impl TokenSettings {
    pub fn ttl_for(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
            TokenKind::EmailVerify => self.email_verification_ttl,
            TokenKind::PasswordReset => self.password_reset_ttl,
        }
    }

    /// Every TTL must be positive and access must be strictly shorter than refresh
    pub fn check(&self) -> Result<(), String> {
        let all = [
            self.access_ttl,
            self.refresh_ttl,
            self.email_verification_ttl,
            self.password_reset_ttl,
        ];
        if all.iter().any(|ttl| ttl.is_zero()) {
            return Err("token lifetimes must be positive".to_string());
        }
        if self.access_ttl >= self.refresh_ttl {
            return Err(format!(
                "access token lifetime ({}s) must be shorter than refresh token lifetime ({}s)",
                self.access_ttl.as_secs(),
                self.refresh_ttl.as_secs()
            ));
        }
        Ok(())
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            access_ttl: Duration::from_secs(15 * 60),
            refresh_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            email_verification_ttl: Duration::from_secs(60 * 60),
            password_reset_ttl: Duration::from_secs(30 * 60),
        }
    }
}

/// Issues and verifies signed, typed, expiring tokens
///
/// Stateless apart from the injected secrets and clock. Expiry is judged against
/// the injected clock, not the wall clock, so verification is deterministic in tests.
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
    settings: TokenSettings,
    clock: Arc<dyn Clock>,
    crypto: CryptoProvider,
}

impl TokenProvider {
    /// # Errors
    /// `InternalError::Validation` when the TTL configuration is inconsistent.
    pub fn new(
        secret_manager: Arc<SecretManager>,
        settings: TokenSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, InternalError> {
        settings
            .check()
            .map_err(|reason| InternalError::validation("token_settings", reason))?;

        Ok(Self {
            secret_manager,
            settings,
            clock,
            crypto: CryptoProvider::new(),
        })
    }

    pub fn settings(&self) -> &TokenSettings {
        &self.settings
    }

    pub fn access_ttl_seconds(&self) -> i64 {
        i64::try_from(self.settings.access_ttl.as_secs()).unwrap_or(i64::MAX)
    }

    /// Sign a token of the given kind for `subject`, valid for `ttl` from the clock's now
    pub fn issue(&self, kind: TokenKind, subject: &Subject, ttl: Duration) -> Result<String, InternalError> {
        let iat = self.clock.now().timestamp();
        let exp = i64::try_from(ttl.as_secs())
            .ok()
            .and_then(|secs| iat.checked_add(secs))
            .ok_or_else(|| TokenError::Signing(format!("{} token lifetime is out of range", kind)))?;

        let claims = Claims {
            sub: subject.user_id.clone(),
            email: subject.email.clone(),
            is_admin: subject.is_admin,
            kind,
            iat,
            exp,
            jti: Self::generate_jti(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| TokenError::Signing(e.to_string()).into())
    }

    pub fn issue_access(&self, subject: &Subject) -> Result<String, InternalError> {
        self.issue(TokenKind::Access, subject, self.settings.ttl_for(TokenKind::Access))
    }

    pub fn issue_refresh(&self, subject: &Subject) -> Result<String, InternalError> {
        self.issue(TokenKind::Refresh, subject, self.settings.ttl_for(TokenKind::Refresh))
    }

    pub fn issue_email_verification(&self, subject: &Subject) -> Result<String, InternalError> {
        self.issue(TokenKind::EmailVerify, subject, self.settings.ttl_for(TokenKind::EmailVerify))
    }

    pub fn issue_password_reset(&self, subject: &Subject) -> Result<String, InternalError> {
        self.issue(TokenKind::PasswordReset, subject, self.settings.ttl_for(TokenKind::PasswordReset))
    }

    /// Check signature, expiry and kind, in that order
    ///
    /// # Errors
    /// * `TokenError::Invalid` - bad signature or malformed payload
    /// * `TokenError::Expired` - the clock's now is strictly after `exp`
    /// * `TokenError::KindMismatch` - a valid token of another kind
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, InternalError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map_err(|e| TokenError::invalid(e.to_string()))?
        .claims;

        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| TokenError::invalid(format!("exp out of range: {}", claims.exp)))?;
        if self.clock.now() > expires_at {
            return Err(TokenError::Expired(claims.kind).into());
        }

        if claims.kind != expected {
            return Err(TokenError::KindMismatch {
                expected,
                actual: claims.kind,
            }
            .into());
        }

        Ok(claims)
    }

    /// Keyed fingerprint of a refresh token; the only form in which it is stored
    pub fn fingerprint(&self, token: &str) -> Result<String, InternalError> {
        self.crypto
            .hmac_sha256_token(self.secret_manager.refresh_token_secret(), token)
    }

    fn generate_jti() -> String {
        let bytes: [u8; 16] = rand::rng().random();
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("secret_manager", &"<redacted>")
            .field("settings", &self.settings)
            .finish()
    }
}

impl fmt::Display for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TokenProvider {{ access_ttl: {}s, refresh_ttl: {}s }}",
            self.settings.access_ttl.as_secs(),
            self.settings.refresh_ttl.as_secs()
        )
    }
}
