//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

use crate::domain::value_object::ClaimType;

/// Default activation endpoint, used when none is configured
pub const DEFAULT_ACTIVATION_URL: &str = "http://localhost:8080/api/v1/user/activate";

/// Default password reset page, used when none is configured
pub const DEFAULT_PASSWORD_RESET_URL: &str = "http://localhost:8080/api/v1/user/password/reset";

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret shared by issuer and validator
    pub jwt_secret: Vec<u8>,
    /// Lifetime of `Normal` tokens (365 days)
    pub normal_token_ttl: Duration,
    /// Lifetime of `Activation` / `PasswordReset` tokens (24 hours)
    pub short_token_ttl: Duration,
    /// Base URL of the activation link mailed on registration
    pub activation_url: String,
    /// Base URL of the password reset link
    pub password_reset_url: String,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl AuthConfig {
    /// Create config signing with the given secret
    ///
    /// An empty secret is kept as-is but refused by [`Self::signing_key`],
    /// so nothing is ever signed or verified with it.
    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: secret.into(),
            normal_token_ttl: Duration::from_secs(365 * 24 * 3600), // 365 days
            short_token_ttl: Duration::from_secs(24 * 3600),        // 24 hours
            activation_url: DEFAULT_ACTIVATION_URL.to_string(),
            password_reset_url: DEFAULT_PASSWORD_RESET_URL.to_string(),
            password_pepper: None,
        }
    }

    /// Create config with a random signing secret
    ///
    /// Tokens do not survive a restart.
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self::with_secret(secret.to_vec())
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Token lifetime for a claim type
    pub fn token_ttl(&self, claim_type: ClaimType) -> Duration {
        if claim_type.is_short_lived() {
            self.short_token_ttl
        } else {
            self.normal_token_ttl
        }
    }

    /// HMAC key for signing and verification
    ///
    /// ## Errors
    /// `InternalService` when the secret is empty
    pub fn signing_key(&self) -> AppResult<&[u8]> {
        if self.jwt_secret.is_empty() {
            tracing::error!("JWT secret is empty, refusing to sign or verify tokens");
            return Err(AppError::service(ErrorKind::InternalService));
        }
        Ok(&self.jwt_secret)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("normal_token_ttl", &self.normal_token_ttl)
            .field("short_token_ttl", &self.short_token_ttl)
            .field("activation_url", &self.activation_url)
            .field("password_reset_url", &self.password_reset_url)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
