//! Issue Token Use Case
//!
//! Signs an HS256 token for a user and a claim type.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use kernel::error::{
    app_error::{AppError, AppResult, OptionExt, ResultExt},
    kind::{ErrorKind, Layer},
};

use crate::application::config::AuthConfig;
use crate::domain::entity::{claims::Claims, user::User};
use crate::domain::value_object::ClaimType;

/// Signing algorithm for every issued token
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Token issuer
pub struct TokenIssuer {
    config: Arc<AuthConfig>,
}

impl TokenIssuer {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    /// Issue a token valid from now
    pub fn issue(&self, user: &User, claim_type: ClaimType) -> AppResult<String> {
        self.issue_at(user, claim_type, Utc::now())
    }

    /// Issue a token as if signed at `now`
    ///
    /// Expiry is `now` plus the configured TTL for `claim_type`.
    ///
    /// ## Errors
    /// `InternalService` if the TTL is out of range or signing fails
    pub fn issue_at(
        &self,
        user: &User,
        claim_type: ClaimType,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        let ttl = chrono::Duration::from_std(self.config.token_ttl(claim_type))
            .map_app_err(Layer::Service, ErrorKind::InternalService)?;

        let claims = Claims {
            user_id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
            claim_type,
            exp: now
                .checked_add_signed(ttl)
                .ok_or_app_err(Layer::Service, ErrorKind::InternalService)?
                .timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::new(TOKEN_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(self.config.signing_key()?),
        )
        .map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "Failed to sign token");
            AppError::service(ErrorKind::InternalService).with_inner(e)
        })?;

        tracing::debug!(
            user_id = %user.id,
            claim_type = %claim_type,
            exp = claims.exp,
            "Token issued"
        );

        Ok(token)
    }
}
