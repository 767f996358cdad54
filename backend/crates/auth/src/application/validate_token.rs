//! Validate Token Use Case
//!
//! Verifies signature and expiry, then re-resolves the subject so that a
//! deactivated or deleted account stops authenticating immediately.
//! Claim type restrictions are left to the endpoints.

use std::sync::Arc;

use jsonwebtoken::{DecodingKey, Validation, decode};
use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
use tokio::time::Instant;

use crate::application::config::AuthConfig;
use crate::application::find_user::find_user_by_id;
use crate::application::issue_token::TOKEN_ALGORITHM;
use crate::domain::entity::{claims::Claims, principal::AuthenticatedUser, user::User};
use crate::domain::repository::UserRepository;

/// Token validator
pub struct TokenValidator<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> TokenValidator<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Validate a token and return its claims
    ///
    /// ## Errors
    /// * `InvalidToken` - bad signature, wrong algorithm, malformed or expired
    /// * `UserNotFound` / `InternalService` - subject lookup failed
    /// * `UserNotActive` - subject is no longer active
    pub async fn parse_token_with_claims(&self, token: &str) -> AppResult<Claims> {
        let (claims, _) = self.verify(token, None).await?;
        Ok(claims)
    }

    /// Validate a token and build the request principal
    ///
    /// When `deadline` is set the account lookup fails with
    /// `InternalService` once it passes.
    pub async fn authenticate(
        &self,
        token: &str,
        deadline: Option<Instant>,
    ) -> AppResult<AuthenticatedUser> {
        let (claims, user) = self.verify(token, deadline).await?;
        Ok(AuthenticatedUser::from_validated(&claims, &user))
    }

    /// Signature and temporal checks only; no account lookup
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let invalid = AppError::service(ErrorKind::InvalidToken);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.signing_key()?),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    tracing::warn!("Token signature mismatch")
                }
                _ => tracing::debug!(error = %e, "Token rejected"),
            }
            invalid.clone_with_inner(e)
        })
    }

    async fn verify(&self, token: &str, deadline: Option<Instant>) -> AppResult<(Claims, User)> {
        let claims = self.decode(token)?;

        let lookup = find_user_by_id(self.repo.as_ref(), claims.user_id);
        let user = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, lookup)
                .await
                .map_err(|elapsed| {
                    tracing::warn!(user_id = %claims.user_id, "Account lookup hit the request deadline");
                    AppError::service(ErrorKind::InternalService).with_inner(elapsed)
                })??,
            None => lookup.await?,
        };

        if !user.active {
            tracing::debug!(user_id = %user.id, "Token subject is not active");
            return Err(AppError::service(ErrorKind::UserNotActive));
        }

        Ok((claims, user))
    }
}
