//! Authenticated Principal
//!
//! What the request gate attaches to a request after a token has been
//! validated. Display names and role come from the live account, not from
//! the (possibly stale) token payload.

use chrono::{DateTime, Utc};
use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

use crate::domain::entity::{claims::Claims, user::User};
use crate::domain::value_object::{ClaimType, UserId, UserRole};

/// Identity of the caller for the rest of the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    pub claim_type: ClaimType,
    pub expires_at: DateTime<Utc>,
}

impl AuthenticatedUser {
    /// Combine validated claims with the freshly loaded account
    pub fn from_validated(claims: &Claims, user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            claim_type: claims.claim_type,
            expires_at: claims.expires_at(),
        }
    }

    /// Per-endpoint claim type check
    ///
    /// ## Errors
    /// `InvalidTokenType` at the transport layer when the token was issued
    /// for another purpose
    pub fn require(&self, expected: ClaimType) -> AppResult<()> {
        if self.claim_type == expected {
            return Ok(());
        }

        tracing::debug!(
            user_id = %self.user_id,
            expected = %expected,
            actual = %self.claim_type,
            "Token used for the wrong purpose"
        );
        Err(AppError::transport(ErrorKind::InvalidTokenType))
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
