//! Token Claims
//!
//! Payload signed into every issued token. Never mutated after issuance;
//! a token dies when `exp` passes or its subject stops being active.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{ClaimType, UserId, UserRole};

/// Signed token payload
///
/// ## Wire format
/// ```json
/// {"user_id":42,"first_name":"Ada","last_name":"Lovelace","role":"user","claim_type":0,"exp":1767225600,"iat":1735689600}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    /// Restricts which endpoints accept the token
    pub claim_type: ClaimType,
    /// Expiry, seconds since epoch
    pub exp: i64,
    /// Issued-at, seconds since epoch
    pub iat: i64,
}

impl Claims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
