//! Claim Type Value Object
//!
//! Declares what a token may be used for. Serialized as a small integer
//! inside the token payload.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Purpose of an issued token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum ClaimType {
    /// Ordinary authenticated session
    Normal = 0,
    /// Account activation link
    Activation = 1,
    /// Password reset link
    PasswordReset = 2,
}

/// Integer in a token payload that names no known claim type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown claim type: {0}")]
pub struct UnknownClaimType(pub u8);

impl ClaimType {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            ClaimType::Normal => "normal",
            ClaimType::Activation => "activation",
            ClaimType::PasswordReset => "password_reset",
        }
    }

    /// Short-lived tokens are delivered by mail rather than kept by a client.
    #[inline]
    pub const fn is_short_lived(&self) -> bool {
        matches!(self, ClaimType::Activation | ClaimType::PasswordReset)
    }
}

impl From<ClaimType> for u8 {
    fn from(value: ClaimType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for ClaimType {
    type Error = UnknownClaimType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ClaimType::Normal),
            1 => Ok(ClaimType::Activation),
            2 => Ok(ClaimType::PasswordReset),
            other => Err(UnknownClaimType(other)),
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
