//! User Password Value Object
//!
//! Domain wrapper over `platform::password`. Policy violations surface as
//! `InvalidPassword`; hashing failures are server faults.
//!
//! ## Usage
//! ```rust
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//!
//! let raw = RawPassword::new("MySecurePass123!".to_string()).unwrap();
//! let hashed = UserPassword::from_raw(&raw, None).unwrap();
//! assert!(hashed.verify(&raw, None));
//! ```

use kernel::error::{
    app_error::{AppError, AppResult},
    kind::{ErrorKind, Layer},
};
use platform::password::{ClearTextPassword, HashedPassword};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input, zeroized on drop
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a new raw password, enforcing the password policy
    ///
    /// ## Errors
    /// `InvalidPassword` at the service layer, with the policy violation chained
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| {
            tracing::debug!(violation = %e, "Password rejected by policy");
            AppError::service(ErrorKind::InvalidPassword).with_inner(e)
        })?;

        Ok(Self(clear_text))
    }

    /// Wrap a password typed at login; the policy is not re-applied
    pub fn for_comparison(raw: String) -> Self {
        Self(ClearTextPassword::for_comparison(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password in Argon2id PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a validated raw password
    ///
    /// ## Arguments
    /// * `raw` - The validated raw password
    /// * `pepper` - Optional application-wide secret
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AppResult<Self> {
        let hashed = raw.inner().hash(pepper).map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AppError::service(ErrorKind::InternalService).with_inner(e)
        })?;

        Ok(Self(hashed))
    }

    /// Restore from the PHC string stored in the database
    pub fn from_phc_string(phc_string: impl Into<String>) -> AppResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string).map_err(|e| {
            tracing::error!(error = %e, "Invalid password hash in database");
            AppError::new(Layer::Repo, ErrorKind::InternalService).with_inner(e)
        })?;

        Ok(Self(hashed))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Constant-time verification; `pepper` must match the one used for hashing
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}
