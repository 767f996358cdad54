//! Value Object Module

pub mod claim_type;
pub mod email;
pub mod user_password;
pub mod user_role;

pub use claim_type::ClaimType;
pub use email::Email;
pub use kernel::id::UserId;
pub use user_password::{RawPassword, UserPassword};
pub use user_role::UserRole;
