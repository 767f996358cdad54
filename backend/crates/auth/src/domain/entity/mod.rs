//! Entity Module

pub mod claims;
pub mod principal;
pub mod user;

pub use claims::Claims;
pub use principal::AuthenticatedUser;
pub use user::{NewUser, ProfileUpdate, User};
