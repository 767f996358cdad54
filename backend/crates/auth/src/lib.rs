//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and mailer traits
//! - `application/` - Use cases (token issuance and validation, account flows)
//! - `infra/` - PostgreSQL and in-memory stores, logging mailer
//! - `presentation/` - HTTP handlers, DTOs, request gate, router
//!
//! ## Features
//! - Registration with a mailed activation link
//! - Email + password login returning a signed bearer token
//! - Profile read / partial update
//! - Password reset via a mailed short-lived token
//!
//! ## Token Model
//! - HS256 tokens carrying user id, names, role and a claim type
//! - Claim types: `Normal` (365 days), `Activation` and `PasswordReset` (24 hours)
//! - Every request re-checks that the subject still exists and is active
//! - Endpoints declare which claim type they accept

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::entity::principal::AuthenticatedUser;
pub use error::AuthResult;
pub use infra::{InMemoryUserRepository, LogMailer, PgUserRepository};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::infra::memory::InMemoryUserRepository as MemoryStore;
    pub use crate::infra::postgres::PgUserRepository as UserStore;
}

pub mod token {
    pub use crate::application::issue_token::{TOKEN_ALGORITHM, TokenIssuer};
    pub use crate::application::validate_token::TokenValidator;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
