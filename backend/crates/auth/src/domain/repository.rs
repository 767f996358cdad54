//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer and report failures at `Layer::Repo`:
//! - `UserNotFound` when no live account matches
//! - `UserAlreadyExists` when email or mobile collide
//! - `InternalService` for anything else

use kernel::error::app_error::AppResult;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::value_object::{Email, UserId};

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Persist a new account and return it with its assigned id
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Find a live account by id
    async fn find_by_id(&self, id: UserId) -> AppResult<User>;

    /// Find a live account by (normalized) email
    async fn find_by_email(&self, email: &Email) -> AppResult<User>;

    /// Overwrite the mutable fields of an existing account
    async fn update(&self, user: &User) -> AppResult<User>;
}
