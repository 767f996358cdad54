//! Activate Use Case
//!
//! Marks the account named by an activation token as active.

use std::sync::Arc;

use kernel::error::app_error::AppResult;

use crate::application::find_user::{find_user_by_id, save_user};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::UserId;

/// Activate use case
pub struct ActivateUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> ActivateUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Idempotent: activating an active account succeeds without a write
    ///
    /// Over HTTP this is a confirmation: registration creates active
    /// accounts and the gate turns inactive ones away before any handler
    /// runs. The write path serves direct callers (admin tooling, imports).
    pub async fn execute(&self, user_id: UserId) -> AppResult<User> {
        let mut user = find_user_by_id(self.repo.as_ref(), user_id).await?;
        if user.active {
            return Ok(user);
        }

        user.activate();
        let user = save_user(self.repo.as_ref(), &user).await?;

        tracing::info!(user_id = %user.id, "Account activated");

        Ok(user)
    }
}
