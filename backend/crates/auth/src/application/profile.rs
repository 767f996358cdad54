//! Profile Use Case
//!
//! Reads and partially updates the caller's own account.

use std::sync::Arc;

use kernel::error::app_error::AppResult;

use crate::application::find_user::{find_user_by_id, save_user};
use crate::domain::entity::user::{ProfileUpdate, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, UserId};

/// Profile update input; absent fields are left unchanged
#[derive(Default)]
pub struct UpdateProfileInput {
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub address: Option<String>,
}

/// Profile use case
pub struct ProfileUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> ProfileUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, user_id: UserId) -> AppResult<User> {
        find_user_by_id(self.repo.as_ref(), user_id).await
    }

    pub async fn update(&self, user_id: UserId, input: UpdateProfileInput) -> AppResult<User> {
        let update = ProfileUpdate {
            email: input.email.as_deref().map(Email::new).transpose()?,
            mobile: input.mobile.map(|m| m.trim().to_string()),
            first_name: input.first_name.map(|n| n.trim().to_string()),
            last_name: input.last_name.map(|n| n.trim().to_string()),
            image_url: input.image_url,
            address: input.address,
        };

        let mut user = find_user_by_id(self.repo.as_ref(), user_id).await?;
        user.apply_profile(update);
        let user = save_user(self.repo.as_ref(), &user).await?;

        tracing::info!(user_id = %user.id, "Profile updated");

        Ok(user)
    }
}
