//! Login Use Case
//!
//! Checks credentials and issues a `Normal` token.

use std::sync::Arc;

use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

use crate::application::config::AuthConfig;
use crate::application::find_user::find_user_by_email;
use crate::application::issue_token::TokenIssuer;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{ClaimType, Email, RawPassword};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
pub struct LoginOutput {
    pub token: String,
    pub user: User,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> LoginUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: LoginInput) -> AppResult<LoginOutput> {
        let email = Email::new(&input.email)?;
        let user = find_user_by_email(self.repo.as_ref(), &email).await?;

        let raw_password = RawPassword::for_comparison(input.password);
        if !user.password.verify(&raw_password, self.config.pepper()) {
            tracing::warn!(user_id = %user.id, "Invalid login attempt");
            return Err(AppError::service(ErrorKind::WrongCredentials));
        }

        if !user.active {
            tracing::warn!(user_id = %user.id, "Login attempt on inactive account");
            return Err(AppError::service(ErrorKind::UserNotActive));
        }

        let token = TokenIssuer::new(self.config.clone()).issue(&user, ClaimType::Normal)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutput { token, user })
    }
}
