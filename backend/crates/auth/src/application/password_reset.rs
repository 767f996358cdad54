//! Password Reset Use Case
//!
//! Two steps: mail a `PasswordReset` link, then store the new password
//! presented with that token.

use std::sync::Arc;

use kernel::error::app_error::AppResult;

use crate::application::config::AuthConfig;
use crate::application::find_user::{find_user_by_email, find_user_by_id, save_user};
use crate::application::issue_token::TokenIssuer;
use crate::application::mail_link::link_with_token;
use crate::domain::mailer::Mailer;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{ClaimType, Email, RawPassword, UserId, UserPassword};
use crate::error::service_error;

/// Password reset use case
pub struct PasswordResetUseCase<R, M>
where
    R: UserRepository,
    M: Mailer,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<R, M> PasswordResetUseCase<R, M>
where
    R: UserRepository,
    M: Mailer,
{
    pub fn new(repo: Arc<R>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }

    /// Issue a reset token for the account and mail the link
    pub async fn request(&self, email: &str) -> AppResult<()> {
        let email = Email::new(email)?;
        let user = find_user_by_email(self.repo.as_ref(), &email).await?;

        let token = TokenIssuer::new(self.config.clone()).issue(&user, ClaimType::PasswordReset)?;
        let link = link_with_token(&self.config.password_reset_url, &token)?;

        self.mailer
            .send_password_reset_link(&user.email, &link)
            .await
            .map_err(|e| service_error(e, &[]))?;

        tracing::info!(user_id = %user.id, "Password reset link sent");

        Ok(())
    }

    /// Replace the password of the token subject
    pub async fn reset(&self, user_id: UserId, new_password: String) -> AppResult<()> {
        let raw_password = RawPassword::new(new_password)?;
        let password = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        let mut user = find_user_by_id(self.repo.as_ref(), user_id).await?;
        user.set_password(password);
        save_user(self.repo.as_ref(), &user).await?;

        tracing::info!(user_id = %user.id, "Password updated");

        Ok(())
    }
}
