//! Register Use Case
//!
//! Creates a new account and mails an activation link.

use std::sync::Arc;

use kernel::error::{app_error::AppResult, kind::ErrorKind};

use crate::application::config::AuthConfig;
use crate::application::issue_token::TokenIssuer;
use crate::application::mail_link::link_with_token;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::mailer::Mailer;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{ClaimType, Email, RawPassword, UserPassword, UserRole};
use crate::error::service_error;

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
    pub address: String,
}

/// Register use case
pub struct RegisterUseCase<R, M>
where
    R: UserRepository,
    M: Mailer,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<R, M> RegisterUseCase<R, M>
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

    pub async fn execute(&self, input: RegisterInput) -> AppResult<User> {
        let email = Email::new(&input.email)?;
        let raw_password = RawPassword::new(input.password)?;
        let password = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        let user = self
            .repo
            .create(NewUser {
                email,
                mobile: input.mobile.trim().to_string(),
                password,
                first_name: input.first_name.trim().to_string(),
                last_name: input.last_name.trim().to_string(),
                image_url: String::new(),
                address: input.address,
                role: UserRole::User,
                // Accounts start active; the activation link confirms the address.
                active: true,
            })
            .await
            .map_err(|e| service_error(e, &[ErrorKind::UserAlreadyExists]))?;

        let token = TokenIssuer::new(self.config.clone()).issue(&user, ClaimType::Activation)?;
        let link = link_with_token(&self.config.activation_url, &token)?;

        self.mailer
            .send_welcome_mail(&user.email, &link)
            .await
            .map_err(|e| service_error(e, &[]))?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }
}
