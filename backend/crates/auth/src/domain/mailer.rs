//! Mail Delivery Port
//!
//! Outgoing account mail. Links carry short-lived tokens, so implementations
//! must not log them.

use kernel::error::app_error::AppResult;

use crate::domain::value_object::Email;

#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    /// Welcome mail carrying the account activation link
    async fn send_welcome_mail(&self, to: &Email, activation_link: &str) -> AppResult<()>;

    /// Mail carrying the password reset link
    async fn send_password_reset_link(&self, to: &Email, reset_link: &str) -> AppResult<()>;
}
