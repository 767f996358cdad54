//! Logging Mailer
//!
//! Stand-in for a real mail provider: records that a mail would have been
//! sent. Links are not logged since they carry tokens.

use kernel::error::app_error::AppResult;

use crate::domain::mailer::Mailer;
use crate::domain::value_object::Email;

#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

impl Mailer for LogMailer {
    async fn send_welcome_mail(&self, to: &Email, activation_link: &str) -> AppResult<()> {
        tracing::info!(
            to = %to,
            link_len = activation_link.len(),
            "Welcome mail dispatched"
        );
        Ok(())
    }

    async fn send_password_reset_link(&self, to: &Email, reset_link: &str) -> AppResult<()> {
        tracing::info!(
            to = %to,
            link_len = reset_link.len(),
            "Password reset mail dispatched"
        );
        Ok(())
    }
}
