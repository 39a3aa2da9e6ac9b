use async_trait::async_trait;
use tracing::info;

use crate::{entities::email::OutgoingEmail, errors::AppError, repositories::email::EmailDispatcher};

/// Development dispatcher that writes emails to the log instead of sending them.
#[derive(Clone, Default)]
pub struct ConsoleEmailDispatcher;

#[async_trait]
impl EmailDispatcher for ConsoleEmailDispatcher {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        info!(
            to = %email.to,
            reply_to = email.reply_to.as_deref().unwrap_or("-"),
            subject = %email.subject,
            "--- EMAIL (console) ---\n{}\n--- END EMAIL ---",
            email.text_body
        );
        Ok(())
    }
}
