use std::sync::Arc;

use async_trait::async_trait;

use crate::{entities::email::OutgoingEmail, errors::AppError};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailDispatcher: Send + Sync {
    /// Sends one email. Either the whole message is accepted for delivery or an error is returned.
    async fn send_email(&self, email: &OutgoingEmail) -> Result<(), AppError>;
}

#[async_trait]
impl<T> EmailDispatcher for Arc<T>
where
    T: EmailDispatcher + ?Sized,
{
    async fn send_email(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        (**self).send_email(email).await
    }
}
