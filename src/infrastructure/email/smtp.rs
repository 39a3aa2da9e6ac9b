use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::{
    entities::email::OutgoingEmail,
    errors::AppError,
    repositories::email::EmailDispatcher,
    settings::AppConfig,
};

/// Sends consultation emails through an SMTP relay using STARTTLS.
#[derive(Clone)]
pub struct SmtpEmailDispatcher {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailDispatcher {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let host = config
            .smtp_host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| AppError::InternalError("SMTP host is not configured".into()))?;

        let from: Mailbox = config.email_from.parse()?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
            .port(config.smtp_port);

        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        Ok(SmtpEmailDispatcher {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, AppError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse()?)
            .subject(email.subject.as_str());

        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(reply_to.parse()?);
        }

        let message = builder.multipart(MultiPart::alternative_plain_html(
            email.text_body.clone(),
            email.html_body.clone(),
        ))?;

        Ok(message)
    }
}

#[async_trait]
impl EmailDispatcher for SmtpEmailDispatcher {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        let message = self.build_message(email)?;

        let response = self.transport.send(message).await?;
        tracing::debug!(
            to = %email.to,
            code = %response.code(),
            "SMTP relay accepted email"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            smtp_host: Some("smtp.example.com".into()),
            smtp_username: "mailer".into(),
            smtp_password: "secret".into(),
            ..Default::default()
        }
    }

    fn email(to: &str) -> OutgoingEmail {
        OutgoingEmail {
            to: to.into(),
            reply_to: Some("ada@example.com".into()),
            subject: "Hello".into(),
            text_body: "plain".into(),
            html_body: "<p>html</p>".into(),
        }
    }

    #[tokio::test]
    async fn missing_host_is_rejected() {
        let config = AppConfig { smtp_host: None, ..config() };
        assert!(matches!(SmtpEmailDispatcher::new(&config), Err(AppError::InternalError(_))));
    }

    #[tokio::test]
    async fn builds_with_or_without_credentials() {
        assert!(SmtpEmailDispatcher::new(&config()).is_ok());

        let anonymous = AppConfig { smtp_username: String::new(), smtp_password: String::new(), ..config() };
        assert!(SmtpEmailDispatcher::new(&anonymous).is_ok());
    }

    #[tokio::test]
    async fn builds_multipart_message_with_reply_to() {
        let dispatcher = SmtpEmailDispatcher::new(&config()).unwrap();
        let message = dispatcher.build_message(&email("info@example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("To: info@example.com"));
        assert!(raw.contains("Reply-To: ada@example.com"));
        assert!(raw.contains("multipart/alternative"));
    }

    #[tokio::test]
    async fn invalid_recipient_is_an_email_delivery_error() {
        let dispatcher = SmtpEmailDispatcher::new(&config()).unwrap();
        let result = dispatcher.build_message(&email("not an address"));
        assert!(matches!(result, Err(AppError::EmailDelivery(_))));
    }
}
