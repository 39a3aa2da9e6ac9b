use std::sync::Arc;

use crate::{errors::AppError, repositories::email::EmailDispatcher, settings::AppConfig};

pub mod console;
pub mod smtp;

use console::ConsoleEmailDispatcher;
use smtp::SmtpEmailDispatcher;

/// Picks the SMTP dispatcher when a relay is configured, the console one otherwise.
pub fn build_email_dispatcher(config: &AppConfig) -> Result<Arc<dyn EmailDispatcher>, AppError> {
    match config.smtp_host.as_deref().map(str::trim) {
        Some(host) if !host.is_empty() => {
            tracing::info!(smtp_host = host, smtp_port = config.smtp_port, "Using SMTP email dispatcher");
            Ok(Arc::new(SmtpEmailDispatcher::new(config)?))
        }
        _ => {
            tracing::warn!("SMTP is not configured, consultation emails will only be logged");
            Ok(Arc::new(ConsoleEmailDispatcher))
        }
    }
}
