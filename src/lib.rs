use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod api_errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{client, email, limiter, utils};

use errors::AppError;
use limiter::rate_limiter::FixedWindowRateLimiter;
use repositories::email::EmailDispatcher;
use use_cases::consultation::ConsultationHandler;

/// Shared across all workers for the lifetime of the server.
pub struct AppState {
    pub consultation_handler: AppConsultationHandler,
    pub rate_limiter: FixedWindowRateLimiter,
    pub trust_x_forwarded_for: bool,
}

pub type AppConsultationHandler = ConsultationHandler<Arc<dyn EmailDispatcher>>;

impl AppState {
    pub fn new(config: &settings::AppConfig) -> Result<Self, AppError> {
        let email_dispatcher = email::build_email_dispatcher(config)?;
        Ok(Self::with_dispatcher(config, email_dispatcher))
    }

    pub fn with_dispatcher(config: &settings::AppConfig, email_dispatcher: Arc<dyn EmailDispatcher>) -> Self {
        AppState {
            consultation_handler: ConsultationHandler::new(email_dispatcher, config.notification_email.clone()),
            rate_limiter: FixedWindowRateLimiter::from_config(config),
            trust_x_forwarded_for: config.trust_x_forwarded_for,
        }
    }
}
