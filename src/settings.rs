use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};

use crate::constants::{PRODUCTION_CORS_ORIGIN, RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW_SECS};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    /// Resolved from `APP_ENV` case-insensitively, never from the layered sources.
    #[serde(skip_deserializing, default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub log_json: bool,

    /// Origin allowed to call the API when running in production.
    #[serde(default = "default_cors_origin")]
    pub cors_allowed_origin: String,

    #[serde(default = "default_true")]
    pub trust_x_forwarded_for: bool,

    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: u32,

    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    #[serde(default)]
    pub smtp_host: Option<String>,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_username: String,

    #[serde(default)]
    pub smtp_password: String,

    #[serde(default = "default_email_from")]
    pub email_from: String,

    #[serde(default = "default_notification_email")]
    pub notification_email: String,

    /// Base URL the client helper resolves its relative endpoint against outside production.
    #[serde(default = "default_local_api_base_url")]
    pub local_api_base_url: String,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Consultation-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origin() -> String {
    PRODUCTION_CORS_ORIGIN.to_string()
}
fn default_true() -> bool {
    true
}
fn default_rate_limit_max_requests() -> u32 {
    RATE_LIMIT_MAX_REQUESTS
}
fn default_rate_limit_window_secs() -> u64 {
    RATE_LIMIT_WINDOW_SECS
}
fn default_smtp_port() -> u16 {
    587
}
fn default_email_from() -> String {
    "Platteneye <no-reply@platteneye.co.uk>".to_string()
}
fn default_notification_email() -> String {
    "info@platteneye.co.uk".to_string()
}
fn default_local_api_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            port: default_port(),
            host: default_host(),
            worker_count: default_worker_count(),
            log_json: false,
            cors_allowed_origin: default_cors_origin(),
            trust_x_forwarded_for: true,
            rate_limit_max_requests: default_rate_limit_max_requests(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
            smtp_host: None,
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            email_from: default_email_from(),
            notification_email: default_notification_email(),
            local_api_base_url: default_local_api_base_url(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.rate_limit_max_requests == 0 {
            errors.push("RATE_LIMIT_MAX_REQUESTS must be greater than zero");
        }
        if self.rate_limit_window_secs == 0 {
            errors.push("RATE_LIMIT_WINDOW_SECS must be greater than zero");
        }
        if self.notification_email.trim().is_empty() {
            errors.push("NOTIFICATION_EMAIL cannot be empty");
        }
        if self.is_production() {
            if self.cors_allowed_origin.trim().is_empty() || self.cors_allowed_origin.trim() == "*" {
                errors.push("Wildcard CORS (*) is not allowed in production");
            }
            if self.smtp_host.as_deref().is_none_or(|h| h.trim().is_empty()) {
                errors.push("SMTP_HOST must be set in production");
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    /// The value sent in `Access-Control-Allow-Origin`.
    pub fn cors_origin(&self) -> &str {
        if self.is_production() {
            self.cors_allowed_origin.trim()
        } else {
            "*"
        }
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("log_json", &self.log_json)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .field("trust_x_forwarded_for", &self.trust_x_forwarded_for)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &self.smtp_password.redact())
            .field("email_from", &self.email_from)
            .field("notification_email", &self.notification_email)
            .field("local_api_base_url", &self.local_api_base_url)
            .finish()
    }
}
