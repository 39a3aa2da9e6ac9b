use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

/// Forced at startup so health uptime counts from process start.
pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const PRODUCTION_CORS_ORIGIN: &str = "https://platteneye.co.uk";
pub const PRODUCTION_CONSULTATION_ENDPOINT: &str = "https://api.platteneye.co.uk/consultation";
pub const LOCAL_CONSULTATION_PATH: &str = "/api/submit-consultation";

pub const RATE_LIMIT_MAX_REQUESTS: u32 = 5;
pub const RATE_LIMIT_WINDOW_SECS: u64 = 60;

pub const MAX_CONSULTATION_BODY_BYTES: usize = 64 * 1024;

pub const SUBMISSION_SUCCESS_MESSAGE: &str = "Consultation request submitted successfully";
