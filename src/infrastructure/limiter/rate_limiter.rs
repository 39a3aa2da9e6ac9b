use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;

use crate::settings::AppConfig;

/// Requests counted for one client in its current window.
#[derive(Debug, Clone, Copy)]
struct RateLimitRecord {
    count: u32,
    window_start: Instant,
}

impl RateLimitRecord {
    fn new(now: Instant) -> Self {
        Self { count: 0, window_start: now }
    }

    fn is_expired(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.window_start) >= window
    }
}

type Key = String;

/// Fixed-window request counter keyed by client identifier.
///
/// The table lives as long as the limiter (in practice, the server process) and is
/// never persisted. Every check sweeps expired records from the whole table before
/// touching the caller's record, so memory stays bounded once clients go quiet.
#[derive(Clone)]
pub struct FixedWindowRateLimiter {
    records: Arc<DashMap<Key, RateLimitRecord>>,
    max_requests: u32,
    window: Duration,
}

impl FixedWindowRateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            max_requests,
            window,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.rate_limit_max_requests, config.rate_limit_window())
    }

    /// Counts a request from `client_id` and reports whether it is over the limit.
    pub fn is_rate_limited(&self, client_id: &str) -> bool {
        self.check_at(client_id, Instant::now())
    }

    pub fn check_at(&self, client_id: &str, now: Instant) -> bool {
        let window = self.window;

        self.records.retain(|_, record| !record.is_expired(now, window));

        // The entry guard holds the shard lock, so the increment below cannot be lost
        // to a concurrent request from the same client.
        let mut record = self
            .records
            .entry(client_id.to_string())
            .or_insert_with(|| RateLimitRecord::new(now));

        if record.is_expired(now, window) {
            *record = RateLimitRecord::new(now);
        }

        record.count = record.count.saturating_add(1);
        record.count > self.max_requests
    }

    /// Number of clients currently holding a record.
    pub fn tracked_clients(&self) -> usize {
        self.records.len()
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn limiter() -> FixedWindowRateLimiter {
        FixedWindowRateLimiter::new(5, Duration::from_secs(60))
    }

    #[test]
    fn first_five_requests_pass_and_sixth_is_limited() {
        let limiter = limiter();
        let now = Instant::now();

        for i in 0..5 {
            assert!(!limiter.check_at("1.2.3.4", now + Duration::from_millis(i)), "request {} limited", i + 1);
        }
        assert!(limiter.check_at("1.2.3.4", now + Duration::from_secs(1)));
        assert!(limiter.check_at("1.2.3.4", now + Duration::from_secs(2)));
    }

    #[test]
    fn counter_resets_after_window_elapses() {
        let limiter = limiter();
        let start = Instant::now();

        for _ in 0..6 {
            limiter.check_at("1.2.3.4", start);
        }
        assert!(limiter.check_at("1.2.3.4", start + Duration::from_secs(59)));

        let later = start + Duration::from_secs(60);
        assert!(!limiter.check_at("1.2.3.4", later));
        for _ in 0..4 {
            assert!(!limiter.check_at("1.2.3.4", later));
        }
        assert!(limiter.check_at("1.2.3.4", later));
    }

    #[test]
    fn window_is_anchored_to_first_request() {
        let limiter = limiter();
        let start = Instant::now();

        limiter.check_at("a", start);
        for _ in 0..4 {
            limiter.check_at("a", start + Duration::from_secs(50));
        }
        // Seventy seconds after the first request the old window is gone even though
        // the last request was only twenty seconds ago.
        assert!(!limiter.check_at("a", start + Duration::from_secs(70)));
    }

    #[test]
    fn clients_are_counted_independently() {
        let limiter = limiter();
        let now = Instant::now();

        for _ in 0..5 {
            limiter.check_at("a", now);
        }
        assert!(limiter.check_at("a", now));
        assert!(!limiter.check_at("b", now));
    }

    #[test]
    fn stale_records_are_swept_on_any_request() {
        let limiter = limiter();
        let start = Instant::now();

        for i in 0..100 {
            limiter.check_at(&format!("10.0.0.{}", i), start);
        }
        assert_eq!(limiter.tracked_clients(), 100);

        limiter.check_at("fresh", start + Duration::from_secs(61));
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn concurrent_requests_from_one_client_are_not_undercounted() {
        let limiter = limiter();
        let now = Instant::now();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                thread::spawn(move || {
                    (0..25).filter(|_| !limiter.check_at("shared", now)).count()
                })
            })
            .collect();

        let allowed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(allowed, 5);
    }

    #[test]
    fn from_config_uses_configured_threshold() {
        let config = AppConfig {
            rate_limit_max_requests: 2,
            rate_limit_window_secs: 10,
            ..Default::default()
        };
        let limiter = FixedWindowRateLimiter::from_config(&config);
        assert_eq!(limiter.max_requests(), 2);
        assert_eq!(limiter.window(), Duration::from_secs(10));
    }
}
