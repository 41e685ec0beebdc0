//! Fixed-window request rate limiting for schedule endpoints.
//!
//! The limiter is constructed once at server start and injected into the
//! HTTP state, so tests can swap in their own instance and no global mutable
//! map is involved. Counters are keyed by practitioner id; a window resets
//! when its duration elapses.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::domain::Error;

/// Configuration for the fixed-window limiter.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Requests permitted per key within one window.
    pub max_requests: u32,
    /// Window length.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Fixed-window rate limiter keyed by caller identity.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    /// Create a limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Record one request for `key`, rejecting it once the window is full.
    pub fn check(&self, key: &str) -> Result<(), Error> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), Error> {
        let mut windows = self
            .windows
            .lock()
            .map_err(|_| Error::internal("rate limiter state poisoned"))?;

        let window = windows.entry(key.to_owned()).or_insert(Window {
            started_at: now,
            count: 0,
        });
        if now.duration_since(window.started_at) >= self.config.window {
            window.started_at = now;
            window.count = 0;
        }
        if window.count >= self.config.max_requests {
            return Err(Error::rate_limited("request rate limit exceeded"));
        }
        window.count += 1;
        Ok(())
    }

    /// Drop windows that have fully elapsed.
    ///
    /// Called periodically by the server so idle keys do not accumulate.
    pub fn purge_expired(&self) {
        self.purge_expired_at(Instant::now());
    }

    fn purge_expired_at(&self, now: Instant) {
        if let Ok(mut windows) = self.windows.lock() {
            windows.retain(|_, window| now.duration_since(window.started_at) < self.config.window);
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::ErrorCode;

    use super::*;

    fn limiter(max_requests: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_requests,
            window: Duration::from_secs(window_secs),
        })
    }

    #[test]
    fn permits_requests_under_the_limit() {
        let limiter = limiter(3, 60);
        for _ in 0..3 {
            limiter.check("alice").expect("under limit");
        }
    }

    #[test]
    fn rejects_requests_over_the_limit() {
        let limiter = limiter(2, 60);
        limiter.check("alice").expect("first request");
        limiter.check("alice").expect("second request");

        let error = limiter.check("alice").expect_err("over limit");
        assert_eq!(error.code(), ErrorCode::RateLimited);
    }

    #[test]
    fn keys_are_tracked_independently() {
        let limiter = limiter(1, 60);
        limiter.check("alice").expect("alice first");
        limiter.check("bob").expect("bob unaffected");
    }

    #[test]
    fn window_resets_after_duration() {
        let limiter = limiter(1, 60);
        let start = Instant::now();
        limiter.check_at("alice", start).expect("first request");
        limiter
            .check_at("alice", start)
            .expect_err("window is full");

        limiter
            .check_at("alice", start + Duration::from_secs(61))
            .expect("fresh window");
    }

    #[test]
    fn purge_drops_only_elapsed_windows() {
        let limiter = limiter(1, 3_600);
        limiter.check("alice").expect("tracked");
        limiter.purge_expired();

        // The hour-long window has not elapsed, so the key is still tracked.
        limiter.check("alice").expect_err("still rate limited");
    }

    #[test]
    fn requests_are_admitted_after_purge_drops_an_elapsed_window() {
        let limiter = limiter(1, 60);
        let start = Instant::now();
        limiter.check_at("alice", start).expect("first request");
        limiter
            .check_at("alice", start)
            .expect_err("window is full");

        limiter.purge_expired_at(start + Duration::from_secs(61));
        limiter
            .check_at("alice", start + Duration::from_secs(61))
            .expect("admitted after purge");
    }
}
