//! Rate limiting for login attempts.
//!
//! Fixed window per normalized email. The window map is the only shared
//! mutable state in the auth subsystem; critical sections are bounded
//! to a map lookup and the map is pruned on every check.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited,
}

pub trait RateLimiter: Send + Sync {
    /// Whether a login attempt for this email may proceed.
    fn check(&self, email: &str) -> RateLimitDecision;

    /// Record a failed attempt.
    fn record_failure(&self, email: &str);

    /// A successful login resets the window.
    fn record_success(&self, email: &str);
}

/// Limiter that always allows. Used in tests and as an explicit opt-out.
#[derive(Clone, Debug)]
pub struct NoopRateLimiter;

impl RateLimiter for NoopRateLimiter {
    fn check(&self, _email: &str) -> RateLimitDecision {
        RateLimitDecision::Allowed
    }

    fn record_failure(&self, _email: &str) {}

    fn record_success(&self, _email: &str) {}
}

const DEFAULT_MAX_FAILURES: u32 = 5;
const DEFAULT_WINDOW_SECONDS: u64 = 300;

struct Window {
    started: Instant,
    failures: u32,
}

/// At most `max_failures` failed attempts per email per window.
pub struct FixedWindowLimiter {
    max_failures: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_FAILURES,
            Duration::from_secs(DEFAULT_WINDOW_SECONDS),
        )
    }
}

impl FixedWindowLimiter {
    #[must_use]
    pub fn new(max_failures: u32, window: Duration) -> Self {
        Self {
            max_failures,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    fn with_windows<T>(&self, f: impl FnOnce(&mut HashMap<String, Window>) -> T) -> Option<T> {
        self.windows.lock().ok().map(|mut windows| f(&mut windows))
    }
}

impl RateLimiter for FixedWindowLimiter {
    fn check(&self, email: &str) -> RateLimitDecision {
        let email = email.trim().to_lowercase();
        let window = self.window;
        let max_failures = self.max_failures;

        self.with_windows(|windows| {
            windows.retain(|_, w| w.started.elapsed() < window);
            match windows.get(&email) {
                Some(w) if w.failures >= max_failures => {
                    warn!("Login rate limit hit for a tracked email");
                    RateLimitDecision::Limited
                }
                _ => RateLimitDecision::Allowed,
            }
        })
        // A poisoned lock fails open: the guard still rejects bad
        // credentials, only the throttle is lost.
        .unwrap_or(RateLimitDecision::Allowed)
    }

    fn record_failure(&self, email: &str) {
        let email = email.trim().to_lowercase();
        let window = self.window;

        self.with_windows(|windows| {
            let entry = windows.entry(email).or_insert(Window {
                started: Instant::now(),
                failures: 0,
            });
            if entry.started.elapsed() >= window {
                entry.started = Instant::now();
                entry.failures = 0;
            }
            entry.failures += 1;
        });
    }

    fn record_success(&self, email: &str) {
        let email = email.trim().to_lowercase();
        self.with_windows(|windows| {
            windows.remove(&email);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_always_allows() {
        let limiter = NoopRateLimiter;
        limiter.record_failure("alice@x.com");
        assert_eq!(limiter.check("alice@x.com"), RateLimitDecision::Allowed);
    }

    #[test]
    fn limits_after_max_failures() {
        let limiter = FixedWindowLimiter::new(3, Duration::from_secs(60));

        for _ in 0..2 {
            limiter.record_failure("alice@x.com");
        }
        assert_eq!(limiter.check("alice@x.com"), RateLimitDecision::Allowed);

        limiter.record_failure("alice@x.com");
        assert_eq!(limiter.check("alice@x.com"), RateLimitDecision::Limited);

        // Other emails are unaffected.
        assert_eq!(limiter.check("bob@x.com"), RateLimitDecision::Allowed);
    }

    #[test]
    fn success_resets_the_window() {
        let limiter = FixedWindowLimiter::new(2, Duration::from_secs(60));

        limiter.record_failure("alice@x.com");
        limiter.record_failure("alice@x.com");
        assert_eq!(limiter.check("alice@x.com"), RateLimitDecision::Limited);

        limiter.record_success("alice@x.com");
        assert_eq!(limiter.check("alice@x.com"), RateLimitDecision::Allowed);
    }

    #[test]
    fn email_matching_is_case_insensitive() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60));

        limiter.record_failure("Alice@X.com");
        assert_eq!(limiter.check("alice@x.com"), RateLimitDecision::Limited);
    }

    #[test]
    fn window_expiry_clears_the_count() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_millis(10));

        limiter.record_failure("alice@x.com");
        assert_eq!(limiter.check("alice@x.com"), RateLimitDecision::Limited);

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(limiter.check("alice@x.com"), RateLimitDecision::Allowed);
    }
}
