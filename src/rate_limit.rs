//! Request pacing for OpenAlex.
//!
//! Multi-ID commands and ID resolution issue several requests in a row;
//! the limiter spaces them out and holds every request back after the
//! server answered 429.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Requests per second allowed in the polite pool.
pub const POLITE_RATE: f64 = 10.0;

/// Requests per second without a contact email.
pub const ANONYMOUS_RATE: f64 = 5.0;

/// Rate limiter that enforces a maximum request rate.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
}

#[derive(Debug)]
struct RateLimiterInner {
    /// Minimum spacing between requests; `None` disables pacing.
    min_interval: Option<Duration>,
    /// Time of the last request.
    last_request: Option<Instant>,
    /// No request may start before this instant (set after a 429).
    blocked_until: Option<Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given maximum requests per second.
    ///
    /// A rate that is zero, negative or not finite disables pacing.
    pub fn new(max_per_second: f64) -> Self {
        let min_interval = if max_per_second.is_finite() && max_per_second > 0.0 {
            Some(Duration::try_from_secs_f64(1.0 / max_per_second).unwrap_or(Duration::MAX))
        } else {
            None
        };
        Self {
            inner: Arc::new(Mutex::new(RateLimiterInner {
                min_interval,
                last_request: None,
                blocked_until: None,
            })),
        }
    }

    /// Wait until a request is allowed, then mark it as sent.
    pub async fn acquire(&self) {
        let mut inner = self.inner.lock().await;

        if let Some(until) = inner.blocked_until.take() {
            let now = Instant::now();
            if now < until {
                drop(inner);
                tokio::time::sleep(until - now).await;
                inner = self.inner.lock().await;
            }
        }

        if let (Some(last), Some(min_interval)) = (inner.last_request, inner.min_interval) {
            let elapsed = last.elapsed();
            if elapsed < min_interval {
                let wait = min_interval - elapsed;
                drop(inner);
                tokio::time::sleep(wait).await;
                inner = self.inner.lock().await;
            }
        }

        inner.last_request = Some(Instant::now());
    }

    /// Hold all requests back for `wait`.
    ///
    /// A later deadline always wins over an earlier one.
    pub async fn back_off(&self, wait: Duration) {
        let mut inner = self.inner.lock().await;
        let until = Instant::now() + wait;
        inner.blocked_until = Some(match inner.blocked_until {
            Some(existing) if existing > until => existing,
            _ => until,
        });
    }
}
