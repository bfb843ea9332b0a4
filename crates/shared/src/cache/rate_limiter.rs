use crate::cache::CacheStore;
use chrono::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited,
    /// Counter store unavailable; requests pass.
    Unchecked,
}

/// Fixed-window request counter keyed by client.
#[derive(Clone)]
pub struct RateLimiter {
    store: CacheStore,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(store: CacheStore, max_requests: u32, window: Duration) -> Self {
        Self {
            store,
            max_requests,
            window,
        }
    }

    pub async fn check(&self, client: &str) -> RateDecision {
        let key = format!("rate_limit:{client}");

        match self.store.increment(&key, self.window).await {
            Some(count) if count > self.max_requests as i64 => {
                debug!("Rate limit exceeded for key: {key}");
                RateDecision::Limited
            }
            Some(count) => RateDecision::Allowed {
                remaining: self.max_requests.saturating_sub(count as u32),
            },
            None => RateDecision::Unchecked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fails_open_without_redis() {
        let limiter = RateLimiter::new(CacheStore::disabled(), 1, Duration::seconds(60));

        assert_eq!(limiter.check("10.0.0.1").await, RateDecision::Unchecked);
        assert_eq!(limiter.check("10.0.0.1").await, RateDecision::Unchecked);
    }
}
