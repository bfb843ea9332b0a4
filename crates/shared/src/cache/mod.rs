mod cache_store;
mod rate_limiter;

pub use self::cache_store::CacheStore;
pub use self::rate_limiter::{RateDecision, RateLimiter};
