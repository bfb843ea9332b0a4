use chrono::Duration;
use deadpool_redis::{Connection, Pool};
use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Instant,
};
use tracing::{debug, error};

type MemoryEntries = HashMap<String, (String, Instant)>;

#[derive(Clone)]
enum Backend {
    Redis(Arc<Pool>),
    Memory(Arc<Mutex<MemoryEntries>>),
    Disabled,
}

/// JSON values in Redis. Every failure is logged and treated as a miss.
#[derive(Clone)]
pub struct CacheStore {
    backend: Backend,
}

impl CacheStore {
    pub fn new(redis_pool: Pool) -> Self {
        Self {
            backend: Backend::Redis(Arc::new(redis_pool)),
        }
    }

    /// A store that never hits Redis.
    pub fn disabled() -> Self {
        Self {
            backend: Backend::Disabled,
        }
    }

    /// Process-local store with the same expiry semantics as Redis.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(Mutex::new(HashMap::new()))),
        }
    }

    async fn get_conn(pool: &Pool) -> Option<Connection> {
        match pool.get().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("Failed to get Redis pooled connection: {:?}", e);
                None
            }
        }
    }

    fn with_entries<T>(
        entries: &Mutex<MemoryEntries>,
        f: impl FnOnce(&mut MemoryEntries) -> T,
    ) -> T {
        let mut guard = entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Instant::now();
        guard.retain(|_, (_, expires_at)| *expires_at > now);
        f(&mut guard)
    }

    fn expires_at(window: Duration) -> Instant {
        let ttl = window
            .max(Duration::seconds(1))
            .to_std()
            .unwrap_or(std::time::Duration::from_secs(1));
        Instant::now() + ttl
    }

    async fn get_raw(&self, key: &str) -> Option<String> {
        match &self.backend {
            Backend::Redis(pool) => {
                let mut conn = Self::get_conn(pool).await?;
                let result: redis::RedisResult<Option<String>> =
                    redis::cmd("GET").arg(key).query_async(&mut conn).await;

                match result {
                    Ok(value) => value,
                    Err(e) => {
                        error!("Redis get error for key '{}': {:?}", key, e);
                        None
                    }
                }
            }
            Backend::Memory(entries) => {
                Self::with_entries(entries, |map| map.get(key).map(|(v, _)| v.clone()))
            }
            Backend::Disabled => None,
        }
    }

    pub async fn get_from_cache<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let Some(data) = self.get_raw(key).await else {
            debug!("Cache miss for key: {key}");
            return None;
        };

        match serde_json::from_str::<T>(&data) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                error!(
                    "Failed to deserialize cached value for key '{}': {:?}",
                    key, e
                );
                None
            }
        }
    }

    pub async fn set_to_cache<T>(&self, key: &str, data: &T, expiration: Duration)
    where
        T: Serialize,
    {
        let json_data = match serde_json::to_string(data) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize data for key '{}': {:?}", key, e);
                return;
            }
        };

        match &self.backend {
            Backend::Redis(pool) => {
                if let Some(mut conn) = Self::get_conn(pool).await {
                    let result: redis::RedisResult<()> = redis::cmd("SET")
                        .arg(key)
                        .arg(&json_data)
                        .arg("EX")
                        .arg(expiration.num_seconds().max(1))
                        .query_async(&mut conn)
                        .await;

                    match result {
                        Ok(_) => debug!("Cached key '{}' with TTL {:?}", key, expiration),
                        Err(e) => error!("Failed to set cache key '{}': {:?}", key, e),
                    }
                }
            }
            Backend::Memory(entries) => {
                let expires_at = Self::expires_at(expiration);
                Self::with_entries(entries, |map| {
                    map.insert(key.to_string(), (json_data, expires_at));
                });
            }
            Backend::Disabled => {}
        }
    }

    pub async fn delete_from_cache(&self, key: &str) {
        match &self.backend {
            Backend::Redis(pool) => {
                if let Some(mut conn) = Self::get_conn(pool).await
                    && let Err(e) = redis::cmd("DEL")
                        .arg(key)
                        .query_async::<()>(&mut conn)
                        .await
                {
                    error!("Failed to delete key '{}': {:?}", key, e);
                }
            }
            Backend::Memory(entries) => {
                Self::with_entries(entries, |map| {
                    map.remove(key);
                });
            }
            Backend::Disabled => {}
        }
    }

    /// Increments a counter, starting its window on the first hit. Returns the new value.
    pub async fn increment(&self, key: &str, window: Duration) -> Option<i64> {
        match &self.backend {
            Backend::Redis(pool) => {
                let mut conn = Self::get_conn(pool).await?;

                let count: i64 = match redis::cmd("INCR").arg(key).query_async(&mut conn).await {
                    Ok(count) => count,
                    Err(e) => {
                        error!("Failed to increment key '{}': {:?}", key, e);
                        return None;
                    }
                };

                if count == 1
                    && let Err(e) = redis::cmd("EXPIRE")
                        .arg(key)
                        .arg(window.num_seconds().max(1))
                        .query_async::<()>(&mut conn)
                        .await
                {
                    error!("Failed to set window on key '{}': {:?}", key, e);
                }

                Some(count)
            }
            Backend::Memory(entries) => Self::with_entries(entries, |map| {
                let entry = map
                    .entry(key.to_string())
                    .or_insert_with(|| ("0".to_string(), Self::expires_at(window)));
                let count = entry.0.parse::<i64>().unwrap_or(0) + 1;
                entry.0 = count.to_string();
                Some(count)
            }),
            Backend::Disabled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_round_trips_and_deletes() {
        let cache = CacheStore::in_memory();

        cache.set_to_cache("spot:1", &vec![1, 2], Duration::minutes(5)).await;
        assert_eq!(cache.get_from_cache::<Vec<i32>>("spot:1").await, Some(vec![1, 2]));

        cache.delete_from_cache("spot:1").await;
        assert_eq!(cache.get_from_cache::<Vec<i32>>("spot:1").await, None);
    }

    #[tokio::test]
    async fn counters_share_one_window() {
        let cache = CacheStore::in_memory();

        assert_eq!(cache.increment("hits", Duration::minutes(1)).await, Some(1));
        assert_eq!(cache.increment("hits", Duration::minutes(1)).await, Some(2));
        assert_eq!(cache.get_from_cache::<i64>("hits").await, Some(2));
    }

    #[tokio::test]
    async fn disabled_store_always_misses() {
        let cache = CacheStore::disabled();

        cache.set_to_cache("k", &1, Duration::minutes(1)).await;
        assert_eq!(cache.get_from_cache::<i32>("k").await, None);
        assert_eq!(cache.increment("k", Duration::minutes(1)).await, None);
    }
}
