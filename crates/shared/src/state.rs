use crate::{
    abstract_trait::{DynHashing, DynJwtService, DynMailQueue, DynPaymentGateway},
    cache::{CacheStore, RateLimiter},
    config::{Config, ConnectionPool, Hashing, JwtConfig, RazorpayClient, RedisClient, RedisConfig},
    di::{DependenciesInject, DependenciesInjectDeps},
    utils::{SystemMetrics, run_metrics_collector},
};
use anyhow::{Context, Result};
use chrono::Duration;
use prometheus_client::registry::Registry;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;
use tracing::warn;

const RATE_LIMIT_MAX_REQUESTS: u32 = 100;
const RATE_LIMIT_WINDOW_SECS: i64 = 60;

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub rate_limiter: Arc<RateLimiter>,
    pub registry: Arc<Mutex<Registry>>,
    pub system_metrics: Arc<SystemMetrics>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("di_container", &self.di_container)
            .field("rate_limiter", &"<RateLimiter>")
            .finish()
    }
}

impl AppState {
    pub async fn new(pool: ConnectionPool, config: &Config, mail: DynMailQueue) -> Result<Self> {
        let jwt_config = Arc::new(JwtConfig::new(&config.jwt_secret)) as DynJwtService;
        let hashing = Arc::new(Hashing::new()) as DynHashing;
        let gateway = Arc::new(
            RazorpayClient::new(config.razorpay.clone())
                .context("Failed to initialize payment gateway client")?,
        ) as DynPaymentGateway;

        let registry = Arc::new(Mutex::new(Registry::default()));
        let system_metrics = Arc::new(SystemMetrics::new());

        let redis = RedisClient::new(&RedisConfig::new(config.redis_url.clone()))
            .context("Failed to create Redis client")?;

        if let Err(e) = redis.ping().await {
            warn!("⚠️ Redis is unreachable, caching and rate limiting are disabled until it returns: {e:#}");
        }

        let cache = CacheStore::new(redis.pool.clone());
        let rate_limiter = Arc::new(RateLimiter::new(
            cache.clone(),
            RATE_LIMIT_MAX_REQUESTS,
            Duration::seconds(RATE_LIMIT_WINDOW_SECS),
        ));

        let di_container = DependenciesInject::new(DependenciesInjectDeps {
            pool,
            hash: hashing,
            jwt_config,
            mail,
            gateway,
            cache: Arc::new(cache),
            registry: registry.clone(),
            app_base_url: config.app_base_url.clone(),
        })
        .await;

        system_metrics.register(&mut *registry.lock().await);

        tokio::spawn(run_metrics_collector(system_metrics.clone()));

        Ok(Self {
            di_container,
            rate_limiter,
            registry,
            system_metrics,
        })
    }
}
