use crate::{
    abstract_trait::{DynHashing, DynTokenService, DynUserQueryRepository, LoginServiceTrait},
    cache::CacheStore,
    domain::{
        requests::LoginRequest,
        responses::{ApiResponse, TokenResponse},
    },
    errors::ServiceError,
    utils::{Method, ServiceTracer},
};
use async_trait::async_trait;
use chrono::Duration;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

const MAX_FAILED_ATTEMPTS: i64 = 5;

pub struct LoginService {
    hash: DynHashing,
    token_service: DynTokenService,
    query: DynUserQueryRepository,
    cache_store: Arc<CacheStore>,
    tracer: ServiceTracer,
}

pub struct LoginServiceDeps {
    pub hash: DynHashing,
    pub token_service: DynTokenService,
    pub query: DynUserQueryRepository,
    pub registry: Arc<Mutex<Registry>>,
    pub cache_store: Arc<CacheStore>,
}

impl LoginService {
    pub async fn new(deps: LoginServiceDeps) -> Self {
        let LoginServiceDeps {
            hash,
            token_service,
            query,
            registry,
            cache_store,
        } = deps;

        let tracer = ServiceTracer::new("login-service", "auth", &registry).await;

        Self {
            hash,
            token_service,
            query,
            cache_store,
            tracer,
        }
    }

    async fn record_failure(&self, key: &str) {
        let window = Duration::minutes(15);
        if let Some(count) = self.cache_store.increment(key, window).await {
            warn!("⚠️ Failed login attempt #{count} for key {key}");
        }
    }
}

#[async_trait]
impl LoginServiceTrait for LoginService {
    async fn login(
        &self,
        request: &LoginRequest,
    ) -> Result<ApiResponse<TokenResponse>, ServiceError> {
        let email = request.email.trim().to_lowercase();

        info!("🔐 Attempting login for email: {email}");

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "Login",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("user.email", email.clone()),
            ],
        );

        let failed_attempts_key = format!("auth:login_attempts:{email}");
        let current_attempts = self
            .cache_store
            .get_from_cache::<i64>(&failed_attempts_key)
            .await
            .unwrap_or(0);

        if current_attempts >= MAX_FAILED_ATTEMPTS {
            let msg = "Too many failed login attempts";
            warn!("❌ {msg}: {email}");
            self.tracer.error(&tracing_ctx, method, msg);
            return Err(ServiceError::TooManyAttempts(
                "Too many failed attempts. Try again in 15 minutes.".to_string(),
            ));
        }

        let user = match self.query.find_by_email(&email).await {
            Ok(Some(user)) if user.deleted_at.is_none() => user,
            Ok(_) => {
                error!("❌ No active account for {email}");
                self.record_failure(&failed_attempts_key).await;
                self.tracer.error(&tracing_ctx, method, "User not found");
                return Err(ServiceError::InvalidCredentials);
            }
            Err(err) => {
                error!("❌ Failed to query user: {err}");
                self.tracer.error(&tracing_ctx, method, "Database error");
                return Err(ServiceError::Repo(err));
            }
        };

        if let Err(e) = self.hash.compare_password(&user.password, &request.password).await {
            error!("❌ Invalid password for user: {email}");
            self.record_failure(&failed_attempts_key).await;
            self.tracer.error(&tracing_ctx, method, "Invalid password");
            return Err(e);
        }

        if !user.is_verified {
            self.tracer.error(&tracing_ctx, method, "Email not verified");
            return Err(ServiceError::Forbidden(
                "Please verify your email before logging in".to_string(),
            ));
        }

        if user.is_blocked {
            self.tracer.error(&tracing_ctx, method, "Account blocked");
            return Err(ServiceError::Forbidden("Account is blocked".to_string()));
        }

        self.cache_store.delete_from_cache(&failed_attempts_key).await;

        let access_token = match self.token_service.create_access_token(user.user_id).await {
            Ok(token) => token,
            Err(e) => {
                self.tracer
                    .error(&tracing_ctx, method, "Failed to generate access token");
                return Err(e);
            }
        };

        let refresh_token = match self.token_service.create_refresh_token(user.user_id).await {
            Ok(token) => token,
            Err(e) => {
                self.tracer
                    .error(&tracing_ctx, method, "Failed to generate refresh token");
                return Err(e);
            }
        };

        info!("✅ Login successful for email: {email}");
        self.tracer.success(&tracing_ctx, method, "Login successful");

        Ok(ApiResponse::success(
            "Login successful",
            TokenResponse {
                access_token,
                refresh_token,
            },
        ))
    }
}
