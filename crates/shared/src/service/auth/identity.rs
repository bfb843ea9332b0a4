use crate::{
    abstract_trait::{
        DynJwtService, DynRefreshTokenRepository, DynTokenService, DynUserQueryRepository,
        IdentityServiceTrait,
    },
    domain::{
        Session,
        responses::{ApiResponse, TokenResponse, UserResponse},
    },
    errors::ServiceError,
    model::User as UserModel,
    utils::{Method, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

pub struct IdentityService {
    jwt: DynJwtService,
    token_service: DynTokenService,
    refresh_token: DynRefreshTokenRepository,
    user_query: DynUserQueryRepository,
    tracer: ServiceTracer,
}

pub struct IdentityServiceDeps {
    pub jwt: DynJwtService,
    pub token_service: DynTokenService,
    pub refresh_token: DynRefreshTokenRepository,
    pub user_query: DynUserQueryRepository,
    pub registry: Arc<Mutex<Registry>>,
}

impl IdentityService {
    pub async fn new(deps: IdentityServiceDeps) -> Self {
        let IdentityServiceDeps {
            jwt,
            token_service,
            refresh_token,
            user_query,
            registry,
        } = deps;

        let tracer = ServiceTracer::new("identity-service", "auth", &registry).await;

        Self {
            jwt,
            token_service,
            refresh_token,
            user_query,
            tracer,
        }
    }

    async fn active_user(&self, user_id: i32) -> Result<UserModel, ServiceError> {
        let user = self
            .user_query
            .find_by_id(user_id)
            .await?
            .filter(|u| u.deleted_at.is_none())
            .ok_or_else(|| ServiceError::Unauthorized("Account no longer exists".to_string()))?;

        if user.is_blocked {
            return Err(ServiceError::Forbidden("Account is blocked".to_string()));
        }

        Ok(user)
    }
}

#[async_trait]
impl IdentityServiceTrait for IdentityService {
    async fn authenticate(&self, access_token: &str) -> Result<Session, ServiceError> {
        let user_id = self.jwt.verify_token(access_token, "access")?;
        let user = self.active_user(user_id).await?;

        Session::try_from(&user).map_err(|e| {
            error!("❌ User {user_id} carries an unknown role: {e}");
            ServiceError::Internal("Invalid account role".to_string())
        })
    }

    async fn refresh_token(&self, token: &str) -> Result<ApiResponse<TokenResponse>, ServiceError> {
        info!("🔄 Attempting to refresh token");

        let method = Method::Post;
        let tracing_ctx = self
            .tracer
            .start("RefreshToken", vec![KeyValue::new("component", "auth")]);

        let user_id = match self.jwt.verify_token(token, "refresh") {
            Ok(uid) => uid,
            Err(ServiceError::TokenExpired) => {
                if let Err(e) = self.refresh_token.delete_token(token).await {
                    warn!("⚠️ Failed to drop expired refresh token: {e:?}");
                }
                self.tracer.error(&tracing_ctx, method, "Token expired");
                return Err(ServiceError::TokenExpired);
            }
            Err(e) => {
                error!("❌ Invalid refresh token: {e:?}");
                self.tracer.error(&tracing_ctx, method, "Invalid token");
                return Err(e);
            }
        };

        match self.refresh_token.find_by_token(token).await {
            Ok(Some(stored)) if stored.user_id == user_id => {}
            Ok(_) => {
                self.tracer.error(&tracing_ctx, method, "Token revoked");
                return Err(ServiceError::Unauthorized(
                    "Refresh token has been revoked".to_string(),
                ));
            }
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, "Database error");
                return Err(ServiceError::Repo(e));
            }
        }

        if let Err(e) = self.active_user(user_id).await {
            self.tracer.error(&tracing_ctx, method, "Inactive account");
            return Err(e);
        }

        if let Err(e) = self.refresh_token.delete_token(token).await {
            error!("❌ Failed to delete old refresh token: {e:?}");
            self.tracer
                .error(&tracing_ctx, method, "Failed to delete old refresh token");
            return Err(ServiceError::from(e));
        }

        let access_token = match self.token_service.create_access_token(user_id).await {
            Ok(token) => token,
            Err(e) => {
                self.tracer
                    .error(&tracing_ctx, method, "Failed to generate access token");
                return Err(e);
            }
        };

        let refresh_token = match self.token_service.create_refresh_token(user_id).await {
            Ok(token) => token,
            Err(e) => {
                self.tracer
                    .error(&tracing_ctx, method, "Failed to generate refresh token");
                return Err(e);
            }
        };

        self.tracer
            .success(&tracing_ctx, method, "Token refreshed successfully");

        Ok(ApiResponse::success(
            "Token refreshed",
            TokenResponse {
                access_token,
                refresh_token,
            },
        ))
    }

    async fn get_me(&self, id: i32) -> Result<ApiResponse<UserResponse>, ServiceError> {
        info!("👤 Fetching user profile | User ID: {id}");

        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "GetMe",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("user.id", id.to_string()),
            ],
        );

        match self.active_user(id).await {
            Ok(user) => {
                self.tracer
                    .success(&tracing_ctx, method, "User profile fetched");
                Ok(ApiResponse::success(
                    "User fetched successfully",
                    UserResponse::from(user),
                ))
            }
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, &e.to_string());
                Err(e)
            }
        }
    }

    async fn logout(&self, id: i32) -> Result<ApiResponse<()>, ServiceError> {
        info!("🚪 Logging out user {id}");

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "Logout",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("user.id", id.to_string()),
            ],
        );

        if let Err(e) = self.refresh_token.delete_by_user_id(id).await {
            self.tracer
                .error(&tracing_ctx, method, "Failed to revoke tokens");
            return Err(ServiceError::Repo(e));
        }

        self.tracer.success(&tracing_ctx, method, "Logged out");

        Ok(ApiResponse::success("Logged out successfully", ()))
    }
}
