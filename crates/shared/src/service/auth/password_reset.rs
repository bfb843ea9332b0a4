use crate::{
    abstract_trait::{
        DynHashing, DynMailQueue, DynRefreshTokenRepository, DynResetTokenRepository,
        DynUserCommandRepository, DynUserQueryRepository, PasswordResetServiceTrait,
    },
    domain::{
        requests::{CreateResetPasswordRequest, CreateResetTokenRequest},
        responses::ApiResponse,
    },
    errors::ServiceError,
    service::mail_queue::notify,
    utils::{Method, ServiceTracer, generate_random_string},
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

const RESET_TOKEN_TTL_MINUTES: i64 = 60;

pub struct PasswordResetService {
    reset_token: DynResetTokenRepository,
    refresh_token: DynRefreshTokenRepository,
    user_query: DynUserQueryRepository,
    user_command: DynUserCommandRepository,
    hash: DynHashing,
    mail: DynMailQueue,
    app_base_url: String,
    tracer: ServiceTracer,
}

pub struct PasswordResetServiceDeps {
    pub reset_token: DynResetTokenRepository,
    pub refresh_token: DynRefreshTokenRepository,
    pub user_query: DynUserQueryRepository,
    pub user_command: DynUserCommandRepository,
    pub hash: DynHashing,
    pub mail: DynMailQueue,
    pub app_base_url: String,
    pub registry: Arc<Mutex<Registry>>,
}

impl PasswordResetService {
    pub async fn new(deps: PasswordResetServiceDeps) -> Self {
        let tracer = ServiceTracer::new("password-reset-service", "auth", &deps.registry).await;

        Self {
            reset_token: deps.reset_token,
            refresh_token: deps.refresh_token,
            user_query: deps.user_query,
            user_command: deps.user_command,
            hash: deps.hash,
            mail: deps.mail,
            app_base_url: deps.app_base_url,
            tracer,
        }
    }
}

#[async_trait]
impl PasswordResetServiceTrait for PasswordResetService {
    async fn forgot_password(&self, email: &str) -> Result<ApiResponse<()>, ServiceError> {
        let email = email.trim().to_lowercase();

        info!("🔐 Forgot password requested | Email: {email}");

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "ForgotPassword",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("user.email", email.clone()),
            ],
        );

        let user = match self.user_query.find_by_email(&email).await {
            Ok(Some(user)) if user.deleted_at.is_none() => user,
            Ok(_) => {
                self.tracer.error(&tracing_ctx, method, "User not found");
                return Err(ServiceError::NotFound("User not found".to_string()));
            }
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, "Database error");
                return Err(ServiceError::Repo(e));
            }
        };

        let token = match generate_random_string(48) {
            Ok(token) => token,
            Err(e) => {
                error!("❌ Failed to generate reset token: {e:?}");
                self.tracer
                    .error(&tracing_ctx, method, "Failed to generate token");
                return Err(ServiceError::Internal(
                    "Failed to generate reset token".to_string(),
                ));
            }
        };

        let req = CreateResetTokenRequest {
            user_id: user.user_id,
            reset_token: token.clone(),
            expired_at: (Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES)).naive_utc(),
        };

        if let Err(e) = self.reset_token.create_reset_token(&req).await {
            self.tracer
                .error(&tracing_ctx, method, "Failed to store reset token");
            return Err(ServiceError::Repo(e));
        }

        notify(
            &self.mail,
            &user.email,
            "Reset your Parkspot password",
            format!(
                "Hi {}, use the link below within {RESET_TOKEN_TTL_MINUTES} minutes to choose a new password.",
                user.name
            ),
            "Reset password",
            format!("{}/reset-password?token={token}", self.app_base_url),
        )
        .await;

        self.tracer
            .success(&tracing_ctx, method, "Reset email queued");

        Ok(ApiResponse::success("Password reset email sent", ()))
    }

    async fn reset_password(
        &self,
        request: &CreateResetPasswordRequest,
    ) -> Result<ApiResponse<()>, ServiceError> {
        info!("🔁 Resetting password");

        let method = Method::Post;
        let tracing_ctx = self
            .tracer
            .start("ResetPassword", vec![KeyValue::new("component", "auth")]);

        let invalid = || ServiceError::BadRequest("Invalid or expired reset token".to_string());

        let token = match self.reset_token.find_by_token(&request.reset_token).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.tracer.error(&tracing_ctx, method, "Unknown token");
                return Err(invalid());
            }
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, "Database error");
                return Err(ServiceError::Repo(e));
            }
        };

        if token.expired_date < Utc::now().naive_utc() {
            if let Err(e) = self.reset_token.delete_by_user_id(token.user_id).await {
                warn!("⚠️ Failed to drop expired reset token: {e:?}");
            }
            self.tracer.error(&tracing_ctx, method, "Token expired");
            return Err(invalid());
        }

        let hashed = match self.hash.hash_password(&request.password).await {
            Ok(hash) => hash,
            Err(e) => {
                self.tracer
                    .error(&tracing_ctx, method, "Failed to hash password");
                return Err(e);
            }
        };

        if let Err(e) = self
            .user_command
            .update_password(token.user_id, &hashed)
            .await
        {
            self.tracer
                .error(&tracing_ctx, method, "Failed to update password");
            return Err(ServiceError::Repo(e));
        }

        if let Err(e) = self.reset_token.delete_by_user_id(token.user_id).await {
            warn!("⚠️ Failed to delete used reset token: {e:?}");
        }
        if let Err(e) = self.refresh_token.delete_by_user_id(token.user_id).await {
            warn!("⚠️ Failed to revoke sessions after reset: {e:?}");
        }

        self.tracer
            .success(&tracing_ctx, method, "Password reset");

        Ok(ApiResponse::success("Password has been reset", ()))
    }
}
