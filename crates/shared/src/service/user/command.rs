use crate::{
    abstract_trait::{
        DynHashing, DynRefreshTokenRepository, DynUserCommandRepository, DynUserQueryRepository,
        UserCommandServiceTrait,
    },
    config::AdminSeed,
    domain::{
        Session,
        requests::{CreateUserRequest, UpdateProfileRequest},
        responses::{ApiResponse, UserResponse, UserResponseDeleteAt},
    },
    errors::{RepositoryError, ServiceError},
    model::UserRole,
    utils::{Method, ServiceTracer, TracingContext},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub struct UserCommandService {
    query: DynUserQueryRepository,
    command: DynUserCommandRepository,
    refresh_token: DynRefreshTokenRepository,
    hash: DynHashing,
    tracer: ServiceTracer,
}

impl UserCommandService {
    pub async fn new(
        query: DynUserQueryRepository,
        command: DynUserCommandRepository,
        refresh_token: DynRefreshTokenRepository,
        hash: DynHashing,
        registry: &Arc<Mutex<Registry>>,
    ) -> Self {
        let tracer = ServiceTracer::new("user-command-service", "user", registry).await;

        Self {
            query,
            command,
            refresh_token,
            hash,
            tracer,
        }
    }

    fn finish<T>(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        result: Result<T, ServiceError>,
        message: &str,
    ) -> Result<T, ServiceError> {
        match &result {
            Ok(_) => self.tracer.success(tracing_ctx, method, message),
            Err(e) => self.tracer.error(tracing_ctx, method, &e.to_string()),
        }
        result
    }

    async fn revoke_sessions(&self, user_id: i32) {
        if let Err(e) = self.refresh_token.delete_by_user_id(user_id).await {
            warn!("⚠️ Failed to revoke refresh tokens for user {user_id}: {e:?}");
        }
    }

    fn guard_self(actor: &Session, user_id: i32, action: &str) -> Result<(), ServiceError> {
        if actor.user_id == user_id {
            return Err(ServiceError::BadRequest(format!(
                "Administrators cannot {action} their own account"
            )));
        }
        Ok(())
    }

    async fn apply_profile(
        &self,
        session: &Session,
        req: &UpdateProfileRequest,
    ) -> Result<UserResponse, ServiceError> {
        let name = req.name.as_deref().map(str::trim).filter(|n| !n.is_empty());

        if name.is_none() && req.password.is_none() {
            return Err(ServiceError::BadRequest("Nothing to update".to_string()));
        }

        let password_hash = match req.password.as_deref() {
            Some(password) => Some(self.hash.hash_password(password).await?),
            None => None,
        };

        let user = self
            .command
            .update_profile(session.user_id, name, password_hash.as_deref())
            .await?;

        Ok(UserResponse::from(user))
    }
}

#[async_trait]
impl UserCommandServiceTrait for UserCommandService {
    async fn update_profile(
        &self,
        session: &Session,
        req: &UpdateProfileRequest,
    ) -> Result<ApiResponse<UserResponse>, ServiceError> {
        info!("✏️ Updating profile of user {}", session.user_id);

        let tracing_ctx = self.tracer.start(
            "UpdateProfile",
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("user.id", session.user_id.to_string()),
            ],
        );

        let result = self.apply_profile(session, req).await;
        let user = self.finish(&tracing_ctx, Method::Put, result, "Profile updated")?;

        Ok(ApiResponse::success("Profile updated successfully", user))
    }

    async fn delete_account(&self, session: &Session) -> Result<ApiResponse<()>, ServiceError> {
        info!("🗑️ User {} is deleting their account", session.user_id);

        let tracing_ctx = self.tracer.start(
            "DeleteAccount",
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("user.id", session.user_id.to_string()),
            ],
        );

        let result = self
            .command
            .trash_user(session.user_id)
            .await
            .map_err(ServiceError::from);
        self.finish(&tracing_ctx, Method::Delete, result, "Account deleted")?;

        self.revoke_sessions(session.user_id).await;

        Ok(ApiResponse::success("Account deleted successfully", ()))
    }

    async fn set_blocked(
        &self,
        actor: &Session,
        user_id: i32,
        blocked: bool,
    ) -> Result<ApiResponse<UserResponseDeleteAt>, ServiceError> {
        let action = if blocked { "block" } else { "unblock" };
        info!("🚫 Admin {} requested {action} of user {user_id}", actor.user_id);

        let tracing_ctx = self.tracer.start(
            "SetBlocked",
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("user.id", user_id.to_string()),
                KeyValue::new("blocked", blocked),
            ],
        );

        let result = match Self::guard_self(actor, user_id, action) {
            Ok(()) => self
                .command
                .set_blocked(user_id, blocked)
                .await
                .map_err(|e| match e {
                    RepositoryError::NotFound => {
                        ServiceError::NotFound(format!("User with id {user_id} not found"))
                    }
                    other => ServiceError::Repo(other),
                }),
            Err(e) => Err(e),
        };
        let user = self.finish(&tracing_ctx, Method::Post, result, "Block state changed")?;

        if blocked {
            self.revoke_sessions(user_id).await;
        }

        let message = if blocked {
            "User blocked successfully"
        } else {
            "User unblocked successfully"
        };

        Ok(ApiResponse::success(message, UserResponseDeleteAt::from(user)))
    }

    async fn trash_user(
        &self,
        actor: &Session,
        user_id: i32,
    ) -> Result<ApiResponse<UserResponseDeleteAt>, ServiceError> {
        info!("🗑️ Admin {} is deleting user {user_id}", actor.user_id);

        let tracing_ctx = self.tracer.start(
            "TrashUser",
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("user.id", user_id.to_string()),
            ],
        );

        let result = match Self::guard_self(actor, user_id, "delete") {
            Ok(()) => self.command.trash_user(user_id).await.map_err(|e| match e {
                RepositoryError::NotFound => {
                    ServiceError::NotFound(format!("User with id {user_id} not found"))
                }
                other => ServiceError::Repo(other),
            }),
            Err(e) => Err(e),
        };
        let user = self.finish(&tracing_ctx, Method::Delete, result, "User deleted")?;

        self.revoke_sessions(user_id).await;

        Ok(ApiResponse::success(
            "User deleted successfully",
            UserResponseDeleteAt::from(user),
        ))
    }

    async fn ensure_admin(&self, seed: &AdminSeed) -> Result<(), ServiceError> {
        let email = seed.email.trim().to_lowercase();

        if let Some(existing) = self.query.find_by_email(&email).await? {
            if existing.role != UserRole::Admin.as_str() {
                warn!("⚠️ Seed admin email {email} belongs to a {} account", existing.role);
            }
            return Ok(());
        }

        let password = self.hash.hash_password(&seed.password).await?;

        let admin = self
            .command
            .create_user(&CreateUserRequest {
                name: seed.name.clone(),
                email,
                password,
                role: UserRole::Admin,
                verification_code: None,
                is_verified: true,
            })
            .await?;

        info!("👑 Created administrator account {}", admin.email);
        Ok(())
    }
}
