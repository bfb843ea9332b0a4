use crate::{
    abstract_trait::{
        DynHashing, DynMailQueue, DynUserCommandRepository, DynUserQueryRepository,
        RegisterServiceTrait,
    },
    domain::{
        requests::{CreateUserRequest, RegisterRequest, ResendVerificationRequest},
        responses::{ApiResponse, UserResponse},
    },
    errors::{RepositoryError, ServiceError},
    service::mail_queue::notify,
    utils::{Method, ServiceTracer, generate_random_string},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

const VERIFICATION_CODE_LENGTH: usize = 32;

pub struct RegisterService {
    query: DynUserQueryRepository,
    command: DynUserCommandRepository,
    hash: DynHashing,
    mail: DynMailQueue,
    app_base_url: String,
    tracer: ServiceTracer,
}

pub struct RegisterServiceDeps {
    pub query: DynUserQueryRepository,
    pub command: DynUserCommandRepository,
    pub hash: DynHashing,
    pub mail: DynMailQueue,
    pub app_base_url: String,
    pub registry: Arc<Mutex<Registry>>,
}

impl RegisterService {
    pub async fn new(deps: RegisterServiceDeps) -> Self {
        let RegisterServiceDeps {
            query,
            command,
            hash,
            mail,
            app_base_url,
            registry,
        } = deps;

        let tracer = ServiceTracer::new("register-service", "auth", &registry).await;

        Self {
            query,
            command,
            hash,
            mail,
            app_base_url,
            tracer,
        }
    }

    fn new_code() -> Result<String, ServiceError> {
        generate_random_string(VERIFICATION_CODE_LENGTH).map_err(|e| {
            error!("❌ Failed to generate verification code: {e:?}");
            ServiceError::Internal("Failed to generate verification code".into())
        })
    }

    async fn send_verification(&self, email: &str, name: &str, code: &str) {
        notify(
            &self.mail,
            email,
            "Verify your Parkspot account",
            format!("Hi {name}, confirm your email address to start using Parkspot."),
            "Verify email",
            format!(
                "{}/api/auth/verify-code?verify_code={code}",
                self.app_base_url
            ),
        )
        .await;
    }
}

#[async_trait]
impl RegisterServiceTrait for RegisterService {
    async fn register(
        &self,
        req: &RegisterRequest,
    ) -> Result<ApiResponse<UserResponse>, ServiceError> {
        let email = req.email.trim().to_lowercase();

        info!("📝 [REGISTER] Starting user registration | Email: {email}");

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "RegisterUser",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("user.email", email.clone()),
                KeyValue::new("user.role", req.role.as_str()),
            ],
        );

        match self.query.find_by_email(&email).await {
            Ok(None) => {}
            Ok(Some(_)) => {
                error!("❌ [REGISTER] Email already taken | Email: {email}");
                self.tracer
                    .error(&tracing_ctx, method, "Email already exists");
                return Err(ServiceError::Conflict("Email already registered".to_string()));
            }
            Err(e) => {
                error!("❌ Failed to check email in DB: {e:?}");
                self.tracer.error(&tracing_ctx, method, "Database error");
                return Err(ServiceError::Repo(e));
            }
        }

        let code = match Self::new_code() {
            Ok(code) => code,
            Err(e) => {
                self.tracer
                    .error(&tracing_ctx, method, "Failed to generate code");
                return Err(e);
            }
        };

        let password = match self.hash.hash_password(&req.password).await {
            Ok(hash) => hash,
            Err(e) => {
                self.tracer
                    .error(&tracing_ctx, method, "Failed to hash password");
                return Err(e);
            }
        };

        let create_req = CreateUserRequest {
            name: req.name.trim().to_string(),
            email: email.clone(),
            password,
            role: req.role,
            verification_code: Some(code.clone()),
            is_verified: false,
        };

        let user = match self.command.create_user(&create_req).await {
            Ok(user) => user,
            Err(RepositoryError::AlreadyExists(_)) => {
                self.tracer
                    .error(&tracing_ctx, method, "Email already exists");
                return Err(ServiceError::Conflict("Email already registered".to_string()));
            }
            Err(e) => {
                error!("❌ Failed to create user: {e:?}");
                self.tracer
                    .error(&tracing_ctx, method, "Failed to create user");
                return Err(ServiceError::Repo(e));
            }
        };

        self.send_verification(&user.email, &user.name, &code).await;

        info!(
            "✅ User registered: {} ({}) as {}",
            user.name, user.email, user.role
        );
        self.tracer
            .success(&tracing_ctx, method, "User registered successfully");

        Ok(ApiResponse::success(
            "Registration successful, check your email to verify your account",
            UserResponse::from(user),
        ))
    }

    async fn verify_code(&self, code: &str) -> Result<ApiResponse<UserResponse>, ServiceError> {
        info!("🔍 Verifying email code");

        let method = Method::Get;
        let tracing_ctx = self
            .tracer
            .start("VerifyCode", vec![KeyValue::new("component", "auth")]);

        let user = match self.query.find_by_verification_code(code.trim()).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.tracer.error(&tracing_ctx, method, "Unknown code");
                return Err(ServiceError::NotFound(
                    "Invalid or already used verification code".to_string(),
                ));
            }
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, "Database error");
                return Err(ServiceError::Repo(e));
            }
        };

        let user = match self.command.mark_verified(user.user_id).await {
            Ok(user) => user,
            Err(e) => {
                error!("❌ Failed to mark user {} verified: {e:?}", user.user_id);
                self.tracer
                    .error(&tracing_ctx, method, "Failed to mark verified");
                return Err(ServiceError::Repo(e));
            }
        };

        self.tracer.success(&tracing_ctx, method, "Email verified");

        Ok(ApiResponse::success(
            "Email verified successfully",
            UserResponse::from(user),
        ))
    }

    async fn resend_verification(
        &self,
        request: &ResendVerificationRequest,
    ) -> Result<ApiResponse<()>, ServiceError> {
        let email = request.email.trim().to_lowercase();

        info!("📨 Resending verification email to {email}");

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "ResendVerification",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("user.email", email.clone()),
            ],
        );

        let user = match self.query.find_by_email(&email).await {
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

        if user.is_verified {
            self.tracer.error(&tracing_ctx, method, "Already verified");
            return Err(ServiceError::Conflict("Email is already verified".to_string()));
        }

        let code = match Self::new_code() {
            Ok(code) => code,
            Err(e) => {
                self.tracer
                    .error(&tracing_ctx, method, "Failed to generate code");
                return Err(e);
            }
        };

        if let Err(e) = self
            .command
            .update_verification_code(user.user_id, &code)
            .await
        {
            self.tracer
                .error(&tracing_ctx, method, "Failed to store code");
            return Err(ServiceError::Repo(e));
        }

        self.send_verification(&user.email, &user.name, &code).await;

        self.tracer
            .success(&tracing_ctx, method, "Verification email queued");

        Ok(ApiResponse::success("Verification email sent", ()))
    }
}
