mod identity;
mod login;
mod password_reset;
mod register;
mod token;

pub use self::identity::{IdentityService, IdentityServiceDeps};
pub use self::login::{LoginService, LoginServiceDeps};
pub use self::password_reset::{PasswordResetService, PasswordResetServiceDeps};
pub use self::register::{RegisterService, RegisterServiceDeps};
pub use self::token::TokenService;

use crate::{
    abstract_trait::{
        DynHashing, DynIdentityService, DynJwtService, DynLoginService, DynMailQueue,
        DynPasswordResetService, DynRefreshTokenRepository, DynRegisterService,
        DynResetTokenRepository, DynTokenService, DynUserCommandRepository,
        DynUserQueryRepository,
    },
    cache::CacheStore,
};
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AuthService {
    pub passreset: DynPasswordResetService,
    pub identity: DynIdentityService,
    pub login: DynLoginService,
    pub register: DynRegisterService,
    pub token: DynTokenService,
}

#[derive(Clone)]
pub struct AuthServiceDeps {
    pub hash: DynHashing,
    pub jwt: DynJwtService,
    pub mail: DynMailQueue,
    pub reset_token: DynResetTokenRepository,
    pub refresh_token: DynRefreshTokenRepository,
    pub user_query: DynUserQueryRepository,
    pub user_command: DynUserCommandRepository,
    pub cache: Arc<CacheStore>,
    pub registry: Arc<Mutex<Registry>>,
    pub app_base_url: String,
}

impl AuthService {
    pub async fn new(deps: AuthServiceDeps) -> Self {
        let token = Arc::new(TokenService::new(
            deps.jwt.clone(),
            deps.refresh_token.clone(),
        )) as DynTokenService;

        let passreset = Arc::new(
            PasswordResetService::new(PasswordResetServiceDeps {
                reset_token: deps.reset_token.clone(),
                refresh_token: deps.refresh_token.clone(),
                user_query: deps.user_query.clone(),
                user_command: deps.user_command.clone(),
                hash: deps.hash.clone(),
                mail: deps.mail.clone(),
                app_base_url: deps.app_base_url.clone(),
                registry: deps.registry.clone(),
            })
            .await,
        ) as DynPasswordResetService;

        let identity = Arc::new(
            IdentityService::new(IdentityServiceDeps {
                jwt: deps.jwt.clone(),
                token_service: token.clone(),
                refresh_token: deps.refresh_token.clone(),
                user_query: deps.user_query.clone(),
                registry: deps.registry.clone(),
            })
            .await,
        ) as DynIdentityService;

        let login = Arc::new(
            LoginService::new(LoginServiceDeps {
                hash: deps.hash.clone(),
                token_service: token.clone(),
                query: deps.user_query.clone(),
                registry: deps.registry.clone(),
                cache_store: deps.cache.clone(),
            })
            .await,
        ) as DynLoginService;

        let register = Arc::new(
            RegisterService::new(RegisterServiceDeps {
                query: deps.user_query.clone(),
                command: deps.user_command.clone(),
                hash: deps.hash.clone(),
                mail: deps.mail.clone(),
                app_base_url: deps.app_base_url.clone(),
                registry: deps.registry.clone(),
            })
            .await,
        ) as DynRegisterService;

        Self {
            passreset,
            identity,
            login,
            register,
            token,
        }
    }
}
