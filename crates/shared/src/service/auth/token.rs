use crate::{
    abstract_trait::{DynJwtService, DynRefreshTokenRepository, TokenServiceTrait},
    domain::requests::CreateRefreshToken,
    errors::ServiceError,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::{error, info, warn};

pub struct TokenService {
    jwt: DynJwtService,
    refresh: DynRefreshTokenRepository,
}

impl TokenService {
    pub fn new(jwt: DynJwtService, refresh: DynRefreshTokenRepository) -> Self {
        Self { jwt, refresh }
    }
}

#[async_trait]
impl TokenServiceTrait for TokenService {
    async fn create_access_token(&self, id: i32) -> Result<String, ServiceError> {
        self.jwt.generate_token(id, "access").inspect_err(|err| {
            error!("❌ Failed to generate access token for user_id {id}: {err:?}");
        })
    }

    async fn create_refresh_token(&self, id: i32) -> Result<String, ServiceError> {
        let token = self.jwt.generate_token(id, "refresh")?;

        if let Err(e) = self.refresh.delete_by_user_id(id).await {
            warn!("⚠️ Failed to drop previous refresh tokens for user {id}: {e:?}");
        }

        let req = CreateRefreshToken {
            user_id: id,
            token: token.clone(),
            expired_date: (Utc::now() + Duration::days(7)).naive_utc(),
        };

        self.refresh.create(&req).await.map_err(|e| {
            error!("❌ Failed to persist refresh token for user {id}: {e:?}");
            ServiceError::from(e)
        })?;

        info!("✅ Issued refresh token for user_id {id}");
        Ok(token)
    }
}
