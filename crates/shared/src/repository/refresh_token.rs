use crate::{
    abstract_trait::RefreshTokenRepositoryTrait, config::ConnectionPool,
    domain::requests::CreateRefreshToken, errors::RepositoryError,
    model::RefreshToken as RefreshTokenModel,
};
use async_trait::async_trait;
use tracing::{error, info};

#[derive(Clone)]
pub struct RefreshTokenRepository {
    db: ConnectionPool,
}

impl RefreshTokenRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RefreshTokenRepositoryTrait for RefreshTokenRepository {
    async fn create(
        &self,
        request: &CreateRefreshToken,
    ) -> Result<RefreshTokenModel, RepositoryError> {
        info!("🔑 Storing refresh token for user {}", request.user_id);

        sqlx::query_as::<_, RefreshTokenModel>(
            r#"
            INSERT INTO refresh_tokens (user_id, token, expired_date, created_at, updated_at)
            VALUES ($1, $2, $3, current_timestamp, current_timestamp)
            RETURNING refresh_token_id, user_id, token, expired_date, created_at, updated_at
            "#,
        )
        .bind(request.user_id)
        .bind(&request.token)
        .bind(request.expired_date)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to store refresh token for user {}: {:?}",
                request.user_id, e
            );
            RepositoryError::from(e)
        })
    }

    async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenModel>, RepositoryError> {
        sqlx::query_as::<_, RefreshTokenModel>(
            r#"
            SELECT refresh_token_id, user_id, token, expired_date, created_at, updated_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to look up refresh token: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn delete_token(&self, token: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to delete refresh token: {:?}", e);
                RepositoryError::from(e)
            })?;

        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: i32) -> Result<(), RepositoryError> {
        info!("🗑️ Revoking refresh tokens for user {user_id}");

        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to revoke refresh tokens for user {user_id}: {:?}", e);
                RepositoryError::from(e)
            })?;

        Ok(())
    }
}
