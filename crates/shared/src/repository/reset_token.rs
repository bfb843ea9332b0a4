use crate::{
    abstract_trait::ResetTokenRepositoryTrait, config::ConnectionPool,
    domain::requests::CreateResetTokenRequest, errors::RepositoryError,
    model::ResetToken as ResetTokenModel,
};
use async_trait::async_trait;
use tracing::{error, info};

#[derive(Clone)]
pub struct ResetTokenRepository {
    db: ConnectionPool,
}

impl ResetTokenRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResetTokenRepositoryTrait for ResetTokenRepository {
    /// Replaces any earlier token for the same user.
    async fn create_reset_token(
        &self,
        request: &CreateResetTokenRequest,
    ) -> Result<ResetTokenModel, RepositoryError> {
        info!("🔑 Issuing reset token for user {}", request.user_id);

        let mut tx = self.db.begin().await.map_err(|e| {
            error!("❌ Failed to begin transaction: {:?}", e);
            RepositoryError::from(e)
        })?;

        sqlx::query("DELETE FROM reset_tokens WHERE user_id = $1")
            .bind(request.user_id)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

        let token = sqlx::query_as::<_, ResetTokenModel>(
            r#"
            INSERT INTO reset_tokens (user_id, token, expired_date)
            VALUES ($1, $2, $3)
            RETURNING reset_token_id, user_id, token, expired_date
            "#,
        )
        .bind(request.user_id)
        .bind(&request.reset_token)
        .bind(request.expired_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to insert reset token for user {}: {:?}",
                request.user_id, e
            );
            RepositoryError::from(e)
        })?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(token)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ResetTokenModel>, RepositoryError> {
        sqlx::query_as::<_, ResetTokenModel>(
            r#"
            SELECT reset_token_id, user_id, token, expired_date
            FROM reset_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to look up reset token: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn delete_by_user_id(&self, user_id: i32) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM reset_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to delete reset tokens for user {user_id}: {:?}", e);
                RepositoryError::from(e)
            })?;

        Ok(())
    }
}
