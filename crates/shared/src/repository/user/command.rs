use super::USER_COLUMNS;
use crate::{
    abstract_trait::UserCommandRepositoryTrait, config::ConnectionPool,
    domain::requests::CreateUserRequest, errors::RepositoryError, model::User as UserModel,
};
use async_trait::async_trait;
use tracing::{error, info};

#[derive(Clone)]
pub struct UserCommandRepository {
    db: ConnectionPool,
}

impl UserCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

fn log_failure(action: &str, user_id: i32) -> impl FnOnce(sqlx::Error) -> RepositoryError + '_ {
    move |e| {
        error!("❌ Failed to {action} for user {user_id}: {:?}", e);
        RepositoryError::from(e)
    }
}

#[async_trait]
impl UserCommandRepositoryTrait for UserCommandRepository {
    async fn create_user(&self, req: &CreateUserRequest) -> Result<UserModel, RepositoryError> {
        info!("🆕 Creating user with email: {}", req.email);

        let sql = format!(
            r#"
            INSERT INTO users (name, email, password, role, verification_code, is_verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, current_timestamp, current_timestamp)
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, UserModel>(&sql)
            .bind(&req.name)
            .bind(req.email.trim().to_lowercase())
            .bind(&req.password)
            .bind(req.role.as_str())
            .bind(req.verification_code.as_deref())
            .bind(req.is_verified)
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to create user {}: {:?}", req.email, e);
                RepositoryError::from(e)
            })
    }

    async fn update_profile(
        &self,
        user_id: i32,
        name: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<UserModel, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                password = COALESCE($3, password),
                updated_at = current_timestamp
            WHERE user_id = $1 AND deleted_at IS NULL
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, UserModel>(&sql)
            .bind(user_id)
            .bind(name)
            .bind(password_hash)
            .fetch_one(&self.db)
            .await
            .map_err(log_failure("update profile", user_id))
    }

    async fn mark_verified(&self, user_id: i32) -> Result<UserModel, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE users
            SET is_verified = TRUE, verification_code = NULL, updated_at = current_timestamp
            WHERE user_id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, UserModel>(&sql)
            .bind(user_id)
            .fetch_one(&self.db)
            .await
            .map_err(log_failure("mark verified", user_id))
    }

    async fn update_verification_code(
        &self,
        user_id: i32,
        code: &str,
    ) -> Result<UserModel, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE users
            SET verification_code = $2, updated_at = current_timestamp
            WHERE user_id = $1 AND is_verified = FALSE
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, UserModel>(&sql)
            .bind(user_id)
            .bind(code)
            .fetch_one(&self.db)
            .await
            .map_err(log_failure("update verification code", user_id))
    }

    async fn update_password(
        &self,
        user_id: i32,
        password: &str,
    ) -> Result<UserModel, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE users
            SET password = $2, updated_at = current_timestamp
            WHERE user_id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, UserModel>(&sql)
            .bind(user_id)
            .bind(password)
            .fetch_one(&self.db)
            .await
            .map_err(log_failure("update password", user_id))
    }

    async fn set_blocked(&self, user_id: i32, blocked: bool) -> Result<UserModel, RepositoryError> {
        info!("🚫 Setting blocked={blocked} for user {user_id}");

        let sql = format!(
            r#"
            UPDATE users
            SET is_blocked = $2, updated_at = current_timestamp
            WHERE user_id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, UserModel>(&sql)
            .bind(user_id)
            .bind(blocked)
            .fetch_one(&self.db)
            .await
            .map_err(log_failure("set blocked", user_id))
    }

    async fn trash_user(&self, user_id: i32) -> Result<UserModel, RepositoryError> {
        info!("🗑️ Soft deleting user {user_id}");

        let sql = format!(
            r#"
            UPDATE users
            SET deleted_at = current_timestamp, updated_at = current_timestamp
            WHERE user_id = $1 AND deleted_at IS NULL
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, UserModel>(&sql)
            .bind(user_id)
            .fetch_one(&self.db)
            .await
            .map_err(log_failure("trash", user_id))
    }
}
