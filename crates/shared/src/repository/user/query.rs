use super::USER_COLUMNS;
use crate::{
    abstract_trait::UserQueryRepositoryTrait,
    config::ConnectionPool,
    domain::{requests::FindAllUsers, responses::Pagination},
    errors::RepositoryError,
    model::User as UserModel,
    repository::{contains_pattern, needs_total_count},
};
use async_trait::async_trait;
use sqlx::FromRow;
use tracing::{error, info};

const USER_SEARCH_WHERE: &str =
    r#"($1::TEXT IS NULL OR name ILIKE $1 ESCAPE '\' OR email ILIKE $1 ESCAPE '\')"#;

#[derive(FromRow)]
struct UserRow {
    #[sqlx(flatten)]
    user: UserModel,
    total_count: i64,
}

#[derive(Clone)]
pub struct UserQueryRepository {
    db: ConnectionPool,
}

impl UserQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    async fn find_one(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<UserModel>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");

        sqlx::query_as::<_, UserModel>(&sql)
            .bind(value)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch user by {column}: {:?}", e);
                RepositoryError::from(e)
            })
    }
}

#[async_trait]
impl UserQueryRepositoryTrait for UserQueryRepository {
    async fn find_all(&self, req: &FindAllUsers) -> Result<(Vec<UserModel>, i64), RepositoryError> {
        info!("🔍 Fetching users with search: {:?}", req.search);

        let limit = i64::from(req.page_size);
        let offset = Pagination::offset(req.page, req.page_size);

        let search_pattern = Some(req.search.trim())
            .filter(|s| !s.is_empty())
            .map(contains_pattern);

        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}, COUNT(*) OVER() AS total_count
            FROM users
            WHERE {USER_SEARCH_WHERE}
            ORDER BY created_at DESC, user_id DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(search_pattern.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch users: {:?}", e);
                RepositoryError::from(e)
            })?;

        if needs_total_count(rows.len(), offset) {
            let total = sqlx::query_scalar::<_, i64>(&format!(
                "SELECT COUNT(*) FROM users WHERE {USER_SEARCH_WHERE}"
            ))
            .bind(search_pattern.as_deref())
            .fetch_one(&self.db)
            .await
            .map_err(RepositoryError::from)?;

            return Ok((Vec::new(), total));
        }

        let total = rows.first().map(|r| r.total_count).unwrap_or(0);
        let users = rows.into_iter().map(|r| r.user).collect();

        Ok((users, total))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<UserModel>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");

        sqlx::query_as::<_, UserModel>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch user {id}: {:?}", e);
                RepositoryError::from(e)
            })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, RepositoryError> {
        self.find_one("LOWER(email)", &email.trim().to_lowercase())
            .await
    }

    async fn find_by_verification_code(
        &self,
        code: &str,
    ) -> Result<Option<UserModel>, RepositoryError> {
        self.find_one("verification_code", code).await
    }
}
