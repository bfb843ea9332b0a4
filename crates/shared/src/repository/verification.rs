use crate::{
    abstract_trait::VerificationRepositoryTrait,
    config::ConnectionPool,
    domain::{requests::FindAllVerifications, responses::Pagination},
    errors::RepositoryError,
    model::{Verification as VerificationModel, VerificationStatus},
    repository::needs_total_count,
};
use async_trait::async_trait;
use sqlx::FromRow;
use tracing::{error, info};

const VERIFICATION_COLUMNS: &str =
    "verification_id, user_id, document_url, status, remarks, created_at, updated_at";

#[derive(FromRow)]
struct VerificationRow {
    #[sqlx(flatten)]
    verification: VerificationModel,
    total_count: i64,
}

#[derive(Clone)]
pub struct VerificationRepository {
    db: ConnectionPool,
}

impl VerificationRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VerificationRepositoryTrait for VerificationRepository {
    async fn find_by_user(
        &self,
        user_id: i32,
    ) -> Result<Option<VerificationModel>, RepositoryError> {
        let sql = format!("SELECT {VERIFICATION_COLUMNS} FROM verifications WHERE user_id = $1");

        sqlx::query_as::<_, VerificationModel>(&sql)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch verification for user {user_id}: {:?}", e);
                RepositoryError::from(e)
            })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<VerificationModel>, RepositoryError> {
        let sql =
            format!("SELECT {VERIFICATION_COLUMNS} FROM verifications WHERE verification_id = $1");

        sqlx::query_as::<_, VerificationModel>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch verification {id}: {:?}", e);
                RepositoryError::from(e)
            })
    }

    async fn find_all(
        &self,
        req: &FindAllVerifications,
    ) -> Result<(Vec<VerificationModel>, i64), RepositoryError> {
        info!("🔍 Fetching verifications with status: {:?}", req.status);

        let limit = i64::from(req.page_size);
        let offset = Pagination::offset(req.page, req.page_size);

        let sql = format!(
            r#"
            SELECT {VERIFICATION_COLUMNS}, COUNT(*) OVER() AS total_count
            FROM verifications
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY created_at ASC, verification_id ASC
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, VerificationRow>(&sql)
            .bind(req.status.map(|s| s.as_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch verifications: {:?}", e);
                RepositoryError::from(e)
            })?;

        if needs_total_count(rows.len(), offset) {
            let total = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM verifications WHERE ($1::TEXT IS NULL OR status = $1)",
            )
            .bind(req.status.map(|s| s.as_str()))
            .fetch_one(&self.db)
            .await
            .map_err(RepositoryError::from)?;

            return Ok((Vec::new(), total));
        }

        let total = rows.first().map(|r| r.total_count).unwrap_or(0);
        let items = rows.into_iter().map(|r| r.verification).collect();

        Ok((items, total))
    }

    async fn upsert_pending(
        &self,
        user_id: i32,
        document_url: &str,
    ) -> Result<VerificationModel, RepositoryError> {
        info!("📄 Storing verification document for user {user_id}");

        let sql = format!(
            r#"
            INSERT INTO verifications (user_id, document_url, status, created_at, updated_at)
            VALUES ($1, $2, 'Pending', current_timestamp, current_timestamp)
            ON CONFLICT (user_id) DO UPDATE
            SET document_url = EXCLUDED.document_url,
                status = 'Pending',
                remarks = NULL,
                updated_at = current_timestamp
            RETURNING {VERIFICATION_COLUMNS}
            "#
        );

        sqlx::query_as::<_, VerificationModel>(&sql)
            .bind(user_id)
            .bind(document_url)
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to store verification for user {user_id}: {:?}", e);
                RepositoryError::from(e)
            })
    }

    async fn update_status(
        &self,
        id: i32,
        status: VerificationStatus,
        remarks: Option<&str>,
    ) -> Result<VerificationModel, RepositoryError> {
        info!("📝 Marking verification {id} as {status}");

        let sql = format!(
            r#"
            UPDATE verifications
            SET status = $2, remarks = $3, updated_at = current_timestamp
            WHERE verification_id = $1
            RETURNING {VERIFICATION_COLUMNS}
            "#
        );

        sqlx::query_as::<_, VerificationModel>(&sql)
            .bind(id)
            .bind(status.as_str())
            .bind(remarks)
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to update verification {id}: {:?}", e);
                RepositoryError::from(e)
            })
    }
}
