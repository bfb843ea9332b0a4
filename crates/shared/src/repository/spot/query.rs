use super::SPOT_COLUMNS;
use crate::{
    abstract_trait::SpotQueryRepositoryTrait,
    config::ConnectionPool,
    domain::{
        requests::{FindAllSpots, SpotSearchFilter},
        responses::Pagination,
    },
    errors::RepositoryError,
    model::Spot as SpotModel,
    repository::{contains_pattern, needs_total_count},
};
use async_trait::async_trait;
use sqlx::FromRow;
use tracing::{error, info};

#[derive(FromRow)]
struct SpotRow {
    #[sqlx(flatten)]
    spot: SpotModel,
    total_count: i64,
}

const SEARCH_WHERE: &str = r#"
    deleted_at IS NULL
      AND ($1::TEXT IS NULL
           OR title ILIKE $1 ESCAPE '\'
           OR address ILIKE $1 ESCAPE '\'
           OR city ILIKE $1 ESCAPE '\')
      AND ($2::TEXT IS NULL OR LOWER(city) = LOWER($2))
      AND (cardinality($3::TEXT[]) = 0 OR features @> $3::TEXT[])
      AND ($4::BIGINT IS NULL OR hourly_rate <= $4)
      AND available_spots >= $5
      AND ($6::FLOAT8 IS NULL OR latitude BETWEEN $6 AND $7::FLOAT8)
      AND ($8::FLOAT8 IS NULL OR longitude BETWEEN $8 AND $9::FLOAT8)
"#;

fn split_rows(rows: Vec<SpotRow>) -> (Vec<SpotModel>, i64) {
    let total = rows.first().map(|r| r.total_count).unwrap_or(0);
    (rows.into_iter().map(|r| r.spot).collect(), total)
}

#[derive(Clone)]
pub struct SpotQueryRepository {
    db: ConnectionPool,
}

impl SpotQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SpotQueryRepositoryTrait for SpotQueryRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<SpotModel>, RepositoryError> {
        let sql =
            format!("SELECT {SPOT_COLUMNS} FROM spots WHERE spot_id = $1 AND deleted_at IS NULL");

        sqlx::query_as::<_, SpotModel>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch spot {id}: {:?}", e);
                RepositoryError::from(e)
            })
    }

    async fn find_owner_id(&self, id: i32) -> Result<Option<i32>, RepositoryError> {
        sqlx::query_scalar::<_, i32>("SELECT owner_id FROM spots WHERE spot_id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(RepositoryError::from)
    }

    async fn search(
        &self,
        filter: &SpotSearchFilter,
    ) -> Result<(Vec<SpotModel>, i64), RepositoryError> {
        info!("🔍 Searching spots: {:?}", filter);

        let sql = format!(
            r#"
            SELECT {SPOT_COLUMNS}, COUNT(*) OVER() AS total_count
            FROM spots
            WHERE {SEARCH_WHERE}
            ORDER BY created_at DESC, spot_id DESC
            LIMIT $10 OFFSET $11
            "#
        );

        let bbox = filter.bbox.as_ref();
        let pattern = filter.search.as_deref().map(contains_pattern);

        let rows = sqlx::query_as::<_, SpotRow>(&sql)
            .bind(pattern.as_deref())
            .bind(filter.city.as_deref())
            .bind(filter.features.as_slice())
            .bind(filter.max_hourly_rate)
            .bind(filter.min_available)
            .bind(bbox.map(|b| b.min_lat))
            .bind(bbox.map(|b| b.max_lat))
            .bind(bbox.map(|b| b.min_lng))
            .bind(bbox.map(|b| b.max_lng))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to search spots: {:?}", e);
                RepositoryError::from(e)
            })?;

        if !needs_total_count(rows.len(), filter.offset) {
            return Ok(split_rows(rows));
        }

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM spots WHERE {SEARCH_WHERE}"
        ))
        .bind(pattern.as_deref())
        .bind(filter.city.as_deref())
        .bind(filter.features.as_slice())
        .bind(filter.max_hourly_rate)
        .bind(filter.min_available)
        .bind(bbox.map(|b| b.min_lat))
        .bind(bbox.map(|b| b.max_lat))
        .bind(bbox.map(|b| b.min_lng))
        .bind(bbox.map(|b| b.max_lng))
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to count spots: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok((Vec::new(), total))
    }

    async fn find_by_owner(
        &self,
        owner_id: i32,
        req: &FindAllSpots,
    ) -> Result<(Vec<SpotModel>, i64), RepositoryError> {
        info!("🔍 Fetching spots for owner {owner_id}");

        let limit = i64::from(req.page_size);
        let offset = Pagination::offset(req.page, req.page_size);

        let sql = format!(
            r#"
            SELECT {SPOT_COLUMNS}, COUNT(*) OVER() AS total_count
            FROM spots
            WHERE owner_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, spot_id DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, SpotRow>(&sql)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch spots for owner {owner_id}: {:?}", e);
                RepositoryError::from(e)
            })?;

        if !needs_total_count(rows.len(), offset) {
            return Ok(split_rows(rows));
        }

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM spots WHERE owner_id = $1 AND deleted_at IS NULL",
        )
        .bind(owner_id)
        .fetch_one(&self.db)
        .await
        .map_err(RepositoryError::from)?;

        Ok((Vec::new(), total))
    }
}
