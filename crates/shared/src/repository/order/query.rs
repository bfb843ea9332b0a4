use super::ORDER_COLUMNS;
use crate::{
    abstract_trait::OrderQueryRepositoryTrait,
    config::ConnectionPool,
    domain::{requests::FindAllOrders, responses::Pagination},
    errors::RepositoryError,
    model::Order as OrderModel,
    repository::needs_total_count,
};
use async_trait::async_trait;
use sqlx::FromRow;
use tracing::{error, info};

#[derive(FromRow)]
struct OrderRow {
    #[sqlx(flatten)]
    order: OrderModel,
    total_count: i64,
}

fn split_rows(rows: Vec<OrderRow>) -> (Vec<OrderModel>, i64) {
    let total = rows.first().map(|r| r.total_count).unwrap_or(0);
    (rows.into_iter().map(|r| r.order).collect(), total)
}

fn paging(req: &FindAllOrders) -> (i64, i64) {
    (
        i64::from(req.page_size),
        Pagination::offset(req.page, req.page_size),
    )
}

#[derive(Clone)]
pub struct OrderQueryRepository {
    db: ConnectionPool,
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<OrderModel>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1");

        sqlx::query_as::<_, OrderModel>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch order {id}: {:?}", e);
                RepositoryError::from(e)
            })
    }

    async fn find_by_user(
        &self,
        user_id: i32,
        req: &FindAllOrders,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError> {
        info!("🔍 Fetching orders for user {user_id}");

        let (limit, offset) = paging(req);

        let sql = format!(
            r#"
            SELECT {ORDER_COLUMNS}, COUNT(*) OVER() AS total_count
            FROM orders
            WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY created_at DESC, order_id DESC
            LIMIT $3 OFFSET $4
            "#
        );

        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(user_id)
            .bind(req.status.map(|s| s.as_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch orders for user {user_id}: {:?}", e);
                RepositoryError::from(e)
            })?;

        if needs_total_count(rows.len(), offset) {
            let total = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM orders WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)",
            )
            .bind(user_id)
            .bind(req.status.map(|s| s.as_str()))
            .fetch_one(&self.db)
            .await
            .map_err(RepositoryError::from)?;

            return Ok((Vec::new(), total));
        }

        Ok(split_rows(rows))
    }

    async fn find_by_spot_owner(
        &self,
        owner_id: i32,
        req: &FindAllOrders,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError> {
        info!("🔍 Fetching orders on spots of owner {owner_id}");

        let (limit, offset) = paging(req);

        let sql = r#"
            SELECT o.order_id, o.user_id, o.spot_id, o.vehicle_id, o.start_time, o.end_time,
                   o.amount, o.currency, o.status, o.gateway_order_id, o.gateway_payment_id,
                   o.created_at, o.updated_at,
                   COUNT(*) OVER() AS total_count
            FROM orders o
            JOIN spots s ON s.spot_id = o.spot_id
            WHERE s.owner_id = $1 AND ($2::TEXT IS NULL OR o.status = $2)
            ORDER BY o.created_at DESC, o.order_id DESC
            LIMIT $3 OFFSET $4
        "#;

        let rows = sqlx::query_as::<_, OrderRow>(sql)
            .bind(owner_id)
            .bind(req.status.map(|s| s.as_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch orders for owner {owner_id}: {:?}", e);
                RepositoryError::from(e)
            })?;

        if needs_total_count(rows.len(), offset) {
            let total = sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(*)
                FROM orders o
                JOIN spots s ON s.spot_id = o.spot_id
                WHERE s.owner_id = $1 AND ($2::TEXT IS NULL OR o.status = $2)
                "#,
            )
            .bind(owner_id)
            .bind(req.status.map(|s| s.as_str()))
            .fetch_one(&self.db)
            .await
            .map_err(RepositoryError::from)?;

            return Ok((Vec::new(), total));
        }

        Ok(split_rows(rows))
    }
}
