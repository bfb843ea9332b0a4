use super::ORDER_COLUMNS;
use crate::{
    abstract_trait::OrderCommandRepositoryTrait,
    config::ConnectionPool,
    domain::requests::CreateOrderRecord,
    errors::RepositoryError,
    model::{Order as OrderModel, OrderStatus},
};
use async_trait::async_trait;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn create_booking(&self, req: &CreateOrderRecord) -> Result<OrderModel, RepositoryError> {
        info!(
            "🅿️ Reserving spot {} for user {} ({} → {})",
            req.spot_id, req.user_id, req.start_time, req.end_time
        );

        let mut tx = self.db.begin().await.map_err(|e| {
            error!("❌ Failed to begin booking transaction: {:?}", e);
            RepositoryError::from(e)
        })?;

        let reserved = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE spots
            SET available_spots = available_spots - 1, updated_at = current_timestamp
            WHERE spot_id = $1 AND deleted_at IS NULL AND available_spots > 0
            RETURNING spot_id
            "#,
        )
        .bind(req.spot_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        if reserved.is_none() {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM spots WHERE spot_id = $1 AND deleted_at IS NULL)",
            )
            .bind(req.spot_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

            tx.rollback().await.map_err(RepositoryError::from)?;

            if exists {
                warn!("⚠️ Spot {} has no free slots", req.spot_id);
                return Err(RepositoryError::Conflict(
                    "No slots available for this spot".to_string(),
                ));
            }
            return Err(RepositoryError::NotFound);
        }

        let sql = format!(
            r#"
            INSERT INTO orders (
                user_id, spot_id, vehicle_id, start_time, end_time, amount, currency,
                status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, current_timestamp, current_timestamp)
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let order = sqlx::query_as::<_, OrderModel>(&sql)
            .bind(req.user_id)
            .bind(req.spot_id)
            .bind(req.vehicle_id)
            .bind(req.start_time)
            .bind(req.end_time)
            .bind(req.amount)
            .bind(&req.currency)
            .bind(OrderStatus::Created.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                error!("❌ Failed to insert order for spot {}: {:?}", req.spot_id, e);
                RepositoryError::from(e)
            })?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!("✅ Order {} reserved on spot {}", order.order_id, order.spot_id);

        Ok(order)
    }

    async fn attach_gateway_order(
        &self,
        order_id: i32,
        gateway_order_id: &str,
    ) -> Result<OrderModel, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE orders
            SET gateway_order_id = $2, updated_at = current_timestamp
            WHERE order_id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, OrderModel>(&sql)
            .bind(order_id)
            .bind(gateway_order_id)
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to attach gateway order to {order_id}: {:?}", e);
                RepositoryError::from(e)
            })
    }

    async fn mark_paid(
        &self,
        order_id: i32,
        gateway_payment_id: &str,
    ) -> Result<OrderModel, RepositoryError> {
        info!("💳 Marking order {order_id} as paid");

        let sql = format!(
            r#"
            UPDATE orders
            SET status = $3, gateway_payment_id = $2, updated_at = current_timestamp
            WHERE order_id = $1 AND status = $4
            RETURNING {ORDER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, OrderModel>(&sql)
            .bind(order_id)
            .bind(gateway_payment_id)
            .bind(OrderStatus::Paid.as_str())
            .bind(OrderStatus::Created.as_str())
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to mark order {order_id} paid: {:?}", e);
                RepositoryError::from(e)
            })?
            .ok_or_else(|| RepositoryError::Conflict("Order is not awaiting payment".to_string()))
    }

    async fn release(
        &self,
        order_id: i32,
        from: &[OrderStatus],
        to: OrderStatus,
    ) -> Result<OrderModel, RepositoryError> {
        info!("🔓 Moving order {order_id} to {to} and releasing its slot");

        let from: Vec<&str> = from.iter().map(OrderStatus::as_str).collect();

        let mut tx = self.db.begin().await.map_err(|e| {
            error!("❌ Failed to begin release transaction: {:?}", e);
            RepositoryError::from(e)
        })?;

        let sql = format!(
            r#"
            UPDATE orders
            SET status = $2, updated_at = current_timestamp
            WHERE order_id = $1 AND status = ANY($3)
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let order = sqlx::query_as::<_, OrderModel>(&sql)
            .bind(order_id)
            .bind(to.as_str())
            .bind(&from)
            .fetch_optional(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

        let Some(order) = order else {
            tx.rollback().await.map_err(RepositoryError::from)?;
            return Err(RepositoryError::Conflict(format!(
                "Order cannot move to {to} from its current status"
            )));
        };

        sqlx::query(
            r#"
            UPDATE spots
            SET available_spots = LEAST(available_spots + 1, total_spots),
                updated_at = current_timestamp
            WHERE spot_id = $1
            "#,
        )
        .bind(order.spot_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("❌ Failed to release slot on spot {}: {:?}", order.spot_id, e);
            RepositoryError::from(e)
        })?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(order)
    }
}
