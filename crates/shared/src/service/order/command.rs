use super::{order_not_found, order_status};
use crate::{
    abstract_trait::{
        DynOrderCommandRepository, DynOrderQueryRepository, DynPaymentGateway,
        DynSpotQueryRepository, DynVehicleRepository, OrderCommandServiceTrait,
    },
    cache::CacheStore,
    domain::{
        Session,
        requests::{CreateOrderRecord, CreateOrderRequest, GatewayOrderRequest},
        responses::{ApiResponse, OrderResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::{Order as OrderModel, OrderStatus},
    service::spot::spot_cache_key,
    utils::{Method, ServiceTracer, booking_amount},
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

const BOOKING_CURRENCY: &str = "INR";
const MAX_BOOKING_DAYS: i64 = 30;
const START_GRACE_MINUTES: i64 = 5;

pub struct OrderCommandService {
    command: DynOrderCommandRepository,
    query: DynOrderQueryRepository,
    spot_query: DynSpotQueryRepository,
    vehicle: DynVehicleRepository,
    gateway: DynPaymentGateway,
    cache_store: Arc<CacheStore>,
    tracer: ServiceTracer,
}

pub struct OrderCommandServiceDeps {
    pub command: DynOrderCommandRepository,
    pub query: DynOrderQueryRepository,
    pub spot_query: DynSpotQueryRepository,
    pub vehicle: DynVehicleRepository,
    pub gateway: DynPaymentGateway,
    pub cache_store: Arc<CacheStore>,
    pub registry: Arc<Mutex<Registry>>,
}

impl OrderCommandService {
    pub async fn new(deps: OrderCommandServiceDeps) -> Self {
        let OrderCommandServiceDeps {
            command,
            query,
            spot_query,
            vehicle,
            gateway,
            cache_store,
            registry,
        } = deps;

        let tracer = ServiceTracer::new("order-command-service", "order", &registry).await;

        Self {
            command,
            query,
            spot_query,
            vehicle,
            gateway,
            cache_store,
            tracer,
        }
    }

    fn check_window(req: &CreateOrderRequest) -> Result<(), ServiceError> {
        if req.end_time <= req.start_time {
            return Err(ServiceError::BadRequest(
                "end_time must be after start_time".to_string(),
            ));
        }
        if req.start_time < Utc::now() - Duration::minutes(START_GRACE_MINUTES) {
            return Err(ServiceError::BadRequest(
                "start_time cannot be in the past".to_string(),
            ));
        }
        if req.end_time - req.start_time > Duration::days(MAX_BOOKING_DAYS) {
            return Err(ServiceError::BadRequest(format!(
                "A booking cannot be longer than {MAX_BOOKING_DAYS} days"
            )));
        }
        Ok(())
    }

    /// Validates the request and prices it against the live spot.
    async fn prepare(
        &self,
        session: &Session,
        req: &CreateOrderRequest,
    ) -> Result<CreateOrderRecord, ServiceError> {
        Self::check_window(req)?;

        self.vehicle
            .find_by_id(req.vehicle_id)
            .await?
            .filter(|v| v.user_id == session.user_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Vehicle with id {} not found", req.vehicle_id))
            })?;

        let spot = self
            .spot_query
            .find_by_id(req.spot_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Spot with id {} not found", req.spot_id)))?;

        let amount = booking_amount(req.start_time, req.end_time, spot.hourly_rate, spot.daily_rate)
            .ok_or_else(|| ServiceError::BadRequest("Unable to price this booking".to_string()))?;

        Ok(CreateOrderRecord {
            user_id: session.user_id,
            spot_id: spot.spot_id,
            vehicle_id: req.vehicle_id,
            start_time: req.start_time,
            end_time: req.end_time,
            amount,
            currency: BOOKING_CURRENCY.to_string(),
        })
    }

    /// Reserves a slot, then opens the matching gateway order. A gateway failure cancels
    /// the reservation.
    async fn book(&self, record: &CreateOrderRecord) -> Result<OrderModel, ServiceError> {
        let order = self
            .command
            .create_booking(record)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
                RepositoryError::NotFound => {
                    ServiceError::NotFound(format!("Spot with id {} not found", record.spot_id))
                }
                other => ServiceError::Repo(other),
            })?;

        self.invalidate_spot(order.spot_id).await;

        let gateway_req = GatewayOrderRequest {
            amount: order.amount,
            currency: order.currency.clone(),
            receipt: format!("order_{}", order.order_id),
        };

        let attached = match self.gateway.create_order(&gateway_req).await {
            Ok(gateway_order) => self
                .command
                .attach_gateway_order(order.order_id, &gateway_order.id)
                .await
                .map_err(ServiceError::from),
            Err(e) => Err(e),
        };

        match attached {
            Ok(order) => Ok(order),
            Err(e) => {
                error!("❌ Rolling back reservation of order {}: {e}", order.order_id);
                if let Err(release_err) = self
                    .command
                    .release(order.order_id, &[OrderStatus::Created], OrderStatus::Cancelled)
                    .await
                {
                    error!(
                        "❌ Failed to release slot of order {}: {release_err:?}",
                        order.order_id
                    );
                }
                self.invalidate_spot(order.spot_id).await;
                Err(e)
            }
        }
    }

    async fn invalidate_spot(&self, spot_id: i32) {
        self.cache_store
            .delete_from_cache(&spot_cache_key(spot_id))
            .await;
    }

    async fn transition(
        &self,
        order: &OrderModel,
        from: &[OrderStatus],
        to: OrderStatus,
    ) -> Result<OrderModel, ServiceError> {
        let current = order_status(order)?;
        if !current.can_transition_to(to) {
            return Err(ServiceError::Conflict(format!(
                "Order is {current} and cannot be {to}"
            )));
        }

        let updated = self
            .command
            .release(order.order_id, from, to)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
                other => ServiceError::Repo(other),
            })?;

        self.invalidate_spot(updated.spot_id).await;
        Ok(updated)
    }

    async fn load(&self, id: i32) -> Result<OrderModel, ServiceError> {
        self.query
            .find_by_id(id)
            .await?
            .ok_or_else(|| order_not_found(id))
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn create(
        &self,
        session: &Session,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!(
            "🅿️ Parker {} is booking spot {} with vehicle {}",
            session.user_id, req.spot_id, req.vehicle_id
        );

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "CreateOrder",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("spot.id", req.spot_id.to_string()),
                KeyValue::new("user.id", session.user_id.to_string()),
            ],
        );

        let record = match self.prepare(session, req).await {
            Ok(record) => record,
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, &e.to_string());
                return Err(e);
            }
        };

        match self.book(&record).await {
            Ok(order) => {
                info!(
                    "✅ Order {} created for {} paise",
                    order.order_id, order.amount
                );
                self.tracer.success(&tracing_ctx, method, "Order created");
                Ok(ApiResponse::success(
                    "Booking created, complete the payment to confirm",
                    OrderResponse::from(order),
                ))
            }
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, &e.to_string());
                Err(e)
            }
        }
    }

    async fn cancel(
        &self,
        session: &Session,
        id: i32,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🚫 User {} is cancelling order {id}", session.user_id);

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "CancelOrder",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("order.id", id.to_string()),
            ],
        );

        let result: Result<OrderModel, ServiceError> = async {
            let order = self.load(id).await?;
            if order.user_id != session.user_id {
                return Err(ServiceError::Forbidden(
                    "Only the parker who booked can cancel this order".to_string(),
                ));
            }
            self.transition(
                &order,
                &[OrderStatus::Created, OrderStatus::Paid],
                OrderStatus::Cancelled,
            )
            .await
        }
        .await;

        match result {
            Ok(order) => {
                self.tracer.success(&tracing_ctx, method, "Order cancelled");
                Ok(ApiResponse::success(
                    "Order cancelled successfully",
                    OrderResponse::from(order),
                ))
            }
            Err(e) => {
                warn!("⚠️ Cancel of order {id} refused: {e}");
                self.tracer.error(&tracing_ctx, method, &e.to_string());
                Err(e)
            }
        }
    }

    async fn complete(
        &self,
        session: &Session,
        id: i32,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🏁 User {} is completing order {id}", session.user_id);

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "CompleteOrder",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("order.id", id.to_string()),
            ],
        );

        let result: Result<OrderModel, ServiceError> = async {
            let order = self.load(id).await?;
            let owner_id = self.spot_query.find_owner_id(order.spot_id).await?;
            if owner_id != Some(session.user_id) && !session.is_admin() {
                return Err(ServiceError::Forbidden(
                    "Only the spot owner can complete this order".to_string(),
                ));
            }
            self.transition(&order, &[OrderStatus::Paid], OrderStatus::Completed)
                .await
        }
        .await;

        match result {
            Ok(order) => {
                self.tracer.success(&tracing_ctx, method, "Order completed");
                Ok(ApiResponse::success(
                    "Order completed successfully",
                    OrderResponse::from(order),
                ))
            }
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, &e.to_string());
                Err(e)
            }
        }
    }
}
