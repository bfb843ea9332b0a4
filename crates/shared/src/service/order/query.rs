use super::order_not_found;
use crate::{
    abstract_trait::{DynOrderQueryRepository, DynSpotQueryRepository, OrderQueryServiceTrait},
    domain::{
        Session,
        requests::FindAllOrders,
        responses::{ApiResponse, ApiResponsePagination, OrderResponse, Pagination},
    },
    errors::ServiceError,
    model::Order as OrderModel,
    utils::{Method, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    spot_query: DynSpotQueryRepository,
    tracer: ServiceTracer,
}

impl OrderQueryService {
    pub async fn new(
        query: DynOrderQueryRepository,
        spot_query: DynSpotQueryRepository,
        registry: &Arc<Mutex<Registry>>,
    ) -> Self {
        let tracer = ServiceTracer::new("order-query-service", "order", registry).await;

        Self {
            query,
            spot_query,
            tracer,
        }
    }

    fn paginated(
        orders: Vec<OrderModel>,
        total: i64,
        req: &FindAllOrders,
    ) -> ApiResponsePagination<Vec<OrderResponse>> {
        ApiResponsePagination::success(
            "Orders retrieved successfully",
            orders.into_iter().map(OrderResponse::from).collect(),
            Pagination::new(req.page, req.page_size, total),
        )
    }

    /// The parker, the spot's owner, and administrators may read an order.
    async fn visible(&self, session: &Session, id: i32) -> Result<OrderModel, ServiceError> {
        let order = self
            .query
            .find_by_id(id)
            .await?
            .ok_or_else(|| order_not_found(id))?;

        if order.user_id == session.user_id || session.is_admin() {
            return Ok(order);
        }

        let owner_id = self.spot_query.find_owner_id(order.spot_id).await?;
        if owner_id == Some(session.user_id) {
            Ok(order)
        } else {
            Err(ServiceError::Forbidden(
                "You do not have access to this order".to_string(),
            ))
        }
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_mine(
        &self,
        session: &Session,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "FindMyOrders",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("user.id", session.user_id.to_string()),
            ],
        );

        match self.query.find_by_user(session.user_id, req).await {
            Ok((orders, total)) => {
                self.tracer.success(&tracing_ctx, method, "Orders listed");
                Ok(Self::paginated(orders, total, req))
            }
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, "Database error");
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn find_for_owner(
        &self,
        session: &Session,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "FindOwnerOrders",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("owner.id", session.user_id.to_string()),
            ],
        );

        match self.query.find_by_spot_owner(session.user_id, req).await {
            Ok((orders, total)) => {
                self.tracer.success(&tracing_ctx, method, "Owner orders listed");
                Ok(Self::paginated(orders, total, req))
            }
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, "Database error");
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn find_by_id(
        &self,
        session: &Session,
        id: i32,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "FindOrderById",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("order.id", id.to_string()),
            ],
        );

        match self.visible(session, id).await {
            Ok(order) => {
                self.tracer.success(&tracing_ctx, method, "Order found");
                Ok(ApiResponse::success(
                    "Order retrieved successfully",
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
