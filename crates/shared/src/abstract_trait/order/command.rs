use crate::{
    domain::{
        Session,
        requests::{CreateOrderRecord, CreateOrderRequest},
        responses::{ApiResponse, OrderResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::{Order as OrderModel, OrderStatus},
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;
pub type DynOrderCommandService = Arc<dyn OrderCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandRepositoryTrait {
    /// Takes one slot from the spot and inserts the order in a single transaction.
    /// `Conflict` when the spot has nothing left, `NotFound` when it is gone.
    async fn create_booking(&self, req: &CreateOrderRecord) -> Result<OrderModel, RepositoryError>;
    async fn attach_gateway_order(
        &self,
        order_id: i32,
        gateway_order_id: &str,
    ) -> Result<OrderModel, RepositoryError>;
    /// Moves a `created` order to `paid`; `Conflict` from any other status.
    async fn mark_paid(
        &self,
        order_id: i32,
        gateway_payment_id: &str,
    ) -> Result<OrderModel, RepositoryError>;
    /// Moves the order from one of `from` to `to` and gives its slot back, atomically.
    async fn release(
        &self,
        order_id: i32,
        from: &[OrderStatus],
        to: OrderStatus,
    ) -> Result<OrderModel, RepositoryError>;
}

#[async_trait]
pub trait OrderCommandServiceTrait {
    async fn create(
        &self,
        session: &Session,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn cancel(
        &self,
        session: &Session,
        id: i32,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn complete(
        &self,
        session: &Session,
        id: i32,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
}
