use crate::{
    domain::{
        Session,
        requests::{GatewayOrder, GatewayOrderRequest, VerifyPaymentRequest},
        responses::{ApiResponse, CheckoutResponse, OrderResponse},
    },
    errors::ServiceError,
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynPaymentGateway = Arc<dyn PaymentGatewayTrait + Send + Sync>;
pub type DynPaymentService = Arc<dyn PaymentServiceTrait + Send + Sync>;

#[async_trait]
pub trait PaymentGatewayTrait {
    /// Public key the checkout widget is opened with.
    fn key_id(&self) -> &str;
    async fn create_order(&self, req: &GatewayOrderRequest) -> Result<GatewayOrder, ServiceError>;
    fn verify_signature(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        signature: &str,
    ) -> bool;
}

#[async_trait]
pub trait PaymentServiceTrait {
    async fn checkout(
        &self,
        session: &Session,
        order_id: i32,
    ) -> Result<ApiResponse<CheckoutResponse>, ServiceError>;
    async fn verify(
        &self,
        session: &Session,
        req: &VerifyPaymentRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
}
