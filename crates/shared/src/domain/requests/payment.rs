use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct VerifyPaymentRequest {
    #[validate(range(min = 1, message = "order_id is required"))]
    pub order_id: i32,

    #[validate(length(min = 1, message = "gateway_order_id is required"))]
    pub gateway_order_id: String,

    #[validate(length(min = 1, message = "gateway_payment_id is required"))]
    pub gateway_payment_id: String,

    #[validate(length(min = 1, message = "gateway_signature is required"))]
    pub gateway_signature: String,
}

/// Body of the gateway's order-creation call.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayOrderRequest {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub status: String,
}
