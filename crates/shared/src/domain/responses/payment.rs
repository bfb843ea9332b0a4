use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What the client-side checkout widget needs to open a payment.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CheckoutResponse {
    pub key_id: String,
    pub order_id: i32,
    pub gateway_order_id: String,
    pub amount: i64,
    pub currency: String,
}
