use crate::model::Order;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderResponse {
    pub id: i32,
    pub user_id: i32,
    pub spot_id: i32,
    pub vehicle_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Order> for OrderResponse {
    fn from(value: Order) -> Self {
        OrderResponse {
            id: value.order_id,
            user_id: value.user_id,
            spot_id: value.spot_id,
            vehicle_id: value.vehicle_id,
            start_time: value.start_time,
            end_time: value.end_time,
            amount: value.amount,
            currency: value.currency,
            status: value.status,
            gateway_order_id: value.gateway_order_id,
            gateway_payment_id: value.gateway_payment_id,
            created_at: value.created_at.map(|dt| dt.to_string()),
            updated_at: value.updated_at.map(|dt| dt.to_string()),
        }
    }
}
