use crate::domain::requests::user::{default_page, default_page_size};
use crate::model::OrderStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

fn validate_time_range(req: &CreateOrderRequest) -> Result<(), ValidationError> {
    if req.end_time <= req.start_time {
        return Err(ValidationError::new("end_time")
            .with_message("end_time must be after start_time".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_time_range"))]
pub struct CreateOrderRequest {
    #[validate(range(min = 1, message = "spot_id is required"))]
    pub spot_id: i32,

    #[validate(range(min = 1, message = "vehicle_id is required"))]
    pub vehicle_id: i32,

    pub start_time: DateTime<Utc>,

    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateOrderRecord {
    pub user_id: i32,
    pub spot_id: i32,
    pub vehicle_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
pub struct FindAllOrders {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 100000, message = "Page must be between 1 and 100000"))]
    pub page: i32,

    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub page_size: i32,

    /// Restrict to one status, e.g. `paid`.
    pub status: Option<OrderStatus>,
}
