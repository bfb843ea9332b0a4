use crate::model::Vehicle;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct VehicleResponse {
    pub id: i32,
    pub plate_number: String,
    pub vehicle_type: String,
    pub model: Option<String>,
    pub color: Option<String>,
    pub created_at: Option<String>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(value: Vehicle) -> Self {
        VehicleResponse {
            id: value.vehicle_id,
            plate_number: value.plate_number,
            vehicle_type: value.vehicle_type,
            model: value.model,
            color: value.color,
            created_at: value.created_at.map(|dt| dt.to_string()),
        }
    }
}
