use crate::{model::Spot, utils::map_url};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SpotResponse {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub address: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub hourly_rate: i64,
    pub daily_rate: i64,
    pub total_spots: i32,
    pub available_spots: i32,
    pub features: Vec<String>,
    pub image_url: Option<String>,
    pub map_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl SpotResponse {
    pub fn with_distance(mut self, distance_km: f64) -> Self {
        self.distance_km = Some((distance_km * 100.0).round() / 100.0);
        self
    }
}

impl From<Spot> for SpotResponse {
    fn from(value: Spot) -> Self {
        SpotResponse {
            id: value.spot_id,
            owner_id: value.owner_id,
            map_url: map_url(value.latitude, value.longitude),
            title: value.title,
            address: value.address,
            city: value.city,
            latitude: value.latitude,
            longitude: value.longitude,
            hourly_rate: value.hourly_rate,
            daily_rate: value.daily_rate,
            total_spots: value.total_spots,
            available_spots: value.available_spots,
            features: value.features,
            image_url: value.image_url,
            distance_km: None,
            created_at: value.created_at.map(|dt| dt.to_string()),
            updated_at: value.updated_at.map(|dt| dt.to_string()),
        }
    }
}
