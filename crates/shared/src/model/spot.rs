use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Spot {
    pub spot_id: i32,
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
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub deleted_at: Option<NaiveDateTime>,
}
