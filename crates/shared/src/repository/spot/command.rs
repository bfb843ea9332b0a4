use super::SPOT_COLUMNS;
use crate::{
    abstract_trait::SpotCommandRepositoryTrait,
    config::ConnectionPool,
    domain::requests::{CreateSpotRecord, UpdateSpotRecord},
    errors::RepositoryError,
    model::Spot as SpotModel,
};
use async_trait::async_trait;
use tracing::{error, info};

#[derive(Clone)]
pub struct SpotCommandRepository {
    db: ConnectionPool,
}

impl SpotCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SpotCommandRepositoryTrait for SpotCommandRepository {
    async fn create(&self, req: &CreateSpotRecord) -> Result<SpotModel, RepositoryError> {
        info!("🅿️ Creating spot '{}' for owner {}", req.title, req.owner_id);

        let sql = format!(
            r#"
            INSERT INTO spots (
                owner_id, title, address, city, latitude, longitude, hourly_rate, daily_rate,
                total_spots, available_spots, features, image_url, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, current_timestamp, current_timestamp)
            RETURNING {SPOT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, SpotModel>(&sql)
            .bind(req.owner_id)
            .bind(&req.title)
            .bind(&req.address)
            .bind(&req.city)
            .bind(req.latitude)
            .bind(req.longitude)
            .bind(req.hourly_rate)
            .bind(req.daily_rate)
            .bind(req.total_spots)
            .bind(req.available_spots)
            .bind(req.features.as_slice())
            .bind(req.image_url.as_deref())
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to create spot '{}': {:?}", req.title, e);
                RepositoryError::from(e)
            })
    }

    async fn update(&self, req: &UpdateSpotRecord) -> Result<SpotModel, RepositoryError> {
        info!("✏️ Updating spot {}", req.spot_id);

        let sql = format!(
            r#"
            UPDATE spots
            SET title = COALESCE($2, title),
                address = COALESCE($3, address),
                city = COALESCE($4, city),
                latitude = COALESCE($5, latitude),
                longitude = COALESCE($6, longitude),
                hourly_rate = COALESCE($7, hourly_rate),
                daily_rate = COALESCE($8, daily_rate),
                available_spots = CASE
                    WHEN $10::INT IS NOT NULL THEN $10
                    WHEN $9::INT IS NOT NULL THEN available_spots + ($9 - total_spots)
                    ELSE available_spots
                END,
                total_spots = COALESCE($9, total_spots),
                features = COALESCE($11::TEXT[], features),
                image_url = COALESCE($12, image_url),
                updated_at = current_timestamp
            WHERE spot_id = $1 AND deleted_at IS NULL
            RETURNING {SPOT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, SpotModel>(&sql)
            .bind(req.spot_id)
            .bind(req.title.as_deref())
            .bind(req.address.as_deref())
            .bind(req.city.as_deref())
            .bind(req.latitude)
            .bind(req.longitude)
            .bind(req.hourly_rate)
            .bind(req.daily_rate)
            .bind(req.total_spots)
            .bind(req.available_spots)
            .bind(req.features.as_deref())
            .bind(req.image_url.as_deref())
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to update spot {}: {:?}", req.spot_id, e);
                RepositoryError::from(e)
            })
    }

    async fn trash(&self, id: i32) -> Result<SpotModel, RepositoryError> {
        info!("🗑️ Soft deleting spot {id}");

        let sql = format!(
            r#"
            UPDATE spots
            SET deleted_at = current_timestamp, updated_at = current_timestamp
            WHERE spot_id = $1 AND deleted_at IS NULL
            RETURNING {SPOT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, SpotModel>(&sql)
            .bind(id)
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to delete spot {id}: {:?}", e);
                RepositoryError::from(e)
            })
    }
}
