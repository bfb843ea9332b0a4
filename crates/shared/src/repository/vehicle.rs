use crate::{
    abstract_trait::VehicleRepositoryTrait, config::ConnectionPool,
    domain::requests::CreateVehicleRequest, errors::RepositoryError,
    model::Vehicle as VehicleModel,
};
use async_trait::async_trait;
use tracing::{error, info};

const VEHICLE_COLUMNS: &str = "vehicle_id, user_id, plate_number, vehicle_type, model, color, \
     created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct VehicleRepository {
    db: ConnectionPool,
}

impl VehicleRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VehicleRepositoryTrait for VehicleRepository {
    async fn create(
        &self,
        user_id: i32,
        plate_number: &str,
        req: &CreateVehicleRequest,
    ) -> Result<VehicleModel, RepositoryError> {
        info!("🚗 Registering vehicle {plate_number} for user {user_id}");

        let sql = format!(
            r#"
            INSERT INTO vehicles (user_id, plate_number, vehicle_type, model, color, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, current_timestamp, current_timestamp)
            RETURNING {VEHICLE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, VehicleModel>(&sql)
            .bind(user_id)
            .bind(plate_number)
            .bind(req.vehicle_type.as_str())
            .bind(req.model.as_deref())
            .bind(req.color.as_deref())
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to register vehicle {plate_number}: {:?}", e);
                RepositoryError::from(e)
            })
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<VehicleModel>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {VEHICLE_COLUMNS}
            FROM vehicles
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, vehicle_id DESC
            "#
        );

        sqlx::query_as::<_, VehicleModel>(&sql)
            .bind(user_id)
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch vehicles for user {user_id}: {:?}", e);
                RepositoryError::from(e)
            })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<VehicleModel>, RepositoryError> {
        let sql =
            format!("SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE vehicle_id = $1 AND deleted_at IS NULL");

        sqlx::query_as::<_, VehicleModel>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch vehicle {id}: {:?}", e);
                RepositoryError::from(e)
            })
    }

    async fn find_by_plate(
        &self,
        user_id: i32,
        plate_number: &str,
    ) -> Result<Option<VehicleModel>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {VEHICLE_COLUMNS}
            FROM vehicles
            WHERE user_id = $1 AND plate_number = $2 AND deleted_at IS NULL
            "#
        );

        sqlx::query_as::<_, VehicleModel>(&sql)
            .bind(user_id)
            .bind(plate_number)
            .fetch_optional(&self.db)
            .await
            .map_err(RepositoryError::from)
    }

    async fn trash(&self, id: i32) -> Result<VehicleModel, RepositoryError> {
        info!("🗑️ Removing vehicle {id}");

        let sql = format!(
            r#"
            UPDATE vehicles
            SET deleted_at = current_timestamp, updated_at = current_timestamp
            WHERE vehicle_id = $1 AND deleted_at IS NULL
            RETURNING {VEHICLE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, VehicleModel>(&sql)
            .bind(id)
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to remove vehicle {id}: {:?}", e);
                RepositoryError::from(e)
            })
    }
}
