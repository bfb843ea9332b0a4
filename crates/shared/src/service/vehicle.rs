use crate::{
    abstract_trait::{DynVehicleRepository, VehicleServiceTrait},
    domain::{
        Session,
        requests::{CreateVehicleRequest, normalize_plate},
        responses::{ApiResponse, VehicleResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::Vehicle as VehicleModel,
    utils::{Method, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

pub struct VehicleService {
    repository: DynVehicleRepository,
    tracer: ServiceTracer,
}

impl VehicleService {
    pub async fn new(repository: DynVehicleRepository, registry: &Arc<Mutex<Registry>>) -> Self {
        let tracer = ServiceTracer::new("vehicle-service", "vehicle", registry).await;
        Self { repository, tracer }
    }

    /// Another user's vehicle is reported as missing.
    async fn owned(&self, session: &Session, id: i32) -> Result<VehicleModel, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|v| v.user_id == session.user_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Vehicle with id {id} not found")))
    }
}

#[async_trait]
impl VehicleServiceTrait for VehicleService {
    async fn create(
        &self,
        session: &Session,
        req: &CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, ServiceError> {
        let plate = normalize_plate(&req.plate_number);

        info!("🚗 User {} is adding vehicle {plate}", session.user_id);

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "CreateVehicle",
            vec![
                KeyValue::new("component", "vehicle"),
                KeyValue::new("vehicle.plate", plate.clone()),
                KeyValue::new("vehicle.type", req.vehicle_type.as_str()),
            ],
        );

        match self.repository.find_by_plate(session.user_id, &plate).await {
            Ok(None) => {}
            Ok(Some(_)) => {
                self.tracer.error(&tracing_ctx, method, "Duplicate plate");
                return Err(ServiceError::Conflict(format!(
                    "Vehicle {plate} is already registered"
                )));
            }
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, "Database error");
                return Err(ServiceError::Repo(e));
            }
        }

        let vehicle = match self.repository.create(session.user_id, &plate, req).await {
            Ok(vehicle) => vehicle,
            Err(RepositoryError::AlreadyExists(_)) => {
                self.tracer.error(&tracing_ctx, method, "Duplicate plate");
                return Err(ServiceError::Conflict(format!(
                    "Vehicle {plate} is already registered"
                )));
            }
            Err(e) => {
                error!("❌ Failed to create vehicle {plate}: {e:?}");
                self.tracer
                    .error(&tracing_ctx, method, "Failed to create vehicle");
                return Err(ServiceError::Repo(e));
            }
        };

        self.tracer.success(&tracing_ctx, method, "Vehicle added");

        Ok(ApiResponse::success(
            "Vehicle added successfully",
            VehicleResponse::from(vehicle),
        ))
    }

    async fn find_mine(
        &self,
        session: &Session,
    ) -> Result<ApiResponse<Vec<VehicleResponse>>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "FindMyVehicles",
            vec![
                KeyValue::new("component", "vehicle"),
                KeyValue::new("user.id", session.user_id.to_string()),
            ],
        );

        match self.repository.find_by_user(session.user_id).await {
            Ok(vehicles) => {
                self.tracer.success(&tracing_ctx, method, "Vehicles listed");
                Ok(ApiResponse::success(
                    "Vehicles retrieved successfully",
                    vehicles.into_iter().map(VehicleResponse::from).collect(),
                ))
            }
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, "Database error");
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn find_by_id(
        &self,
        session: &Session,
        id: i32,
    ) -> Result<ApiResponse<VehicleResponse>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "FindVehicleById",
            vec![
                KeyValue::new("component", "vehicle"),
                KeyValue::new("vehicle.id", id.to_string()),
            ],
        );

        match self.owned(session, id).await {
            Ok(vehicle) => {
                self.tracer.success(&tracing_ctx, method, "Vehicle found");
                Ok(ApiResponse::success(
                    "Vehicle retrieved successfully",
                    VehicleResponse::from(vehicle),
                ))
            }
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, &e.to_string());
                Err(e)
            }
        }
    }

    async fn delete(&self, session: &Session, id: i32) -> Result<ApiResponse<()>, ServiceError> {
        info!("🗑️ User {} is removing vehicle {id}", session.user_id);

        let method = Method::Delete;
        let tracing_ctx = self.tracer.start(
            "DeleteVehicle",
            vec![
                KeyValue::new("component", "vehicle"),
                KeyValue::new("vehicle.id", id.to_string()),
            ],
        );

        if let Err(e) = self.owned(session, id).await {
            self.tracer.error(&tracing_ctx, method, &e.to_string());
            return Err(e);
        }

        if let Err(e) = self.repository.trash(id).await {
            self.tracer
                .error(&tracing_ctx, method, "Failed to delete vehicle");
            return Err(ServiceError::Repo(e));
        }

        self.tracer.success(&tracing_ctx, method, "Vehicle removed");

        Ok(ApiResponse::success("Vehicle deleted successfully", ()))
    }
}
