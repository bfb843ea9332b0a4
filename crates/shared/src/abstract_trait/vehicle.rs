use crate::{
    domain::{
        Session,
        requests::CreateVehicleRequest,
        responses::{ApiResponse, VehicleResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::Vehicle as VehicleModel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynVehicleRepository = Arc<dyn VehicleRepositoryTrait + Send + Sync>;
pub type DynVehicleService = Arc<dyn VehicleServiceTrait + Send + Sync>;

#[async_trait]
pub trait VehicleRepositoryTrait {
    /// `plate_number` must already be normalized.
    async fn create(
        &self,
        user_id: i32,
        plate_number: &str,
        req: &CreateVehicleRequest,
    ) -> Result<VehicleModel, RepositoryError>;
    async fn find_by_user(&self, user_id: i32) -> Result<Vec<VehicleModel>, RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<VehicleModel>, RepositoryError>;
    async fn find_by_plate(
        &self,
        user_id: i32,
        plate_number: &str,
    ) -> Result<Option<VehicleModel>, RepositoryError>;
    async fn trash(&self, id: i32) -> Result<VehicleModel, RepositoryError>;
}

#[async_trait]
pub trait VehicleServiceTrait {
    async fn create(
        &self,
        session: &Session,
        req: &CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, ServiceError>;
    async fn find_mine(
        &self,
        session: &Session,
    ) -> Result<ApiResponse<Vec<VehicleResponse>>, ServiceError>;
    async fn find_by_id(
        &self,
        session: &Session,
        id: i32,
    ) -> Result<ApiResponse<VehicleResponse>, ServiceError>;
    async fn delete(&self, session: &Session, id: i32) -> Result<ApiResponse<()>, ServiceError>;
}
