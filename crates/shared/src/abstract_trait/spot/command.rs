use crate::{
    domain::{
        Session,
        requests::{CreateSpotRecord, CreateSpotRequest, UpdateSpotRecord, UpdateSpotRequest},
        responses::{ApiResponse, SpotResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::Spot as SpotModel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynSpotCommandRepository = Arc<dyn SpotCommandRepositoryTrait + Send + Sync>;
pub type DynSpotCommandService = Arc<dyn SpotCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait SpotCommandRepositoryTrait {
    async fn create(&self, req: &CreateSpotRecord) -> Result<SpotModel, RepositoryError>;
    async fn update(&self, req: &UpdateSpotRecord) -> Result<SpotModel, RepositoryError>;
    async fn trash(&self, id: i32) -> Result<SpotModel, RepositoryError>;
}

#[async_trait]
pub trait SpotCommandServiceTrait {
    async fn create(
        &self,
        session: &Session,
        req: &CreateSpotRequest,
    ) -> Result<ApiResponse<SpotResponse>, ServiceError>;
    async fn update(
        &self,
        session: &Session,
        id: i32,
        req: &UpdateSpotRequest,
    ) -> Result<ApiResponse<SpotResponse>, ServiceError>;
    async fn delete(&self, session: &Session, id: i32) -> Result<ApiResponse<()>, ServiceError>;
}
