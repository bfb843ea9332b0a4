use crate::{
    domain::{
        Session,
        requests::{FindAllSpots, SearchSpotsQuery, SpotSearchFilter},
        responses::{ApiResponse, ApiResponsePagination, SpotResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::Spot as SpotModel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynSpotQueryRepository = Arc<dyn SpotQueryRepositoryTrait + Send + Sync>;
pub type DynSpotQueryService = Arc<dyn SpotQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait SpotQueryRepositoryTrait {
    /// Live (not soft-deleted) spot.
    async fn find_by_id(&self, id: i32) -> Result<Option<SpotModel>, RepositoryError>;
    /// Owner of a spot, deleted or not.
    async fn find_owner_id(&self, id: i32) -> Result<Option<i32>, RepositoryError>;
    async fn search(
        &self,
        filter: &SpotSearchFilter,
    ) -> Result<(Vec<SpotModel>, i64), RepositoryError>;
    async fn find_by_owner(
        &self,
        owner_id: i32,
        req: &FindAllSpots,
    ) -> Result<(Vec<SpotModel>, i64), RepositoryError>;
}

#[async_trait]
pub trait SpotQueryServiceTrait {
    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<SpotResponse>, ServiceError>;
    async fn search(
        &self,
        query: &SearchSpotsQuery,
    ) -> Result<ApiResponsePagination<Vec<SpotResponse>>, ServiceError>;
    async fn find_mine(
        &self,
        session: &Session,
        req: &FindAllSpots,
    ) -> Result<ApiResponsePagination<Vec<SpotResponse>>, ServiceError>;
}
