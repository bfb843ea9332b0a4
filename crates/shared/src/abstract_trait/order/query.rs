use crate::{
    domain::{
        Session,
        requests::FindAllOrders,
        responses::{ApiResponse, ApiResponsePagination, OrderResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::Order as OrderModel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynOrderQueryRepository = Arc<dyn OrderQueryRepositoryTrait + Send + Sync>;
pub type DynOrderQueryService = Arc<dyn OrderQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryRepositoryTrait {
    async fn find_by_id(&self, id: i32) -> Result<Option<OrderModel>, RepositoryError>;
    async fn find_by_user(
        &self,
        user_id: i32,
        req: &FindAllOrders,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError>;
    async fn find_by_spot_owner(
        &self,
        owner_id: i32,
        req: &FindAllOrders,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError>;
}

#[async_trait]
pub trait OrderQueryServiceTrait {
    async fn find_mine(
        &self,
        session: &Session,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError>;
    async fn find_for_owner(
        &self,
        session: &Session,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError>;
    async fn find_by_id(
        &self,
        session: &Session,
        id: i32,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
}
