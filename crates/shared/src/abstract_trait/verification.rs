use crate::{
    domain::{
        Session,
        requests::{FindAllVerifications, ReviewVerificationRequest, SubmitVerificationRequest},
        responses::{ApiResponse, ApiResponsePagination, VerificationResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::{Verification as VerificationModel, VerificationStatus},
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynVerificationRepository = Arc<dyn VerificationRepositoryTrait + Send + Sync>;
pub type DynVerificationService = Arc<dyn VerificationServiceTrait + Send + Sync>;

#[async_trait]
pub trait VerificationRepositoryTrait {
    async fn find_by_user(&self, user_id: i32)
    -> Result<Option<VerificationModel>, RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<VerificationModel>, RepositoryError>;
    async fn find_all(
        &self,
        req: &FindAllVerifications,
    ) -> Result<(Vec<VerificationModel>, i64), RepositoryError>;
    /// Inserts or replaces the user's document and resets it to `Pending`.
    async fn upsert_pending(
        &self,
        user_id: i32,
        document_url: &str,
    ) -> Result<VerificationModel, RepositoryError>;
    async fn update_status(
        &self,
        id: i32,
        status: VerificationStatus,
        remarks: Option<&str>,
    ) -> Result<VerificationModel, RepositoryError>;
}

#[async_trait]
pub trait VerificationServiceTrait {
    async fn submit(
        &self,
        session: &Session,
        req: &SubmitVerificationRequest,
    ) -> Result<ApiResponse<VerificationResponse>, ServiceError>;
    async fn find_mine(
        &self,
        session: &Session,
    ) -> Result<ApiResponse<VerificationResponse>, ServiceError>;
    async fn find_all(
        &self,
        req: &FindAllVerifications,
    ) -> Result<ApiResponsePagination<Vec<VerificationResponse>>, ServiceError>;
    async fn review(
        &self,
        id: i32,
        req: &ReviewVerificationRequest,
    ) -> Result<ApiResponse<VerificationResponse>, ServiceError>;
}
