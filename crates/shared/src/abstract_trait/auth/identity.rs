use crate::{
    domain::{
        Session,
        responses::{ApiResponse, TokenResponse, UserResponse},
    },
    errors::ServiceError,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynIdentityService = Arc<dyn IdentityServiceTrait + Send + Sync>;

#[async_trait]
pub trait IdentityServiceTrait {
    /// Resolves an access token to a live, unblocked user.
    async fn authenticate(&self, access_token: &str) -> Result<Session, ServiceError>;
    async fn refresh_token(&self, token: &str) -> Result<ApiResponse<TokenResponse>, ServiceError>;
    async fn get_me(&self, id: i32) -> Result<ApiResponse<UserResponse>, ServiceError>;
    async fn logout(&self, id: i32) -> Result<ApiResponse<()>, ServiceError>;
}
