use crate::errors::ServiceError;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynTokenService = Arc<dyn TokenServiceTrait + Send + Sync>;

#[async_trait]
pub trait TokenServiceTrait {
    async fn create_access_token(&self, id: i32) -> Result<String, ServiceError>;
    /// Issues and persists a refresh token.
    async fn create_refresh_token(&self, id: i32) -> Result<String, ServiceError>;
}
