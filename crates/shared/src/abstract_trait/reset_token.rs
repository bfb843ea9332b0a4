use crate::{
    domain::requests::CreateResetTokenRequest, errors::RepositoryError,
    model::ResetToken as ResetTokenModel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynResetTokenRepository = Arc<dyn ResetTokenRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ResetTokenRepositoryTrait {
    async fn create_reset_token(
        &self,
        request: &CreateResetTokenRequest,
    ) -> Result<ResetTokenModel, RepositoryError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<ResetTokenModel>, RepositoryError>;
    async fn delete_by_user_id(&self, user_id: i32) -> Result<(), RepositoryError>;
}
