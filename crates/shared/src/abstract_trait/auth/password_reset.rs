use crate::{
    domain::{requests::CreateResetPasswordRequest, responses::ApiResponse},
    errors::ServiceError,
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynPasswordResetService = Arc<dyn PasswordResetServiceTrait + Send + Sync>;

#[async_trait]
pub trait PasswordResetServiceTrait {
    async fn forgot_password(&self, email: &str) -> Result<ApiResponse<()>, ServiceError>;
    async fn reset_password(
        &self,
        request: &CreateResetPasswordRequest,
    ) -> Result<ApiResponse<()>, ServiceError>;
}
