use crate::{
    config::AdminSeed,
    domain::{
        Session,
        requests::{CreateUserRequest, UpdateProfileRequest},
        responses::{ApiResponse, UserResponse, UserResponseDeleteAt},
    },
    errors::{RepositoryError, ServiceError},
    model::User as UserModel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynUserCommandRepository = Arc<dyn UserCommandRepositoryTrait + Send + Sync>;
pub type DynUserCommandService = Arc<dyn UserCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait UserCommandRepositoryTrait {
    async fn create_user(&self, req: &CreateUserRequest) -> Result<UserModel, RepositoryError>;
    async fn update_profile(
        &self,
        user_id: i32,
        name: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<UserModel, RepositoryError>;
    /// Sets `is_verified` and clears the stored code.
    async fn mark_verified(&self, user_id: i32) -> Result<UserModel, RepositoryError>;
    async fn update_verification_code(
        &self,
        user_id: i32,
        code: &str,
    ) -> Result<UserModel, RepositoryError>;
    async fn update_password(
        &self,
        user_id: i32,
        password: &str,
    ) -> Result<UserModel, RepositoryError>;
    async fn set_blocked(&self, user_id: i32, blocked: bool) -> Result<UserModel, RepositoryError>;
    async fn trash_user(&self, user_id: i32) -> Result<UserModel, RepositoryError>;
}

#[async_trait]
pub trait UserCommandServiceTrait {
    async fn update_profile(
        &self,
        session: &Session,
        req: &UpdateProfileRequest,
    ) -> Result<ApiResponse<UserResponse>, ServiceError>;
    async fn delete_account(&self, session: &Session) -> Result<ApiResponse<()>, ServiceError>;
    async fn set_blocked(
        &self,
        actor: &Session,
        user_id: i32,
        blocked: bool,
    ) -> Result<ApiResponse<UserResponseDeleteAt>, ServiceError>;
    async fn trash_user(
        &self,
        actor: &Session,
        user_id: i32,
    ) -> Result<ApiResponse<UserResponseDeleteAt>, ServiceError>;
    /// Creates the configured administrator if no account holds that email yet.
    async fn ensure_admin(&self, seed: &AdminSeed) -> Result<(), ServiceError>;
}
