use crate::errors::ServiceError;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynHashing = Arc<dyn HashingTrait + Send + Sync>;
pub type DynJwtService = Arc<dyn JwtServiceTrait + Send + Sync>;

#[async_trait]
pub trait HashingTrait {
    async fn hash_password(&self, password: &str) -> Result<String, ServiceError>;

    /// `Err(InvalidCredentials)` when the password does not match.
    async fn compare_password(
        &self,
        hashed_password: &str,
        password: &str,
    ) -> Result<(), ServiceError>;
}

/// Signs and checks `access` / `refresh` tokens.
pub trait JwtServiceTrait: Send + Sync + std::fmt::Debug {
    fn generate_token(&self, user_id: i32, token_type: &str) -> Result<String, ServiceError>;
    fn verify_token(&self, token: &str, expected_type: &str) -> Result<i32, ServiceError>;
}
