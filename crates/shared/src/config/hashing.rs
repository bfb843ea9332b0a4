use crate::{abstract_trait::HashingTrait, errors::ServiceError};
use async_trait::async_trait;
use bcrypt::{DEFAULT_COST, hash, verify};

#[derive(Clone)]
pub struct Hashing {
    cost: u32,
}

impl Hashing {
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for Hashing {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HashingTrait for Hashing {
    async fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
        let password = password.to_string();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || hash(password, cost))
            .await
            .map_err(|e| ServiceError::Internal(format!("Hashing task failed: {e}")))?
            .map_err(ServiceError::Bcrypt)
    }

    async fn compare_password(
        &self,
        hashed_password: &str,
        password: &str,
    ) -> Result<(), ServiceError> {
        let password = password.to_string();
        let hashed_password = hashed_password.to_string();

        let is_valid = tokio::task::spawn_blocking(move || verify(password, &hashed_password))
            .await
            .map_err(|e| ServiceError::Internal(format!("Hashing task failed: {e}")))?
            .map_err(ServiceError::Bcrypt)?;

        if is_valid {
            Ok(())
        } else {
            Err(ServiceError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashes_and_compares_passwords() {
        let hashing = Hashing::with_cost(4);
        let hashed = hashing.hash_password("s3cret-pass").await.unwrap();

        assert_ne!(hashed, "s3cret-pass");
        assert!(hashing.compare_password(&hashed, "s3cret-pass").await.is_ok());
        assert!(matches!(
            hashing.compare_password(&hashed, "wrong-pass").await,
            Err(ServiceError::InvalidCredentials)
        ));
    }
}
