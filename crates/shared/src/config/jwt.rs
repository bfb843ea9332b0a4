use crate::{abstract_trait::JwtServiceTrait, errors::ServiceError};
use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
    pub token_type: String,
}

impl Claims {
    pub fn new(user_id: i32, exp: usize, iat: usize, token_type: String) -> Self {
        Claims {
            user_id,
            exp,
            iat,
            jti: Uuid::new_v4().to_string(),
            token_type,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub jwt_secret: String,
}

impl JwtConfig {
    pub fn new(jwt_secret: &str) -> Self {
        JwtConfig {
            jwt_secret: jwt_secret.to_string(),
        }
    }
}

impl JwtServiceTrait for JwtConfig {
    fn generate_token(&self, user_id: i32, token_type: &str) -> Result<String, ServiceError> {
        let now = Utc::now();
        let iat = now.timestamp() as usize;
        let exp = match token_type {
            "access" => (now + Duration::minutes(60)).timestamp() as usize,
            "refresh" => (now + Duration::days(7)).timestamp() as usize,
            _ => return Err(ServiceError::InvalidTokenType),
        };

        let claims = Claims::new(user_id, exp, iat, token_type.to_string());

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(ServiceError::Jwt)
    }

    fn verify_token(&self, token: &str, expected_type: &str) -> Result<i32, ServiceError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_ref());
        let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
                _ => ServiceError::Jwt(e),
            })?;

        if token_data.claims.token_type != expected_type {
            return Err(ServiceError::InvalidTokenType);
        }

        Ok(token_data.claims.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_round_trips_user_id() {
        let jwt = JwtConfig::new("test-secret");
        let token = jwt.generate_token(42, "access").unwrap();

        assert_eq!(jwt.verify_token(&token, "access").unwrap(), 42);
    }

    #[test]
    fn rejects_refresh_token_where_access_expected() {
        let jwt = JwtConfig::new("test-secret");
        let token = jwt.generate_token(7, "refresh").unwrap();

        assert!(matches!(
            jwt.verify_token(&token, "access"),
            Err(ServiceError::InvalidTokenType)
        ));
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = JwtConfig::new("one").generate_token(1, "access").unwrap();

        assert!(matches!(
            JwtConfig::new("two").verify_token(&token, "access"),
            Err(ServiceError::Jwt(_))
        ));
    }

    #[test]
    fn unknown_token_type_is_rejected() {
        let jwt = JwtConfig::new("test-secret");
        assert!(matches!(
            jwt.generate_token(1, "session"),
            Err(ServiceError::InvalidTokenType)
        ));
    }
}
