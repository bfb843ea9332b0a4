use crate::model::UserRole;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

fn validate_self_assignable_role(role: &UserRole) -> Result<(), ValidationError> {
    match role {
        UserRole::Parker | UserRole::Owner => Ok(()),
        UserRole::Admin => Err(ValidationError::new("role")
            .with_message("Role must be either parker or owner".into())),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be at least 2 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,

    #[serde(default = "default_role")]
    #[validate(custom(function = "validate_self_assignable_role"))]
    pub role: UserRole,
}

fn default_role() -> UserRole {
    UserRole::Parker
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct ResendVerificationRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct VerifyCodeQuery {
    pub verify_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(role: UserRole, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            password: "password123".into(),
            confirm_password: confirm.into(),
            role,
        }
    }

    #[test]
    fn admin_cannot_self_register() {
        assert!(register(UserRole::Owner, "password123").validate().is_ok());
        let errors = register(UserRole::Admin, "password123").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("role"));
    }

    #[test]
    fn confirm_password_must_match() {
        let errors = register(UserRole::Parker, "different1").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
    }

    #[test]
    fn role_defaults_to_parker() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"name":"Ravi","email":"ravi@example.com","password":"password123","confirm_password":"password123"}"#,
        )
        .unwrap();
        assert_eq!(req.role, UserRole::Parker);
    }
}
