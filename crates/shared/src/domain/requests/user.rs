use crate::model::UserRole;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
pub struct FindAllUsers {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 100000, message = "Page must be between 1 and 100000"))]
    pub page: i32,

    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub page_size: i32,

    #[serde(default)]
    pub search: String,
}

pub(crate) fn default_page() -> i32 {
    1
}

pub(crate) fn default_page_size() -> i32 {
    10
}

/// Row data for a new user; `password` is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub verification_code: Option<String>,
    pub is_verified: bool,
}

fn validate_profile_passwords(req: &UpdateProfileRequest) -> Result<(), ValidationError> {
    match &req.password {
        Some(password) if req.confirm_password.as_deref() != Some(password.as_str()) => Err(
            ValidationError::new("confirm_password").with_message("Passwords do not match".into()),
        ),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_profile_passwords"))]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    pub confirm_password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(password: Option<&str>, confirm: Option<&str>) -> UpdateProfileRequest {
        UpdateProfileRequest {
            name: None,
            password: password.map(str::to_string),
            confirm_password: confirm.map(str::to_string),
        }
    }

    fn mismatch_reported(req: &UpdateProfileRequest) -> bool {
        req.validate()
            .is_err_and(|errors| errors.field_errors().contains_key("__all__"))
    }

    #[test]
    fn new_password_needs_matching_confirmation() {
        assert!(mismatch_reported(&profile(Some("password123"), None)));
        assert!(mismatch_reported(&profile(Some("password123"), Some("password124"))));
        assert!(profile(Some("password123"), Some("password123")).validate().is_ok());
    }

    #[test]
    fn name_only_update_skips_password_checks() {
        let req = UpdateProfileRequest {
            name: Some("Asha K".into()),
            ..profile(None, None)
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn page_is_bounded() {
        let req = FindAllUsers {
            page: 30_000_000,
            page_size: 100,
            search: String::new(),
        };
        assert!(req.validate().unwrap_err().field_errors().contains_key("page"));
    }
}
