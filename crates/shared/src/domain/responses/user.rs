use crate::model::User;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_verified: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        UserResponse {
            id: value.user_id,
            name: value.name,
            email: value.email,
            role: value.role,
            is_verified: value.is_verified,
            created_at: value.created_at.map(|dt| dt.to_string()),
            updated_at: value.updated_at.map(|dt| dt.to_string()),
        }
    }
}

/// Admin view, including moderation state.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct UserResponseDeleteAt {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_verified: bool,
    pub is_blocked: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub deleted_at: Option<String>,
}

impl From<User> for UserResponseDeleteAt {
    fn from(value: User) -> Self {
        UserResponseDeleteAt {
            id: value.user_id,
            name: value.name,
            email: value.email,
            role: value.role,
            is_verified: value.is_verified,
            is_blocked: value.is_blocked,
            created_at: value.created_at.map(|dt| dt.to_string()),
            updated_at: value.updated_at.map(|dt| dt.to_string()),
            deleted_at: value.deleted_at.map(|dt| dt.to_string()),
        }
    }
}
