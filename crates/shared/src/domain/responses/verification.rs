use crate::model::Verification;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct VerificationResponse {
    pub id: i32,
    pub user_id: i32,
    pub document_url: String,
    pub status: String,
    pub remarks: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Verification> for VerificationResponse {
    fn from(value: Verification) -> Self {
        VerificationResponse {
            id: value.verification_id,
            user_id: value.user_id,
            document_url: value.document_url,
            status: value.status,
            remarks: value.remarks,
            created_at: value.created_at.map(|dt| dt.to_string()),
            updated_at: value.updated_at.map(|dt| dt.to_string()),
        }
    }
}
