use crate::domain::requests::user::{default_page, default_page_size};
use crate::model::VerificationStatus;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitVerificationRequest {
    #[validate(url(message = "Document URL must be a valid URL"))]
    pub document_url: String,
}

fn validate_review_outcome(status: &VerificationStatus) -> Result<(), ValidationError> {
    match status {
        VerificationStatus::Verified | VerificationStatus::Rejected => Ok(()),
        VerificationStatus::Pending => Err(ValidationError::new("status")
            .with_message("Review outcome must be Verified or Rejected".into())),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReviewVerificationRequest {
    #[validate(custom(function = "validate_review_outcome"))]
    pub status: VerificationStatus,

    #[validate(length(max = 500, message = "Remarks must be at most 500 characters"))]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
pub struct FindAllVerifications {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 100000, message = "Page must be between 1 and 100000"))]
    pub page: i32,

    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub page_size: i32,

    pub status: Option<VerificationStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_not_a_review_outcome() {
        let review = |status| ReviewVerificationRequest {
            status,
            remarks: None,
        };

        assert!(review(VerificationStatus::Verified).validate().is_ok());
        assert!(review(VerificationStatus::Rejected).validate().is_ok());
        assert!(review(VerificationStatus::Pending).validate().is_err());
    }
}
