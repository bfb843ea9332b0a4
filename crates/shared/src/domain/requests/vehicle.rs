use crate::model::VehicleType;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Upper-cased plate with all whitespace removed, so `"ka 01 ab 1234"` equals `"KA01AB1234"`.
pub fn normalize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

fn validate_plate(plate: &str) -> Result<(), ValidationError> {
    let normalized = normalize_plate(plate);
    let valid = (4..=15).contains(&normalized.len())
        && normalized.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("plate_number")
            .with_message("Plate number must be 4-15 letters, digits or dashes".into()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateVehicleRequest {
    #[validate(custom(function = "validate_plate"))]
    pub plate_number: String,

    pub vehicle_type: VehicleType,

    #[validate(length(max = 100, message = "Model must be at most 100 characters"))]
    pub model: Option<String>,

    #[validate(length(max = 50, message = "Color must be at most 50 characters"))]
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_plate_numbers() {
        assert_eq!(normalize_plate("  ka 01 ab 1234 "), "KA01AB1234");
        assert_eq!(normalize_plate("mh-12\tde-1433"), "MH-12DE-1433");
    }

    #[test]
    fn rejects_malformed_plates() {
        let mut req = CreateVehicleRequest {
            plate_number: "ka 01 ab 1234".into(),
            vehicle_type: VehicleType::Car,
            model: None,
            color: None,
        };
        assert!(req.validate().is_ok());

        req.plate_number = "K@1".into();
        assert!(req.validate().is_err());
    }
}
