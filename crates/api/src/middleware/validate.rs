use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{StatusCode, request::Parts},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

type Rejection = (StatusCode, Json<Value>);

fn rejection(status: StatusCode, message: String) -> Rejection {
    (
        status,
        Json(json!({
            "status": "error",
            "message": message,
        })),
    )
}

fn validation_rejection(errors: &ValidationErrors) -> Rejection {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "status": "error",
            "message": format_validation_errors(errors),
            "details": format_validation_errors_detailed(errors),
        })),
    )
}

/// JSON body that must also pass its `validator` rules.
pub struct SimpleValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for SimpleValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| rejection(e.status(), e.body_text()))?;

        value.validate().map_err(|e| validation_rejection(&e))?;

        Ok(Self(value))
    }
}

/// Query string counterpart of [`SimpleValidatedJson`].
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| rejection(StatusCode::BAD_REQUEST, e.body_text()))?;

        value.validate().map_err(|e| validation_rejection(&e))?;

        Ok(Self(value))
    }
}

fn describe(field: &str, error: &validator::ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| match error.code.as_ref() {
            "email" => "Invalid email format".to_string(),
            "url" => "Invalid URL format".to_string(),
            "length" => "Invalid length".to_string(),
            "range" => "Value out of range".to_string(),
            "must_match" => "Values do not match".to_string(),
            _ => format!("Invalid {field}"),
        })
}

/// Field errors plus struct-level (`__all__`) errors from schema validators.
fn flatten(errors: &ValidationErrors) -> Vec<(String, Vec<String>)> {
    errors
        .errors()
        .iter()
        .filter_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(list) => Some((
                field.to_string(),
                list.iter().map(|e| describe(field, e)).collect(),
            )),
            _ => None,
        })
        .collect()
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    let messages: Vec<String> = flatten(errors)
        .into_iter()
        .flat_map(|(field, messages)| {
            messages
                .into_iter()
                .map(move |message| format!("{field}: {message}"))
        })
        .collect();

    if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.join("; ")
    }
}

fn format_validation_errors_detailed(errors: &ValidationErrors) -> Value {
    let map: serde_json::Map<String, Value> = flatten(errors)
        .into_iter()
        .map(|(field, messages)| (field, json!(messages)))
        .collect();

    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::requests::{CreateOrderRequest, RegisterRequest};
    use shared::model::UserRole;

    #[test]
    fn lists_every_failing_field() {
        let errors = RegisterRequest {
            name: "A".into(),
            email: "nope".into(),
            password: "password123".into(),
            confirm_password: "password123".into(),
            role: UserRole::Parker,
        }
        .validate()
        .unwrap_err();

        let message = format_validation_errors(&errors);
        assert!(message.contains("name: Name must be at least 2 characters"));
        assert!(message.contains("email: Invalid email format"));

        let details = format_validation_errors_detailed(&errors);
        assert!(details.get("email").is_some());
    }

    #[test]
    fn reports_schema_level_errors() {
        let now = chrono::Utc::now();
        let errors = CreateOrderRequest {
            spot_id: 1,
            vehicle_id: 1,
            start_time: now,
            end_time: now,
        }
        .validate()
        .unwrap_err();

        assert!(format_validation_errors(&errors).contains("end_time must be after start_time"));
    }
}
