use crate::errors::{error::ErrorResponse, repository::RepositoryError, service::ServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    TooManyRequests(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidCredentials => {
                HttpError::Unauthorized("Invalid credentials".to_string())
            }

            ServiceError::Unauthorized(msg) => HttpError::Unauthorized(msg),

            ServiceError::Validation(errors) => {
                HttpError::BadRequest(format!("Validation failed: {}", errors.join("; ")))
            }

            ServiceError::BadRequest(msg) => HttpError::BadRequest(msg),

            ServiceError::Forbidden(msg) => HttpError::Forbidden(msg),

            ServiceError::NotFound(msg) => HttpError::NotFound(msg),

            ServiceError::Conflict(msg) => HttpError::Conflict(msg),

            ServiceError::TooManyAttempts(msg) => HttpError::TooManyRequests(msg),

            ServiceError::Gateway(msg) => HttpError::ServiceUnavailable(msg),

            ServiceError::Repo(repo_err) => match repo_err {
                RepositoryError::NotFound => HttpError::NotFound("Not found".into()),
                RepositoryError::Conflict(msg) => HttpError::Conflict(msg),
                RepositoryError::AlreadyExists(msg) => HttpError::Conflict(msg),
                RepositoryError::ForeignKey(msg) => {
                    HttpError::BadRequest(format!("Foreign key violation: {msg}"))
                }
                RepositoryError::Check(msg) => {
                    HttpError::BadRequest(format!("Constraint violation: {msg}"))
                }
                other => {
                    error!("Repository failure: {other}");
                    HttpError::Internal("Repository error".into())
                }
            },

            ServiceError::Jwt(err) => HttpError::Unauthorized(format!("JWT error: {err}")),

            ServiceError::TokenExpired => HttpError::Unauthorized("Token expired".into()),

            ServiceError::InvalidTokenType => {
                HttpError::Unauthorized("Invalid token type".into())
            }

            ServiceError::Bcrypt(_) => {
                HttpError::Internal("Internal authentication error".into())
            }

            ServiceError::Internal(msg) | ServiceError::Custom(msg) => HttpError::Internal(msg),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            HttpError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HttpError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            HttpError::TooManyRequests(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            HttpError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse {
            status: "error".into(),
            message: msg,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ServiceError) -> StatusCode {
        HttpError::from(err).into_response().status()
    }

    #[test]
    fn maps_service_errors_to_status_codes() {
        assert_eq!(
            status_of(ServiceError::Validation(vec!["bad".into()])),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ServiceError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ServiceError::Forbidden("no".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(ServiceError::Repo(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ServiceError::Repo(RepositoryError::AlreadyExists(
                "email".into()
            ))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ServiceError::TooManyAttempts("slow down".into())),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status_of(ServiceError::Gateway("down".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(ServiceError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
