use crate::middleware::{
    jwt::auth_middleware,
    rate_limit::rate_limit_middleware,
    role::{require_admin, require_owner},
    validate::{SimpleValidatedJson, ValidatedQuery},
};
use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use shared::{
    abstract_trait::DynVerificationService,
    domain::{
        Session,
        requests::{FindAllVerifications, ReviewVerificationRequest, SubmitVerificationRequest},
        responses::{ApiResponse, ApiResponsePagination, VerificationResponse},
    },
    errors::HttpError,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/verification",
    tag = "Verification",
    security(("bearer_auth" = [])),
    request_body = SubmitVerificationRequest,
    responses(
        (status = 201, description = "Document submitted for review", body = ApiResponse<VerificationResponse>),
        (status = 409, description = "Already verified")
    )
)]
pub async fn submit_document(
    Extension(service): Extension<DynVerificationService>,
    Extension(session): Extension<Session>,
    SimpleValidatedJson(body): SimpleValidatedJson<SubmitVerificationRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.submit(&session, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/verification",
    tag = "Verification",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's verification state", body = ApiResponse<VerificationResponse>),
        (status = 404, description = "Nothing submitted yet")
    )
)]
pub async fn get_my_verification(
    Extension(service): Extension<DynVerificationService>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_mine(&session).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/admin/verifications",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(FindAllVerifications),
    responses(
        (status = 200, description = "Submitted documents", body = ApiResponsePagination<Vec<VerificationResponse>>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn get_verifications(
    Extension(service): Extension<DynVerificationService>,
    ValidatedQuery(params): ValidatedQuery<FindAllVerifications>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/admin/verifications/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Verification ID")),
    request_body = ReviewVerificationRequest,
    responses(
        (status = 200, description = "Review recorded", body = ApiResponse<VerificationResponse>),
        (status = 400, description = "Pending is not a review outcome"),
        (status = 404, description = "Verification not found")
    )
)]
pub async fn review_verification(
    Extension(service): Extension<DynVerificationService>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<ReviewVerificationRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.review(id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn verification_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let owner_routes = OpenApiRouter::new()
        .route("/api/verification", post(submit_document))
        .route("/api/verification", get(get_my_verification))
        .route_layer(middleware::from_fn(require_owner));

    let admin_routes = OpenApiRouter::new()
        .route("/api/admin/verifications", get(get_verifications))
        .route("/api/admin/verifications/{id}", put(review_verification))
        .route_layer(middleware::from_fn(require_admin));

    owner_routes
        .merge(admin_routes)
        .route_layer(middleware::from_fn(auth_middleware))
        .route_layer(middleware::from_fn(rate_limit_middleware))
        .layer(Extension(app_state.di_container.verification_service.clone()))
        .layer(Extension(app_state.di_container.auth_service.identity.clone()))
        .layer(Extension(app_state.rate_limiter.clone()))
        .with_state(app_state.clone())
}
