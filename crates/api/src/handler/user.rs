use crate::middleware::{
    jwt::auth_middleware,
    rate_limit::rate_limit_middleware,
    role::require_admin,
    validate::{SimpleValidatedJson, ValidatedQuery},
};
use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use shared::{
    domain::{
        Session,
        requests::{FindAllUsers, UpdateProfileRequest},
        responses::{ApiResponse, ApiResponsePagination, UserResponse, UserResponseDeleteAt},
    },
    errors::HttpError,
    service::UserService,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    put,
    path = "/api/users/me",
    tag = "User",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserResponse>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_profile(
    Extension(service): Extension<UserService>,
    Extension(session): Extension<Session>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.update_profile(&session, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/users/me",
    tag = "User",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn delete_account(
    Extension(service): Extension<UserService>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.delete_account(&session).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(FindAllUsers),
    responses(
        (status = 200, description = "List of users", body = ApiResponsePagination<Vec<UserResponseDeleteAt>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn get_users(
    Extension(service): Extension<UserService>,
    ValidatedQuery(params): ValidatedQuery<FindAllUsers>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.query.find_all(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserResponseDeleteAt>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(service): Extension<UserService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.query.find_by_id(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/block",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User blocked", body = ApiResponse<UserResponseDeleteAt>),
        (status = 400, description = "Cannot block yourself"),
        (status = 404, description = "User not found")
    )
)]
pub async fn block_user(
    Extension(service): Extension<UserService>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.set_blocked(&session, id, true).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/unblock",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User unblocked", body = ApiResponse<UserResponseDeleteAt>),
        (status = 404, description = "User not found")
    )
)]
pub async fn unblock_user(
    Extension(service): Extension<UserService>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.set_blocked(&session, id, false).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User soft-deleted", body = ApiResponse<UserResponseDeleteAt>),
        (status = 400, description = "Cannot delete yourself"),
        (status = 404, description = "User not found")
    )
)]
pub async fn trash_user_handler(
    Extension(service): Extension<UserService>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.trash_user(&session, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn user_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let self_routes = OpenApiRouter::new()
        .route("/api/users/me", put(update_profile))
        .route("/api/users/me", delete(delete_account));

    let admin_routes = OpenApiRouter::new()
        .route("/api/admin/users", get(get_users))
        .route("/api/admin/users/{id}", get(get_user))
        .route("/api/admin/users/{id}", delete(trash_user_handler))
        .route("/api/admin/users/{id}/block", post(block_user))
        .route("/api/admin/users/{id}/unblock", post(unblock_user))
        .route_layer(middleware::from_fn(require_admin));

    self_routes
        .merge(admin_routes)
        .route_layer(middleware::from_fn(auth_middleware))
        .route_layer(middleware::from_fn(rate_limit_middleware))
        .layer(Extension(app_state.di_container.user_service.clone()))
        .layer(Extension(app_state.di_container.auth_service.identity.clone()))
        .layer(Extension(app_state.rate_limiter.clone()))
        .with_state(app_state.clone())
}
