use crate::middleware::{
    jwt::auth_middleware, rate_limit::rate_limit_middleware, validate::SimpleValidatedJson,
};
use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use shared::{
    abstract_trait::DynVehicleService,
    domain::{
        Session,
        requests::CreateVehicleRequest,
        responses::{ApiResponse, VehicleResponse},
    },
    errors::HttpError,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/vehicles",
    tag = "Vehicle",
    security(("bearer_auth" = [])),
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle added", body = ApiResponse<VehicleResponse>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Plate already registered")
    )
)]
pub async fn create_vehicle(
    Extension(service): Extension<DynVehicleService>,
    Extension(session): Extension<Session>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateVehicleRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create(&session, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/vehicles",
    tag = "Vehicle",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's vehicles", body = ApiResponse<Vec<VehicleResponse>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_vehicles(
    Extension(service): Extension<DynVehicleService>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_mine(&session).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/vehicles/{id}",
    tag = "Vehicle",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle details", body = ApiResponse<VehicleResponse>),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn get_vehicle(
    Extension(service): Extension<DynVehicleService>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(&session, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/vehicles/{id}",
    tag = "Vehicle",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle removed"),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn delete_vehicle(
    Extension(service): Extension<DynVehicleService>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.delete(&session, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn vehicle_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/vehicles", post(create_vehicle))
        .route("/api/vehicles", get(get_vehicles))
        .route("/api/vehicles/{id}", get(get_vehicle))
        .route("/api/vehicles/{id}", delete(delete_vehicle))
        .route_layer(middleware::from_fn(auth_middleware))
        .route_layer(middleware::from_fn(rate_limit_middleware))
        .layer(Extension(app_state.di_container.vehicle_service.clone()))
        .layer(Extension(app_state.di_container.auth_service.identity.clone()))
        .layer(Extension(app_state.rate_limiter.clone()))
        .with_state(app_state.clone())
}
