use crate::middleware::{
    jwt::auth_middleware,
    rate_limit::rate_limit_middleware,
    role::require_owner,
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
        requests::{CreateSpotRequest, FindAllSpots, SearchSpotsQuery, UpdateSpotRequest},
        responses::{ApiResponse, ApiResponsePagination, SpotResponse},
    },
    errors::HttpError,
    service::SpotService,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/spots",
    tag = "Spot",
    params(SearchSpotsQuery),
    responses(
        (status = 200, description = "Matching spots, nearest first when a location is given", body = ApiResponsePagination<Vec<SpotResponse>>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn search_spots(
    Extension(service): Extension<SpotService>,
    ValidatedQuery(params): ValidatedQuery<SearchSpotsQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.query.search(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/spots/{id}",
    tag = "Spot",
    params(("id" = i32, Path, description = "Spot ID")),
    responses(
        (status = 200, description = "Spot details", body = ApiResponse<SpotResponse>),
        (status = 404, description = "Spot not found")
    )
)]
pub async fn get_spot(
    Extension(service): Extension<SpotService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.query.find_by_id(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/spots/mine",
    tag = "Spot",
    security(("bearer_auth" = [])),
    params(FindAllSpots),
    responses(
        (status = 200, description = "Spots listed by the caller", body = ApiResponsePagination<Vec<SpotResponse>>),
        (status = 403, description = "Owner only")
    )
)]
pub async fn get_my_spots(
    Extension(service): Extension<SpotService>,
    Extension(session): Extension<Session>,
    ValidatedQuery(params): ValidatedQuery<FindAllSpots>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.query.find_mine(&session, &params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/spots",
    tag = "Spot",
    security(("bearer_auth" = [])),
    request_body = CreateSpotRequest,
    responses(
        (status = 201, description = "Spot listed", body = ApiResponse<SpotResponse>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Owner without a verified document")
    )
)]
pub async fn create_spot(
    Extension(service): Extension<SpotService>,
    Extension(session): Extension<Session>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateSpotRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.create(&session, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/spots/{id}",
    tag = "Spot",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Spot ID")),
    request_body = UpdateSpotRequest,
    responses(
        (status = 200, description = "Spot updated", body = ApiResponse<SpotResponse>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Spot not found")
    )
)]
pub async fn update_spot(
    Extension(service): Extension<SpotService>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateSpotRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.update(&session, id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/spots/{id}",
    tag = "Spot",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Spot ID")),
    responses(
        (status = 200, description = "Spot removed"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Spot not found")
    )
)]
pub async fn delete_spot(
    Extension(service): Extension<SpotService>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.delete(&session, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn spot_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let public_routes = OpenApiRouter::new()
        .route("/api/spots", get(search_spots))
        .route("/api/spots/{id}", get(get_spot));

    let owner_routes = OpenApiRouter::new()
        .route("/api/spots", post(create_spot))
        .route("/api/spots/mine", get(get_my_spots))
        .route("/api/spots/{id}", put(update_spot))
        .route_layer(middleware::from_fn(require_owner));

    let private_routes = OpenApiRouter::new()
        .route("/api/spots/{id}", delete(delete_spot))
        .merge(owner_routes)
        .route_layer(middleware::from_fn(auth_middleware))
        .route_layer(middleware::from_fn(rate_limit_middleware))
        .layer(Extension(app_state.di_container.auth_service.identity.clone()))
        .layer(Extension(app_state.rate_limiter.clone()));

    public_routes
        .merge(private_routes)
        .layer(Extension(app_state.di_container.spot_service.clone()))
        .with_state(app_state.clone())
}
