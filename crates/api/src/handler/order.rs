use crate::middleware::{
    jwt::auth_middleware,
    rate_limit::rate_limit_middleware,
    role::{require_owner, require_parker},
    validate::{SimpleValidatedJson, ValidatedQuery},
};
use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use shared::{
    domain::{
        Session,
        requests::{CreateOrderRequest, FindAllOrders},
        responses::{ApiResponse, ApiResponsePagination, OrderResponse},
    },
    errors::HttpError,
    service::OrderService,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Order",
    security(("bearer_auth" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Slot reserved and gateway order created", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Invalid booking window"),
        (status = 409, description = "Spot is full"),
        (status = 503, description = "Payment gateway unavailable")
    )
)]
pub async fn create_order(
    Extension(service): Extension<OrderService>,
    Extension(session): Extension<Session>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.create(&session, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(FindAllOrders),
    responses(
        (status = 200, description = "Caller's bookings", body = ApiResponsePagination<Vec<OrderResponse>>),
        (status = 403, description = "Parker only")
    )
)]
pub async fn get_my_orders(
    Extension(service): Extension<OrderService>,
    Extension(session): Extension<Session>,
    ValidatedQuery(params): ValidatedQuery<FindAllOrders>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.query.find_mine(&session, &params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/owner",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(FindAllOrders),
    responses(
        (status = 200, description = "Bookings on the caller's spots", body = ApiResponsePagination<Vec<OrderResponse>>),
        (status = 403, description = "Owner only")
    )
)]
pub async fn get_owner_orders(
    Extension(service): Extension<OrderService>,
    Extension(session): Extension<Session>,
    ValidatedQuery(params): ValidatedQuery<FindAllOrders>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.query.find_for_owner(&session, &params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order details", body = ApiResponse<OrderResponse>),
        (status = 403, description = "Not a party to this order"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    Extension(service): Extension<OrderService>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.query.find_by_id(&session, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/cancel",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order cancelled and slot released", body = ApiResponse<OrderResponse>),
        (status = 403, description = "Not allowed to cancel"),
        (status = 409, description = "Order can no longer be cancelled")
    )
)]
pub async fn cancel_order(
    Extension(service): Extension<OrderService>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.cancel(&session, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/complete",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order completed and slot released", body = ApiResponse<OrderResponse>),
        (status = 403, description = "Not allowed to complete"),
        (status = 409, description = "Only paid orders can be completed")
    )
)]
pub async fn complete_order(
    Extension(service): Extension<OrderService>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.complete(&session, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn order_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let parker_routes = OpenApiRouter::new()
        .route("/api/orders", post(create_order))
        .route("/api/orders", get(get_my_orders))
        .route_layer(middleware::from_fn(require_parker));

    let owner_routes = OpenApiRouter::new()
        .route("/api/orders/owner", get(get_owner_orders))
        .route_layer(middleware::from_fn(require_owner));

    OpenApiRouter::new()
        .route("/api/orders/{id}", get(get_order))
        .route("/api/orders/{id}/cancel", post(cancel_order))
        .route("/api/orders/{id}/complete", post(complete_order))
        .merge(parker_routes)
        .merge(owner_routes)
        .route_layer(middleware::from_fn(auth_middleware))
        .route_layer(middleware::from_fn(rate_limit_middleware))
        .layer(Extension(app_state.di_container.order_service.clone()))
        .layer(Extension(app_state.di_container.auth_service.identity.clone()))
        .layer(Extension(app_state.rate_limiter.clone()))
        .with_state(app_state.clone())
}
