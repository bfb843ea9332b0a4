use crate::middleware::{
    jwt::auth_middleware, rate_limit::rate_limit_middleware, role::require_parker,
    validate::SimpleValidatedJson,
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
    abstract_trait::DynPaymentService,
    domain::{
        Session,
        requests::VerifyPaymentRequest,
        responses::{ApiResponse, CheckoutResponse, OrderResponse},
    },
    errors::HttpError,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/payments/{order_id}/checkout",
    tag = "Payment",
    security(("bearer_auth" = [])),
    params(("order_id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Checkout parameters for the payment widget", body = ApiResponse<CheckoutResponse>),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is not awaiting payment")
    )
)]
pub async fn checkout(
    Extension(service): Extension<DynPaymentService>,
    Extension(session): Extension<Session>,
    Path(order_id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.checkout(&session, order_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/payments/verify",
    tag = "Payment",
    security(("bearer_auth" = [])),
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Signature accepted, order marked paid", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Signature mismatch"),
        (status = 409, description = "Order is not awaiting payment")
    )
)]
pub async fn verify_payment(
    Extension(service): Extension<DynPaymentService>,
    Extension(session): Extension<Session>,
    SimpleValidatedJson(body): SimpleValidatedJson<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.verify(&session, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn payment_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/payments/{order_id}/checkout", get(checkout))
        .route("/api/payments/verify", post(verify_payment))
        .route_layer(middleware::from_fn(require_parker))
        .route_layer(middleware::from_fn(auth_middleware))
        .route_layer(middleware::from_fn(rate_limit_middleware))
        .layer(Extension(app_state.di_container.payment_service.clone()))
        .layer(Extension(app_state.di_container.auth_service.identity.clone()))
        .layer(Extension(app_state.rate_limiter.clone()))
        .with_state(app_state.clone())
}
