mod auth;
mod order;
mod payment;
mod spot;
mod user;
mod vehicle;
mod verification;

use anyhow::Result;
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use prometheus_client::encoding::text::encode;
use serde_json::json;
use shared::state::AppState;
use shared::utils::shutdown_signal;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::{Modify, OpenApi, openapi::security::SecurityScheme};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

pub use self::auth::auth_routes;
pub use self::order::order_routes;
pub use self::payment::payment_routes;
pub use self::spot::spot_routes;
pub use self::user::user_routes;
pub use self::vehicle::vehicle_routes;
pub use self::verification::verification_routes;

const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_checker_handler,

        auth::register_user_handler,
        auth::verify_code_handler,
        auth::resend_verification_handler,
        auth::login_user_handler,
        auth::refresh_token_handler,
        auth::forgot_password_handler,
        auth::reset_password_handler,
        auth::get_me_handler,
        auth::logout_handler,

        user::update_profile,
        user::delete_account,
        user::get_users,
        user::get_user,
        user::block_user,
        user::unblock_user,
        user::trash_user_handler,

        vehicle::create_vehicle,
        vehicle::get_vehicles,
        vehicle::get_vehicle,
        vehicle::delete_vehicle,

        verification::submit_document,
        verification::get_my_verification,
        verification::get_verifications,
        verification::review_verification,

        spot::search_spots,
        spot::get_spot,
        spot::get_my_spots,
        spot::create_spot,
        spot::update_spot,
        spot::delete_spot,

        order::create_order,
        order::get_my_orders,
        order::get_owner_orders,
        order::get_order,
        order::cancel_order,
        order::complete_order,

        payment::checkout,
        payment::verify_payment,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and sessions"),
        (name = "User", description = "Self-service profile endpoints"),
        (name = "Admin", description = "User and document moderation"),
        (name = "Vehicle", description = "Parker vehicles"),
        (name = "Verification", description = "Owner identity documents"),
        (name = "Spot", description = "Parking spot listings and search"),
        (name = "Order", description = "Bookings"),
        (name = "Payment", description = "Gateway checkout and verification"),
        (name = "Health", description = "Liveness"),
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(utoipa::openapi::security::Http::new(
                    utoipa::openapi::security::HttpAuthScheme::Bearer,
                )),
            );
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/healthchecker",
    tag = "Health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_checker_handler() -> impl IntoResponse {
    Json(json!({
        "status": "success",
        "message": "Parkspot API is running"
    }))
}

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut buffer = String::new();

    let registry = state.registry.lock().await;

    if let Err(e) = encode(&mut buffer, &registry) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {e}"),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(
            CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        Body::from(buffer),
    )
        .into_response()
}

/// Assembles every route, the docs UI and the shared tower layers.
pub fn build_router(shared_state: Arc<AppState>) -> Router {
    let api_router = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/api/healthchecker", get(health_checker_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(shared_state.clone())
        .merge(auth_routes(shared_state.clone()))
        .merge(user_routes(shared_state.clone()))
        .merge(vehicle_routes(shared_state.clone()))
        .merge(verification_routes(shared_state.clone()))
        .merge(spot_routes(shared_state.clone()))
        .merge(order_routes(shared_state.clone()))
        .merge(payment_routes(shared_state.clone()));

    let (app_router, api) = api_router.split_for_parts();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    app_router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub struct AppRouter;

impl AppRouter {
    pub async fn serve(port: u16, app_state: AppState) -> Result<()> {
        let app = build_router(Arc::new(app_state));

        let addr = format!("0.0.0.0:{port}");
        let listener = TcpListener::bind(&addr).await?;

        info!("🚀 Server running on http://{}", listener.local_addr()?);
        info!("📖 Swagger UI: http://localhost:{port}/swagger-ui");
        info!("📊 Metrics: http://localhost:{port}/metrics");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}
