use crate::middleware::{
    jwt::auth_middleware, rate_limit::rate_limit_middleware, validate::SimpleValidatedJson,
};
use axum::{
    Extension, Json,
    extract::Query,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use shared::{
    abstract_trait::{
        DynIdentityService, DynLoginService, DynPasswordResetService, DynRegisterService,
    },
    domain::{
        Session,
        requests::{
            CreateResetPasswordRequest, ForgotPasswordRequest, LoginRequest, RefreshTokenRequest,
            RegisterRequest, ResendVerificationRequest, VerifyCodeQuery,
        },
        responses::{ApiResponse, TokenResponse, UserResponse},
    },
    errors::HttpError,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

fn token_cookie(value: String) -> Cookie<'static> {
    Cookie::build(("token", value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, verification email queued", body = ApiResponse<UserResponse>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Auth"
)]
pub async fn register_user_handler(
    Extension(service): Extension<DynRegisterService>,
    SimpleValidatedJson(body): SimpleValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.register(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/auth/verify-code",
    params(VerifyCodeQuery),
    responses(
        (status = 200, description = "Email verified", body = ApiResponse<UserResponse>),
        (status = 404, description = "Unknown or already used code")
    ),
    tag = "Auth"
)]
pub async fn verify_code_handler(
    Extension(service): Extension<DynRegisterService>,
    Query(query): Query<VerifyCodeQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.verify_code(&query.verify_code).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/resend-verification",
    request_body = ResendVerificationRequest,
    responses(
        (status = 200, description = "Verification email queued"),
        (status = 404, description = "No such account"),
        (status = 409, description = "Already verified")
    ),
    tag = "Auth"
)]
pub async fn resend_verification_handler(
    Extension(service): Extension<DynRegisterService>,
    SimpleValidatedJson(body): SimpleValidatedJson<ResendVerificationRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.resend_verification(&body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Email not verified or account blocked"),
        (status = 429, description = "Too many failed attempts")
    ),
    tag = "Auth"
)]
pub async fn login_user_handler(
    Extension(service): Extension<DynLoginService>,
    jar: CookieJar,
    SimpleValidatedJson(body): SimpleValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.login(&body).await?;
    let jar = jar.add(token_cookie(response.data.access_token.clone()));
    Ok((StatusCode::OK, jar, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token refreshed", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid, revoked or expired refresh token")
    ),
    tag = "Auth"
)]
pub async fn refresh_token_handler(
    Extension(service): Extension<DynIdentityService>,
    jar: CookieJar,
    SimpleValidatedJson(body): SimpleValidatedJson<RefreshTokenRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.refresh_token(&body.refresh_token).await?;
    let jar = jar.add(token_cookie(response.data.access_token.clone()));
    Ok((StatusCode::OK, jar, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset link sent"),
        (status = 404, description = "No such account")
    ),
    tag = "Auth"
)]
pub async fn forgot_password_handler(
    Extension(service): Extension<DynPasswordResetService>,
    SimpleValidatedJson(body): SimpleValidatedJson<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.forgot_password(&body.email).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = CreateResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset successful"),
        (status = 400, description = "Invalid or expired token")
    ),
    tag = "Auth"
)]
pub async fn reset_password_handler(
    Extension(service): Extension<DynPasswordResetService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateResetPasswordRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.reset_password(&body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth",
)]
pub async fn get_me_handler(
    Extension(service): Extension<DynIdentityService>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.get_me(session.user_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Refresh tokens revoked"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth",
)]
pub async fn logout_handler(
    Extension(service): Extension<DynIdentityService>,
    Extension(session): Extension<Session>,
    jar: CookieJar,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.logout(session.user_id).await?;
    let jar = jar.remove(Cookie::build("token").path("/"));
    Ok((StatusCode::OK, jar, Json(response)))
}

pub fn auth_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let auth = &app_state.di_container.auth_service;

    let public_routes = OpenApiRouter::new()
        .route("/api/auth/register", post(register_user_handler))
        .route("/api/auth/verify-code", get(verify_code_handler))
        .route(
            "/api/auth/resend-verification",
            post(resend_verification_handler),
        )
        .route("/api/auth/login", post(login_user_handler))
        .route("/api/auth/refresh", post(refresh_token_handler))
        .route("/api/auth/forgot-password", post(forgot_password_handler))
        .route("/api/auth/reset-password", post(reset_password_handler));

    let private_routes = OpenApiRouter::new()
        .route("/api/auth/me", get(get_me_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route_layer(middleware::from_fn(auth_middleware))
        .route_layer(middleware::from_fn(rate_limit_middleware))
        .layer(Extension(app_state.rate_limiter.clone()));

    public_routes
        .merge(private_routes)
        .layer(Extension(auth.register.clone()))
        .layer(Extension(auth.login.clone()))
        .layer(Extension(auth.passreset.clone()))
        .layer(Extension(auth.identity.clone()))
        .with_state(app_state.clone())
}
