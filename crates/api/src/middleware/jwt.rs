use axum::{
    Extension,
    body::Body,
    http::{Request, header},
    middleware::Next,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use shared::{abstract_trait::DynIdentityService, errors::HttpError};

/// Resolves the caller from the `token` cookie or a bearer header and stores the
/// [`shared::domain::Session`] in the request extensions.
pub async fn auth_middleware(
    cookie_jar: CookieJar,
    Extension(identity): Extension<DynIdentityService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        })
        .ok_or_else(|| {
            HttpError::Unauthorized("You are not logged in, please provide token".to_string())
        })?;

    let session = identity.authenticate(&token).await?;

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}
