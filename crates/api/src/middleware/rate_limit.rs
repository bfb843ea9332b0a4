use axum::{
    Extension,
    body::Body,
    http::{HeaderMap, Request},
    middleware::Next,
    response::IntoResponse,
};
use shared::{
    cache::{RateDecision, RateLimiter},
    errors::HttpError,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// First hop of `x-forwarded-for`, or `unknown`.
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    Extension(rate_limiter): Extension<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let client_ip = client_ip(req.headers());

    match rate_limiter.check(&client_ip).await {
        RateDecision::Limited => {
            warn!("Rate limit exceeded for IP: {client_ip}");
            return Err(HttpError::TooManyRequests(
                "Too many requests, please try again later".to_string(),
            ));
        }
        RateDecision::Unchecked => debug!("Rate limiter unavailable, letting {client_ip} through"),
        RateDecision::Allowed { .. } => {}
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers), "unknown");

        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        assert_eq!(client_ip(&headers), "203.0.113.7");
    }
}
