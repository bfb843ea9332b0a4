use axum::{body::Body, http::Request, middleware::Next, response::Response};
use shared::{domain::Session, errors::HttpError, model::UserRole};

fn ensure_role(req: &Request<Body>, allowed: &[UserRole]) -> Result<(), HttpError> {
    let session = req
        .extensions()
        .get::<Session>()
        .ok_or_else(|| HttpError::Unauthorized("Missing session in request context".to_string()))?;

    if allowed.contains(&session.role) {
        Ok(())
    } else {
        let names: Vec<&str> = allowed.iter().map(UserRole::as_str).collect();
        Err(HttpError::Forbidden(format!(
            "Access denied. Required role: {}",
            names.join(" or ")
        )))
    }
}

pub async fn require_admin(req: Request<Body>, next: Next) -> Result<Response, HttpError> {
    ensure_role(&req, &[UserRole::Admin])?;
    Ok(next.run(req).await)
}

pub async fn require_owner(req: Request<Body>, next: Next) -> Result<Response, HttpError> {
    ensure_role(&req, &[UserRole::Owner])?;
    Ok(next.run(req).await)
}

pub async fn require_parker(req: Request<Body>, next: Next) -> Result<Response, HttpError> {
    ensure_role(&req, &[UserRole::Parker])?;
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_as(role: Option<UserRole>) -> Request<Body> {
        let mut req = Request::new(Body::empty());
        if let Some(role) = role {
            req.extensions_mut().insert(Session {
                user_id: 1,
                email: "asha@example.com".into(),
                name: "Asha".into(),
                role,
            });
        }
        req
    }

    #[test]
    fn matches_allowed_roles_only() {
        assert!(ensure_role(&request_as(Some(UserRole::Owner)), &[UserRole::Owner]).is_ok());
        assert!(matches!(
            ensure_role(&request_as(Some(UserRole::Parker)), &[UserRole::Owner]),
            Err(HttpError::Forbidden(_))
        ));
        assert!(matches!(
            ensure_role(&request_as(None), &[UserRole::Admin]),
            Err(HttpError::Unauthorized(_))
        ));
    }
}
