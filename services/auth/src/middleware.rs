//! Middleware for JWT access token validation

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::debug;
use uuid::Uuid;

use crate::{AppState, error::AuthError, jwt::TokenType};

/// Identity of the caller, inserted into request extensions
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
}

/// Require a valid bearer access token
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AuthError::Unauthorized)?;

    let claims = state
        .jwt_service
        .validate_token(bearer.token())
        .map_err(|e| {
            debug!("Rejected access token: {}", e);
            AuthError::Unauthorized
        })?;

    if claims.token_type != TokenType::Access {
        return Err(AuthError::Unauthorized);
    }

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        name: claims.name,
    });

    Ok(next.run(req).await)
}
