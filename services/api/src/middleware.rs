//! Authentication middleware for JWT token validation
//!
//! Access tokens are issued by the auth service and verified here with its
//! public key only.

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
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Display name at issue time
    pub name: String,
    /// Unique token ID
    pub jti: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

/// Token type enum
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum TokenType {
    /// Access token
    Access,
    /// Refresh token
    Refresh,
}

/// Authenticated user information
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
}

/// Verifies access tokens; built once at startup
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Build a verifier from an RSA public key in PEM form
    pub fn from_public_key(pem: &str) -> anyhow::Result<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(pem.as_bytes())?;
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Build a verifier from `JWT_PUBLIC_KEY`, holding either the PEM itself
    /// or a path to it
    pub fn from_env() -> anyhow::Result<Self> {
        let public_key = std::env::var("JWT_PUBLIC_KEY")
            .map_err(|_| anyhow::anyhow!("JWT_PUBLIC_KEY environment variable not set"))?;

        let public_key = if public_key.starts_with("-----BEGIN") {
            public_key
        } else {
            std::fs::read_to_string(&public_key)
                .map_err(|e| anyhow::anyhow!("Failed to read public key file: {}", e))?
                .trim()
                .to_string()
        };

        Self::from_public_key(&public_key)
    }

    /// Validate an access token and return the caller it identifies
    pub fn verify(&self, token: &str) -> Result<AuthUser, ApiError> {
        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("Rejected token: {}", e);
                ApiError::Unauthorized
            })?;

        if token_data.claims.token_type != TokenType::Access {
            return Err(ApiError::Unauthorized);
        }

        Ok(AuthUser {
            id: token_data.claims.sub,
            name: token_data.claims.name,
        })
    }
}

/// Require a valid bearer access token
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;
    let user = state.jwt_verifier.verify(bearer.token())?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Attach the caller's identity when a valid token is present; never rejects
pub async fn identify_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(TypedHeader(Authorization(bearer))) = bearer {
        if let Ok(user) = state.jwt_verifier.verify(bearer.token()) {
            req.extensions_mut().insert(user);
        }
    }

    next.run(req).await
}

/// Allow the request only when `user` owns the resource
pub fn ensure_owner(owner_id: Uuid, user: &AuthUser) -> Result<(), ApiError> {
    if owner_id == user.id {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Whether `viewer` may see an item with the given owner and visibility
pub fn can_view(owner_id: Uuid, is_public: bool, viewer: Option<&AuthUser>) -> bool {
    is_public || viewer.is_some_and(|user| user.id == owner_id)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};

    pub(crate) const TEST_PRIVATE_KEY: &str =
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/jwt_test_private.pem"));
    pub(crate) const TEST_PUBLIC_KEY: &str =
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/jwt_test_public.pem"));

    pub(crate) fn sign(user_id: Uuid, token_type: TokenType, ttl: i64) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let claims = Claims {
            sub: user_id,
            name: "Ana".to_string(),
            jti: Uuid::new_v4(),
            iat: now as u64,
            exp: (now + ttl) as u64,
            token_type,
        };
        encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &EncodingKey::from_rsa_pem(TEST_PRIVATE_KEY.as_bytes()).unwrap(),
        )
        .unwrap()
    }

    pub(crate) fn verifier() -> JwtVerifier {
        JwtVerifier::from_public_key(TEST_PUBLIC_KEY).unwrap()
    }

    #[test]
    fn test_verify_access_token() {
        let id = Uuid::new_v4();
        let user = verifier().verify(&sign(id, TokenType::Access, 900)).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.name, "Ana");
    }

    #[test]
    fn test_refresh_token_is_rejected() {
        let token = sign(Uuid::new_v4(), TokenType::Refresh, 900);
        assert!(matches!(verifier().verify(&token), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = sign(Uuid::new_v4(), TokenType::Access, -3600);
        assert!(matches!(verifier().verify(&token), Err(ApiError::Unauthorized)));
    }

    #[test]
    #[serial_test::serial]
    fn test_verifier_from_env_accepts_inline_pem() {
        unsafe {
            std::env::set_var("JWT_PUBLIC_KEY", TEST_PUBLIC_KEY);
        }
        assert!(JwtVerifier::from_env().is_ok());

        unsafe {
            std::env::set_var("JWT_PUBLIC_KEY", "/nonexistent/jwt_public.pem");
        }
        assert!(JwtVerifier::from_env().is_err());

        unsafe {
            std::env::remove_var("JWT_PUBLIC_KEY");
        }
        assert!(JwtVerifier::from_env().is_err());
    }

    #[test]
    fn test_ensure_owner() {
        let user = AuthUser {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
        };
        assert!(ensure_owner(user.id, &user).is_ok());
        assert!(matches!(
            ensure_owner(Uuid::new_v4(), &user),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn test_private_items_are_visible_to_owner_only() {
        let owner = AuthUser {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
        };
        let other = AuthUser {
            id: Uuid::new_v4(),
            name: "Bob".to_string(),
        };

        assert!(can_view(owner.id, true, None));
        assert!(!can_view(owner.id, false, None));
        assert!(!can_view(owner.id, false, Some(&other)));
        assert!(can_view(owner.id, false, Some(&owner)));
    }
}
