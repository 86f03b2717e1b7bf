//! JWT service for token generation, validation, and revocation
//!
//! Tokens are signed with RS256. The api service only holds the public key,
//! so it can verify access tokens without calling back into this service.
//! Revoked refresh tokens are remembered in Redis by their `jti` until they
//! would have expired anyway.

use anyhow::Result;
use common::cache::RedisPool;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::models::User;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Private key for signing tokens
    pub private_key: String,
    /// Public key for verifying tokens
    pub public_key: String,
    /// Access token expiration time in seconds (default: 15 minutes)
    pub access_token_expiry: u64,
    /// Refresh token expiration time in seconds (default: 7 days)
    pub refresh_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_PRIVATE_KEY`: Private key (PEM) or path to a PEM file
    /// - `JWT_PUBLIC_KEY`: Public key (PEM) or path to a PEM file
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 900)
    /// - `JWT_REFRESH_TOKEN_EXPIRY`: Refresh token expiry in seconds (default: 604800)
    pub fn from_env() -> Result<Self> {
        let private_key = read_key_env("JWT_PRIVATE_KEY")?;
        let public_key = read_key_env("JWT_PUBLIC_KEY")?;

        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(900);

        let refresh_token_expiry = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(604800);

        Ok(JwtConfig {
            private_key,
            public_key,
            access_token_expiry,
            refresh_token_expiry,
        })
    }
}

/// Read a PEM key from an environment variable holding either the key itself
/// or a path to it
fn read_key_env(var: &str) -> Result<String> {
    let value =
        std::env::var(var).map_err(|_| anyhow::anyhow!("{} environment variable not set", var))?;

    if value.starts_with("-----BEGIN") {
        return Ok(value);
    }

    let contents = std::fs::read_to_string(&value)
        .map_err(|e| anyhow::anyhow!("Failed to read key file {}: {}", value, e))?;
    Ok(contents.trim().to_string())
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Display name at issue time
    pub name: String,
    /// Unique token ID, used for revocation
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

/// Issued access/refresh pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(config.private_key.as_bytes())?;
        let decoding_key = DecodingKey::from_rsa_pem(config.public_key.as_bytes())?;
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;

        Ok(JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        })
    }

    fn issue(&self, user: &User, token_type: TokenType) -> Result<String> {
        let now = unix_now()?;
        let expiry = match token_type {
            TokenType::Access => self.config.access_token_expiry,
            TokenType::Refresh => self.config.refresh_token_expiry,
        };

        let claims = Claims {
            sub: user.id,
            name: user.name.clone(),
            jti: Uuid::new_v4(),
            iat: now,
            exp: now + expiry,
            token_type,
        };

        Ok(encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Generate an access token for a user
    pub fn generate_access_token(&self, user: &User) -> Result<String> {
        self.issue(user, TokenType::Access)
    }

    /// Generate a refresh token for a user
    pub fn generate_refresh_token(&self, user: &User) -> Result<String> {
        self.issue(user, TokenType::Refresh)
    }

    /// Generate a fresh access/refresh pair
    pub fn generate_pair(&self, user: &User) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.generate_access_token(user)?,
            refresh_token: self.generate_refresh_token(user)?,
        })
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Validate a token and require it to be a refresh token
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims> {
        let claims = self.validate_token(token)?;
        if claims.token_type != TokenType::Refresh {
            anyhow::bail!("Token is not a refresh token");
        }
        Ok(claims)
    }

    /// Check if a token has been revoked
    pub async fn is_revoked(&self, redis_pool: &RedisPool, claims: &Claims) -> Result<bool> {
        Ok(redis_pool.exists(&revoked_key(claims.jti)).await?)
    }

    /// Revoke a token for the rest of its lifetime
    pub async fn revoke(&self, redis_pool: &RedisPool, claims: &Claims) -> Result<()> {
        let remaining = claims.exp.saturating_sub(unix_now()?);
        if remaining > 0 {
            redis_pool
                .set(&revoked_key(claims.jti), "1", Some(remaining))
                .await?;
        }
        Ok(())
    }

    /// Get the access token expiry time
    pub fn access_token_expiry(&self) -> u64 {
        self.config.access_token_expiry
    }

    /// Get the refresh token expiry time
    pub fn refresh_token_expiry(&self) -> u64 {
        self.config.refresh_token_expiry
    }
}

fn revoked_key(jti: Uuid) -> String {
    format!("revoked_token:{}", jti)
}

fn unix_now() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
        .as_secs())
}
