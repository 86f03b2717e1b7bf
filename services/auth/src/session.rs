//! Login sessions stored in Redis
//!
//! Each user has at most one live session, identified by the `jti` of the
//! refresh token issued with it. Refreshing rotates the stored `jti`.

use anyhow::Result;
use common::cache::RedisPool;
use tracing::info;
use uuid::Uuid;

/// Session manager for handling user sessions in Redis
#[derive(Clone)]
pub struct SessionManager {
    redis_pool: RedisPool,
    ttl_seconds: u64,
}

impl SessionManager {
    /// Create a new session manager; sessions live as long as refresh tokens
    pub fn new(redis_pool: RedisPool, ttl_seconds: u64) -> Self {
        Self {
            redis_pool,
            ttl_seconds,
        }
    }

    /// Start or replace the session of a user
    pub async fn store(&self, user_id: Uuid, refresh_jti: Uuid) -> Result<()> {
        info!("Storing session for user: {}", user_id);
        self.redis_pool
            .set(
                &session_key(user_id),
                &refresh_jti.to_string(),
                Some(self.ttl_seconds),
            )
            .await?;
        Ok(())
    }

    /// Check whether `refresh_jti` belongs to the user's live session
    pub async fn is_current(&self, user_id: Uuid, refresh_jti: Uuid) -> Result<bool> {
        let stored = self.redis_pool.get(&session_key(user_id)).await?;
        Ok(stored.as_deref() == Some(refresh_jti.to_string().as_str()))
    }

    /// End the session of a user
    pub async fn delete(&self, user_id: Uuid) -> Result<()> {
        info!("Deleting session for user: {}", user_id);
        self.redis_pool.delete(&session_key(user_id)).await?;
        Ok(())
    }
}

fn session_key(user_id: Uuid) -> String {
    format!("session:{}", user_id)
}
