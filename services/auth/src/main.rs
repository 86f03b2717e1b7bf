use anyhow::Result;
use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
    settings::{self, ServiceConfig},
};
use tokio::net::TcpListener;
use tracing::info;

mod error;
mod jwt;
mod middleware;
mod models;
mod rate_limiter;
mod repositories;
mod routes;
mod session;
mod validation;

use crate::{
    jwt::{JwtConfig, JwtService},
    rate_limiter::{RateLimiter, RateLimiterConfig},
    repositories::UserRepository,
    session::SessionManager,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub redis_pool: RedisPool,
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub session_manager: SessionManager,
    pub rate_limiter: RateLimiter,
}

#[tokio::main]
async fn main() -> Result<()> {
    let service_config = ServiceConfig::load("auth", 3000)?;
    settings::init_tracing(&service_config.log_level);

    info!("Starting authentication service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }
    database::run_migrations(&pool).await?;

    // Initialize JWT service
    let jwt_service = JwtService::new(JwtConfig::from_env()?)?;

    // Initialize Redis connection pool
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config)?;
    if !redis_pool.health_check().await? {
        anyhow::bail!("Failed to connect to Redis at {}", redis_config.url);
    }

    let app_state = AppState {
        session_manager: SessionManager::new(
            redis_pool.clone(),
            jwt_service.refresh_token_expiry(),
        ),
        redis_pool,
        jwt_service,
        user_repository: UserRepository::new(pool),
        rate_limiter: RateLimiter::new(RateLimiterConfig::default()),
    };

    let app = routes::create_router(app_state);

    let address = service_config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Authentication service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
