use std::sync::Arc;

use anyhow::Result;
use api::{middleware::JwtVerifier, routes, state::AppState};
use common::{
    database::{self, DatabaseConfig},
    settings::{self, ServiceConfig},
};
use media::{MediaConfig, S3MediaStore};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let service_config = ServiceConfig::load("api", 3001)?;
    settings::init_tracing(&service_config.log_level);

    info!("Starting API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }
    database::run_migrations(&pool).await?;

    let jwt_verifier = JwtVerifier::from_env()?;

    let media_config = MediaConfig::from_env()?;
    let max_upload_bytes = media_config.max_upload_bytes;
    let media_store = S3MediaStore::from_config(media_config).await;

    let app_state = AppState::new(pool, Arc::new(media_store), jwt_verifier, max_upload_bytes);

    let app = routes::create_router(app_state);

    let address = service_config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
