//! Common library for the VidoraFrameForge services
//!
//! This crate provides shared functionality used by the auth and api
//! services: the PostgreSQL pool and schema migrations, the Redis cache
//! used for sessions, and the shared error types.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, init_pool, health_check, run_migrations};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     println!("Database health check: {}", health_check(&pool).await?);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod database;
pub mod error;
pub mod settings;
