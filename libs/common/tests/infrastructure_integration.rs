//! Integration tests for the infrastructure components
//!
//! These tests need a PostgreSQL database and a Redis instance reachable
//! through `DATABASE_URL` and `REDIS_URL`. Run them with
//! `cargo test -p common -- --ignored`.

use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, health_check, init_pool, run_migrations},
};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires PostgreSQL and Redis"]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    assert!(health_check(&pool).await?, "Database health check failed");

    // Migrations are idempotent, running them twice must succeed
    run_migrations(&pool).await?;
    run_migrations(&pool).await?;

    for table in ["users", "photos", "videos", "journals"] {
        let row = sqlx::query("SELECT to_regclass($1) IS NOT NULL AS present")
            .bind(format!("public.{}", table))
            .fetch_one(&pool)
            .await?;
        let present: bool = row.get("present");
        assert!(present, "table {} missing after migrations", table);
    }

    let redis_pool = RedisPool::new(&RedisConfig::from_env()?)?;
    assert!(redis_pool.health_check().await?, "Redis health check failed");

    let test_key = "integration_test_key";
    redis_pool.set(test_key, "integration_test_value", Some(10)).await?;
    assert_eq!(
        redis_pool.get(test_key).await?,
        Some("integration_test_value".to_string())
    );

    redis_pool.delete(test_key).await?;
    assert_eq!(redis_pool.get(test_key).await?, None);

    Ok(())
}
