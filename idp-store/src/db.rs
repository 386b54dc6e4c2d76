//! PostgreSQL connection management.

use crate::error::StoreError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Create a PostgreSQL connection pool.
///
/// Both logical stores share this one physical connection target; they
/// live in separate schemas on it.
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<PgPool, StoreError> {
    tracing::info!(
        max_connections = max_connections,
        min_connections = min_connections,
        "Connecting to PostgreSQL"
    );

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .connect(database_url)
        .await
        .map_err(StoreError::Connectivity)?;

    tracing::info!("PostgreSQL connection pool established");

    Ok(pool)
}

/// Check store reachability with a trivial round trip.
///
/// Run before bootstrap so an unreachable store surfaces as a
/// connectivity failure rather than a mid-migration error.
pub async fn health_check(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(StoreError::Connectivity)?;
    Ok(())
}
