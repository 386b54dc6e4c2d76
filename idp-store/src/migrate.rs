//! Schema migration management.
//!
//! Each store carries its own set of versioned SQL migrations, embedded
//! at compile time. The two stores share one physical database but live
//! in separate schemas, and each schema keeps its own migration history
//! table, so the stores migrate independently.

use crate::error::StoreError;
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::PgPool;

/// Schema holding the configuration store (clients, resources, scopes).
pub const CONFIGURATION_SCHEMA: &str = "idp_configuration";

/// Schema holding the operational store (persisted grants).
pub const OPERATIONAL_SCHEMA: &str = "idp_operational";

/// Embedded migrations for the configuration store.
pub static CONFIGURATION_MIGRATOR: Migrator = sqlx::migrate!("migrations/configuration");

/// Embedded migrations for the operational store.
pub static OPERATIONAL_MIGRATOR: Migrator = sqlx::migrate!("migrations/operational");

/// Bring a store's schema up to the latest version.
///
/// The contract is the same regardless of backing mechanism: pending
/// migrations apply in version order, each inside its own transaction,
/// and calling on an already-current store is a no-op.
#[async_trait]
pub trait MigrateStore {
    async fn migrate_to_latest(&self) -> Result<(), StoreError>;
}

/// Run an embedded migrator with its history table confined to `schema`.
///
/// A dedicated connection is taken from the pool, its `search_path` is
/// pointed at the schema (creating it if needed) so `_sqlx_migrations`
/// lands there, and the path is reset before the connection returns to
/// the pool.
pub(crate) async fn run_in_schema(
    pool: &PgPool,
    schema: &str,
    migrator: &Migrator,
) -> Result<(), StoreError> {
    tracing::info!(schema = schema, "Running database migrations");

    let mut conn = pool.acquire().await.map_err(StoreError::from_sqlx)?;

    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
        .execute(&mut *conn)
        .await
        .map_err(StoreError::from_sqlx)?;
    sqlx::query(&format!("SET search_path TO {}", schema))
        .execute(&mut *conn)
        .await
        .map_err(StoreError::from_sqlx)?;

    let outcome = migrator.run_direct(&mut *conn).await;

    // Reset even when the migrator failed; the connection goes back to
    // the shared pool either way.
    let reset = sqlx::query("RESET search_path").execute(&mut *conn).await;

    outcome?;
    reset.map_err(StoreError::from_sqlx)?;

    tracing::info!(schema = schema, "Database migrations completed");
    Ok(())
}
