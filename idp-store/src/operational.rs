//! Operational store: runtime-issued grants (refresh tokens, consents,
//! device codes), backed by the `idp_operational` schema.
//!
//! Bootstrap only migrates this store; the grant operations here are
//! the token runtime's surface over it.

use crate::error::StoreError;
use crate::migrate::{run_in_schema, MigrateStore, OPERATIONAL_MIGRATOR, OPERATIONAL_SCHEMA};
use crate::models::PersistedGrant;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use tracing::instrument;

/// Handle to the operational store.
#[derive(Clone)]
pub struct OperationalStore {
    pool: PgPool,
}

impl OperationalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Store a grant, replacing any existing grant with the same key.
    #[instrument(skip(self, grant), fields(grant_type = %grant.grant_type, client_id = %grant.client_id))]
    pub async fn store_grant(&self, grant: &PersistedGrant) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO idp_operational.persisted_grants
                (grant_key, grant_type, subject_id, client_id,
                 creation_utc, expiration_utc, consumed_utc, data)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (grant_key) DO UPDATE SET
                grant_type = EXCLUDED.grant_type,
                subject_id = EXCLUDED.subject_id,
                client_id = EXCLUDED.client_id,
                creation_utc = EXCLUDED.creation_utc,
                expiration_utc = EXCLUDED.expiration_utc,
                consumed_utc = EXCLUDED.consumed_utc,
                data = EXCLUDED.data
            "#,
        )
        .bind(&grant.key)
        .bind(&grant.grant_type)
        .bind(&grant.subject_id)
        .bind(&grant.client_id)
        .bind(grant.creation_utc)
        .bind(grant.expiration_utc)
        .bind(grant.consumed_utc)
        .bind(&grant.data)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;
        Ok(())
    }

    /// Fetch a grant by its unique key.
    #[instrument(skip(self, key))]
    pub async fn find_grant(&self, key: &str) -> Result<Option<PersistedGrant>, StoreError> {
        sqlx::query_as::<_, PersistedGrant>(
            r#"
            SELECT grant_key, grant_type, subject_id, client_id,
                   creation_utc, expiration_utc, consumed_utc, data
            FROM idp_operational.persisted_grants
            WHERE grant_key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    /// Remove a grant (revocation). Returns whether a row was deleted.
    #[instrument(skip(self, key))]
    pub async fn remove_grant(&self, key: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM idp_operational.persisted_grants WHERE grant_key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove all grants that expired at or before `now`. Returns the
    /// number of rows deleted.
    #[instrument(skip(self))]
    pub async fn remove_expired_grants(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "DELETE FROM idp_operational.persisted_grants WHERE expiration_utc <= $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        let removed = result.rows_affected();
        if removed > 0 {
            tracing::info!(removed = removed, "Removed expired grants");
        }
        Ok(removed)
    }
}

#[async_trait]
impl MigrateStore for OperationalStore {
    async fn migrate_to_latest(&self) -> Result<(), StoreError> {
        run_in_schema(&self.pool, OPERATIONAL_SCHEMA, &OPERATIONAL_MIGRATOR).await
    }
}
