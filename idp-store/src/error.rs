//! Error types for the persistence layer.

use crate::seed::SeedCategory;
use thiserror::Error;

/// Errors surfaced by the configuration and operational stores.
///
/// All variants are fatal for the bootstrap flow: nothing in this layer
/// retries or recovers locally, callers decide whether the process may
/// continue (it may not, during startup).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store is unreachable (connection refused, pool exhausted, TLS).
    #[error("store unreachable: {0}")]
    Connectivity(#[source] sqlx::Error),

    /// A schema migration could not be applied.
    #[error("schema migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Writing baseline rows for a category failed; the category's
    /// transaction was rolled back.
    #[error("seeding {category} failed: {source}")]
    SeedWrite {
        category: SeedCategory,
        #[source]
        source: Box<StoreError>,
    },

    /// A stored value could not be decoded into its domain type.
    #[error("invalid stored value: {0}")]
    Decode(String),

    /// Any other query failure.
    #[error("database query failed: {0}")]
    Query(sqlx::Error),
}

impl StoreError {
    /// Classify a raw sqlx error, separating connectivity loss from
    /// ordinary query failures.
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => StoreError::Connectivity(err),
            other => StoreError::Query(other),
        }
    }

    /// Wrap a failure that happened while seeding `category`.
    pub fn seed_write(category: SeedCategory, source: StoreError) -> Self {
        StoreError::SeedWrite {
            category,
            source: Box::new(source),
        }
    }

    /// True when the failure indicates the store cannot be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, StoreError::Connectivity(_))
    }
}
