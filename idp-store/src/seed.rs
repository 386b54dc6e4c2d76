//! Idempotent baseline seeding.
//!
//! Each category (clients, identity resources, API scopes) is seeded
//! only when the store holds no rows of that category at all. A
//! populated category is left untouched: no diffing, no upserts, no
//! removal. Within a category the whole baseline goes in as one commit.

use crate::error::StoreError;
use crate::models::{ApiScope, Client, IdentityResource};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The three seedable categories of the configuration store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedCategory {
    Clients,
    IdentityResources,
    ApiScopes,
}

impl SeedCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::IdentityResources => "identity_resources",
            Self::ApiScopes => "api_scopes",
        }
    }
}

impl std::fmt::Display for SeedCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a seeding pass did for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The category was empty; the full baseline was inserted.
    Seeded(usize),
    /// At least one row already existed; nothing was written.
    AlreadyPopulated,
}

/// Existence checks and batch inserts the seeder needs from a
/// configuration store. Each `insert_*` must write its whole batch in
/// a single transaction.
#[async_trait]
pub trait ConfigurationSeed {
    async fn any_clients(&self) -> Result<bool, StoreError>;
    async fn insert_clients(&self, items: &[Client]) -> Result<(), StoreError>;

    async fn any_identity_resources(&self) -> Result<bool, StoreError>;
    async fn insert_identity_resources(&self, items: &[IdentityResource])
        -> Result<(), StoreError>;

    async fn any_api_scopes(&self) -> Result<bool, StoreError>;
    async fn insert_api_scopes(&self, items: &[ApiScope]) -> Result<(), StoreError>;
}

/// Seed baseline clients if the store has none.
pub async fn seed_clients<S>(store: &S, items: &[Client]) -> Result<SeedOutcome, StoreError>
where
    S: ConfigurationSeed + ?Sized,
{
    if store.any_clients().await? {
        tracing::info!("Clients already present; skipping seed");
        return Ok(SeedOutcome::AlreadyPopulated);
    }

    store
        .insert_clients(items)
        .await
        .map_err(|e| StoreError::seed_write(SeedCategory::Clients, e))?;

    tracing::info!(count = items.len(), "Seeded baseline clients");
    Ok(SeedOutcome::Seeded(items.len()))
}

/// Seed baseline identity resources if the store has none.
pub async fn seed_identity_resources<S>(
    store: &S,
    items: &[IdentityResource],
) -> Result<SeedOutcome, StoreError>
where
    S: ConfigurationSeed + ?Sized,
{
    if store.any_identity_resources().await? {
        tracing::info!("Identity resources already present; skipping seed");
        return Ok(SeedOutcome::AlreadyPopulated);
    }

    store
        .insert_identity_resources(items)
        .await
        .map_err(|e| StoreError::seed_write(SeedCategory::IdentityResources, e))?;

    tracing::info!(count = items.len(), "Seeded baseline identity resources");
    Ok(SeedOutcome::Seeded(items.len()))
}

/// Seed baseline API scopes if the store has none.
pub async fn seed_api_scopes<S>(store: &S, items: &[ApiScope]) -> Result<SeedOutcome, StoreError>
where
    S: ConfigurationSeed + ?Sized,
{
    if store.any_api_scopes().await? {
        tracing::info!("API scopes already present; skipping seed");
        return Ok(SeedOutcome::AlreadyPopulated);
    }

    store
        .insert_api_scopes(items)
        .await
        .map_err(|e| StoreError::seed_write(SeedCategory::ApiScopes, e))?;

    tracing::info!(count = items.len(), "Seeded baseline API scopes");
    Ok(SeedOutcome::Seeded(items.len()))
}
