//! Bootstrap orchestrator.
//!
//! Runs once per process start, before any listener opens: migrate the
//! operational store, migrate the configuration store, then seed
//! clients, identity resources, and API scopes from the baseline
//! catalog. Steps execute strictly in that order with no concurrency;
//! the first failure is terminal and the error propagates to the host,
//! which must abort startup.

use crate::catalog::BaselineCatalog;
use idp_store::seed::{seed_api_scopes, seed_clients, seed_identity_resources};
use idp_store::{ConfigurationSeed, MigrateStore, SeedCategory, SeedOutcome, StoreError};
use thiserror::Error;

/// Progress of one bootstrap run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    NotStarted,
    MigratingOperational,
    MigratingConfiguration,
    SeedingClients,
    SeedingIdentityResources,
    SeedingApiScopes,
    Ready,
    Failed,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Bootstrap is single-shot; a second `run` on the same instance is
    /// a caller bug.
    #[error("bootstrap already ran (state {0:?})")]
    AlreadyRan(BootstrapState),

    #[error("operational store migration failed: {0}")]
    OperationalMigration(#[source] StoreError),

    #[error("configuration store migration failed: {0}")]
    ConfigurationMigration(#[source] StoreError),

    #[error("seeding {category} failed: {source}")]
    Seed {
        category: SeedCategory,
        #[source]
        source: StoreError,
    },
}

/// What each category's seeding pass did, for operator-facing logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapReport {
    pub clients: SeedOutcome,
    pub identity_resources: SeedOutcome,
    pub api_scopes: SeedOutcome,
}

/// Single-shot bootstrap of both stores.
///
/// Generic over the store contracts so tests can drive the exact same
/// sequencing with in-memory stores.
pub struct Bootstrap {
    state: BootstrapState,
}

impl Bootstrap {
    pub fn new() -> Self {
        Self {
            state: BootstrapState::NotStarted,
        }
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    /// Migrate both stores, then seed the configuration store from the
    /// catalog. On any failure the state becomes [`BootstrapState::Failed`]
    /// and the error propagates; already-committed categories stay
    /// committed.
    pub async fn run<O, C>(
        &mut self,
        operational: &O,
        configuration: &C,
        catalog: &BaselineCatalog,
    ) -> Result<BootstrapReport, BootstrapError>
    where
        O: MigrateStore + Sync,
        C: MigrateStore + ConfigurationSeed + Sync,
    {
        if self.state != BootstrapState::NotStarted {
            return Err(BootstrapError::AlreadyRan(self.state));
        }

        let result = self.run_steps(operational, configuration, catalog).await;
        match &result {
            Ok(_) => {
                self.state = BootstrapState::Ready;
                tracing::info!("Bootstrap complete; stores are migrated and seeded");
            }
            Err(error) => {
                let failed_step = self.state;
                self.state = BootstrapState::Failed;
                tracing::error!(step = ?failed_step, error = %error, "Bootstrap failed");
            }
        }
        result
    }

    async fn run_steps<O, C>(
        &mut self,
        operational: &O,
        configuration: &C,
        catalog: &BaselineCatalog,
    ) -> Result<BootstrapReport, BootstrapError>
    where
        O: MigrateStore + Sync,
        C: MigrateStore + ConfigurationSeed + Sync,
    {
        self.state = BootstrapState::MigratingOperational;
        operational
            .migrate_to_latest()
            .await
            .map_err(BootstrapError::OperationalMigration)?;

        self.state = BootstrapState::MigratingConfiguration;
        configuration
            .migrate_to_latest()
            .await
            .map_err(BootstrapError::ConfigurationMigration)?;

        self.state = BootstrapState::SeedingClients;
        let clients = seed_clients(configuration, catalog.clients())
            .await
            .map_err(|source| BootstrapError::Seed {
                category: SeedCategory::Clients,
                source,
            })?;

        self.state = BootstrapState::SeedingIdentityResources;
        let identity_resources =
            seed_identity_resources(configuration, catalog.identity_resources())
                .await
                .map_err(|source| BootstrapError::Seed {
                    category: SeedCategory::IdentityResources,
                    source,
                })?;

        self.state = BootstrapState::SeedingApiScopes;
        let api_scopes = seed_api_scopes(configuration, catalog.api_scopes())
            .await
            .map_err(|source| BootstrapError::Seed {
                category: SeedCategory::ApiScopes,
                source,
            })?;

        Ok(BootstrapReport {
            clients,
            identity_resources,
            api_scopes,
        })
    }
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new()
    }
}
