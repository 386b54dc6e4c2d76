//! Persistence layer for the identity provider.
//!
//! Two logically separate stores share one physical PostgreSQL target:
//! the configuration store (registered clients, identity resources,
//! API scopes) and the operational store (persisted grants). Each
//! lives in its own schema with its own migration history, so they
//! migrate and seed independently.

pub mod configuration;
pub mod db;
pub mod error;
pub mod migrate;
pub mod models;
pub mod operational;
pub mod seed;

pub use configuration::ConfigurationStore;
pub use error::StoreError;
pub use migrate::MigrateStore;
pub use models::{ApiScope, Client, ClientSecret, GrantType, IdentityResource, PersistedGrant};
pub use operational::OperationalStore;
pub use seed::{
    seed_api_scopes, seed_clients, seed_identity_resources, ConfigurationSeed, SeedCategory,
    SeedOutcome,
};
