//! Startup bootstrap for the identity provider.
//!
//! The host runs exactly once per process start, before the serving
//! layer arms its request pipeline: it connects to PostgreSQL, migrates
//! the operational and configuration stores, and seeds the baseline
//! configuration catalog into an empty configuration store. A failed
//! bootstrap exits non-zero so the deployment never serves against an
//! unmigrated or unseeded store.

pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod error;
pub mod observability;

pub use bootstrap::{Bootstrap, BootstrapError, BootstrapReport, BootstrapState};
pub use catalog::BaselineCatalog;
pub use config::HostConfig;
pub use error::HostError;
