//! Domain models for the configuration and operational stores.

mod client;
mod grant;
mod resource;

pub use client::{Client, ClientSecret, GrantType};
pub use grant::PersistedGrant;
pub use resource::{ApiScope, IdentityResource};
