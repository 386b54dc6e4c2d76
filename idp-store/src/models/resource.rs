//! Identity resources and API scopes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named group of user claims exposed to clients (e.g. `profile`).
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct IdentityResource {
    pub name: String,
    pub display_name: String,
    pub claim_types: Vec<String>,
}

/// A named API permission a client can request.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ApiScope {
    pub name: String,
    pub display_name: String,
}
