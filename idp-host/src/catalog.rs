//! Baseline configuration catalog.
//!
//! A declarative, immutable description of the clients, identity
//! resources, and API scopes this deployment requires. Built once at
//! startup and passed explicitly into bootstrap; changing the baseline
//! means shipping a new deployment.

use crate::config::SeedConfig;
use idp_store::{ApiScope, Client, ClientSecret, GrantType, IdentityResource};

/// Read-only baseline for the configuration store.
#[derive(Debug, Clone)]
pub struct BaselineCatalog {
    clients: Vec<Client>,
    identity_resources: Vec<IdentityResource>,
    api_scopes: Vec<ApiScope>,
}

impl BaselineCatalog {
    pub fn new(
        clients: Vec<Client>,
        identity_resources: Vec<IdentityResource>,
        api_scopes: Vec<ApiScope>,
    ) -> Self {
        Self {
            clients,
            identity_resources,
            api_scopes,
        }
    }

    /// The standard deployment baseline: one machine-to-machine client,
    /// one interactive web client, the core OIDC identity resources,
    /// and the API scopes the platform exposes. Secrets come from
    /// deployment configuration and are hashed here, never stored or
    /// checked in as plaintext.
    pub fn standard(seed: &SeedConfig) -> Self {
        let clients = vec![
            Client {
                client_id: "m2m.client".to_string(),
                display_name: "Machine to machine client".to_string(),
                grant_types: vec![GrantType::ClientCredentials],
                allowed_scopes: vec!["idp.api".to_string()],
                redirect_uris: vec![],
                secrets: vec![ClientSecret::from_plain(&seed.machine_client_secret)],
                require_pkce: false,
                allow_offline_access: false,
            },
            Client {
                client_id: "interactive.web".to_string(),
                display_name: "Interactive web client".to_string(),
                grant_types: vec![GrantType::AuthorizationCode],
                allowed_scopes: vec![
                    "openid".to_string(),
                    "profile".to_string(),
                    "email".to_string(),
                    "idp.api".to_string(),
                ],
                redirect_uris: vec![format!("{}/signin-oidc", seed.web_base_url)],
                secrets: vec![ClientSecret::from_plain(&seed.web_client_secret)],
                require_pkce: true,
                allow_offline_access: true,
            },
        ];

        let identity_resources = vec![
            IdentityResource {
                name: "openid".to_string(),
                display_name: "Your user identifier".to_string(),
                claim_types: vec!["sub".to_string()],
            },
            IdentityResource {
                name: "profile".to_string(),
                display_name: "User profile".to_string(),
                claim_types: vec![
                    "name".to_string(),
                    "given_name".to_string(),
                    "family_name".to_string(),
                    "preferred_username".to_string(),
                ],
            },
            IdentityResource {
                name: "email".to_string(),
                display_name: "Your email address".to_string(),
                claim_types: vec!["email".to_string(), "email_verified".to_string()],
            },
        ];

        let api_scopes = vec![
            ApiScope {
                name: "idp.api".to_string(),
                display_name: "Main API".to_string(),
            },
            ApiScope {
                name: "idp.admin".to_string(),
                display_name: "Administrative API".to_string(),
            },
        ];

        Self::new(clients, identity_resources, api_scopes)
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn identity_resources(&self) -> &[IdentityResource] {
        &self.identity_resources
    }

    pub fn api_scopes(&self) -> &[ApiScope] {
        &self.api_scopes
    }
}
