//! Environment-driven host configuration.
//!
//! Defaults are for local development only; in `prod` every value must
//! be set explicitly or startup fails.

use crate::error::HostError;
use std::env;

#[derive(Debug, Clone)]
pub struct HostConfig {
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    pub database: DatabaseConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Deployment-supplied inputs for the baseline catalog. Client secrets
/// are plaintext here and hashed before they ever reach a store.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub machine_client_secret: String,
    pub web_client_secret: String,
    /// Base URL of the interactive web client, used to derive its
    /// redirect URIs.
    pub web_base_url: String,
}

impl HostConfig {
    pub fn from_env() -> Result<Self, HostError> {
        dotenvy::dotenv().ok();

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| HostError::Config(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = HostConfig {
            environment,
            service_name: get_env("SERVICE_NAME", Some("idp-host"), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            database: DatabaseConfig {
                url: get_env(
                    "DATABASE_URL",
                    Some("postgres://localhost/idp_dev"),
                    is_prod,
                )?,
                max_connections: get_env("DATABASE_MAX_CONNECTIONS", Some("5"), is_prod)?
                    .parse()
                    .unwrap_or(5),
                min_connections: get_env("DATABASE_MIN_CONNECTIONS", Some("1"), is_prod)?
                    .parse()
                    .unwrap_or(1),
            },
            seed: SeedConfig {
                machine_client_secret: get_env("SEED_M2M_CLIENT_SECRET", Some("dev-m2m"), is_prod)?,
                web_client_secret: get_env("SEED_WEB_CLIENT_SECRET", Some("dev-web"), is_prod)?,
                web_base_url: get_env(
                    "SEED_WEB_BASE_URL",
                    Some("https://localhost:5001"),
                    is_prod,
                )?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), HostError> {
        if self.database.max_connections == 0 {
            return Err(HostError::Config(anyhow::anyhow!(
                "DATABASE_MAX_CONNECTIONS must be greater than 0"
            )));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(HostError::Config(anyhow::anyhow!(
                "DATABASE_MIN_CONNECTIONS must not exceed DATABASE_MAX_CONNECTIONS"
            )));
        }

        if self.seed.web_base_url.ends_with('/') {
            return Err(HostError::Config(anyhow::anyhow!(
                "SEED_WEB_BASE_URL must not end with a trailing slash"
            )));
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, HostError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(HostError::Config(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(HostError::Config(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
