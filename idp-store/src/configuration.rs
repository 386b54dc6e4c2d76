//! Configuration store: registered clients, identity resources, and
//! API scopes, backed by the `idp_configuration` schema.

use crate::error::StoreError;
use crate::migrate::{run_in_schema, MigrateStore, CONFIGURATION_MIGRATOR, CONFIGURATION_SCHEMA};
use crate::models::{ApiScope, Client, ClientSecret, GrantType, IdentityResource};
use crate::seed::ConfigurationSeed;
use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Row;
use tracing::instrument;

/// Handle to the configuration store.
#[derive(Clone)]
pub struct ConfigurationStore {
    pool: PgPool,
}

impl ConfigurationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[instrument(skip(self))]
    pub async fn count_clients(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM idp_configuration.clients")
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(row.get("n"))
    }

    #[instrument(skip(self))]
    pub async fn count_identity_resources(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM idp_configuration.identity_resources")
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(row.get("n"))
    }

    #[instrument(skip(self))]
    pub async fn count_api_scopes(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM idp_configuration.api_scopes")
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(row.get("n"))
    }

    /// Fetch a registered client by its unique identifier.
    #[instrument(skip(self))]
    pub async fn find_client(&self, client_id: &str) -> Result<Option<Client>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT client_id, display_name, grant_types, allowed_scopes,
                   redirect_uris, secret_hashes, require_pkce, allow_offline_access
            FROM idp_configuration.clients
            WHERE client_id = $1
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        row.map(client_from_row).transpose()
    }

    /// List all registered clients in insertion order.
    #[instrument(skip(self))]
    pub async fn list_clients(&self) -> Result<Vec<Client>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT client_id, display_name, grant_types, allowed_scopes,
                   redirect_uris, secret_hashes, require_pkce, allow_offline_access
            FROM idp_configuration.clients
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        rows.into_iter().map(client_from_row).collect()
    }

    /// List all identity resources in insertion order.
    #[instrument(skip(self))]
    pub async fn list_identity_resources(&self) -> Result<Vec<IdentityResource>, StoreError> {
        sqlx::query_as::<_, IdentityResource>(
            r#"
            SELECT name, display_name, claim_types
            FROM idp_configuration.identity_resources
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    /// List all API scopes in insertion order.
    #[instrument(skip(self))]
    pub async fn list_api_scopes(&self) -> Result<Vec<ApiScope>, StoreError> {
        sqlx::query_as::<_, ApiScope>(
            r#"
            SELECT name, display_name
            FROM idp_configuration.api_scopes
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }
}

fn client_from_row(row: sqlx::postgres::PgRow) -> Result<Client, StoreError> {
    let grant_types: Vec<String> = row.get("grant_types");
    let grant_types = grant_types
        .iter()
        .map(|s| s.parse::<GrantType>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::Decode)?;

    let secret_hashes: Vec<String> = row.get("secret_hashes");

    Ok(Client {
        client_id: row.get("client_id"),
        display_name: row.get("display_name"),
        grant_types,
        allowed_scopes: row.get("allowed_scopes"),
        redirect_uris: row.get("redirect_uris"),
        secrets: secret_hashes
            .into_iter()
            .map(ClientSecret::from_hash)
            .collect(),
        require_pkce: row.get("require_pkce"),
        allow_offline_access: row.get("allow_offline_access"),
    })
}

#[async_trait]
impl MigrateStore for ConfigurationStore {
    async fn migrate_to_latest(&self) -> Result<(), StoreError> {
        run_in_schema(&self.pool, CONFIGURATION_SCHEMA, &CONFIGURATION_MIGRATOR).await
    }
}

#[async_trait]
impl ConfigurationSeed for ConfigurationStore {
    async fn any_clients(&self) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM idp_configuration.clients) AS present")
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(row.get("present"))
    }

    async fn insert_clients(&self, items: &[Client]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::from_sqlx)?;

        for client in items {
            let grant_types: Vec<String> = client
                .grant_types
                .iter()
                .map(|g| g.as_str().to_string())
                .collect();
            let secret_hashes: Vec<String> =
                client.secrets.iter().map(|s| s.value.clone()).collect();

            sqlx::query(
                r#"
                INSERT INTO idp_configuration.clients
                    (client_id, display_name, grant_types, allowed_scopes,
                     redirect_uris, secret_hashes, require_pkce, allow_offline_access)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(&client.client_id)
            .bind(&client.display_name)
            .bind(&grant_types)
            .bind(&client.allowed_scopes)
            .bind(&client.redirect_uris)
            .bind(&secret_hashes)
            .bind(client.require_pkce)
            .bind(client.allow_offline_access)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::from_sqlx)?;
        }

        tx.commit().await.map_err(StoreError::from_sqlx)
    }

    async fn any_identity_resources(&self) -> Result<bool, StoreError> {
        let row = sqlx::query(
            "SELECT EXISTS (SELECT 1 FROM idp_configuration.identity_resources) AS present",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;
        Ok(row.get("present"))
    }

    async fn insert_identity_resources(
        &self,
        items: &[IdentityResource],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::from_sqlx)?;

        for resource in items {
            sqlx::query(
                r#"
                INSERT INTO idp_configuration.identity_resources
                    (name, display_name, claim_types)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(&resource.name)
            .bind(&resource.display_name)
            .bind(&resource.claim_types)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::from_sqlx)?;
        }

        tx.commit().await.map_err(StoreError::from_sqlx)
    }

    async fn any_api_scopes(&self) -> Result<bool, StoreError> {
        let row =
            sqlx::query("SELECT EXISTS (SELECT 1 FROM idp_configuration.api_scopes) AS present")
                .fetch_one(&self.pool)
                .await
                .map_err(StoreError::from_sqlx)?;
        Ok(row.get("present"))
    }

    async fn insert_api_scopes(&self, items: &[ApiScope]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::from_sqlx)?;

        for scope in items {
            sqlx::query(
                r#"
                INSERT INTO idp_configuration.api_scopes (name, display_name)
                VALUES ($1, $2)
                "#,
            )
            .bind(&scope.name)
            .bind(&scope.display_name)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::from_sqlx)?;
        }

        tx.commit().await.map_err(StoreError::from_sqlx)
    }
}
