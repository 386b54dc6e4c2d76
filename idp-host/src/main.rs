use idp_host::{
    bootstrap::Bootstrap, catalog::BaselineCatalog, config::HostConfig,
    observability::init_tracing, HostError,
};
use idp_store::{db, ConfigurationStore, OperationalStore};

#[tokio::main]
async fn main() -> Result<(), HostError> {
    // Load configuration - fail fast if invalid
    let config = HostConfig::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(
        service = %config.service_name,
        environment = ?config.environment,
        "Starting identity provider bootstrap"
    );

    let pool = db::create_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;

    // Surface an unreachable store before touching any schema.
    db::health_check(&pool).await?;

    let operational = OperationalStore::new(pool.clone());
    let configuration = ConfigurationStore::new(pool.clone());
    let catalog = BaselineCatalog::standard(&config.seed);

    let mut bootstrap = Bootstrap::new();
    let report = bootstrap.run(&operational, &configuration, &catalog).await?;

    tracing::info!(
        clients = ?report.clients,
        identity_resources = ?report.identity_resources,
        api_scopes = ?report.api_scopes,
        "Stores ready; serving layer may start"
    );

    // Pool connections are released here, before control returns to the
    // deployment that starts the serving layer.
    pool.close().await;
    Ok(())
}
