//! Integration tests for the bootstrap orchestrator.
//!
//! Driven entirely against in-memory stores so the sequencing,
//! short-circuit, and idempotence guarantees are checked without a
//! database.

use async_trait::async_trait;
use idp_host::{BaselineCatalog, Bootstrap, BootstrapError, BootstrapState};
use idp_store::{
    ApiScope, Client, ClientSecret, ConfigurationSeed, GrantType, IdentityResource, MigrateStore,
    SeedOutcome, StoreError,
};
use std::sync::{Arc, Mutex};

type EventLog = Arc<Mutex<Vec<&'static str>>>;

struct FakeOperational {
    events: EventLog,
    migrations: Mutex<usize>,
    fail_migration: bool,
}

impl FakeOperational {
    fn new(events: EventLog) -> Self {
        Self {
            events,
            migrations: Mutex::new(0),
            fail_migration: false,
        }
    }

    fn failing(events: EventLog) -> Self {
        Self {
            fail_migration: true,
            ..Self::new(events)
        }
    }
}

#[async_trait]
impl MigrateStore for FakeOperational {
    async fn migrate_to_latest(&self) -> Result<(), StoreError> {
        if self.fail_migration {
            return Err(StoreError::Decode("injected: operational down".to_string()));
        }
        self.events.lock().unwrap().push("migrate_operational");
        *self.migrations.lock().unwrap() += 1;
        Ok(())
    }
}

#[derive(Default)]
struct FakeConfiguration {
    events: EventLog,
    migrations: Mutex<usize>,
    clients: Mutex<Vec<Client>>,
    identity_resources: Mutex<Vec<IdentityResource>>,
    api_scopes: Mutex<Vec<ApiScope>>,
    fail_identity_resource_insert: bool,
}

impl FakeConfiguration {
    fn new(events: EventLog) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }
}

#[async_trait]
impl MigrateStore for FakeConfiguration {
    async fn migrate_to_latest(&self) -> Result<(), StoreError> {
        self.events.lock().unwrap().push("migrate_configuration");
        *self.migrations.lock().unwrap() += 1;
        Ok(())
    }
}

#[async_trait]
impl ConfigurationSeed for FakeConfiguration {
    async fn any_clients(&self) -> Result<bool, StoreError> {
        Ok(!self.clients.lock().unwrap().is_empty())
    }

    async fn insert_clients(&self, items: &[Client]) -> Result<(), StoreError> {
        self.events.lock().unwrap().push("insert_clients");
        self.clients.lock().unwrap().extend_from_slice(items);
        Ok(())
    }

    async fn any_identity_resources(&self) -> Result<bool, StoreError> {
        Ok(!self.identity_resources.lock().unwrap().is_empty())
    }

    async fn insert_identity_resources(
        &self,
        items: &[IdentityResource],
    ) -> Result<(), StoreError> {
        if self.fail_identity_resource_insert {
            return Err(StoreError::Decode("injected: write refused".to_string()));
        }
        self.events.lock().unwrap().push("insert_identity_resources");
        self.identity_resources
            .lock()
            .unwrap()
            .extend_from_slice(items);
        Ok(())
    }

    async fn any_api_scopes(&self) -> Result<bool, StoreError> {
        Ok(!self.api_scopes.lock().unwrap().is_empty())
    }

    async fn insert_api_scopes(&self, items: &[ApiScope]) -> Result<(), StoreError> {
        self.events.lock().unwrap().push("insert_api_scopes");
        self.api_scopes.lock().unwrap().extend_from_slice(items);
        Ok(())
    }
}

fn client(id: &str) -> Client {
    Client {
        client_id: id.to_string(),
        display_name: id.to_string(),
        grant_types: vec![GrantType::ClientCredentials],
        allowed_scopes: vec!["idp.api".to_string()],
        redirect_uris: vec![],
        secrets: vec![ClientSecret::from_plain("test-secret")],
        require_pkce: false,
        allow_offline_access: false,
    }
}

fn resource(name: &str) -> IdentityResource {
    IdentityResource {
        name: name.to_string(),
        display_name: name.to_string(),
        claim_types: vec!["sub".to_string()],
    }
}

fn scope(name: &str) -> ApiScope {
    ApiScope {
        name: name.to_string(),
        display_name: name.to_string(),
    }
}

/// Two clients, three identity resources, two API scopes.
fn catalog() -> BaselineCatalog {
    BaselineCatalog::new(
        vec![client("m2m.client"), client("interactive.web")],
        vec![resource("openid"), resource("profile"), resource("email")],
        vec![scope("idp.api"), scope("idp.admin")],
    )
}

#[tokio::test]
async fn bootstrap_runs_steps_in_order_and_reaches_ready() {
    let events: EventLog = Arc::default();
    let operational = FakeOperational::new(events.clone());
    let configuration = FakeConfiguration::new(events.clone());

    let mut bootstrap = Bootstrap::new();
    assert_eq!(bootstrap.state(), BootstrapState::NotStarted);

    let report = bootstrap
        .run(&operational, &configuration, &catalog())
        .await
        .expect("bootstrap succeeds");

    assert_eq!(bootstrap.state(), BootstrapState::Ready);
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            "migrate_operational",
            "migrate_configuration",
            "insert_clients",
            "insert_identity_resources",
            "insert_api_scopes",
        ]
    );
    assert_eq!(report.clients, SeedOutcome::Seeded(2));
    assert_eq!(report.identity_resources, SeedOutcome::Seeded(3));
    assert_eq!(report.api_scopes, SeedOutcome::Seeded(2));
}

/// Scenario A: empty store ends up with exactly the baseline rows.
#[tokio::test]
async fn empty_store_receives_exactly_the_baseline() {
    let events: EventLog = Arc::default();
    let operational = FakeOperational::new(events.clone());
    let configuration = FakeConfiguration::new(events);

    Bootstrap::new()
        .run(&operational, &configuration, &catalog())
        .await
        .expect("bootstrap succeeds");

    assert_eq!(configuration.clients.lock().unwrap().len(), 2);
    assert_eq!(configuration.identity_resources.lock().unwrap().len(), 3);
    assert_eq!(configuration.api_scopes.lock().unwrap().len(), 2);

    let ids: Vec<_> = configuration
        .clients
        .lock()
        .unwrap()
        .iter()
        .map(|c| c.client_id.clone())
        .collect();
    assert_eq!(ids, vec!["m2m.client", "interactive.web"]);
}

/// Scenario B: a pre-existing client blocks client seeding only.
#[tokio::test]
async fn populated_client_category_is_skipped_others_still_seed() {
    let events: EventLog = Arc::default();
    let operational = FakeOperational::new(events.clone());
    let configuration = FakeConfiguration::new(events);
    configuration
        .clients
        .lock()
        .unwrap()
        .push(client("operator.client"));

    let report = Bootstrap::new()
        .run(&operational, &configuration, &catalog())
        .await
        .expect("bootstrap succeeds");

    assert_eq!(report.clients, SeedOutcome::AlreadyPopulated);
    assert_eq!(report.identity_resources, SeedOutcome::Seeded(3));

    let clients = configuration.clients.lock().unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].client_id, "operator.client");
}

/// Scenario C: operational migration failure leaves the configuration
/// store completely untouched and ends in Failed.
#[tokio::test]
async fn operational_migration_failure_short_circuits_everything() {
    let events: EventLog = Arc::default();
    let operational = FakeOperational::failing(events.clone());
    let configuration = FakeConfiguration::new(events.clone());

    let mut bootstrap = Bootstrap::new();
    let error = bootstrap
        .run(&operational, &configuration, &catalog())
        .await
        .expect_err("bootstrap must fail");

    assert!(matches!(error, BootstrapError::OperationalMigration(_)));
    assert_eq!(bootstrap.state(), BootstrapState::Failed);
    assert_eq!(*configuration.migrations.lock().unwrap(), 0);
    assert!(configuration.clients.lock().unwrap().is_empty());
    assert!(events.lock().unwrap().is_empty());
}

/// A seed write failure is fatal for its category but earlier
/// categories stay committed; later ones are never attempted.
#[tokio::test]
async fn seed_failure_keeps_prior_categories_and_stops() {
    let events: EventLog = Arc::default();
    let operational = FakeOperational::new(events.clone());
    let mut configuration = FakeConfiguration::new(events.clone());
    configuration.fail_identity_resource_insert = true;

    let mut bootstrap = Bootstrap::new();
    let error = bootstrap
        .run(&operational, &configuration, &catalog())
        .await
        .expect_err("bootstrap must fail");

    assert!(matches!(error, BootstrapError::Seed { .. }));
    assert_eq!(bootstrap.state(), BootstrapState::Failed);

    // Clients were committed before the failure and stay committed.
    assert_eq!(configuration.clients.lock().unwrap().len(), 2);
    assert!(configuration.identity_resources.lock().unwrap().is_empty());
    assert!(configuration.api_scopes.lock().unwrap().is_empty());
    assert!(!events.lock().unwrap().contains(&"insert_api_scopes"));
}

/// Scenario D: three sequential runs converge after the first.
#[tokio::test]
async fn repeated_bootstrap_converges_after_first_run() {
    let events: EventLog = Arc::default();
    let operational = FakeOperational::new(events.clone());
    let configuration = FakeConfiguration::new(events);
    let catalog = catalog();

    for run in 0..3 {
        let report = Bootstrap::new()
            .run(&operational, &configuration, &catalog)
            .await
            .expect("bootstrap succeeds");

        if run == 0 {
            assert_eq!(report.clients, SeedOutcome::Seeded(2));
        } else {
            assert_eq!(report.clients, SeedOutcome::AlreadyPopulated);
            assert_eq!(report.identity_resources, SeedOutcome::AlreadyPopulated);
            assert_eq!(report.api_scopes, SeedOutcome::AlreadyPopulated);
        }

        assert_eq!(configuration.clients.lock().unwrap().len(), 2);
        assert_eq!(configuration.identity_resources.lock().unwrap().len(), 3);
        assert_eq!(configuration.api_scopes.lock().unwrap().len(), 2);
    }

    // Migrations ran every start; seeding only wrote once.
    assert_eq!(*operational.migrations.lock().unwrap(), 3);
}

#[tokio::test]
async fn bootstrap_instance_is_single_shot() {
    let events: EventLog = Arc::default();
    let operational = FakeOperational::new(events.clone());
    let configuration = FakeConfiguration::new(events);
    let catalog = catalog();

    let mut bootstrap = Bootstrap::new();
    bootstrap
        .run(&operational, &configuration, &catalog)
        .await
        .expect("first run succeeds");

    let error = bootstrap
        .run(&operational, &configuration, &catalog)
        .await
        .expect_err("second run is rejected");
    assert!(matches!(error, BootstrapError::AlreadyRan(_)));
}
