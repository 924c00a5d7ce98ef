//! Dependency Injection Container
//!
//! Provides a clean DI pattern for Gateway dependencies.
//! Makes testing easier and dependencies explicit.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use rsvp_core::{
    HttpPolicySource, HttpStoreDirectory, OutboxRepository, PolicySource, ReservationRepository,
    StoreDirectory,
};
use rsvp_storage::{Database, SqliteOutboxRepository, SqliteReservationRepository};
use tokio::sync::Mutex;
use tracing::info;

use crate::config::GatewayConfig;

/// Dependency container for Gateway
///
/// Everything the gateway talks to, behind traits, so tests can swap in
/// in-memory repositories and scripted upstreams.
#[derive(Clone)]
pub struct GatewayDependencies {
    // Repositories (Data Layer)
    pub reservation_repo: Arc<dyn ReservationRepository>,
    pub outbox_repo: Arc<dyn OutboxRepository>,

    // Upstream services
    pub store_directory: Arc<dyn StoreDirectory>,
    pub policy_source: Arc<dyn PolicySource>,
}

impl GatewayDependencies {
    /// Open SQLite and build HTTP clients as configured
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let path = match &config.database_path {
            Some(path) => path.clone(),
            None => rsvp_storage::default_database_path()
                .ok_or_else(|| anyhow!("No data directory on this platform; set RSVP_DATABASE_PATH"))?,
        };

        info!("[Gateway] Database: {:?}", path);
        let db = Database::open(&path)
            .with_context(|| format!("Failed to open database at {:?}", path))?;
        let db = Arc::new(Mutex::new(db));

        let store_directory = HttpStoreDirectory::new(&config.directory_url, config.upstream.timeout)
            .context("Invalid store directory URL")?;
        let policy_source = HttpPolicySource::new(&config.policy_url, config.upstream.timeout)
            .context("Invalid policy service URL")?;

        DependenciesBuilder::new()
            .reservation_repo(Arc::new(SqliteReservationRepository::new(db.clone())))
            .outbox_repo(Arc::new(SqliteOutboxRepository::new(db)))
            .store_directory(Arc::new(store_directory))
            .policy_source(Arc::new(policy_source))
            .build()
    }
}

/// Builder for GatewayDependencies
#[derive(Default)]
pub struct DependenciesBuilder {
    reservation_repo: Option<Arc<dyn ReservationRepository>>,
    outbox_repo: Option<Arc<dyn OutboxRepository>>,
    store_directory: Option<Arc<dyn StoreDirectory>>,
    policy_source: Option<Arc<dyn PolicySource>>,
}

impl DependenciesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reservation_repo(mut self, repo: Arc<dyn ReservationRepository>) -> Self {
        self.reservation_repo = Some(repo);
        self
    }

    pub fn outbox_repo(mut self, repo: Arc<dyn OutboxRepository>) -> Self {
        self.outbox_repo = Some(repo);
        self
    }

    pub fn store_directory(mut self, directory: Arc<dyn StoreDirectory>) -> Self {
        self.store_directory = Some(directory);
        self
    }

    pub fn policy_source(mut self, source: Arc<dyn PolicySource>) -> Self {
        self.policy_source = Some(source);
        self
    }

    pub fn build(self) -> Result<GatewayDependencies> {
        Ok(GatewayDependencies {
            reservation_repo: self
                .reservation_repo
                .ok_or_else(|| anyhow!("reservation_repo is required"))?,
            outbox_repo: self
                .outbox_repo
                .ok_or_else(|| anyhow!("outbox_repo is required"))?,
            store_directory: self
                .store_directory
                .ok_or_else(|| anyhow!("store_directory is required"))?,
            policy_source: self
                .policy_source
                .ok_or_else(|| anyhow!("policy_source is required"))?,
        })
    }
}
