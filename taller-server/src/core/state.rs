//! Server state
//!
//! [`ServerState`] holds shared references to every service the handlers
//! need: configuration, the embedded database, the JWT service, and the sync
//! broadcast channel. `Clone` is shallow (`Arc` inside), so handlers can take
//! it by value.

use std::sync::Arc;

use dashmap::DashMap;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;
use tokio::sync::broadcast;

use shared::{SyncAction, SyncPayload};

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;

/// Capacity of the sync broadcast channel. Lagging subscribers drop
/// messages rather than block writers.
const SYNC_CHANNEL_CAPACITY: usize = 1024;

/// Per-resource monotonic version counters
///
/// Used by [`ServerState::broadcast_sync`] so clients can order change
/// notifications per resource type without a global clock.
#[derive(Debug)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// Increment the version for a resource and return the new value
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current version for a resource, 0 if never touched
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

impl Default for ResourceVersions {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared server state
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub resource_versions: Arc<ResourceVersions>,
    sync_tx: broadcast::Sender<SyncPayload>,
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Db>, jwt_service: Arc<JwtService>) -> Self {
        let (sync_tx, _) = broadcast::channel(SYNC_CHANNEL_CAPACITY);
        Self {
            config,
            db,
            jwt_service,
            resource_versions: Arc::new(ResourceVersions::new()),
            sync_tx,
        }
    }

    /// Initialize the server state: work dir layout, database, JWT service,
    /// and the seeded admin account.
    ///
    /// # Panics
    ///
    /// Panics when the work directory or database cannot be initialized --
    /// the server is useless without either.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_service = DbService::open(&config.database_dir())
            .await
            .expect("Failed to open database");

        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        let state = Self::new(config.clone(), db_service.db().clone(), jwt_service);

        crate::db::seed_admin_user(&state.db)
            .await
            .expect("Failed to seed admin user");

        state
    }

    /// In-memory state for tests
    pub async fn for_tests() -> Self {
        let db_service = DbService::open_in_memory()
            .await
            .expect("Failed to open in-memory database");
        let config = Config::with_overrides("/tmp/taller-test", 0);
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        let state = Self::new(config, db_service.db().clone(), jwt_service);
        crate::db::seed_admin_user(&state.db)
            .await
            .expect("Failed to seed admin user");
        state
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// Register a listener for store change notifications
    pub fn subscribe_sync(&self) -> broadcast::Receiver<SyncPayload> {
        self.sync_tx.subscribe()
    }

    /// Broadcast a resource change to every subscribed screen
    ///
    /// The version is incremented per resource type. Send failures mean no
    /// subscriber is listening, which is fine.
    pub fn broadcast_sync<T: serde::Serialize>(
        &self,
        resource: &str,
        action: SyncAction,
        id: &str,
        data: Option<&T>,
    ) {
        let version = self.resource_versions.increment(resource);
        let payload = SyncPayload {
            resource: resource.to_string(),
            version,
            action,
            id: id.to_string(),
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        };
        let _ = self.sync_tx.send(payload);
    }
}
