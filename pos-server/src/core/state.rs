use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::menu::{BulkAvailabilityService, SqlxDishStore, SystemClock};

/// Shared server state, cheaply cloneable into every handler
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub bulk: Arc<BulkAvailabilityService>,
}

impl ServerState {
    /// Initialize from config: work directory, database, services.
    ///
    /// # Panics
    ///
    /// Panics when the work directory or database cannot be set up — the
    /// server cannot run without either.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("pos.db");
        let db = DbService::new(&db_path.to_string_lossy(), config.db_max_connections)
            .await
            .expect("Failed to initialize database");

        Self::with_pool(config.clone(), db.pool)
    }

    /// Build state around an existing pool, used by tests
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let bulk = Arc::new(BulkAvailabilityService::new(
            Arc::new(SqlxDishStore::new(pool.clone())),
            Arc::new(SystemClock),
        ));
        Self {
            config,
            pool,
            bulk,
        }
    }
}
