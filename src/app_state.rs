use crate::{
    config::{Config, DatabaseConfig},
    services::{CashBookService, DirectoryService, LedgerCoordinator},
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, DatabaseConnection};
use std::{sync::Arc, time::Duration};

const SQLITE_MAX_CONNECTIONS: u32 = 1;
const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared state handed to every route; handlers re-query through the services
/// after each mutation instead of caching lists.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub ledger: Arc<LedgerCoordinator>,
    pub directory: Arc<DirectoryService>,
    pub cash_book: Arc<CashBookService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
        let db = connect(&config.database).await?;

        if config.database.run_migrations {
            Migrator::up(&db, None).await?;
            tracing::info!("Database migrations applied");
        }

        Ok(Self::from_parts(db, config))
    }

    /// Build state around an existing connection (used by tests)
    pub fn from_parts(db: DatabaseConnection, config: Config) -> Self {
        let ledger = Arc::new(LedgerCoordinator::new(db.clone()));
        let directory = Arc::new(DirectoryService::new(db.clone()));
        let cash_book = Arc::new(CashBookService::new(db.clone()));

        Self {
            db,
            ledger,
            directory,
            cash_book,
            config: Arc::new(config),
        }
    }
}

/// Open the embedded database.
///
/// SQLite admits one writer at a time and a transaction that reads before it
/// writes cannot wait for the lock, so the pool holds a single connection and
/// requests queue for it instead of failing with `SQLITE_BUSY`.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    if config.max_connections > 1 {
        tracing::warn!(
            configured = config.max_connections,
            "SQLite pool is limited to one connection"
        );
    }

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(SQLITE_MAX_CONNECTIONS)
        .min_connections(SQLITE_MAX_CONNECTIONS)
        .sqlx_logging(false)
        .map_sqlx_sqlite_opts(|opts| opts.busy_timeout(SQLITE_BUSY_TIMEOUT));

    sea_orm::Database::connect(options).await
}
