pub mod codec;
pub mod memory;
pub mod postgres;
pub mod sqlite;
pub mod trait_def;

pub use codec::{read_json, write_json, Decoded};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;
pub use trait_def::{KeyValueStore, StorageError, StorageResult, StorageScope};

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::{Config, StorageBackend};

/// Durable and session-scoped stores for one origin
pub struct Stores {
    pub local: Arc<dyn KeyValueStore>,
    pub session: Arc<dyn KeyValueStore>,
}

/// Open the configured backend for `origin`
pub async fn open_stores(config: &Config, origin: &str) -> Result<Stores> {
    let database = &config.database;
    let ttl_secs = config.logger.session_ttl_secs;

    let stores = match database.backend {
        StorageBackend::Sqlite => {
            info!("Using SQLite storage: {}", database.url);
            let local = SqliteStore::new(&database.url, database.max_connections, origin)
                .await
                .with_context(|| format!("Failed to open SQLite database {}", database.url))?;
            let session = local.session(ttl_secs);
            Stores {
                local: Arc::new(local),
                session: Arc::new(session),
            }
        }
        StorageBackend::Postgres => {
            info!("Using PostgreSQL storage: {}", database.url);
            let local = PostgresStore::new(&database.url, database.max_connections, origin)
                .await
                .context("Failed to connect to PostgreSQL")?;
            let session = local.session(ttl_secs);
            Stores {
                local: Arc::new(local),
                session: Arc::new(session),
            }
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; nothing will be persisted");
            Stores {
                local: Arc::new(MemoryStore::new()),
                session: Arc::new(MemoryStore::new()),
            }
        }
    };

    Ok(stores)
}
