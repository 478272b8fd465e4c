use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(#[from] sqlx::Error),
    #[error("failed to serialize stored value: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Lifetime class of a key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    /// Durable storage that survives until explicitly cleared
    Local,
    /// Per-session storage that expires after `ttl_secs` of inactivity
    Session { ttl_secs: i64 },
}

impl StorageScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageScope::Local => "local",
            StorageScope::Session { .. } => "session",
        }
    }

    /// Oldest `updated_at` still considered live at `now`, if the scope expires
    pub(crate) fn live_since(&self, now: i64) -> Option<i64> {
        match self {
            StorageScope::Local => None,
            StorageScope::Session { ttl_secs } => Some(now - ttl_secs),
        }
    }
}

/// Origin-scoped string key-value storage.
///
/// Values are opaque text; typed access goes through [`super::read_json`] and
/// [`super::write_json`].
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Initialize the storage (create tables, etc.)
    async fn init(&self) -> StorageResult<()>;

    /// Get the value stored under `key`
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`, returning whether it existed
    async fn remove(&self, key: &str) -> StorageResult<bool>;

    /// Remove every key in this store's origin and scope, returning how many were removed
    async fn clear(&self) -> StorageResult<u64>;

    /// Release backend resources
    async fn close(&self) {}
}
