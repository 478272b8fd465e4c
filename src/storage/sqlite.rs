use crate::storage::{KeyValueStore, StorageResult, StorageScope};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

pub struct SqliteStore {
    pool: Arc<SqlitePool>,
    origin: String,
    scope: StorageScope,
}

impl SqliteStore {
    /// Open a durable store for `origin`, creating the database file if needed
    pub async fn new(database_url: &str, max_connections: u32, origin: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
            origin: origin.to_string(),
            scope: StorageScope::Local,
        })
    }

    /// Session-scoped view over the same database and origin
    pub fn session(&self, ttl_secs: i64) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
            origin: self.origin.clone(),
            scope: StorageScope::Session { ttl_secs },
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn init(&self) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                origin TEXT NOT NULL,
                scope TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (origin, scope, key)
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let row = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT value, updated_at
            FROM kv_store
            WHERE origin = ? AND scope = ? AND key = ?
            "#,
        )
        .bind(&self.origin)
        .bind(self.scope.as_str())
        .bind(key)
        .fetch_optional(self.pool.as_ref())
        .await?;

        let Some((value, updated_at)) = row else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        if let Some(live_since) = self.scope.live_since(now) {
            if updated_at < live_since {
                tracing::debug!("Session key '{}' expired for {}", key, self.origin);
                self.remove(key).await?;
                return Ok(None);
            }

            // Reading a session key keeps the session alive
            sqlx::query(
                r#"
                UPDATE kv_store
                SET updated_at = ?
                WHERE origin = ? AND scope = ? AND key = ?
                "#,
            )
            .bind(now)
            .bind(&self.origin)
            .bind(self.scope.as_str())
            .bind(key)
            .execute(self.pool.as_ref())
            .await?;
        }

        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO kv_store (origin, scope, key, value, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (origin, scope, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&self.origin)
        .bind(self.scope.as_str())
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM kv_store
            WHERE origin = ? AND scope = ? AND key = ?
            "#,
        )
        .bind(&self.origin)
        .bind(self.scope.as_str())
        .bind(key)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> StorageResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM kv_store
            WHERE origin = ? AND scope = ?
            "#,
        )
        .bind(&self.origin)
        .bind(self.scope.as_str())
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
