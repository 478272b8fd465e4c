use crate::storage::{KeyValueStore, StorageResult, StorageScope};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

pub struct PostgresStore {
    pool: Arc<PgPool>,
    origin: String,
    scope: StorageScope,
}

impl PostgresStore {
    pub async fn new(database_url: &str, max_connections: u32, origin: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
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
impl KeyValueStore for PostgresStore {
    async fn init(&self) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                origin TEXT NOT NULL,
                scope TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at BIGINT NOT NULL,
                PRIMARY KEY (origin, scope, key)
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let now = chrono::Utc::now().timestamp();

        let Some(live_since) = self.scope.live_since(now) else {
            let value = sqlx::query_scalar::<_, String>(
                r#"
                SELECT value
                FROM kv_store
                WHERE origin = $1 AND scope = $2 AND key = $3
                "#,
            )
            .bind(&self.origin)
            .bind(self.scope.as_str())
            .bind(key)
            .fetch_optional(self.pool.as_ref())
            .await?;

            return Ok(value);
        };

        // Drop the key if the session went idle, then refresh it on read
        sqlx::query(
            r#"
            DELETE FROM kv_store
            WHERE origin = $1 AND scope = $2 AND key = $3 AND updated_at < $4
            "#,
        )
        .bind(&self.origin)
        .bind(self.scope.as_str())
        .bind(key)
        .bind(live_since)
        .execute(self.pool.as_ref())
        .await?;

        let value = sqlx::query_scalar::<_, String>(
            r#"
            UPDATE kv_store
            SET updated_at = $4
            WHERE origin = $1 AND scope = $2 AND key = $3
            RETURNING value
            "#,
        )
        .bind(&self.origin)
        .bind(self.scope.as_str())
        .bind(key)
        .bind(now)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO kv_store (origin, scope, key, value, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (origin, scope, key) DO UPDATE SET
                value = EXCLUDED.value,
                updated_at = EXCLUDED.updated_at
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
            WHERE origin = $1 AND scope = $2 AND key = $3
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
            WHERE origin = $1 AND scope = $2
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
