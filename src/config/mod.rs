use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::visitor::DEFAULT_MAX_ENTRIES;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logger: LoggerConfig,
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Maximum number of visits kept in the log
    pub max_entries: usize,
    /// Idle time after which the session id is forgotten
    pub session_ttl_secs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Origin used when no page URL is available (admin commands)
    pub origin: String,
    pub export_dir: String,
    pub blog_feed_path: String,
}

impl LoggerConfig {
    const fn default_session_ttl_secs() -> i64 {
        1800
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            session_ttl_secs: Self::default_session_ttl_secs(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let backend = match var("STORAGE_BACKEND", "sqlite").to_lowercase().as_str() {
            "sqlite" => StorageBackend::Sqlite,
            "postgres" | "postgresql" => StorageBackend::Postgres,
            "memory" => StorageBackend::Memory,
            other => {
                tracing::warn!(
                    "Unknown STORAGE_BACKEND '{other}', falling back to 'sqlite'. Supported values: sqlite, postgres, memory"
                );
                StorageBackend::Sqlite
            }
        };

        let database_url = var("DATABASE_URL", "sqlite://./visitlog.db");
        let max_connections = var("DATABASE_MAX_CONNECTIONS", "5")
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;

        let max_entries = lookup("MAX_LOG_ENTRIES")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MAX_ENTRIES);

        let session_ttl_secs = lookup("SESSION_TTL_SECS")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or_else(LoggerConfig::default_session_ttl_secs);

        Ok(Config {
            database: DatabaseConfig {
                backend,
                url: database_url,
                max_connections,
            },
            logger: LoggerConfig {
                max_entries,
                session_ttl_secs,
            },
            site: SiteConfig {
                origin: var("SITE_ORIGIN", "http://localhost"),
                export_dir: var("EXPORT_DIR", "."),
                blog_feed_path: var("BLOG_FEED_PATH", "./blog/posts.json"),
            },
        })
    }
}
