//! Typed JSON access to key-value stores
//!
//! Stored values may be missing or written by something else entirely. Reads
//! never fail on bad data: anything that does not decode comes back as
//! [`Decoded::Empty`] and the caller substitutes its own default.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::storage::{KeyValueStore, StorageResult};

/// Result of decoding a stored JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    /// The key held a well-formed value
    Value(T),
    /// The key was absent or its value could not be decoded
    Empty,
}

impl<T> Decoded<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Decoded::Empty)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Decoded::Value(value) => Some(value),
            Decoded::Empty => None,
        }
    }

    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.into_option().unwrap_or_default()
    }

    /// Decode raw text, treating malformed input the same as a missing value
    pub fn from_json(key: &str, raw: Option<&str>) -> Self
    where
        T: DeserializeOwned,
    {
        let Some(raw) = raw else {
            return Decoded::Empty;
        };

        match serde_json::from_str(raw) {
            Ok(value) => Decoded::Value(value),
            Err(e) => {
                warn!("Ignoring malformed value stored under '{}': {}", key, e);
                Decoded::Empty
            }
        }
    }
}

/// Read and decode the JSON value stored under `key`
///
/// Backend failures are still returned as errors.
pub async fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> StorageResult<Decoded<T>> {
    let raw = store.get(key).await?;
    Ok(Decoded::from_json(key, raw.as_deref()))
}

/// Serialize `value` and store it under `key`, overwriting the previous value
pub async fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_missing_key_is_empty() {
        let store = MemoryStore::new();
        let decoded: Decoded<Vec<String>> = read_json(&store, "visitorLogs").await.unwrap();
        assert!(decoded.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_value_is_empty() {
        let store = MemoryStore::new();
        store.set("visitorLogs", "{not json").await.unwrap();

        let decoded: Decoded<Vec<String>> = read_json(&store, "visitorLogs").await.unwrap();
        assert_eq!(decoded, Decoded::Empty);
    }

    #[tokio::test]
    async fn test_wrong_shape_is_empty() {
        let store = MemoryStore::new();
        store.set("visitorLogs", r#"{"totalVisits": 3}"#).await.unwrap();

        let decoded: Decoded<Vec<String>> = read_json(&store, "visitorLogs").await.unwrap();
        assert!(decoded.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let store = MemoryStore::new();
        let urls = vec!["/home".to_string(), "/about".to_string()];
        write_json(&store, "visitorLogs", &urls).await.unwrap();

        let decoded: Decoded<Vec<String>> = read_json(&store, "visitorLogs").await.unwrap();
        assert_eq!(decoded, Decoded::Value(urls));
    }
}
