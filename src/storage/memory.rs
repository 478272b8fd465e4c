use crate::storage::{KeyValueStore, StorageResult};
use async_trait::async_trait;
use dashmap::DashMap;

/// Process-local store, used for session storage of one-shot runs and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn init(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    async fn clear(&self) -> StorageResult<u64> {
        let count = self.entries.len() as u64;
        self.entries.clear();
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();

        store.set("sessionId", "session_1_abc").await.unwrap();
        assert_eq!(
            store.get("sessionId").await.unwrap(),
            Some("session_1_abc".to_string())
        );
        assert_eq!(store.len(), 1);

        assert!(store.remove("sessionId").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_clear() {
        let store = MemoryStore::new();
        store.set("visitorLogs", "[]").await.unwrap();
        store.set("visitorStats", "{}").await.unwrap();

        assert_eq!(store.clear().await.unwrap(), 2);
        assert_eq!(store.get("visitorLogs").await.unwrap(), None);
    }
}
