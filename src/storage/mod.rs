use crate::config::StorageConfig;
use crate::error::Error;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::info;

pub mod models;
pub mod repositories;

/// Storage key for the persisted user set
pub const USERS_KEY: &str = "v2x_users";
/// Storage key for the current session record
pub const SESSION_KEY: &str = "v2x_auth";

/// JSON-file key-value store.
///
/// Values are opaque JSON blobs under string keys, with no schema
/// versioning. Mutations are written through to disk immediately.
pub struct LocalStore {
    path: PathBuf,
    values: RwLock<HashMap<String, serde_json::Value>>,
}

impl LocalStore {
    /// Open the store, loading any existing contents from disk
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let path = config.data_file.clone();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Io(format!("Failed to create data directory: {}", e)))?;
        }

        let values = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| Error::Io(format!("Failed to read store file: {}", e)))?;
            serde_json::from_str(&raw)
                .map_err(|e| Error::Serialization(format!("Corrupt store file: {}", e)))?
        } else {
            HashMap::new()
        };

        info!("Local store opened at {:?}", path);

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Read and deserialize the value under `key`
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let values = self.values.read().await;
        match values.get(key) {
            Some(value) => {
                let parsed = serde_json::from_value(value.clone())
                    .map_err(|e| Error::Serialization(format!("Failed to decode {}: {}", key, e)))?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Store `value` under `key` and flush to disk
    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_value(value)
            .map_err(|e| Error::Serialization(format!("Failed to encode {}: {}", key, e)))?;

        let mut values = self.values.write().await;
        values.insert(key.to_string(), encoded);
        self.flush(&values)
    }

    /// Remove `key` and flush to disk. Removing an absent key is a no-op.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().await;
        if values.remove(key).is_some() {
            self.flush(&values)?;
        }
        Ok(())
    }

    // Write-then-rename so a crash mid-write never truncates the store.
    fn flush(&self, values: &HashMap<String, serde_json::Value>) -> Result<()> {
        let raw = serde_json::to_string_pretty(values)
            .map_err(|e| Error::Serialization(format!("Failed to encode store: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, raw)
            .map_err(|e| Error::Io(format!("Failed to write store file: {}", e)))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| Error::Io(format!("Failed to replace store file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            data_file: dir.path().join("store.json"),
        };
        let store = LocalStore::open(&config).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn roundtrips_values() {
        let (_dir, store) = temp_store();

        store.put("key", &vec!["a", "b"]).await.unwrap();
        let read: Option<Vec<String>> = store.get("key").await.unwrap();
        assert_eq!(read, Some(vec!["a".to_string(), "b".to_string()]));

        let missing: Option<Vec<String>> = store.get("other").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            data_file: dir.path().join("store.json"),
        };

        {
            let store = LocalStore::open(&config).unwrap();
            store.put("count", &42u32).await.unwrap();
        }

        let reopened = LocalStore::open(&config).unwrap();
        let read: Option<u32> = reopened.get("count").await.unwrap();
        assert_eq!(read, Some(42));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let (_dir, store) = temp_store();
        store.put("key", &1u8).await.unwrap();
        store.remove("key").await.unwrap();
        store.remove("key").await.unwrap();
        let read: Option<u8> = store.get("key").await.unwrap();
        assert!(read.is_none());
    }
}
