//! Whole-document JSON file implementation of [`ConfigStore`].

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use futures::future::BoxFuture;
use tokio::fs;

use crate::host::GroupId;
use crate::state::GroupConfig;

use super::{ConfigStore, StoreError, StoreResult};

/// Stores the settings map as a single JSON document on disk.
///
/// Writes go to a sibling temp file first and are renamed over the target,
/// so a crash mid-write leaves the previous document intact.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self) -> BoxFuture<'static, StoreResult<HashMap<GroupId, GroupConfig>>> {
        let path = self.path.clone();
        Box::pin(async move {
            let contents = match fs::read_to_string(&path).await {
                Ok(contents) => contents,
                Err(err) if err.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
                Err(source) => return Err(StoreError::Io { path, source }),
            };
            serde_json::from_str(&contents).map_err(|source| StoreError::Decode { path, source })
        })
    }

    fn save(&self, configs: HashMap<GroupId, GroupConfig>) -> BoxFuture<'static, StoreResult<()>> {
        let path = self.path.clone();
        Box::pin(async move {
            let payload = serde_json::to_vec_pretty(&configs)
                .map_err(|source| StoreError::Encode { source })?;

            let staging = path.with_extension("json.tmp");
            fs::write(&staging, &payload)
                .await
                .map_err(|source| StoreError::Io {
                    path: staging.clone(),
                    source,
                })?;
            fs::rename(&staging, &path)
                .await
                .map_err(|source| StoreError::Io {
                    path: path.clone(),
                    source,
                })?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("group-settings-{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_document_loads_as_empty() {
        let store = JsonFileStore::new(scratch_path());
        let map = store.load().await.unwrap();
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let path = scratch_path();
        let store = JsonFileStore::new(path.clone());

        let mut configs = HashMap::new();
        configs.insert(
            10,
            GroupConfig {
                misfire_enabled: true,
            },
        );
        configs.insert(
            -20,
            GroupConfig {
                misfire_enabled: false,
            },
        );
        store.save(configs.clone()).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, configs);

        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn save_overwrites_the_previous_document() {
        let path = scratch_path();
        let store = JsonFileStore::new(path.clone());

        let mut first = HashMap::new();
        first.insert(
            1,
            GroupConfig {
                misfire_enabled: true,
            },
        );
        store.save(first).await.unwrap();

        let mut second = HashMap::new();
        second.insert(
            2,
            GroupConfig {
                misfire_enabled: false,
            },
        );
        store.save(second.clone()).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, second);

        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn corrupt_document_reports_decode_error() {
        let path = scratch_path();
        fs::write(&path, b"not json").await.unwrap();

        let store = JsonFileStore::new(path.clone());
        match store.load().await {
            Err(StoreError::Decode { .. }) => {}
            other => panic!("expected decode error, got {other:?}"),
        }

        let _ = fs::remove_file(&path).await;
    }
}
