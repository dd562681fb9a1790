//! Named response cache stores

use chrono::{DateTime, Utc};
use rhymes_core::{Response, RhymesError, RhymesResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// A response stored under its request URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    /// Request URL the response answers
    pub url: String,
    /// Stored response
    pub response: Response,
    /// When the response was stored
    pub stored_at: DateTime<Utc>,
}

/// One named store; serialized as-is when persistence is enabled
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheStore {
    name: String,
    created_at: DateTime<Utc>,
    entries: HashMap<String, CachedResponse>,
}

impl CacheStore {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            created_at: Utc::now(),
            entries: HashMap::new(),
        }
    }

    fn insert(&mut self, url: &str, response: Response) {
        self.entries.insert(
            url.to_string(),
            CachedResponse {
                url: url.to_string(),
                response,
                stored_at: Utc::now(),
            },
        );
    }
}

/// Collection of named cache stores
///
/// Each store maps request URLs to responses. Puts replace whole entries,
/// so no cross-key invariant is kept.
pub struct CacheStorage {
    /// Directory for persisted stores; memory only when `None`
    base_path: Option<PathBuf>,
    /// Stores indexed by name
    stores: RwLock<HashMap<String, CacheStore>>,
}

impl CacheStorage {
    /// Create a storage, persisted under `base_path` when given
    pub fn new(base_path: Option<PathBuf>) -> Self {
        Self {
            base_path,
            stores: RwLock::new(HashMap::new()),
        }
    }

    /// Create a memory-only storage
    pub fn in_memory() -> Self {
        Self::new(None)
    }

    /// Initialize the storage by loading persisted stores
    pub async fn init(&self) -> RhymesResult<()> {
        let Some(base_path) = &self.base_path else {
            return Ok(());
        };

        if !base_path.exists() {
            tokio::fs::create_dir_all(base_path).await?;
            info!(path = %base_path.display(), "Created cache directory");
            return Ok(());
        }

        let mut loaded = Vec::new();
        let mut dir = tokio::fs::read_dir(base_path).await?;
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().map_or(true, |e| e != "json") {
                continue;
            }
            let bytes = tokio::fs::read(&path).await?;
            match serde_json::from_slice::<CacheStore>(&bytes) {
                Ok(store) => loaded.push(store),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable cache store");
                }
            }
        }

        let mut stores = self.stores.write().await;
        for store in loaded {
            debug!(name = %store.name, entries = store.entries.len(), "Loaded cache store");
            stores.insert(store.name.clone(), store);
        }

        info!(stores = stores.len(), "Cache storage initialized");
        Ok(())
    }

    /// Check if a store exists
    pub async fn has(&self, name: &str) -> bool {
        let stores = self.stores.read().await;
        stores.contains_key(name)
    }

    /// Store names, oldest first
    pub async fn keys(&self) -> Vec<String> {
        let stores = self.stores.read().await;
        let mut all: Vec<&CacheStore> = stores.values().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        all.into_iter().map(|s| s.name.clone()).collect()
    }

    /// Delete a store and everything in it; returns whether it existed
    pub async fn delete(&self, name: &str) -> RhymesResult<bool> {
        let mut stores = self.stores.write().await;

        if let Some(path) = self.store_path(name) {
            if path.exists() {
                tokio::fs::remove_file(&path).await.map_err(|e| {
                    RhymesError::Storage(format!("Failed to remove {}: {}", path.display(), e))
                })?;
            }
        }

        let existed = stores.remove(name).is_some();
        if existed {
            info!(name = name, "Deleted cache store");
        }
        Ok(existed)
    }

    /// Store or replace one response
    pub async fn put(&self, name: &str, url: &str, response: Response) -> RhymesResult<()> {
        self.put_all(name, vec![(url.to_string(), response)]).await
    }

    /// Store a batch of responses under one lock, creating the store if needed.
    ///
    /// The batch lands as a whole or not at all: the updated store is
    /// persisted before it replaces the one readers see.
    pub async fn put_all(&self, name: &str, batch: Vec<(String, Response)>) -> RhymesResult<()> {
        let mut stores = self.stores.write().await;
        let mut store = stores
            .get(name)
            .cloned()
            .unwrap_or_else(|| CacheStore::new(name));

        let count = batch.len();
        for (url, response) in batch {
            store.insert(&url, response);
        }

        self.persist(&store).await?;
        stores.insert(name.to_string(), store);
        debug!(name = name, count = count, "Stored responses");
        Ok(())
    }

    /// Look up a response in one store
    pub async fn get(&self, name: &str, url: &str) -> Option<Response> {
        let stores = self.stores.read().await;
        stores
            .get(name)
            .and_then(|store| store.entries.get(url))
            .map(|cached| cached.response.clone())
    }

    /// Look up a response in every store, oldest store first
    pub async fn match_any(&self, url: &str) -> Option<Response> {
        let stores = self.stores.read().await;
        let mut all: Vec<&CacheStore> = stores.values().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        all.into_iter()
            .find_map(|store| store.entries.get(url))
            .map(|cached| cached.response.clone())
    }

    /// All entries of a store, sorted by URL
    pub async fn entries(&self, name: &str) -> Vec<CachedResponse> {
        let stores = self.stores.read().await;
        let mut entries: Vec<CachedResponse> = stores
            .get(name)
            .map(|store| store.entries.values().cloned().collect())
            .unwrap_or_default();
        entries.sort_by(|a, b| a.url.cmp(&b.url));
        entries
    }

    /// Get storage statistics
    pub async fn stats(&self) -> StorageStats {
        let names = self.keys().await;
        let stores = self.stores.read().await;

        let summaries = names
            .iter()
            .filter_map(|name| stores.get(name))
            .map(|store| StoreSummary {
                name: store.name.clone(),
                entries: store.entries.len(),
                bytes: store
                    .entries
                    .values()
                    .map(|e| e.response.body.len() as u64)
                    .sum(),
            })
            .collect();

        StorageStats { stores: summaries }
    }

    fn store_path(&self, name: &str) -> Option<PathBuf> {
        self.base_path
            .as_ref()
            .map(|base| base.join(format!("{}.json", safe_file_stem(name))))
    }

    async fn persist(&self, store: &CacheStore) -> RhymesResult<()> {
        let Some(path) = self.store_path(&store.name) else {
            return Ok(());
        };
        let bytes = serde_json::to_vec(store)?;
        write_file(&path, &bytes).await
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> RhymesResult<()> {
    tokio::fs::write(path, bytes).await.map_err(|e| {
        RhymesError::Storage(format!("Failed to write {}: {}", path.display(), e))
    })
}

fn safe_file_stem(name: &str) -> String {
    name.replace(['/', '\\', ':'], "_")
}

/// Summary of one store
#[derive(Debug, Clone, Serialize)]
pub struct StoreSummary {
    /// Store name
    pub name: String,
    /// Number of cached responses
    pub entries: usize,
    /// Total body size in bytes
    pub bytes: u64,
}

/// Storage statistics
#[derive(Debug, Clone, Serialize)]
pub struct StorageStats {
    /// Stores, oldest first
    pub stores: Vec<StoreSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(body: &str) -> Response {
        Response::ok("text/plain", body)
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let storage = CacheStorage::in_memory();

        assert!(storage.get("v1", "http://localhost/a").await.is_none());
        storage.put("v1", "http://localhost/a", text("a")).await.unwrap();

        let cached = storage.get("v1", "http://localhost/a").await.unwrap();
        assert_eq!(cached.body, b"a");
        assert!(storage.has("v1").await);
    }

    #[tokio::test]
    async fn test_put_replaces_entry() {
        let storage = CacheStorage::in_memory();
        storage.put("v1", "http://localhost/a", text("old")).await.unwrap();
        storage.put("v1", "http://localhost/a", text("new")).await.unwrap();

        assert_eq!(storage.get("v1", "http://localhost/a").await.unwrap().body, b"new");
        assert_eq!(storage.entries("v1").await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_entries() {
        let storage = CacheStorage::in_memory();
        storage.put("v1", "http://localhost/a", text("a")).await.unwrap();

        assert!(storage.delete("v1").await.unwrap());
        assert!(!storage.delete("v1").await.unwrap());
        assert!(storage.get("v1", "http://localhost/a").await.is_none());
        assert!(storage.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_match_any_searches_every_store() {
        let storage = CacheStorage::in_memory();
        storage.put("v1", "http://localhost/old", text("old")).await.unwrap();
        storage.put("v2", "http://localhost/new", text("new")).await.unwrap();

        assert!(storage.get("v2", "http://localhost/old").await.is_none());
        assert_eq!(storage.match_any("http://localhost/old").await.unwrap().body, b"old");
        assert_eq!(storage.match_any("http://localhost/new").await.unwrap().body, b"new");
        assert!(storage.match_any("http://localhost/none").await.is_none());
    }

    #[tokio::test]
    async fn test_stats() {
        let storage = CacheStorage::in_memory();
        storage
            .put_all(
                "v1",
                vec![
                    ("http://localhost/a".to_string(), text("abc")),
                    ("http://localhost/b".to_string(), text("de")),
                ],
            )
            .await
            .unwrap();

        let stats = storage.stats().await;
        assert_eq!(stats.stores.len(), 1);
        assert_eq!(stats.stores[0].entries, 2);
        assert_eq!(stats.stores[0].bytes, 5);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("caches");
        let storage = CacheStorage::new(Some(path.clone()));
        storage.init().await.unwrap();
        storage.put("v1", "http://localhost/a", text("a")).await.unwrap();

        std::fs::remove_dir_all(&path).unwrap();

        let result = storage
            .put_all(
                "v2",
                vec![
                    ("http://localhost/a".to_string(), text("a2")),
                    ("http://localhost/b".to_string(), text("b2")),
                ],
            )
            .await;
        assert!(matches!(result, Err(RhymesError::Storage(_))));
        assert!(!storage.has("v2").await);
        assert!(storage.match_any("http://localhost/b").await.is_none());

        assert!(storage.put("v1", "http://localhost/a", text("changed")).await.is_err());
        assert_eq!(storage.get("v1", "http://localhost/a").await.unwrap().body, b"a");
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_store() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(Some(dir.path().to_path_buf()));
        storage.init().await.unwrap();
        storage.put("v1", "http://localhost/a", text("a")).await.unwrap();

        // A directory where the store file should be cannot be removed as a file
        let file = dir.path().join("v1.json");
        std::fs::remove_file(&file).unwrap();
        std::fs::create_dir(&file).unwrap();

        assert!(storage.delete("v1").await.is_err());
        assert!(storage.has("v1").await);
        assert!(storage.get("v1", "http://localhost/a").await.is_some());
    }

    #[tokio::test]
    async fn test_persistence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("caches");

        {
            let storage = CacheStorage::new(Some(path.clone()));
            storage.init().await.unwrap();
            storage
                .put("rhymes-pwa-v1", "http://localhost/app.js", text("js"))
                .await
                .unwrap();
            storage.put("rhymes-pwa-v0", "http://localhost/x", text("x")).await.unwrap();
            storage.delete("rhymes-pwa-v0").await.unwrap();
        }

        let reopened = CacheStorage::new(Some(path));
        reopened.init().await.unwrap();
        assert_eq!(reopened.keys().await, vec!["rhymes-pwa-v1".to_string()]);
        assert_eq!(
            reopened
                .get("rhymes-pwa-v1", "http://localhost/app.js")
                .await
                .unwrap()
                .body,
            b"js"
        );
    }
}
