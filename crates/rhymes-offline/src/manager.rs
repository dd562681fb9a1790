//! Offline cache manager
//!
//! Owns the cache generation lifecycle and answers intercepted requests.
//! A generation is installed by fetching its whole manifest into a store
//! named after it; activating it deletes every other store.

use async_trait::async_trait;
use futures::future::try_join_all;
use rhymes_core::{AppConfig, Request, Response, RhymesError, RhymesResult};
use rhymes_network::Fetcher;
use rhymes_store::{CacheStorage, ResponseCache};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::routes::RouteTable;

/// One cache lifetime: a name and the assets it must hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Store name, e.g. `rhymes-pwa-v1`
    pub name: String,
    /// Absolute URLs fetched on install
    pub manifest: Vec<String>,
}

impl Generation {
    /// Create a new generation
    pub fn new(name: impl Into<String>, manifest: Vec<String>) -> Self {
        Self {
            name: name.into(),
            manifest,
        }
    }

    /// Generation described by the configuration
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.cache.generation.clone(), config.manifest_urls())
    }
}

/// Where the manager is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Nothing installed yet
    Uninstalled,
    /// A generation is being fetched
    Installing,
    /// A generation is installed and waiting for activation
    Installed,
    /// A generation is serving requests
    Active,
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifecycle::Uninstalled => write!(f, "uninstalled"),
            Lifecycle::Installing => write!(f, "installing"),
            Lifecycle::Installed => write!(f, "installed"),
            Lifecycle::Active => write!(f, "active"),
        }
    }
}

/// Snapshot of the manager state
#[derive(Debug, Clone, Serialize)]
pub struct ManagerStatus {
    pub lifecycle: Lifecycle,
    /// Generation currently serving requests
    pub active: Option<String>,
    /// Installed generation awaiting activation
    pub waiting: Option<String>,
    /// Generation being installed
    pub installing: Option<String>,
}

#[derive(Debug, Default)]
struct ManagerState {
    active: Option<String>,
    waiting: Option<String>,
    installing: Option<String>,
}

/// Offline cache manager
pub struct CacheManager {
    /// Persistent cache stores
    storage: Arc<CacheStorage>,
    /// Network access
    fetcher: Arc<dyn Fetcher>,
    /// Request routing
    routes: RouteTable,
    /// Document served to navigations when everything else misses
    shell_url: String,
    /// Lifecycle state
    state: RwLock<ManagerState>,
}

impl CacheManager {
    /// Create a new manager
    pub fn new(
        storage: Arc<CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        routes: RouteTable,
        shell_url: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            fetcher,
            routes,
            shell_url: shell_url.into(),
            state: RwLock::new(ManagerState::default()),
        }
    }

    /// Create a manager with the default dataset routing
    pub fn from_config(
        config: &AppConfig,
        storage: Arc<CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self::new(
            storage,
            fetcher,
            RouteTable::for_dataset(&config.origin.dataset_path),
            config.shell_url(),
        )
    }

    pub fn storage(&self) -> &Arc<CacheStorage> {
        &self.storage
    }

    /// Fetch every manifest asset and store them under the generation name.
    ///
    /// All or nothing: if any asset fails, nothing is written and whatever
    /// generation was active keeps serving.
    pub async fn install(&self, generation: &Generation) -> RhymesResult<()> {
        {
            let mut state = self.state.write().await;
            state.installing = Some(generation.name.clone());
        }

        info!(
            generation = %generation.name,
            assets = generation.manifest.len(),
            "Installing cache generation"
        );

        let result = self.fetch_manifest(generation).await;

        let mut state = self.state.write().await;
        state.installing = None;

        let batch = match result {
            Ok(batch) => batch,
            Err(e) => {
                error!(generation = %generation.name, error = %e, "Cache install failed");
                return Err(e);
            }
        };

        self.storage.put_all(&generation.name, batch).await.map_err(|e| {
            error!(generation = %generation.name, error = %e, "Cache install failed");
            RhymesError::CacheInstall(format!("{}: {}", generation.name, e))
        })?;

        state.waiting = Some(generation.name.clone());
        info!(generation = %generation.name, "Cache generation installed");
        Ok(())
    }

    async fn fetch_manifest(&self, generation: &Generation) -> RhymesResult<Vec<(String, Response)>> {
        let fetches = generation.manifest.iter().map(|url| async move {
            let response = self
                .fetcher
                .fetch(&Request::get(url.clone()))
                .await
                .map_err(|e| RhymesError::CacheInstall(format!("{}: {}", url, e)))?;

            if !response.is_success() {
                return Err(RhymesError::CacheInstall(format!(
                    "{}: status {}",
                    url, response.status
                )));
            }

            debug!(url = %url, bytes = response.body.len(), "Fetched manifest asset");
            Ok((url.clone(), response))
        });

        try_join_all(fetches).await
    }

    /// Activate the installed generation and delete every other store
    ///
    /// The installed generation stays waiting until every other store is gone,
    /// so a failed cleanup can be retried.
    pub async fn activate(&self) -> RhymesResult<String> {
        let mut state = self.state.write().await;
        let name = state
            .waiting
            .clone()
            .ok_or_else(|| RhymesError::Internal("No installed generation to activate".to_string()))?;

        for old in self.storage.keys().await {
            if old != name {
                self.storage.delete(&old).await.map_err(|e| {
                    error!(generation = %old, error = %e, "Failed to remove stale cache generation");
                    e
                })?;
                info!(generation = %old, "Removed stale cache generation");
            }
        }

        state.waiting = None;
        state.active = Some(name.clone());
        info!(generation = %name, "Cache generation active");
        Ok(name)
    }

    /// Install and immediately activate a generation
    pub async fn update(&self, generation: &Generation) -> RhymesResult<()> {
        self.install(generation).await?;
        self.activate().await?;
        Ok(())
    }

    /// Serve from an already persisted generation without reinstalling it.
    ///
    /// Returns false when no store with that name exists.
    pub async fn resume(&self, name: &str) -> bool {
        if !self.storage.has(name).await {
            return false;
        }
        let mut state = self.state.write().await;
        state.active = Some(name.to_string());
        info!(generation = name, "Resumed persisted cache generation");
        true
    }

    /// Answer an intercepted request
    pub async fn handle(&self, request: &Request) -> RhymesResult<Response> {
        if self.state.read().await.active.is_none() {
            debug!(url = %request.url, "No active generation, passing through");
            return self.fetcher.fetch(request).await;
        }

        if !request.is_get() {
            debug!(url = %request.url, method = %request.method, "Not cacheable, passing through");
            return self.fetcher.fetch(request).await;
        }

        let Some(route) = self.routes.resolve(request) else {
            return self.fetcher.fetch(request).await;
        };

        debug!(
            url = %request.url,
            route = route.name(),
            strategy = %route.strategy(),
            "Routing request"
        );

        let cache = ActiveCache { manager: self };
        route
            .strategy()
            .respond(request, &cache, self.fetcher.as_ref(), &self.shell_url)
            .await
    }

    pub async fn lifecycle(&self) -> Lifecycle {
        self.status().await.lifecycle
    }

    pub async fn active_generation(&self) -> Option<String> {
        self.state.read().await.active.clone()
    }

    /// Snapshot of the lifecycle state
    pub async fn status(&self) -> ManagerStatus {
        let state = self.state.read().await;
        let lifecycle = if state.installing.is_some() {
            Lifecycle::Installing
        } else if state.waiting.is_some() {
            Lifecycle::Installed
        } else if state.active.is_some() {
            Lifecycle::Active
        } else {
            Lifecycle::Uninstalled
        };

        ManagerStatus {
            lifecycle,
            active: state.active.clone(),
            waiting: state.waiting.clone(),
            installing: state.installing.clone(),
        }
    }
}

/// Cache seen by intercepted requests.
///
/// Reads search every store. Writes go to whichever generation is active when
/// the copy is stored, not when the request started, so a request that
/// outlives an activation never writes into a deleted generation.
struct ActiveCache<'a> {
    manager: &'a CacheManager,
}

#[async_trait]
impl ResponseCache for ActiveCache<'_> {
    async fn get(&self, url: &str) -> Option<Response> {
        self.manager.storage.match_any(url).await
    }

    async fn put(&self, url: &str, response: Response) -> RhymesResult<()> {
        // Held across the write so activation cannot run in between
        let state = self.manager.state.read().await;
        match &state.active {
            Some(active) => self.manager.storage.put(active, url, response).await,
            None => Ok(()),
        }
    }
}

/// Requests made through the manager are intercepted like any page fetch
#[async_trait]
impl Fetcher for CacheManager {
    async fn fetch(&self, request: &Request) -> RhymesResult<Response> {
        self.handle(request).await
    }
}
