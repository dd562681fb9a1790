//! Fetch strategies
//!
//! Both strategies only see a `ResponseCache` and a `Fetcher`, so they can be
//! driven by in-memory fakes.

use rhymes_core::{Request, Response, RhymesError, RhymesResult};
use rhymes_network::Fetcher;
use rhymes_store::ResponseCache;
use serde::Serialize;
use tracing::{debug, warn};

/// How a routed request is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Prefer fresh data; fall back to the cache when the network fails
    NetworkFirst,
    /// Prefer the cache; fall back to the network, then to the shell document
    CacheFirst,
}

impl Strategy {
    /// Answer `request` with this strategy
    pub async fn respond(
        &self,
        request: &Request,
        cache: &dyn ResponseCache,
        fetcher: &dyn Fetcher,
        shell_url: &str,
    ) -> RhymesResult<Response> {
        match self {
            Strategy::NetworkFirst => network_first(request, cache, fetcher).await,
            Strategy::CacheFirst => cache_first(request, cache, fetcher, shell_url).await,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::NetworkFirst => write!(f, "network-first"),
            Strategy::CacheFirst => write!(f, "cache-first"),
        }
    }
}

/// Try the network and keep a copy; replay the cached copy if the network fails
pub async fn network_first(
    request: &Request,
    cache: &dyn ResponseCache,
    fetcher: &dyn Fetcher,
) -> RhymesResult<Response> {
    match fetcher.fetch(request).await {
        Ok(response) => {
            store_copy(cache, request, &response).await;
            Ok(response)
        }
        Err(e) => {
            debug!(url = %request.url, error = %e, "Network failed, trying cache");
            cache
                .get(&request.url)
                .await
                .ok_or_else(|| RhymesError::CacheMiss(request.url.clone()))
        }
    }
}

/// Serve from the cache; otherwise fetch and keep a copy.
///
/// When both miss, navigations get the cached shell document.
pub async fn cache_first(
    request: &Request,
    cache: &dyn ResponseCache,
    fetcher: &dyn Fetcher,
    shell_url: &str,
) -> RhymesResult<Response> {
    if let Some(cached) = cache.get(&request.url).await {
        debug!(url = %request.url, "Cache hit");
        return Ok(cached);
    }

    match fetcher.fetch(request).await {
        Ok(response) => {
            store_copy(cache, request, &response).await;
            Ok(response)
        }
        Err(e) => {
            debug!(url = %request.url, error = %e, "Network failed after cache miss");
            if request.is_navigation() {
                if let Some(shell) = cache.get(shell_url).await {
                    debug!(url = %request.url, shell = shell_url, "Serving cached shell");
                    return Ok(shell);
                }
            }
            Err(RhymesError::CacheMiss(request.url.clone()))
        }
    }
}

async fn store_copy(cache: &dyn ResponseCache, request: &Request, response: &Response) {
    if let Err(e) = cache.put(&request.url, response.clone()).await {
        warn!(url = %request.url, error = %e, "Failed to store response copy");
    }
}
