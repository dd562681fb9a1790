//! In-memory fetcher

use async_trait::async_trait;
use rhymes_core::{Request, Response, RhymesError, RhymesResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use crate::fetcher::Fetcher;

/// Fetcher that answers from a fixed URL → response table
///
/// Unknown URLs get a 404. While offline every fetch fails with a network
/// error, which makes it usable as a stand-in origin.
pub struct MemoryFetcher {
    /// Responses indexed by URL
    responses: RwLock<HashMap<String, Response>>,
    /// Whether fetches reach the table
    online: AtomicBool,
    /// Number of fetch attempts, including failed ones
    calls: AtomicUsize,
}

impl MemoryFetcher {
    /// Create an empty, online fetcher
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            online: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        }
    }

    /// Serve `response` for `url`
    pub async fn insert(&self, url: &str, response: Response) {
        let mut responses = self.responses.write().await;
        responses.insert(url.to_string(), response);
    }

    /// Stop serving `url`
    pub async fn remove(&self, url: &str) {
        let mut responses = self.responses.write().await;
        responses.remove(url);
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Number of fetches attempted so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MemoryFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, request: &Request) -> RhymesResult<Response> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.is_online() {
            debug!(url = %request.url, "Offline fetch");
            return Err(RhymesError::Network(format!("offline: {}", request.url)));
        }

        let responses = self.responses.read().await;
        Ok(responses
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| Response::new(404, None, Vec::new())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_table_and_404() {
        let fetcher = MemoryFetcher::new();
        fetcher
            .insert("http://localhost/a", Response::ok("text/plain", "a"))
            .await;

        let hit = fetcher.fetch(&Request::get("http://localhost/a")).await.unwrap();
        assert_eq!(hit.body, b"a");

        let miss = fetcher.fetch(&Request::get("http://localhost/b")).await.unwrap();
        assert_eq!(miss.status, 404);
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_offline_fails() {
        let fetcher = MemoryFetcher::new();
        fetcher.set_online(false);

        let result = fetcher.fetch(&Request::get("http://localhost/a")).await;
        assert!(matches!(result, Err(RhymesError::Network(_))));
        assert_eq!(fetcher.calls(), 1);
    }
}
