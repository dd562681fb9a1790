//! Fetcher trait and HTTP implementation

use async_trait::async_trait;
use rhymes_core::{CacheMode, Request, Response, RhymesError, RhymesResult};
use std::time::Duration;
use tracing::{debug, warn};

/// Something that can turn a request into a response
///
/// Implementations return `Err` only when no response was produced at all;
/// non-2xx responses come back as `Ok`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> RhymesResult<Response>;
}

/// Fetcher backed by a reqwest client
pub struct HttpFetcher {
    /// HTTP client
    client: reqwest::Client,
    /// Per-request timeout, if any
    timeout: Option<Duration>,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher
    pub fn new(timeout_secs: Option<u64>) -> RhymesResult<Self> {
        let timeout = timeout_secs.map(Duration::from_secs);
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RhymesError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// Get the timeout duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn request(&self, request: &Request) -> RhymesResult<reqwest::RequestBuilder> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| RhymesError::Network(format!("Invalid method {}: {}", request.method, e)))?;

        let mut builder = self.client.request(method, &request.url);
        if request.cache == CacheMode::NoCache {
            builder = builder.header(reqwest::header::CACHE_CONTROL, "no-cache");
        }
        Ok(builder)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> RhymesResult<Response> {
        let response = self.request(request)?.send().await.map_err(|e| {
            warn!(url = %request.url, error = %e, "Fetch failed");
            RhymesError::Network(e.to_string())
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| RhymesError::Network(e.to_string()))?
            .to_vec();

        debug!(url = %request.url, status = status, bytes = body.len(), "Fetched");
        Ok(Response::new(status, content_type, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_fetcher_creation() {
        let fetcher = HttpFetcher::new(Some(10)).unwrap();
        assert_eq!(fetcher.timeout(), Some(Duration::from_secs(10)));

        let fetcher = HttpFetcher::new(None).unwrap();
        assert_eq!(fetcher.timeout(), None);
    }

    #[test]
    fn test_no_cache_sets_cache_control() {
        let fetcher = HttpFetcher::new(None).unwrap();

        let fresh = fetcher
            .request(&Request::get("http://localhost/rhymes.json").no_cache())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(fresh.method(), &reqwest::Method::GET);
        assert_eq!(
            fresh.headers().get(reqwest::header::CACHE_CONTROL).unwrap(),
            "no-cache"
        );

        let plain = fetcher
            .request(&Request::get("http://localhost/app.js"))
            .unwrap()
            .build()
            .unwrap();
        assert!(plain.headers().get(reqwest::header::CACHE_CONTROL).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_origin_is_network_error() {
        let fetcher = HttpFetcher::new(Some(2)).unwrap();
        let result = fetcher.fetch(&Request::get("http://127.0.0.1:9/rhymes.json")).await;
        assert!(matches!(result, Err(RhymesError::Network(_))));
    }
}
