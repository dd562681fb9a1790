//! Cache capability trait

use async_trait::async_trait;
use rhymes_core::{Response, RhymesResult};

/// Minimal get/put view of a cache, keyed by request URL
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Look up a stored response
    async fn get(&self, url: &str) -> Option<Response>;

    /// Store or replace a response
    async fn put(&self, url: &str, response: Response) -> RhymesResult<()>;
}
