//! rhymes-store: Response cache storage
//!
//! This crate provides the persistent cache the offline layer works against:
//! - Named cache stores, one per cache generation
//! - Optional on-disk persistence of each store
//! - The `ResponseCache` capability used by the fetch strategies

pub mod cache;
pub mod traits;

pub use cache::{CacheStorage, CachedResponse, StorageStats, StoreSummary};
pub use traits::ResponseCache;
