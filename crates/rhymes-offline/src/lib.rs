//! rhymes-offline: Offline cache manager
//!
//! This crate keeps the application usable without network access:
//! - Cache generation install / activate lifecycle
//! - Request routing to fetch strategies
//! - Network-first and cache-first strategies over injected capabilities

pub mod manager;
pub mod routes;
pub mod strategy;

pub use manager::{CacheManager, Generation, Lifecycle, ManagerStatus};
pub use routes::{Route, RouteTable};
pub use strategy::{cache_first, network_first, Strategy};
