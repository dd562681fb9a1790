//! rhymes-network: Fetching
//!
//! This crate provides network access for rhymes:
//! - The `Fetcher` capability and its reqwest-backed implementation
//! - An in-memory fetcher for embedding fixed assets
//! - The dataset loader and the lookup service built on it

pub mod fetcher;
pub mod loader;
pub mod memory;
pub mod service;

pub use fetcher::{Fetcher, HttpFetcher};
pub use loader::DatasetLoader;
pub use memory::MemoryFetcher;
pub use service::{LookupOutcome, RhymeService};
