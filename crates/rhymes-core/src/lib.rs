//! rhymes-core: Core types for the rhymes lookup system
//!
//! This crate provides the fundamental types used throughout rhymes:
//! - Rhyme entries, the dataset and the lookup engine
//! - Request and response values passed between fetchers and caches
//! - Configuration types
//! - Error handling

pub mod config;
pub mod dataset;
pub mod error;
pub mod http;

pub use config::*;
pub use dataset::*;
pub use error::*;
pub use http::*;
