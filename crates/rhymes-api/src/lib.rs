//! rhymes-api: HTTP gateway for rhymes
//!
//! This crate provides the HTTP surface of the daemon:
//! - Rhyme lookup and dataset reload
//! - Cache and lifecycle status
//! - The offline gateway that answers every other path through the cache manager

pub mod gateway;
pub mod rest;

pub use rest::{create_router, AppState};

#[cfg(test)]
mod testing;
