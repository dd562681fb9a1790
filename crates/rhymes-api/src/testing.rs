//! Shared fixtures for router tests

use rhymes_core::{Response, DEFAULT_GENERATION};
use rhymes_network::{DatasetLoader, MemoryFetcher, RhymeService};
use rhymes_offline::{CacheManager, Generation, RouteTable};
use rhymes_store::CacheStorage;
use std::sync::Arc;

use crate::rest::AppState;

pub(crate) const ORIGIN: &str = "http://localhost:8000";
const DOC: &str = r#"{"words":[{"word":"light","rhymes":["night","bright","sight"]}]}"#;

/// Router state over an in-memory origin with one installed generation
pub(crate) async fn test_state() -> (Arc<AppState>, Arc<MemoryFetcher>) {
    let fetcher = Arc::new(MemoryFetcher::new());
    fetcher
        .insert(&format!("{}/index.html", ORIGIN), Response::ok("text/html", "<shell>"))
        .await;
    fetcher
        .insert(&format!("{}/app.js", ORIGIN), Response::ok("text/javascript", "js"))
        .await;
    fetcher
        .insert(&format!("{}/rhymes.json", ORIGIN), Response::ok("application/json", DOC))
        .await;

    let manager = Arc::new(CacheManager::new(
        Arc::new(CacheStorage::in_memory()),
        fetcher.clone(),
        RouteTable::for_dataset("/rhymes.json"),
        format!("{}/index.html", ORIGIN),
    ));
    let generation = Generation::new(
        DEFAULT_GENERATION,
        vec![
            format!("{}/index.html", ORIGIN),
            format!("{}/app.js", ORIGIN),
            format!("{}/rhymes.json", ORIGIN),
        ],
    );
    manager.update(&generation).await.unwrap();

    let loader = Arc::new(DatasetLoader::new(
        manager.clone(),
        format!("{}/rhymes.json", ORIGIN),
    ));
    let service = Arc::new(RhymeService::new(loader));

    let state = Arc::new(AppState {
        manager,
        service,
        origin: ORIGIN.to_string(),
    });
    (state, fetcher)
}
