//! REST API handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use rhymes_core::{no_match_message, EMPTY_QUERY_MESSAGE};
use rhymes_network::{LookupOutcome, RhymeService};
use rhymes_offline::{CacheManager, Lifecycle};
use rhymes_store::StoreSummary;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::gateway;

/// Application state shared across handlers
pub struct AppState {
    /// Offline cache manager answering gateway requests
    pub manager: Arc<CacheManager>,
    /// Lookup service over the loaded dataset
    pub service: Arc<RhymeService>,
    /// Base URL of the static origin
    pub origin: String,
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/rhymes", get(find_rhymes))
        .route("/api/v1/dataset/reload", post(reload_dataset))
        .route("/api/v1/status", get(get_status))
        .route("/api/v1/caches", get(list_caches))
        .fallback(gateway::proxy)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Lookup query parameters
#[derive(Debug, Deserialize)]
pub struct RhymeQuery {
    /// Word to look up
    #[serde(default)]
    pub word: String,
}

/// Successful lookup
#[derive(Debug, Serialize, Deserialize)]
pub struct RhymeResponse {
    pub word: String,
    pub rhymes: Vec<String>,
    /// True when the word was only found inside other entries' rhymes
    pub reverse: bool,
}

/// Error body shown to the user
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

fn message(status: StatusCode, text: String) -> (StatusCode, Json<MessageResponse>) {
    (status, Json(MessageResponse { message: text }))
}

/// Look up rhymes for a word
async fn find_rhymes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RhymeQuery>,
) -> Result<Json<RhymeResponse>, (StatusCode, Json<MessageResponse>)> {
    match state.service.find(&query.word).await {
        LookupOutcome::Found {
            word,
            rhymes,
            reverse,
        } => Ok(Json(RhymeResponse {
            word,
            rhymes,
            reverse,
        })),
        LookupOutcome::NoQuery => Err(message(
            StatusCode::BAD_REQUEST,
            EMPTY_QUERY_MESSAGE.to_string(),
        )),
        LookupOutcome::NotFound { word } => {
            Err(message(StatusCode::NOT_FOUND, no_match_message(&word)))
        }
    }
}

/// Reload result
#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    /// Entries held after the reload attempt
    pub entries: usize,
}

/// Reload the dataset
async fn reload_dataset(State(state): State<Arc<AppState>>) -> Json<ReloadResponse> {
    info!("Reloading dataset");
    let dataset = state.service.reload().await;
    Json(ReloadResponse {
        entries: dataset.len(),
    })
}

/// System status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub origin: String,
    pub generation: Option<String>,
    pub lifecycle: Lifecycle,
    pub entries: usize,
}

/// Get system status
async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let status = state.manager.status().await;
    let dataset = state.service.loader().current().await;

    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        origin: state.origin.clone(),
        generation: status.active,
        lifecycle: status.lifecycle,
        entries: dataset.len(),
    })
}

/// List cache stores
async fn list_caches(State(state): State<Arc<AppState>>) -> Json<Vec<StoreSummary>> {
    let stats = state.manager.storage().stats().await;
    Json(stats.stores)
}
