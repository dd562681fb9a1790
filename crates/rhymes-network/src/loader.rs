//! Dataset loader

use rhymes_core::{Dataset, Request, RhymesError, RhymesResult};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::fetcher::Fetcher;

/// Fetches the rhyme dataset and owns the loaded copy
///
/// A failed load never clears a dataset that was loaded earlier.
pub struct DatasetLoader {
    /// Where requests go
    fetcher: Arc<dyn Fetcher>,
    /// Absolute URL of the dataset resource
    url: String,
    /// Last successfully loaded dataset (empty until then)
    dataset: RwLock<Arc<Dataset>>,
}

impl DatasetLoader {
    /// Create a loader with an empty dataset
    pub fn new(fetcher: Arc<dyn Fetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
            dataset: RwLock::new(Arc::new(Dataset::default())),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Currently held dataset, without I/O
    pub async fn current(&self) -> Arc<Dataset> {
        self.dataset.read().await.clone()
    }

    /// Fetch the dataset and replace the held copy on success.
    ///
    /// Failures are logged and swallowed; the returned dataset is whatever is
    /// held afterwards, which may be stale or empty.
    pub async fn load(&self) -> Arc<Dataset> {
        match self.fetch_dataset().await {
            Ok(dataset) => {
                info!(entries = dataset.len(), url = %self.url, "Rhymes loaded");
                let dataset = Arc::new(dataset);
                let mut held = self.dataset.write().await;
                *held = dataset.clone();
                dataset
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "Could not fetch rhymes dataset");
                self.current().await
            }
        }
    }

    async fn fetch_dataset(&self) -> RhymesResult<Dataset> {
        let request = Request::get(self.url.clone()).no_cache();
        let response = self.fetcher.fetch(&request).await?;

        if !response.is_success() {
            return Err(RhymesError::HttpStatus {
                url: self.url.clone(),
                status: response.status,
            });
        }

        Dataset::from_json_slice(&response.body)
    }
}
