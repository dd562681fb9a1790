//! Rhyme lookup service

use rhymes_core::Dataset;
use std::sync::Arc;
use tracing::debug;

use crate::loader::DatasetLoader;

/// What a user-facing lookup produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Input was blank after trimming
    NoQuery,
    /// Rhymes were found
    Found {
        word: String,
        rhymes: Vec<String>,
        reverse: bool,
    },
    /// Nothing matched, or the headword lists no rhymes
    NotFound { word: String },
}

/// Lookup engine bound to a dataset loader
///
/// An empty dataset is treated as not loaded yet: the next lookup reloads
/// before searching.
pub struct RhymeService {
    loader: Arc<DatasetLoader>,
}

impl RhymeService {
    /// Create a new service
    pub fn new(loader: Arc<DatasetLoader>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &Arc<DatasetLoader> {
        &self.loader
    }

    /// Reload the dataset
    pub async fn reload(&self) -> Arc<Dataset> {
        self.loader.load().await
    }

    /// Look up a raw user input
    pub async fn find(&self, raw: &str) -> LookupOutcome {
        let word = raw.trim();
        if word.is_empty() {
            return LookupOutcome::NoQuery;
        }

        let mut dataset = self.loader.current().await;
        if dataset.is_empty() {
            debug!("Dataset empty, reloading before lookup");
            dataset = self.loader.load().await;
        }

        match dataset.lookup(word) {
            Some(found) => {
                let reverse = found.is_reverse();
                let rhymes = found.into_rhymes();
                if rhymes.is_empty() {
                    LookupOutcome::NotFound {
                        word: word.to_string(),
                    }
                } else {
                    LookupOutcome::Found {
                        word: word.to_string(),
                        rhymes,
                        reverse,
                    }
                }
            }
            None => LookupOutcome::NotFound {
                word: word.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFetcher;
    use rhymes_core::Response;

    const URL: &str = "http://localhost/rhymes.json";
    const DOC: &str = r#"{"words":[{"word":"light","rhymes":["night","bright","sight"]},{"word":"orange","rhymes":[]}]}"#;

    async fn service(fetcher: Arc<MemoryFetcher>) -> RhymeService {
        RhymeService::new(Arc::new(DatasetLoader::new(fetcher, URL)))
    }

    #[tokio::test]
    async fn test_blank_input_is_no_query() {
        let fetcher = Arc::new(MemoryFetcher::new());
        let service = service(fetcher.clone()).await;

        assert_eq!(service.find("   ").await, LookupOutcome::NoQuery);
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_dataset_triggers_reload() {
        let fetcher = Arc::new(MemoryFetcher::new());
        fetcher.insert(URL, Response::ok("application/json", DOC)).await;
        let service = service(fetcher.clone()).await;

        let outcome = service.find(" Light ").await;
        assert_eq!(
            outcome,
            LookupOutcome::Found {
                word: "Light".to_string(),
                rhymes: vec!["night".into(), "bright".into(), "sight".into()],
                reverse: false,
            }
        );
        assert_eq!(fetcher.calls(), 1);

        // Loaded dataset is reused
        service.find("night").await;
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_reverse_and_missing() {
        let fetcher = Arc::new(MemoryFetcher::new());
        fetcher.insert(URL, Response::ok("application/json", DOC)).await;
        let service = service(fetcher).await;

        assert_eq!(
            service.find("sight").await,
            LookupOutcome::Found {
                word: "sight".to_string(),
                rhymes: vec!["(found as rhyme for) light".to_string()],
                reverse: true,
            }
        );
        assert_eq!(
            service.find("zzz").await,
            LookupOutcome::NotFound {
                word: "zzz".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_headword_without_rhymes_is_not_found() {
        let fetcher = Arc::new(MemoryFetcher::new());
        fetcher.insert(URL, Response::ok("application/json", DOC)).await;
        let service = service(fetcher).await;

        assert!(matches!(
            service.find("orange").await,
            LookupOutcome::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_unreachable_dataset_is_not_found() {
        let fetcher = Arc::new(MemoryFetcher::new());
        fetcher.set_online(false);
        let service = service(fetcher.clone()).await;

        assert!(matches!(
            service.find("light").await,
            LookupOutcome::NotFound { .. }
        ));
        service.find("light").await;
        assert_eq!(fetcher.calls(), 2);
    }
}
