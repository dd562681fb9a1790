//! Error types for rhymes

use thiserror::Error;

/// Main error type for rhymes
#[derive(Error, Debug)]
pub enum RhymesError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level fetch failure (no response was produced)
    #[error("Network error: {0}")]
    Network(String),

    /// A response arrived but its status was not 2xx
    #[error("Unexpected status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// Dataset could not be fetched or parsed
    #[error("Dataset load error: {0}")]
    DatasetLoad(String),

    /// A cache generation failed to install
    #[error("Cache install error: {0}")]
    CacheInstall(String),

    /// Neither the network nor the cache could answer a request
    #[error("No response available for {0}")]
    CacheMiss(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Clipboard write failed
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for rhymes operations
pub type RhymesResult<T> = Result<T, RhymesError>;

impl From<serde_json::Error> for RhymesError {
    fn from(err: serde_json::Error) -> Self {
        RhymesError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for RhymesError {
    fn from(err: toml::de::Error) -> Self {
        RhymesError::Config(err.to_string())
    }
}
