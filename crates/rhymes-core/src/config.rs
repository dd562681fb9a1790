//! Configuration types for rhymes

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::http::join_url;

/// Default cache generation identifier
pub const DEFAULT_GENERATION: &str = "rhymes-pwa-v1";

/// File name of the rhyme dataset
pub const DATASET_FILE: &str = "rhymes.json";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Gateway server configuration
    pub server: ServerConfig,
    /// Upstream origin configuration
    pub origin: OriginConfig,
    /// Offline cache configuration
    pub cache: CacheConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::RhymesError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::RhymesError::Config(format!("Failed to read config file: {}", e))
        })?;
        toml::from_str(&content)
            .map_err(|e| crate::RhymesError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Absolute URL of the dataset resource
    pub fn dataset_url(&self) -> String {
        join_url(&self.origin.base_url, &self.origin.dataset_path)
    }

    /// Absolute URL of the application shell document
    pub fn shell_url(&self) -> String {
        join_url(&self.origin.base_url, &self.cache.shell_path)
    }

    /// Manifest paths resolved against the origin
    pub fn manifest_urls(&self) -> Vec<String> {
        self.cache
            .manifest
            .iter()
            .map(|path| join_url(&self.origin.base_url, path))
            .collect()
    }
}

/// Gateway server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the gateway
    pub address: String,
    /// Port for the gateway
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

/// Where the static application is served from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Base URL of the static origin
    pub base_url: String,
    /// Path of the dataset resource
    pub dataset_path: String,
    /// Optional per-request timeout; unset means a hung fetch stays pending
    pub fetch_timeout_secs: Option<u64>,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            dataset_path: format!("/{}", DATASET_FILE),
            fetch_timeout_secs: None,
        }
    }
}

/// Offline cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Generation identifier; bump it to replace every cached asset
    pub generation: String,
    /// Paths fetched and stored when a generation installs
    pub manifest: Vec<String>,
    /// Document served to navigations when both network and cache miss
    pub shell_path: String,
    /// Directory for persisted cache stores (memory only when unset)
    pub storage_path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            generation: DEFAULT_GENERATION.to_string(),
            manifest: default_manifest(),
            shell_path: "/index.html".to_string(),
            storage_path: None,
        }
    }
}

/// Application shell, styles, script, dataset, app descriptor and icons
pub fn default_manifest() -> Vec<String> {
    [
        "/",
        "/index.html",
        "/styles.css",
        "/app.js",
        "/rhymes.json",
        "/manifest.json",
        "/icon-192.png",
        "/icon-512.png",
    ]
    .iter()
    .map(|path| path.to_string())
    .collect()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
