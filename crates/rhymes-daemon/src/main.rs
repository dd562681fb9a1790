//! rhymes daemon
//!
//! Offline gateway in front of the static rhymes application: installs the
//! configured cache generation, loads the dataset and serves both.

use anyhow::Context;
use clap::Parser;
use rhymes_api::{create_router, AppState};
use rhymes_core::AppConfig;
use rhymes_network::{DatasetLoader, Fetcher, HttpFetcher, RhymeService};
use rhymes_offline::{CacheManager, Generation};
use rhymes_store::CacheStorage;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// rhymesd - offline-capable rhyme lookup gateway
#[derive(Parser, Debug)]
#[command(name = "rhymesd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind the gateway
    #[arg(long)]
    address: Option<String>,

    /// Port for the gateway
    #[arg(long)]
    port: Option<u16>,

    /// Base URL of the static origin
    #[arg(long)]
    origin: Option<String>,

    /// Cache generation identifier
    #[arg(long)]
    generation: Option<String>,

    /// Directory for persisted cache stores
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Log level
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Load the config file (or defaults) and apply flag overrides
    fn into_config(self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(address) = self.address {
            config.server.address = address;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(origin) = self.origin {
            config.origin.base_url = origin;
        }
        if let Some(generation) = self.generation {
            config.cache.generation = generation;
        }
        if let Some(cache_dir) = self.cache_dir {
            config.cache.storage_path = Some(cache_dir);
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }

        Ok(config)
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Args::parse().into_config()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&config.logging.level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting rhymes daemon v{}", env!("CARGO_PKG_VERSION"));

    let storage = Arc::new(CacheStorage::new(config.cache.storage_path.clone()));
    storage.init().await?;

    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(config.origin.fetch_timeout_secs)?);
    let manager = Arc::new(CacheManager::from_config(&config, storage, fetcher));

    // Install the configured generation; if the origin is unreachable, keep
    // serving whatever generation was persisted last.
    let generation = Generation::from_config(&config);
    if let Err(e) = manager.update(&generation).await {
        let persisted = manager.storage().keys().await;
        let fallback = if persisted.contains(&generation.name) {
            Some(generation.name.clone())
        } else {
            persisted.last().cloned()
        };

        match fallback {
            Some(name) if manager.resume(&name).await => {
                warn!(error = %e, generation = %name, "Install failed, serving persisted generation");
            }
            _ => {
                warn!(error = %e, "Install failed, requests pass through to the origin");
            }
        }
    }

    let loader = Arc::new(DatasetLoader::new(manager.clone(), config.dataset_url()));
    let service = Arc::new(RhymeService::new(loader));
    service.reload().await;

    let state = Arc::new(AppState {
        manager,
        service,
        origin: config.origin.base_url.clone(),
    });
    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.address, config.server.port)
        .parse()
        .context("Invalid address")?;

    info!("Gateway listening on {}", addr);
    info!("Origin is {}", config.origin.base_url);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind")?;
    axum::serve(listener, router).await.context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "rhymesd",
            "--port",
            "9000",
            "--origin",
            "https://rhymes.example.com",
            "--generation",
            "rhymes-pwa-v2",
        ]);
        let config = args.into_config().unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.address, "127.0.0.1");
        assert_eq!(config.dataset_url(), "https://rhymes.example.com/rhymes.json");
        assert_eq!(config.cache.generation, "rhymes-pwa-v2");
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("bogus"), Level::INFO);
    }
}
