//! CLI commands implementation

use anyhow::Result;
use rhymes_core::{copy_text, no_match_message, Dataset, EMPTY_QUERY_MESSAGE};
use serde::Deserialize;
use std::path::Path;

use crate::clipboard::Clipboard;

/// API client for communicating with the daemon
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Lookup response from API
#[derive(Debug, Deserialize)]
pub struct RhymeResponse {
    pub word: String,
    pub rhymes: Vec<String>,
    #[allow(dead_code)]
    pub reverse: bool,
}

/// Error message from API
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Reload response from API
#[derive(Debug, Deserialize)]
pub struct ReloadResponse {
    pub entries: usize,
}

/// Status response
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub version: String,
    pub origin: String,
    pub generation: Option<String>,
    pub lifecycle: String,
    pub entries: usize,
}

/// Cache store summary
#[derive(Debug, Deserialize)]
pub struct StoreSummary {
    pub name: String,
    pub entries: usize,
    pub bytes: u64,
}

/// Find rhymes through the daemon
pub async fn find(
    client: &ApiClient,
    word: String,
    copy: bool,
    clipboard: &dyn Clipboard,
) -> Result<()> {
    let response = client
        .client
        .get(client.url("/api/v1/rhymes"))
        .query(&[("word", word.as_str())])
        .send()
        .await?;

    if response.status().is_success() {
        let found: RhymeResponse = response.json().await?;
        print_rhymes(&found.word, &found.rhymes);
        if copy {
            report_copy(clipboard, &found.rhymes).await;
        }
    } else {
        let status = response.status();
        match response.json::<MessageResponse>().await {
            Ok(body) => eprintln!("{}", body.message),
            Err(_) => eprintln!("Lookup failed: {}", status),
        }
    }

    Ok(())
}

/// Find rhymes in a local dataset file
pub async fn lookup(
    dataset_path: &Path,
    word: String,
    copy: bool,
    clipboard: &dyn Clipboard,
) -> Result<()> {
    let bytes = tokio::fs::read(dataset_path).await?;
    let dataset = Dataset::from_json_slice(&bytes)?;

    match local_lookup(&dataset, &word) {
        Ok(rhymes) => {
            print_rhymes(word.trim(), &rhymes);
            if copy {
                report_copy(clipboard, &rhymes).await;
            }
        }
        Err(message) => eprintln!("{}", message),
    }

    Ok(())
}

/// Rhymes for a word, or the message to show instead
pub fn local_lookup(dataset: &Dataset, word: &str) -> std::result::Result<Vec<String>, String> {
    let word = word.trim();
    if word.is_empty() {
        return Err(EMPTY_QUERY_MESSAGE.to_string());
    }

    match dataset.find_rhymes_for(word) {
        Some(rhymes) if !rhymes.is_empty() => Ok(rhymes),
        _ => Err(no_match_message(word)),
    }
}

/// Copy rhymes and return the indicator shown to the user
pub async fn copy_rhymes(clipboard: &dyn Clipboard, rhymes: &[String]) -> &'static str {
    match clipboard.write_text(&copy_text(rhymes)).await {
        Ok(()) => "Copied!",
        Err(e) => {
            tracing::debug!(error = %e, "Copy failed");
            "Err"
        }
    }
}

async fn report_copy(clipboard: &dyn Clipboard, rhymes: &[String]) {
    let indicator = copy_rhymes(clipboard, rhymes).await;
    if indicator == "Err" {
        eprintln!("{}", indicator);
    } else {
        println!("{}", indicator);
    }
}

fn print_rhymes(word: &str, rhymes: &[String]) {
    println!("{}", word);
    for rhyme in rhymes {
        println!("  {}", rhyme);
    }
}

/// Reload the daemon's dataset
pub async fn reload(client: &ApiClient) -> Result<()> {
    let response = client
        .client
        .post(client.url("/api/v1/dataset/reload"))
        .send()
        .await?;

    if response.status().is_success() {
        let reload: ReloadResponse = response.json().await?;
        println!("Dataset holds {} entries", reload.entries);
    } else {
        let error = response.text().await?;
        eprintln!("Failed to reload dataset: {}", error);
    }

    Ok(())
}

/// Show daemon status
pub async fn status(client: &ApiClient) -> Result<()> {
    let response = client
        .client
        .get(client.url("/api/v1/status"))
        .send()
        .await?;

    if response.status().is_success() {
        let status: StatusResponse = response.json().await?;

        println!("rhymes v{}", status.version);
        println!();
        println!("Origin: {}", status.origin);
        println!(
            "Cache: {} ({})",
            status.generation.as_deref().unwrap_or("-"),
            status.lifecycle
        );
        println!("Dataset entries: {}", status.entries);
    } else {
        let error = response.text().await?;
        eprintln!("Failed to get status: {}", error);
    }

    Ok(())
}

/// List cache stores
pub async fn caches(client: &ApiClient) -> Result<()> {
    let response = client
        .client
        .get(client.url("/api/v1/caches"))
        .send()
        .await?;

    if response.status().is_success() {
        let stores: Vec<StoreSummary> = response.json().await?;

        if stores.is_empty() {
            println!("No cache stores");
        } else {
            println!("{:<30} {:<10} {:<12}", "NAME", "ENTRIES", "BYTES");
            println!("{}", "-".repeat(52));
            for store in stores {
                println!("{:<30} {:<10} {:<12}", store.name, store.entries, store.bytes);
            }
        }
    } else {
        let error = response.text().await?;
        eprintln!("Failed to list caches: {}", error);
    }

    Ok(())
}
