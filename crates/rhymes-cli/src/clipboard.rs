//! Clipboard access

use async_trait::async_trait;
use rhymes_core::{RhymesError, RhymesResult};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Somewhere plain text can be copied to
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> RhymesResult<()>;
}

/// Clipboard backed by the platform's copy command
pub struct SystemClipboard {
    /// Candidate commands, tried in order
    commands: Vec<(String, Vec<String>)>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        let commands = [
            ("pbcopy", &[][..]),
            ("wl-copy", &[][..]),
            ("xclip", &["-selection", "clipboard"][..]),
            ("clip", &[][..]),
        ]
        .iter()
        .map(|(program, args)| {
            (
                program.to_string(),
                args.iter().map(|a| a.to_string()).collect(),
            )
        })
        .collect();

        Self { commands }
    }

    /// Use an explicit command list instead of the platform defaults
    pub fn with_commands(commands: Vec<(String, Vec<String>)>) -> Self {
        Self { commands }
    }

    async fn pipe_to(&self, program: &str, args: &[String], text: &str) -> std::io::Result<bool> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
        }
        let status = child.wait().await?;
        Ok(status.success())
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> RhymesResult<()> {
        for (program, args) in &self.commands {
            match self.pipe_to(program, args, text).await {
                Ok(true) => {
                    debug!(program = %program, "Copied to clipboard");
                    return Ok(());
                }
                Ok(false) => debug!(program = %program, "Clipboard command failed"),
                Err(e) => debug!(program = %program, error = %e, "Clipboard command unavailable"),
            }
        }
        Err(RhymesError::Clipboard(
            "no working clipboard command found".to_string(),
        ))
    }
}
