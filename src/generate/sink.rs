use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::LampreelResult;

/// Destination for a finished blueprint string (or any text artifact the CLI produces).
pub trait BlueprintSink {
    /// Deliver `text` in full. Called once per artifact.
    fn deliver(&mut self, text: &str) -> LampreelResult<()>;
}

/// Writes the text to a file, creating parent directories as needed.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BlueprintSink for FileSink {
    fn deliver(&mut self, text: &str) -> LampreelResult<()> {
        ensure_parent_dir(&self.path)?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("write '{}'", self.path.display()))?;
        tracing::info!(path = %self.path.display(), bytes = text.len(), "output written");
        Ok(())
    }
}

/// Prints the text on stdout followed by a newline.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl BlueprintSink for StdoutSink {
    fn deliver(&mut self, text: &str) -> LampreelResult<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{text}").context("write to stdout")?;
        out.flush().context("flush stdout")?;
        Ok(())
    }
}

/// In-memory sink for tests.
#[derive(Debug, Default)]
pub struct InMemorySink {
    delivered: Vec<String>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, oldest first.
    pub fn delivered(&self) -> &[String] {
        &self.delivered
    }
}

impl BlueprintSink for InMemorySink {
    fn deliver(&mut self, text: &str) -> LampreelResult<()> {
        self.delivered.push(text.to_owned());
        Ok(())
    }
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> LampreelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/generate/sink.rs"]
mod tests;
