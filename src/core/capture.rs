//! Page captures written by the browser scraper.
use anyhow::{Context, Result};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A price chip and the comment it was attached to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapturedFragment {
    pub text: String,
    pub author: Option<String>,
    pub comment: Option<String>,
}

/// Everything the scraper collected from one video page, in page order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageCapture {
    /// Watch URL, short URL or bare id.
    pub video: String,
    pub title: Option<String>,
    pub channel: Option<String>,
    #[serde(default)]
    pub fragments: Vec<CapturedFragment>,
}

impl PageCapture {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse page capture")
    }

    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read capture file: {}", path.display()))?;
        let capture = Self::from_json(&json)
            .with_context(|| format!("Failed to parse capture file: {}", path.display()))?;
        debug!(
            "Loaded capture for {} with {} fragments",
            capture.video,
            capture.fragments.len()
        );
        Ok(capture)
    }
}

/// Reads several capture files concurrently, keeping the input order.
pub async fn load_all(paths: &[PathBuf]) -> Vec<Result<PageCapture>> {
    join_all(paths.iter().map(PageCapture::load)).await
}
