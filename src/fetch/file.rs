// src/fetch/file.rs

use super::Fetcher;
use crate::error::FetchError;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Reads dataset text from a local directory, e.g. a checkout's `public/`.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Fetcher for FileFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let full = self.root.join(path);
        debug!(path = %full.display(), "reading local file");
        let bytes = fs::read(&full).await.map_err(|source| FetchError::Io {
            path: full.display().to_string(),
            source,
        })?;
        // invalid UTF-8 becomes U+FFFD, same as an HTTP body
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
