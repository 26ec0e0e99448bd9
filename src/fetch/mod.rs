// src/fetch/mod.rs

use crate::config::Config;
use crate::error::FetchError;
use anyhow::{Context, Result};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use url::Url;

pub mod file;
pub mod http;

pub use file::FileFetcher;
pub use http::HttpFetcher;

/// Source of dataset text. `path` is relative to whatever base the
/// implementation was built with.
pub trait Fetcher: Send + Sync {
    fn fetch_text(&self, path: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// The fetcher picked from `Config::base_url`.
#[derive(Debug, Clone)]
pub enum ResourceFetcher {
    Http(HttpFetcher),
    File(FileFetcher),
}

impl ResourceFetcher {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let base = parse_base_url(&cfg.base_url)?;

        if base.scheme() == "file" {
            let root = base
                .to_file_path()
                .map_err(|_| anyhow::anyhow!("{} is not a usable local directory", base))?;
            return Ok(ResourceFetcher::File(FileFetcher::new(root)));
        }

        let client = Client::builder()
            .timeout(cfg.timeout())
            .gzip(true)
            .build()
            .context("building HTTP client")?;
        Ok(ResourceFetcher::Http(
            HttpFetcher::new(client, base)
                .with_retries(cfg.max_retries, Duration::from_millis(cfg.initial_backoff_ms)),
        ))
    }
}

impl Fetcher for ResourceFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        match self {
            ResourceFetcher::Http(f) => f.fetch_text(path).await,
            ResourceFetcher::File(f) => f.fetch_text(path).await,
        }
    }
}

/// Parse a base location so that relative joins land *inside* it:
/// `https://host/site` is treated as `https://host/site/`.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&with_slash).with_context(|| format!("parsing base URL {}", raw))
}
