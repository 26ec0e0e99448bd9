// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, fs, path::Path, time::Duration};
use tracing::{debug, info};

/// Where the site is served from; the data files live under `data/`.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5173/money-moves/";

pub const ENV_CONFIG_PATH: &str = "MONEY_MOVES_CONFIG";
pub const ENV_BASE_URL: &str = "MONEY_MOVES_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "MONEY_MOVES_TIMEOUT_SECS";
pub const ENV_MAX_RETRIES: &str = "MONEY_MOVES_MAX_RETRIES";

/// Runtime configuration for fetching the datasets.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base location every dataset path is resolved against.
    /// `http(s)://` goes over the network, `file://` reads a local directory.
    pub base_url: String,
    /// Relative path of the chapter 2 dataset (comma separated).
    pub chapter2_path: String,
    /// Relative path of the combined economic dataset (semicolon separated).
    pub economic_path: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chapter2_path: "data/chapter_2_data.csv".to_string(),
            economic_path: "data/combined_data.csv".to_string(),
            timeout_secs: 30,
            max_retries: 3,
            initial_backoff_ms: 500,
        }
    }
}

impl Config {
    /// Read a YAML config file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_yaml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Defaults, then the YAML file named by `MONEY_MOVES_CONFIG` (if set),
    /// then individual environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut cfg = match env::var(ENV_CONFIG_PATH) {
            Ok(path) => {
                info!(%path, "loading config file");
                Self::from_yaml_file(path)?
            }
            Err(_) => Self::default(),
        };
        cfg.apply_overrides(|key| env::var(key).ok())?;
        debug!(?cfg, "effective config");
        Ok(cfg)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(base) = lookup(ENV_BASE_URL) {
            self.base_url = base;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number, got {:?}", ENV_TIMEOUT_SECS, secs))?;
        }
        if let Some(retries) = lookup(ENV_MAX_RETRIES) {
            self.max_retries = retries
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number, got {:?}", ENV_MAX_RETRIES, retries))?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
