// src/error.rs

use thiserror::Error;

/// Failure to obtain a dataset's text.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid resource location {location}: {source}")]
    InvalidUrl {
        location: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("reading {path} failed: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Transport failures and server-side statuses are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Request { .. } => true,
            FetchError::Status { status, .. } => status.is_server_error(),
            FetchError::InvalidUrl { .. } | FetchError::Io { .. } => false,
        }
    }
}

/// Why a data row did not become a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedRow {
    #[error("expected at least {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },
    #[error("category column is empty")]
    MissingCategory,
    #[error("year {0:?} is not an integer")]
    InvalidYear(String),
}

/// Failure of a whole `load()` call. Its message is what the store keeps in
/// `Snapshot::error`.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to fetch {dataset}: {source}")]
    Fetch {
        dataset: &'static str,
        #[source]
        source: FetchError,
    },
}
