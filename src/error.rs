//! Error types for loading and persisting search data.

use thiserror::Error;

/// Everything that can go wrong around the search index and its storage.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("HTTP error! Status: {status} ({path})")]
    Status { path: String, status: u16 },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("No user data directory available")]
    NoDataDir,
}

pub type Result<T> = std::result::Result<T, SearchError>;
