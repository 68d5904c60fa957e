//! Loads the site's `search.json`.
//!
//! The index comes either from a live site over HTTP or from a directory
//! holding the generated site. It is read once; failures are not retried.

use crate::error::{Result, SearchError};
use crate::search::SearchDocument;
use reqwest::blocking::Client;
use std::fs;
use std::path::PathBuf;
use url::Url;

const INDEX_FILE: &str = "search.json";

/// Default `/`, always ending with `/`
pub fn normalize_root(root: &str) -> String {
    let mut root = if root.is_empty() {
        "/".to_string()
    } else {
        root.to_string()
    };
    if !root.ends_with('/') {
        root.push('/');
    }
    root
}

/// `<root>search.json`
pub fn index_path(root: &str) -> String {
    format!("{}{}", normalize_root(root), INDEX_FILE)
}

/// Where the generated site lives
#[derive(Debug, Clone, PartialEq)]
pub enum IndexSource {
    Http(Url),
    Dir(PathBuf),
}

impl IndexSource {
    /// `http(s)://` bases are fetched, anything else is a local directory
    pub fn parse(base: &str) -> Self {
        match Url::parse(base) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => IndexSource::Http(url),
            _ => IndexSource::Dir(PathBuf::from(base)),
        }
    }

    /// Human-readable location of the index, shown in the error panel
    pub fn describe(&self, root: &str) -> String {
        let path = index_path(root);
        match self {
            IndexSource::Http(base) => base
                .join(&path)
                .map(|u| u.to_string())
                .unwrap_or(path),
            IndexSource::Dir(dir) => dir
                .join(path.trim_start_matches('/'))
                .to_string_lossy()
                .to_string(),
        }
    }
}

/// Fetch and parse the index in source order
pub fn load(source: &IndexSource, root: &str) -> Result<Vec<SearchDocument>> {
    let path = index_path(root);
    log::info!("Loading search index from: {}", source.describe(root));

    let body = match source {
        IndexSource::Http(base) => fetch(&base.join(&path)?)?,
        IndexSource::Dir(dir) => fs::read_to_string(dir.join(path.trim_start_matches('/')))?,
    };

    let documents: Vec<SearchDocument> = serde_json::from_str(&body)?;
    log::info!("Search index loaded successfully, entries: {}", documents.len());
    Ok(documents)
}

fn fetch(url: &Url) -> Result<String> {
    let mut builder = Client::builder().user_agent("blog_search");
    // a local dev server is never reached through a proxy
    if matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]")) {
        builder = builder.no_proxy();
    }
    let client = builder.build()?;
    let response = client.get(url.clone()).send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::Status {
            path: url.path().to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.text()?)
}
