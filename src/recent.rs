// src/recent.rs
use crate::error::{Result, SearchError};
use dirs::data_dir;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

pub const RECENT_KEY: &str = "vs-recent-searches";
pub const RECENT_CAPACITY: usize = 5;
const MIN_QUERY_CHARS: usize = 2;

/// Most-recent-first list of queries that produced results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecentSearches {
    entries: Vec<String>,
}

impl RecentSearches {
    /// Build from stored entries, dropping anything the list could not have recorded
    pub fn from_entries(stored: Vec<String>) -> Self {
        let mut recent = RecentSearches::default();
        for entry in stored {
            if recent.entries.len() == RECENT_CAPACITY {
                break;
            }
            if entry.chars().count() >= MIN_QUERY_CHARS && !recent.entries.contains(&entry) {
                recent.entries.push(entry);
            }
        }
        recent
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Put `query` at the front. Returns false when it was too short or already
    /// present; existing entries keep their position.
    pub fn record(&mut self, query: &str) -> bool {
        let query = query.to_lowercase();
        if query.chars().count() < MIN_QUERY_CHARS || self.entries.contains(&query) {
            return false;
        }
        self.entries.insert(0, query);
        self.entries.truncate(RECENT_CAPACITY);
        true
    }
}

/// JSON file holding the recent list between runs
#[derive(Debug, Clone)]
pub struct RecentStore {
    path: PathBuf,
}

/// Get the directory where the recent list is stored
fn get_store_dir() -> Option<PathBuf> {
    let store_dir = data_dir()?.join("blogSearch");

    if !store_dir.exists() {
        fs::create_dir_all(&store_dir).ok()?;
    }

    Some(store_dir)
}

impl RecentStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        RecentStore { path: path.into() }
    }

    /// `<data_dir>/blogSearch/vs-recent-searches.json`
    pub fn default_location() -> Result<Self> {
        let dir = get_store_dir().ok_or(SearchError::NoDataDir)?;
        Ok(RecentStore::at(dir.join(format!("{}.json", RECENT_KEY))))
    }

    fn read(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut file = File::open(&self.path)?;
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        Ok(serde_json::from_str(&buffer)?)
    }

    /// Unreadable or malformed storage counts as an empty history
    pub fn load(&self) -> RecentSearches {
        match self.read() {
            Ok(entries) => RecentSearches::from_entries(entries),
            Err(e) => {
                log::error!("Error loading recent searches: {}", e);
                RecentSearches::default()
            }
        }
    }

    pub fn save(&self, recent: &RecentSearches) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let encoded = serde_json::to_string(recent.entries())?;
        let mut file = File::create(&self.path)?;
        file.write_all(encoded.as_bytes())?;
        log::debug!("Saved {} recent searches", recent.entries().len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn record_inserts_at_front() {
        let mut recent = RecentSearches::default();
        assert!(recent.record("rust"));
        assert!(recent.record("go"));
        assert_eq!(recent.entries(), &["go".to_string(), "rust".to_string()]);
    }

    #[test]
    fn duplicates_are_not_promoted() {
        let mut recent = RecentSearches::default();
        recent.record("rust");
        recent.record("go");
        assert!(!recent.record("rust"));
        assert_eq!(recent.entries(), &["go".to_string(), "rust".to_string()]);
    }

    #[test]
    fn short_queries_are_skipped() {
        let mut recent = RecentSearches::default();
        assert!(!recent.record("r"));
        assert!(!recent.record(""));
        assert!(recent.entries().is_empty());
    }

    #[test]
    fn capacity_is_five() {
        let mut recent = RecentSearches::default();
        for q in ["aa", "bb", "cc", "dd", "ee", "ff", "gg"] {
            recent.record(q);
        }
        assert_eq!(recent.entries().len(), RECENT_CAPACITY);
        assert_eq!(recent.get(0), Some("gg"));
        assert_eq!(recent.get(4), Some("cc"));
    }

    #[test]
    fn stored_entries_are_sanitized() {
        let recent = RecentSearches::from_entries(
            ["aa", "aa", "b", "cc", "dd", "ee", "ff", "gg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        assert_eq!(recent.entries(), &["aa", "cc", "dd", "ee", "ff"]);
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let store = RecentStore::at(dir.path().join("nested").join("recent.json"));
        let mut recent = RecentSearches::default();
        recent.record("ownership");
        store.save(&recent).unwrap();
        assert_eq!(store.load(), recent);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = RecentStore::at(dir.path().join("absent.json"));
        assert!(store.load().entries().is_empty());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recent.json");
        fs::write(&path, "{not json").unwrap();
        assert!(RecentStore::at(&path).load().entries().is_empty());
    }
}
