//! Core search types and matching.
//!
//! Defines:
//! - `SearchDocument`, one entry of the site's `search.json`
//! - `FilterFlags` selecting which fields a query may match
//! - `matches` / `filter_documents`, the pure matching core
//! - `SearchEngine`, the owned, loaded-once document collection

use serde::{Deserialize, Deserializer, Serialize};

/// One indexed page or post. Missing or `null` fields read as empty.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SearchDocument {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Which fields a query is tested against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterFlags {
    pub match_title: bool,
    pub match_content: bool,
    pub match_tags: bool,
}

impl Default for FilterFlags {
    fn default() -> Self {
        FilterFlags {
            match_title: true,
            match_content: true,
            match_tags: true,
        }
    }
}

/// The three filter checkboxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Title,
    Content,
    Tags,
}

impl FilterField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "title" | "titles" => Some(FilterField::Title),
            "content" => Some(FilterField::Content),
            "tags" => Some(FilterField::Tags),
            _ => None,
        }
    }
}

impl FilterFlags {
    pub fn set(&mut self, field: FilterField, on: bool) {
        match field {
            FilterField::Title => self.match_title = on,
            FilterField::Content => self.match_content = on,
            FilterField::Tags => self.match_tags = on,
        }
    }
}

/// Trim and case-fold raw input into the form the matcher expects.
/// Folds per char exactly like the haystack side so every query lines up with its source.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().chars().map(fold).collect()
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Case-folded chars, one per source char, so positions line up with the original text
pub(crate) fn fold_chars(text: &str) -> Vec<char> {
    text.chars().map(fold).collect()
}

/// Char position of the first `needle` in `haystack` at or after `from`
pub(crate) fn find_chars(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| haystack[i..i + needle.len()] == *needle)
}

fn contains_ci(haystack: &str, query: &str) -> bool {
    find_chars(&fold_chars(haystack), &fold_chars(query), 0).is_some()
}

/// Tests a document against an already normalized query.
/// Title, then content, then tags, then categories; the first hit wins.
pub fn matches(doc: &SearchDocument, query: &str, flags: FilterFlags) -> bool {
    if query.is_empty() {
        return false;
    }

    if flags.match_title && contains_ci(&doc.title, query) {
        return true;
    }

    if flags.match_content && contains_ci(&doc.content, query) {
        return true;
    }

    flags.match_tags
        && (doc.tags.iter().any(|tag| contains_ci(tag, query))
            || doc.categories.iter().any(|cat| contains_ci(cat, query)))
}

/// Indices of matching documents, in collection order
pub fn filter_documents(docs: &[SearchDocument], query: &str, flags: FilterFlags) -> Vec<usize> {
    if query.is_empty() {
        return Vec::new();
    }

    docs.iter()
        .enumerate()
        .filter(|(_, doc)| matches(doc, query, flags))
        .map(|(index, _)| index)
        .collect()
}

/// The document collection for one session. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    documents: Vec<SearchDocument>,
}

impl SearchEngine {
    pub fn new(documents: Vec<SearchDocument>) -> Self {
        SearchEngine { documents }
    }

    pub fn get(&self, index: usize) -> Option<&SearchDocument> {
        self.documents.get(index)
    }

    /// Normalizes `raw` and returns matching indices
    pub fn search(&self, raw: &str, flags: FilterFlags) -> Vec<usize> {
        let query = normalize_query(raw);
        log::trace!("Searching {} documents for {:?}", self.documents.len(), query);
        filter_documents(&self.documents, &query, flags)
    }
}

#[cfg(test)]
pub(crate) fn doc(title: &str, content: &str, tags: &[&str]) -> SearchDocument {
    SearchDocument {
        title: title.to_string(),
        content: content.to_string(),
        url: format!("/{}/", title.to_lowercase().replace(' ', "-")),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    }
}
