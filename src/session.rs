//! One search-box session: the loaded engine plus everything the user has typed,
//! toggled and selected since.
//!
//! Every event recomputes synchronously; there is no debounce and nothing typed
//! before the index arrives is replayed.

use crate::config::{Config, Translations};
use crate::error::SearchError;
use crate::navigate::{Key, KeyOutcome, Selection, Viewport};
use crate::recent::{RecentSearches, RecentStore};
use crate::render::{self, RenderedResult, Status, View};
use crate::search::{normalize_query, FilterField, FilterFlags, SearchDocument, SearchEngine};

#[derive(Debug)]
enum Phase {
    Loading,
    Ready(SearchEngine),
    Failed { path: String, message: String },
}

#[derive(Debug)]
pub struct SearchSession {
    phase: Phase,
    input: String,
    filters: FilterFlags,
    results: Vec<usize>,
    selection: Selection,
    viewport: Viewport,
    recent: RecentSearches,
    store: Option<RecentStore>,
    translations: Translations,
    date_format: String,
}

impl SearchSession {
    pub fn new(config: &Config, store: Option<RecentStore>) -> Self {
        let recent = store
            .as_ref()
            .map(RecentStore::load)
            .unwrap_or_default();

        SearchSession {
            phase: Phase::Loading,
            input: String::new(),
            filters: config.filters,
            results: Vec::new(),
            selection: Selection::None,
            viewport: Viewport::default(),
            recent,
            store,
            translations: config.translations.clone(),
            date_format: config.date_format.clone(),
        }
    }

    pub fn loaded(&mut self, documents: Vec<SearchDocument>) {
        self.phase = Phase::Ready(SearchEngine::new(documents));
        self.clear_results();
    }

    /// Terminal for this session; the panel stays until the session ends
    pub fn load_failed(&mut self, path: &str, error: &SearchError) {
        log::error!("Error loading search data: {} Path: {}", error, path);
        self.phase = Phase::Failed {
            path: path.to_string(),
            message: error.to_string(),
        };
        self.clear_results();
    }

    pub fn results(&self) -> &[usize] {
        &self.results
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn recent(&self) -> &RecentSearches {
        &self.recent
    }

    /// The input field changed
    pub fn input(&mut self, raw: &str) {
        self.input = raw.to_string();
        self.perform_search();
    }

    pub fn set_filter(&mut self, field: FilterField, on: bool) {
        self.filters.set(field, on);
        self.perform_search();
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.clear_results();
    }

    /// Fill the input with a recent entry and search again
    pub fn select_recent(&mut self, index: usize) -> bool {
        let Some(query) = self.recent.get(index).map(str::to_string) else {
            return false;
        };
        self.input(&query);
        true
    }

    pub fn key(&mut self, key: Key) -> KeyOutcome {
        let outcome = self.selection.handle(key, self.results.len());
        if let KeyOutcome::Moved(index) = outcome {
            self.viewport.ensure_visible(index);
        }
        outcome
    }

    /// URL to navigate to for an `Open` outcome
    pub fn target(&self, outcome: KeyOutcome) -> Option<&str> {
        let KeyOutcome::Open(index) = outcome else {
            return None;
        };
        let doc_index = *self.results.get(index)?;
        self.engine()?.get(doc_index).map(|doc| doc.url.as_str())
    }

    fn engine(&self) -> Option<&SearchEngine> {
        match &self.phase {
            Phase::Ready(engine) => Some(engine),
            _ => None,
        }
    }

    fn clear_results(&mut self) {
        self.results.clear();
        self.selection = Selection::None;
        self.viewport.reset();
    }

    fn perform_search(&mut self) {
        let query = normalize_query(&self.input);
        let Some(engine) = self.engine() else {
            log::debug!("Index not loaded, ignoring {:?}", query);
            return;
        };

        // an empty query comes back empty
        let results = engine.search(&query, self.filters);
        self.results = results;
        self.selection = Selection::initial(self.results.len());
        self.viewport.reset();
        log::debug!("{} results for {:?}", self.results.len(), query);

        if !self.results.is_empty() && self.recent.record(&query) {
            self.persist_recent();
        }
    }

    fn persist_recent(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save(&self.recent) {
            log::error!("Error saving recent searches: {}", e);
        }
    }

    pub fn view(&self) -> View {
        let query = normalize_query(&self.input);
        let recent = self.recent.entries().to_vec();
        let recent_html = render::recent_html(&recent);
        let zero = render::counter_text(0, &self.translations);

        let engine = match &self.phase {
            Phase::Loading => {
                return View {
                    status: Status::Loading,
                    query,
                    counter: zero,
                    results: Vec::new(),
                    active: None,
                    scroll_offset: 0,
                    results_html: render::loading_html(),
                    recent,
                    recent_html,
                }
            }
            Phase::Failed { path, message } => {
                return View {
                    status: Status::Error,
                    query,
                    counter: zero,
                    results: Vec::new(),
                    active: None,
                    scroll_offset: 0,
                    results_html: render::error_panel(path, message, &self.translations),
                    recent,
                    recent_html,
                }
            }
            Phase::Ready(engine) => engine,
        };

        let results: Vec<RenderedResult> = self
            .results
            .iter()
            .enumerate()
            .filter_map(|(position, &doc_index)| {
                engine
                    .get(doc_index)
                    .map(|doc| RenderedResult::new(position, doc, &query, &self.date_format))
            })
            .collect();

        let active = self.selection.index();
        let (status, results_html) = if query.is_empty() {
            (Status::Idle, String::new())
        } else if results.is_empty() {
            (
                Status::NoResults,
                render::no_results_html(&query, &self.translations),
            )
        } else {
            let html = results
                .iter()
                .map(|item| item.to_html(Some(item.index) == active))
                .collect();
            (Status::Results, html)
        };

        View {
            status,
            query,
            counter: render::counter_text(results.len(), &self.translations),
            results,
            active,
            scroll_offset: self.viewport.scroll_offset,
            results_html,
            recent,
            recent_html,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::doc;
    use tempfile::tempdir;

    fn config() -> Config {
        Config {
            base: ".".to_string(),
            root: "/".to_string(),
            filters: FilterFlags::default(),
            date_format: "%Y-%m-%d".to_string(),
            translations: Translations::default(),
        }
    }

    fn ready_session(store: Option<RecentStore>) -> SearchSession {
        let mut session = SearchSession::new(&config(), store);
        session.loaded(vec![
            doc("Rust Basics", "ownership and borrowing", &["rust"]),
            doc("Go Concurrency", "goroutines", &["go"]),
            doc("Rust Async", "futures and executors", &["rust", "async"]),
        ]);
        session
    }

    #[test]
    fn input_before_load_is_inert() {
        let mut session = SearchSession::new(&config(), None);
        session.input("rust");
        assert!(session.results().is_empty());
        assert_eq!(session.view().status, Status::Loading);

        session.loaded(vec![doc("Rust Basics", "", &[])]);
        // not replayed
        assert!(session.results().is_empty());
    }

    #[test]
    fn empty_query_shows_zero_counter() {
        let mut session = ready_session(None);
        session.input("   ");
        let view = session.view();
        assert_eq!(view.status, Status::Idle);
        assert_eq!(view.counter, "0 results");
        assert!(view.results.is_empty());
    }

    #[test]
    fn search_selects_first_and_counts() {
        let mut session = ready_session(None);
        session.input("Rust");
        let view = session.view();
        assert_eq!(view.status, Status::Results);
        assert_eq!(view.counter, "2 results");
        assert_eq!(view.active, Some(0));
        assert!(view.results_html.contains("vs-result-item active"));
    }

    #[test]
    fn no_match_renders_message() {
        let mut session = ready_session(None);
        session.input("haskell");
        let view = session.view();
        assert_eq!(view.status, Status::NoResults);
        assert!(view.results_html.contains("No results found for \"haskell\""));
        assert_eq!(session.selection(), Selection::None);
        assert!(session.recent().entries().is_empty());
    }

    #[test]
    fn filter_toggle_reruns_query() {
        let mut session = ready_session(None);
        session.input("owner");
        assert_eq!(session.results(), &[0]);
        session.set_filter(FilterField::Content, false);
        assert!(session.results().is_empty());
        session.set_filter(FilterField::Content, true);
        assert_eq!(session.results(), &[0]);
    }

    #[test]
    fn enter_targets_active_result() {
        let mut session = ready_session(None);
        session.input("rust");
        assert_eq!(session.key(Key::ArrowDown), KeyOutcome::Moved(1));
        let outcome = session.key(Key::Enter);
        assert_eq!(session.target(outcome), Some("/rust-async/"));
    }

    #[test]
    fn moving_past_the_viewport_scrolls() {
        let mut session = SearchSession::new(&config(), None);
        session.loaded(
            (0..12)
                .map(|i| doc(&format!("Post {}", i), "", &[]))
                .collect(),
        );
        session.input("post");
        for _ in 0..9 {
            session.key(Key::ArrowDown);
        }
        let view = session.view();
        assert_eq!(view.active, Some(9));
        assert_eq!(view.scroll_offset, 2);

        session.input("post 1");
        assert_eq!(session.view().scroll_offset, 0);
    }

    #[test]
    fn enter_without_results_does_nothing() {
        let mut session = ready_session(None);
        session.input("haskell");
        let outcome = session.key(Key::Enter);
        assert_eq!(outcome, KeyOutcome::Ignored);
        assert_eq!(session.target(outcome), None);
    }

    #[test]
    fn successful_queries_are_remembered_and_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recent.json");
        let mut session = ready_session(Some(RecentStore::at(&path)));
        session.input("Rust");
        session.input("r");
        session.input("haskell");
        assert_eq!(session.recent().entries(), &["rust".to_string()]);

        let reloaded = RecentStore::at(&path).load();
        assert_eq!(reloaded.entries(), &["rust".to_string()]);
    }

    #[test]
    fn recent_entry_reruns_search() {
        let mut session = ready_session(None);
        session.input("go");
        session.clear();
        assert!(session.results().is_empty());
        assert!(session.select_recent(0));
        assert_eq!(session.results(), &[1]);
        assert!(!session.select_recent(3));
    }

    #[test]
    fn failed_load_shows_error_panel() {
        let mut session = SearchSession::new(&config(), None);
        let error = SearchError::Status {
            path: "/search.json".to_string(),
            status: 404,
        };
        session.load_failed("/search.json", &error);
        session.input("rust");
        let view = session.view();
        assert_eq!(view.status, Status::Error);
        assert!(view.results_html.contains("Path: /search.json"));
        assert!(view.results_html.contains("Status: 404"));
    }
}
