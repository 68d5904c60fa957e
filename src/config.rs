//! Settings read from the environment.
//!
//! Every knob has a default so the binary works with no configuration at all:
//! - `search_base` / `search_root` locate `search.json`
//! - `search_titles`, `search_content`, `search_tags` set the filter defaults
//! - `date_format` controls how result dates are printed
//! - `search_no_results`, `search_result`, `search_results`, `search_error`
//!   override the display strings

use crate::search::FilterFlags;

/// Read an env var as bool ("1" or "true" = true, "0" or "false" = false).
/// Anything else, or an unset var, yields `default`.
pub fn get_env_bool_or(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
        Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") => false,
        _ => default,
    }
}

/// Read an env var or return `default`. Empty values count as unset.
pub fn get_env_with_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Display strings, looked up by the theme's translation keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Translations {
    pub no_results: String,
    pub result: String,
    pub results: String,
    pub error: String,
}

impl Default for Translations {
    fn default() -> Self {
        Translations {
            no_results: "No results found for".to_string(),
            result: "result".to_string(),
            results: "results".to_string(),
            error: "Error loading search data".to_string(),
        }
    }
}

impl Translations {
    pub fn from_env() -> Self {
        let fallback = Translations::default();
        Translations {
            no_results: get_env_with_default("search_no_results", &fallback.no_results),
            result: get_env_with_default("search_result", &fallback.result),
            results: get_env_with_default("search_results", &fallback.results),
            error: get_env_with_default("search_error", &fallback.error),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Site origin (`https://blog.example.com`) or a directory holding the generated site
    pub base: String,
    pub root: String,
    pub filters: FilterFlags,
    pub date_format: String,
    pub translations: Translations,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            base: get_env_with_default("search_base", "."),
            root: get_env_with_default("search_root", "/"),
            filters: FilterFlags {
                match_title: get_env_bool_or("search_titles", true),
                match_content: get_env_bool_or("search_content", true),
                match_tags: get_env_bool_or("search_tags", true),
            },
            date_format: get_env_with_default("date_format", "%Y-%m-%d"),
            translations: Translations::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_bool_falls_back_on_unknown_values() {
        std::env::set_var("blog_search_test_flag", "maybe");
        assert!(get_env_bool_or("blog_search_test_flag", true));
        std::env::set_var("blog_search_test_flag", "FALSE");
        assert!(!get_env_bool_or("blog_search_test_flag", true));
        std::env::set_var("blog_search_test_flag", "1");
        assert!(get_env_bool_or("blog_search_test_flag", false));
        std::env::remove_var("blog_search_test_flag");
        assert!(!get_env_bool_or("blog_search_test_flag", false));
    }

    #[test]
    fn empty_env_value_uses_default() {
        std::env::set_var("blog_search_test_text", "");
        assert_eq!(get_env_with_default("blog_search_test_text", "x"), "x");
        std::env::remove_var("blog_search_test_text");
    }
}
