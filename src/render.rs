//! Turns matched documents into display fragments.
//!
//! All source text is HTML-escaped before any highlight markup is added, so the
//! `<span class="vs-highlight">` markers are the only raw tags in the output.

use crate::config::Translations;
use crate::search::{find_chars, fold_chars, SearchDocument};
use chrono::DateTime;
use serde::Serialize;
use std::error::Error;
use std::fmt::Write;

pub const PREVIEW_LENGTH: usize = 150;
const ELLIPSIS: &str = "...";

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape `text` and wrap every case-insensitive occurrence of `query`
pub fn highlight(text: &str, query: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let folded = fold_chars(text);
    let needle = fold_chars(query);
    if needle.is_empty() {
        return escape_html(text);
    }

    let slice = |from: usize, to: usize| chars[from..to].iter().collect::<String>();
    let mut result = String::with_capacity(text.len() + 32);
    let mut last = 0;

    while let Some(index) = find_chars(&folded, &needle, last) {
        result.push_str(&escape_html(&slice(last, index)));
        result.push_str("<span class=\"vs-highlight\">");
        result.push_str(&escape_html(&slice(index, index + needle.len())));
        result.push_str("</span>");
        last = index + needle.len();
    }

    result.push_str(&escape_html(&slice(last, chars.len())));
    result
}

/// A window of at most `max_length` chars around the first occurrence of `query`,
/// with ellipses marking cut ends. Falls back to the head of `content`.
pub fn content_preview(content: &str, query: &str, max_length: usize) -> String {
    if content.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = content.chars().collect();
    let len = chars.len();
    let needle = fold_chars(query);

    let Some(index) = find_chars(&fold_chars(content), &needle, 0) else {
        if len > max_length {
            let head: String = chars[..max_length].iter().collect();
            return head + ELLIPSIS;
        }
        return content.to_string();
    };

    let context = max_length.saturating_sub(needle.len()) / 2;
    let mut start = index.saturating_sub(context);
    let mut end = len.min(index + needle.len() + context);

    if start == 0 {
        end = len.min(max_length);
    } else if end == len {
        start = len.saturating_sub(max_length);
    }

    let mut preview = String::new();
    if start > 0 {
        preview.push_str(ELLIPSIS);
    }
    preview.extend(&chars[start..end]);
    if end < len {
        preview.push_str(ELLIPSIS);
    }
    preview
}

/// Icon class picked from the first category, as the theme's file-type icons
pub fn file_icon(categories: &[String]) -> &'static str {
    let Some(first) = categories.first() else {
        return "fa-file-code";
    };
    let category = first.to_lowercase();

    if category.contains("javascript") || category.contains("js") {
        "fa-file-code js-icon"
    } else if category.contains("css") || category.contains("style") {
        "fa-file-code css-icon"
    } else if category.contains("html") {
        "fa-file-code html-icon"
    } else if category.contains("markdown") || category.contains("md") {
        "fa-file-alt md-icon"
    } else {
        "fa-file-code"
    }
}

/// Reformat an ISO-8601 date with `date_format`; anything unparseable is kept as is
pub fn format_date(raw: &str, date_format: &str) -> String {
    let Ok(parsed) = DateTime::parse_from_rfc3339(raw) else {
        return raw.to_string();
    };

    let mut out = String::new();
    match write!(out, "{}", parsed.format(date_format)) {
        Ok(()) => out,
        Err(_) => {
            log::debug!("Invalid date format {:?}, keeping {:?}", date_format, raw);
            raw.to_string()
        }
    }
}

/// `"1 result"`, `"N results"`, and `"0 results"` for an empty set
pub fn counter_text(count: usize, translations: &Translations) -> String {
    let noun = if count == 1 {
        &translations.result
    } else {
        &translations.results
    };
    format!("{} {}", count, noun)
}

/// One entry of the result list
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RenderedResult {
    pub index: usize,
    pub url: String,
    pub title_html: String,
    pub preview_html: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    pub icon: &'static str,
}

impl RenderedResult {
    pub fn new(index: usize, doc: &SearchDocument, query: &str, date_format: &str) -> Self {
        let preview = content_preview(&doc.content, query, PREVIEW_LENGTH);
        RenderedResult {
            index,
            url: doc.url.clone(),
            title_html: highlight(&doc.title, query),
            preview_html: highlight(&preview, query),
            date: escape_html(&format_date(&doc.date, date_format)),
            tags: if doc.tags.is_empty() {
                None
            } else {
                Some(escape_html(&doc.tags.join(", ")))
            },
            icon: file_icon(&doc.categories),
        }
    }

    /// Result item markup with an anchor to the document
    pub fn to_html(&self, active: bool) -> String {
        let class = if active {
            "vs-result-item active"
        } else {
            "vs-result-item"
        };
        let tags = self
            .tags
            .as_ref()
            .map(|tags| {
                format!(
                    "<span class=\"vs-result-tags\"><i class=\"fas fa-tags\"></i> {}</span>",
                    tags
                )
            })
            .unwrap_or_default();

        format!(
            "<div class=\"{class}\" data-index=\"{index}\">\
             <a href=\"{url}\" class=\"vs-result-link\">\
             <div class=\"vs-result-header\"><i class=\"fas {icon}\"></i>\
             <span class=\"vs-result-title\">{title}</span></div>\
             <div class=\"vs-result-preview\">{preview}</div>\
             <div class=\"vs-result-meta\"><span class=\"vs-result-date\">\
             <i class=\"fas fa-calendar-alt\"></i> {date}</span>{tags}</div>\
             </a></div>",
            class = class,
            index = self.index,
            url = escape_html(&self.url),
            icon = self.icon,
            title = self.title_html,
            preview = self.preview_html,
            date = self.date,
            tags = tags,
        )
    }
}

pub fn loading_html() -> String {
    "<div class=\"vs-search-loading\"><i class=\"fas fa-spinner fa-spin\"></i>\
     <span>Loading search data...</span></div>"
        .to_string()
}

pub fn no_results_html(query: &str, translations: &Translations) -> String {
    format!(
        "<div class=\"vs-no-results\"><i class=\"fas fa-search\"></i>\
         <span>{} \"{}\"</span></div>",
        escape_html(&translations.no_results),
        escape_html(query)
    )
}

/// The terminal panel shown when `search.json` could not be loaded
pub fn error_panel(path: &str, message: &str, translations: &Translations) -> String {
    format!(
        "<div class=\"vs-no-results\"><i class=\"fas fa-exclamation-circle\"></i>\
         <span>{}</span><div class=\"vs-error-details\">\
         Check that search.json is being generated correctly.<br>\
         Path: {}<br>Error: {}</div></div>",
        escape_html(&translations.error),
        escape_html(path),
        escape_html(message)
    )
}

pub fn recent_html(recent: &[String]) -> String {
    if recent.is_empty() {
        return "<div class=\"recent-search-empty\">No recent searches</div>".to_string();
    }
    recent
        .iter()
        .enumerate()
        .map(|(i, query)| {
            format!(
                "<div class=\"recent-search-item\" data-recent=\"{}\">\
                 <i class=\"fas fa-history\"></i> {}</div>",
                i,
                escape_html(query)
            )
        })
        .collect()
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Loading,
    Error,
    Idle,
    Results,
    NoResults,
}

/// Snapshot of everything the search box shows
#[derive(Serialize, Debug, Clone)]
pub struct View {
    pub status: Status,
    pub query: String,
    pub counter: String,
    pub results: Vec<RenderedResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<usize>,
    pub scroll_offset: usize,
    pub results_html: String,
    pub recent: Vec<String>,
    pub recent_html: String,
}

/// Print a view as one JSON document
pub fn output_view(view: &View) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string(view)?);
    Ok(())
}
