//! Client-side search index.
//!
//! The generate stage writes `search-index.json` next to `index.html`:
//!
//! ```json
//! { "version": 1, "entries": [ { "kind": "pattern", "id": "sidecar", ... } ] }
//! ```
//!
//! One entry per pattern and per non-link page. Entries carry resolved
//! labels (tag labels, author names) rather than raw ids so the browser can
//! match on what the reader sees.

use crate::config::SiteConfig;
use crate::markdown::RenderedMarkdown;
use crate::naming::{page_url, pattern_url};
use crate::store::LabelledContent;
use crate::types::Page;
use serde::{Deserialize, Serialize};

pub const SEARCH_INDEX_FILE: &str = "search-index.json";
pub const SEARCH_INDEX_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub version: u32,
    pub entries: Vec<SearchEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Pattern,
    Page,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub kind: EntryKind,
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headings: Vec<String>,
    pub text: String,
}

impl SearchIndex {
    pub fn new(entries: Vec<SearchEntry>) -> Self {
        Self {
            version: SEARCH_INDEX_VERSION,
            entries,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Search entry for a pattern, with labels resolved through the store.
pub fn pattern_entry(
    item: &LabelledContent<'_>,
    rendered: &RenderedMarkdown,
    config: &SiteConfig,
) -> SearchEntry {
    let content = item.content;
    SearchEntry {
        kind: EntryKind::Pattern,
        id: content.id.clone(),
        url: pattern_url(&content.id, config.clean_urls),
        title: content.title.clone(),
        description: content.description.clone(),
        tags: item.known_tags().map(|f| f.label.clone()).collect(),
        authors: item.known_authors().map(|a| a.name.clone()).collect(),
        date: content.date.clone(),
        headings: rendered.outline.iter().map(|h| h.title.clone()).collect(),
        text: truncate_chars(&rendered.text, config.search.max_text_chars),
    }
}

/// Search entry for a top-level page. Link pages have no entry.
pub fn page_entry(
    page: &Page,
    rendered: &RenderedMarkdown,
    config: &SiteConfig,
) -> Option<SearchEntry> {
    if page.is_link {
        return None;
    }
    Some(SearchEntry {
        kind: EntryKind::Page,
        id: page.slug.clone(),
        url: page_url(&page.slug, config.clean_urls),
        title: page.title.clone(),
        description: String::new(),
        tags: Vec::new(),
        authors: Vec::new(),
        date: None,
        headings: rendered.outline.iter().map(|h| h.title.clone()).collect(),
        text: truncate_chars(&rendered.text, config.search.max_text_chars),
    })
}

/// Keep at most `max` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::OutlineHeader;
    use crate::test_helpers::sample_store;

    fn rendered(text: &str) -> RenderedMarkdown {
        RenderedMarkdown {
            html: String::new(),
            outline: vec![OutlineHeader {
                title: "Usage".to_string(),
                link: "#usage".to_string(),
                level: 2,
            }],
            text: text.to_string(),
        }
    }

    #[test]
    fn pattern_entry_resolves_labels() {
        let store = sample_store();
        let items = store.labelled_content();
        let entry = pattern_entry(&items[0], &rendered("body text"), &SiteConfig::default());

        assert_eq!(entry.kind, EntryKind::Pattern);
        assert_eq!(entry.id, "A");
        assert_eq!(entry.url, "/pattern/A");
        assert_eq!(entry.tags, vec!["go", "prod"]);
        assert_eq!(entry.authors, vec!["Ada"]);
        assert_eq!(entry.headings, vec!["Usage"]);
        assert_eq!(entry.text, "body text");
    }

    #[test]
    fn pattern_entry_text_is_truncated() {
        let store = sample_store();
        let items = store.labelled_content();
        let mut config = SiteConfig::default();
        config.search.max_text_chars = 4;
        config.clean_urls = false;
        let entry = pattern_entry(&items[1], &rendered("abcdefgh"), &config);
        assert_eq!(entry.text, "abcd");
        assert_eq!(entry.url, "/pattern/B.html");
    }

    #[test]
    fn link_pages_have_no_entry() {
        let page = Page {
            title: "GitHub".to_string(),
            link_title: "github".to_string(),
            slug: "github".to_string(),
            body: "https://github.com/example".to_string(),
            in_nav: true,
            sort_key: 90,
            is_link: true,
        };
        assert!(page_entry(&page, &rendered(""), &SiteConfig::default()).is_none());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn index_json_shape() {
        let index = SearchIndex::new(Vec::new());
        assert_eq!(index.to_json().unwrap(), r#"{"version":1,"entries":[]}"#);
    }
}
