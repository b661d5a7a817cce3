//! Shared record types.
//!
//! The catalog records ([`Filter`], [`FilterGroup`], [`Content`], [`Author`])
//! are what the [`store`](crate::store) operates on. The manifest types
//! ([`Manifest`], [`Pattern`], [`Page`]) are serialized to JSON between the
//! scan and generate stages and must stay identical across both.

use crate::config::SiteConfig;
use crate::data::CatalogData;
use serde::{Deserialize, Serialize};

/// A `(key, value)` facet attached to a content item, e.g. `lang: go`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterDimension {
    pub key: String,
    pub value: String,
}

impl FilterDimension {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A user-toggleable facet value.
///
/// Unique by `(key, value)`. `checked` is the only field that changes after
/// load; everything else is fixed for the lifetime of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub key: String,
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub checked: bool,
}

/// A named category bundling the filters that share its `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub key: String,
    pub label: String,
}

/// A catalog entry: one pattern page.
///
/// `filter_dimensions` and `authors` default to empty when absent from the
/// source record, so every consumer can iterate them without checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub filter_dimensions: Vec<FilterDimension>,
    /// Author ids, resolved against [`Author::id`].
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Website,
    Github,
    Twitter,
}

impl LinkType {
    pub fn label(self) -> &'static str {
        match self {
            LinkType::Website => "Website",
            LinkType::Github => "GitHub",
            LinkType::Twitter => "Twitter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorLink {
    #[serde(rename = "type")]
    pub link_type: LinkType,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub links: Vec<AuthorLink>,
}

/// Team members are listed in `team.yml` with the same shape as authors.
pub type TeamMember = Author;

/// Scan manifest: everything the generate stage needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub patterns: Vec<Pattern>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<Page>,
    pub data: CatalogData,
    pub config: SiteConfig,
}

impl Manifest {
    /// The content records in catalog order.
    pub fn content(&self) -> Vec<Content> {
        self.patterns.iter().map(|p| p.meta.clone()).collect()
    }
}

/// A pattern page: catalog metadata plus the markdown body it was parsed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    pub meta: Content,
    /// Markdown body with the front matter stripped.
    pub body: String,
    /// Source file, relative to the site root.
    pub source_path: String,
}

/// A page generated from a markdown file in the site root.
///
/// Pages follow the `NNN-name` numbering convention:
/// - Numbered files (`NNN-name.md`) appear in navigation, sorted by number
/// - Unnumbered files are generated but hidden from navigation
///
/// If the file content is just a URL, the page becomes an external link in nav.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Title from first `# heading` in markdown, or link_title as fallback
    pub title: String,
    /// Display label in nav (filename with number stripped and dashes → spaces)
    pub link_title: String,
    /// URL slug (filename stem with number prefix stripped)
    pub slug: String,
    /// Raw markdown content (or URL for link pages)
    pub body: String,
    pub in_nav: bool,
    pub sort_key: u32,
    /// If true, body is a URL and this page is an external link
    pub is_link: bool,
}
