//! The catalog store: content items, filters, and the views derived from them.
//!
//! A [`CatalogStore`] is built once per page render or build from a snapshot
//! of the catalog records. It holds five input collections (content, filters,
//! filter groups, authors, team) and exposes derived views as methods that
//! recompute from the current state on every call. There is no cached view
//! to invalidate: after [`CatalogStore::set_checked`] or
//! [`CatalogStore::reset_all_filters`] the next read reflects the change.
//!
//! ## Lookup indices
//!
//! Keys (`key:value` for filters, `key` for groups, `id` for authors and team
//! members) never change after construction, so their indices are built once
//! in [`CatalogStore::new`] and map to positions in the input vectors.
//! Toggling `checked` mutates the filter in place and leaves every index valid.
//!
//! ## Matching
//!
//! [`CatalogStore::filtered_content`] implements faceted search semantics:
//!
//! ```text
//! no filter checked        →  every content item, in order
//! otherwise                →  items where, for EVERY category with a checked
//!                             filter, AT LEAST ONE of the item's dimensions in
//!                             that category resolves to a checked filter
//! ```
//!
//! AND across categories, OR within a category. A dimension that does not
//! resolve to a known filter never matches.
//!
//! ## Unknown references
//!
//! Content data and filter/author data are maintained separately and drift.
//! A dimension or author id with no matching record resolves to `None` in
//! labelled views and never matches a filter. Nothing here fails.

use crate::data::CatalogData;
use crate::types::{Author, Content, Filter, FilterGroup, TeamMember};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, warn};

/// Index key for a filter: `"<key>:<value>"`.
pub fn filter_key(key: &str, value: &str) -> String {
    format!("{key}:{value}")
}

/// Catalog snapshot with derived views.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    content: Vec<Content>,
    filters: Vec<Filter>,
    filter_groups: Vec<FilterGroup>,
    authors: Vec<Author>,
    team: Vec<TeamMember>,
    filter_index: HashMap<String, usize>,
    group_index: HashMap<String, usize>,
    author_index: HashMap<String, usize>,
    team_index: HashMap<String, usize>,
}

/// A filter group with its filters, in group order then filter order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSection<'a> {
    pub key: &'a str,
    pub label: &'a str,
    pub filters: Vec<&'a Filter>,
}

/// A content item annotated with resolved display data.
///
/// `tags` follows the item's dimension order and `author_details` its author
/// order; unknown references are `None` (`null` when serialized).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelledContent<'a> {
    #[serde(flatten)]
    pub content: &'a Content,
    pub tags: Vec<Option<&'a Filter>>,
    pub author_details: Vec<Option<&'a Author>>,
}

impl<'a> LabelledContent<'a> {
    /// The first listed author, used for card thumbnails.
    ///
    /// Only the first entry is considered: if it is unknown this returns
    /// `None` even when later authors resolve.
    pub fn primary_author(&self) -> Option<&'a Author> {
        self.author_details.first().copied().flatten()
    }

    /// Resolved tags only, skipping unknown dimensions.
    pub fn known_tags(&self) -> impl Iterator<Item = &'a Filter> + '_ {
        self.tags.iter().filter_map(|t| *t)
    }

    /// Resolved authors only, skipping unknown ids.
    pub fn known_authors(&self) -> impl Iterator<Item = &'a Author> + '_ {
        self.author_details.iter().filter_map(|a| *a)
    }
}

/// A reference from a content item to a record that does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReference {
    Dimension {
        content_id: String,
        key: String,
        value: String,
    },
    Author {
        content_id: String,
        author_id: String,
    },
}

impl std::fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedReference::Dimension {
                content_id,
                key,
                value,
            } => write!(f, "{content_id}: unknown filter {key}:{value}"),
            UnresolvedReference::Author {
                content_id,
                author_id,
            } => write!(f, "{content_id}: unknown author {author_id}"),
        }
    }
}

fn build_index<T>(items: &[T], kind: &str, key_of: impl Fn(&T) -> String) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(items.len());
    for (pos, item) in items.iter().enumerate() {
        let key = key_of(item);
        if index.contains_key(&key) {
            warn!(key = %key, "duplicate {} ignored; first definition wins", kind);
            continue;
        }
        index.insert(key, pos);
    }
    index
}

impl CatalogStore {
    /// Ingest a snapshot. `content` order is the order of every content view.
    pub fn new(content: Vec<Content>, data: CatalogData) -> Self {
        let CatalogData {
            filters,
            filter_groups,
            authors,
            team,
        } = data;

        let filter_index = build_index(&filters, "filter", |f| filter_key(&f.key, &f.value));
        let group_index = build_index(&filter_groups, "filter group", |g| g.key.clone());
        let author_index = build_index(&authors, "author", |a| a.id.clone());
        let team_index = build_index(&team, "team member", |m| m.id.clone());

        debug!(
            content = content.len(),
            filters = filters.len(),
            groups = filter_groups.len(),
            authors = authors.len(),
            team = team.len(),
            "catalog store initialized"
        );

        Self {
            content,
            filters,
            filter_groups,
            authors,
            team,
            filter_index,
            group_index,
            author_index,
            team_index,
        }
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    pub fn content(&self) -> &[Content] {
        &self.content
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn filter_groups(&self) -> &[FilterGroup] {
        &self.filter_groups
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    pub fn team(&self) -> &[TeamMember] {
        &self.team
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Set the checked state of one filter.
    ///
    /// Returns `false` if no filter has this `(key, value)`.
    pub fn set_checked(&mut self, key: &str, value: &str, checked: bool) -> bool {
        match self.filter_index.get(&filter_key(key, value)) {
            Some(&pos) => {
                self.filters[pos].checked = checked;
                true
            }
            None => false,
        }
    }

    /// Flip one filter's checked state, returning the new state.
    pub fn toggle_filter(&mut self, key: &str, value: &str) -> Option<bool> {
        let pos = *self.filter_index.get(&filter_key(key, value))?;
        let filter = &mut self.filters[pos];
        filter.checked = !filter.checked;
        Some(filter.checked)
    }

    /// Uncheck every filter.
    pub fn reset_all_filters(&mut self) {
        for filter in &mut self.filters {
            filter.checked = false;
        }
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// Mapping from `"<key>:<value>"` to its filter.
    pub fn filters_by_key_value(&self) -> HashMap<&str, &Filter> {
        self.filter_index
            .iter()
            .map(|(k, &pos)| (k.as_str(), &self.filters[pos]))
            .collect()
    }

    /// The filter for `(key, value)`, if one is defined.
    pub fn find_filter(&self, key: &str, value: &str) -> Option<&Filter> {
        self.filter_index
            .get(&filter_key(key, value))
            .map(|&pos| &self.filters[pos])
    }

    pub fn filter_groups_by_key(&self) -> HashMap<&str, &FilterGroup> {
        self.group_index
            .iter()
            .map(|(k, &pos)| (k.as_str(), &self.filter_groups[pos]))
            .collect()
    }

    pub fn authors_by_id(&self) -> HashMap<&str, &Author> {
        self.author_index
            .iter()
            .map(|(k, &pos)| (k.as_str(), &self.authors[pos]))
            .collect()
    }

    pub fn find_author(&self, id: &str) -> Option<&Author> {
        self.author_index.get(id).map(|&pos| &self.authors[pos])
    }

    pub fn team_by_id(&self) -> HashMap<&str, &TeamMember> {
        self.team_index
            .iter()
            .map(|(k, &pos)| (k.as_str(), &self.team[pos]))
            .collect()
    }

    // ------------------------------------------------------------------
    // Filter views
    // ------------------------------------------------------------------

    /// Filters organized by group, for rendering the filter sidebar.
    pub fn filter_list(&self) -> Vec<FilterSection<'_>> {
        self.filter_groups
            .iter()
            .map(|group| FilterSection {
                key: &group.key,
                label: &group.label,
                filters: self.filters.iter().filter(|f| f.key == group.key).collect(),
            })
            .collect()
    }

    /// Checked filters in their original order.
    pub fn checked_filters(&self) -> Vec<&Filter> {
        self.filters.iter().filter(|f| f.checked).collect()
    }

    /// Categories (filter keys) with at least one checked filter.
    pub fn filter_categories(&self) -> BTreeSet<&str> {
        self.filters
            .iter()
            .filter(|f| f.checked)
            .map(|f| f.key.as_str())
            .collect()
    }

    // ------------------------------------------------------------------
    // Content views
    // ------------------------------------------------------------------

    /// Content matching the checked filters, in source order.
    pub fn filtered_content(&self) -> Vec<&Content> {
        let categories = self.filter_categories();
        if categories.is_empty() {
            return self.content.iter().collect();
        }
        self.content
            .iter()
            .filter(|item| self.matches_categories(item, &categories))
            .collect()
    }

    /// Whether `item` satisfies every category in `categories`.
    fn matches_categories(&self, item: &Content, categories: &BTreeSet<&str>) -> bool {
        categories.iter().all(|category| {
            item.filter_dimensions
                .iter()
                .filter(|dim| dim.key == *category)
                .any(|dim| match self.find_filter(&dim.key, &dim.value) {
                    Some(filter) => filter.checked,
                    None => {
                        debug!(
                            content = %item.id,
                            key = %dim.key,
                            value = %dim.value,
                            "dimension has no filter; treated as non-matching"
                        );
                        false
                    }
                })
        })
    }

    /// Every content item with resolved tags and author details.
    pub fn labelled_content(&self) -> Vec<LabelledContent<'_>> {
        self.content.iter().map(|item| self.label(item)).collect()
    }

    /// [`filtered_content`](Self::filtered_content) with labels applied.
    pub fn labelled_filtered_content(&self) -> Vec<LabelledContent<'_>> {
        self.filtered_content()
            .into_iter()
            .map(|item| self.label(item))
            .collect()
    }

    /// Labelled content grouped by author id.
    ///
    /// Every known author has an entry, possibly empty. Items appear under
    /// each listed author once, in source order. An unknown author id listed
    /// on an item gets its own entry as well.
    pub fn labelled_content_by_author(&self) -> BTreeMap<&str, Vec<LabelledContent<'_>>> {
        let mut by_author: BTreeMap<&str, Vec<LabelledContent<'_>>> = self
            .authors
            .iter()
            .map(|a| (a.id.as_str(), Vec::new()))
            .collect();

        for item in &self.content {
            let mut seen = BTreeSet::new();
            for author_id in &item.authors {
                if !seen.insert(author_id.as_str()) {
                    continue;
                }
                by_author
                    .entry(author_id.as_str())
                    .or_default()
                    .push(self.label(item));
            }
        }
        by_author
    }

    fn label<'a>(&'a self, item: &'a Content) -> LabelledContent<'a> {
        let tags = item
            .filter_dimensions
            .iter()
            .map(|dim| {
                let filter = self.find_filter(&dim.key, &dim.value);
                if filter.is_none() {
                    warn!(
                        content = %item.id,
                        key = %dim.key,
                        value = %dim.value,
                        "content references an unknown filter"
                    );
                }
                filter
            })
            .collect();

        let author_details = item
            .authors
            .iter()
            .map(|id| {
                let author = self.find_author(id);
                if author.is_none() {
                    warn!(content = %item.id, author = %id, "content references an unknown author");
                }
                author
            })
            .collect();

        LabelledContent {
            content: item,
            tags,
            author_details,
        }
    }

    /// Every dimension and author reference that resolves to nothing.
    pub fn unresolved_references(&self) -> Vec<UnresolvedReference> {
        let mut unresolved = Vec::new();
        for item in &self.content {
            for dim in &item.filter_dimensions {
                if self.find_filter(&dim.key, &dim.value).is_none() {
                    unresolved.push(UnresolvedReference::Dimension {
                        content_id: item.id.clone(),
                        key: dim.key.clone(),
                        value: dim.value.clone(),
                    });
                }
            }
            for author_id in &item.authors {
                if self.find_author(author_id).is_none() {
                    unresolved.push(UnresolvedReference::Author {
                        content_id: item.id.clone(),
                        author_id: author_id.clone(),
                    });
                }
            }
        }
        unresolved
    }
}
