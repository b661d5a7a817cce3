//! # Patternbook
//!
//! A static site generator for pattern libraries. Patterns are markdown pages
//! with YAML front matter; filters, filter groups, authors and the team live
//! in YAML data files. The output is a filterable HTML catalog with a page
//! per pattern and author, a search index, and a sitemap.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      site/     →  manifest.json    (filesystem → structured data)
//! 2. Generate  manifest  →  dist/            (catalog store → HTML site)
//! ```
//!
//! The manifest is human-readable JSON you can inspect between stages. The
//! generate stage loads it into a [`store::CatalogStore`] and renders every
//! page from the store's derived views, so the HTML catalog, the `query`
//! command and the client-side filter all share one set of matching rules.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | The catalog store: lookup indices, filter state, derived views, faceted matching |
//! | [`types`] | Catalog records and the manifest types shared between stages |
//! | [`data`] | Loads and validates `filters.yml`, `filter-groups.yml`, `authors.yml`, `team.yml` |
//! | [`scan`] | Stage 1: walks the site, parses front matter, produces the manifest |
//! | [`generate`] | Stage 2: renders the HTML site with Maud |
//! | [`markdown`] | Markdown rendering: code fences, `!!!` SVG embedding, heading outline |
//! | [`svg`] | Clean-up transform for embedded SVG diagrams |
//! | [`search`] | `search-index.json` entries |
//! | [`sitemap`] | `sitemap.xml` |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`naming`] | `NNN-name` page convention, heading slugs, site URLs |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Recompute on Read
//!
//! Catalogs are small (hundreds of items, dozens of filters). Every derived
//! view of the store is recomputed from the current filter state when asked
//! for, which leaves nothing to invalidate when a filter is toggled. Only the
//! key lookups are indexed, because keys never change after load.
//!
//! ## Unknown References Are Data, Not Errors
//!
//! Pattern front matter and the data files are edited by different people at
//! different times. A dimension with no filter record or an author id with no
//! author record renders without a label and never matches a filter. The
//! `check` command lists them; the build never fails on them.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Malformed templates are build errors, interpolation is
//! auto-escaped, and there is no template directory to ship.

pub mod config;
pub mod data;
pub mod generate;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod scan;
pub mod search;
pub mod sitemap;
pub mod store;
pub mod svg;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
