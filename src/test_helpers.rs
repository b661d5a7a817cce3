//! Shared test utilities for the patternbook test suite.
//!
//! Provides record builders for store tests, a canned [`sample_store`], the
//! fixture site copier, and manifest lookups that panic with a clear message.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//! let sidecar = find_pattern(&manifest, "sidecar");
//! assert_eq!(pattern_ids(&manifest), vec!["blue-green", "log-router", "sidecar"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::data::CatalogData;
use crate::store::CatalogStore;
use crate::types::{Author, Content, Filter, FilterDimension, FilterGroup, Manifest, Page, Pattern};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Record builders
// =========================================================================

/// A filter labelled with its value and no color.
pub fn filter(key: &str, value: &str, checked: bool) -> Filter {
    Filter {
        key: key.to_string(),
        value: value.to_string(),
        label: value.to_string(),
        color: String::new(),
        checked,
    }
}

pub fn group(key: &str, label: &str) -> FilterGroup {
    FilterGroup {
        key: key.to_string(),
        label: label.to_string(),
    }
}

/// An author whose name is the capitalized id (`ada` → `Ada`).
pub fn author(id: &str) -> Author {
    let mut chars = id.chars();
    let name = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    Author {
        id: id.to_string(),
        name,
        title: String::new(),
        image: String::new(),
        links: Vec::new(),
    }
}

/// A content item titled with its id.
pub fn content(id: &str, dimensions: &[(&str, &str)], authors: &[&str]) -> Content {
    Content {
        id: id.to_string(),
        title: id.to_string(),
        description: String::new(),
        image: String::new(),
        filter_dimensions: dimensions
            .iter()
            .map(|(k, v)| FilterDimension::new(*k, *v))
            .collect(),
        authors: authors.iter().map(|a| a.to_string()).collect(),
        date: None,
    }
}

/// Three items over two categories, with `lang:go` and `tier:prod` checked.
///
/// ```text
/// A  lang:go   tier:prod  by ada
/// B  lang:go
/// C  lang:rust tier:prod
/// ```
pub fn sample_store() -> CatalogStore {
    let data = CatalogData {
        filters: vec![
            filter("lang", "go", true),
            filter("lang", "rust", false),
            filter("tier", "prod", true),
        ],
        filter_groups: vec![group("lang", "Language"), group("tier", "Tier")],
        authors: vec![author("ada")],
        team: Vec::new(),
    };
    CatalogStore::new(
        vec![
            content("A", &[("lang", "go"), ("tier", "prod")], &["ada"]),
            content("B", &[("lang", "go")], &[]),
            content("C", &[("lang", "rust"), ("tier", "prod")], &[]),
        ],
        data,
    )
}

// =========================================================================
// Manifest lookups (panic with a clear message on miss)
// =========================================================================

/// Find a pattern by id. Panics if not found.
pub fn find_pattern<'a>(manifest: &'a Manifest, id: &str) -> &'a Pattern {
    manifest
        .patterns
        .iter()
        .find(|p| p.meta.id == id)
        .unwrap_or_else(|| {
            let ids = pattern_ids(manifest);
            panic!("pattern '{id}' not found. Available: {ids:?}")
        })
}

/// Find a page by slug. Panics if not found.
pub fn find_page<'a>(manifest: &'a Manifest, slug: &str) -> &'a Page {
    manifest
        .pages
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.pages.iter().map(|p| p.slug.as_str()).collect();
            panic!("page '{slug}' not found. Available: {slugs:?}")
        })
}

/// All pattern ids in manifest order.
pub fn pattern_ids(manifest: &Manifest) -> Vec<&str> {
    manifest.patterns.iter().map(|p| p.meta.id.as_str()).collect()
}

/// Read a generated file. Panics with the path if it is missing.
pub fn read_output(output: &Path, rel: &str) -> String {
    let path = output.join(rel);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}
