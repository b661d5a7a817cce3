//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (pattern, page, reference) is its semantic identity:
//! title and positional index. Filesystem paths and raw ids are shown as
//! secondary context via indented lines.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Patterns
//! 001 Blue/Green Deployment
//!     Source: pattern/blue-green.md
//!     Dimensions: type:deployment level:advanced
//!     Authors: jdoe
//!     Shift traffic between two identical environments.
//!
//! Catalog
//!     5 filters in 2 groups
//!     2 authors, 2 team members
//!
//! Pages
//!     001 About These Patterns
//!     002 github (link)
//!
//! Config
//!     config.toml
//!     public/
//! ```
//!
//! ## Generate
//!
//! ```text
//! Catalog → index.html
//! Patterns → pattern/ (3 pages)
//! Authors → author/ (2 pages)
//! Team → team.html
//! Assets
//!     assets/style.3f2a9c1e.css
//!     assets/filter.8b0d44f2.js
//! Search → search-index.json (4 entries)
//! Sitemap → sitemap.xml (8 URLs)
//!
//! Generated 3 patterns, 2 author pages, 1 page
//! ```
//!
//! ## Query
//!
//! ```text
//! Filters: type:networking
//! 001 Sidecar
//!     Tags: Networking, Advanced
//!     Authors: Jane Doe, Alex Smith
//!
//! 1 of 3 patterns
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O beyond existence checks, no side effects.

use crate::generate::GenerateReport;
use crate::search::SEARCH_INDEX_FILE;
use crate::sitemap::SITEMAP_FILE;
use crate::store::{LabelledContent, UnresolvedReference};
use crate::types::{Filter, Manifest};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional marker.
///
/// ```text
/// 001 Sidecar
/// 002 github (link)
/// ```
fn entity_header(index: usize, title: &str, marker: Option<&str>) -> String {
    match marker {
        Some(m) => format!("{} {} ({})", format_index(index), title, m),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

/// Labels of an item's known tags, unknown dimensions as raw `key:value`.
fn tag_labels(item: &LabelledContent<'_>) -> Vec<String> {
    item.tags
        .iter()
        .zip(&item.content.filter_dimensions)
        .map(|(tag, dim)| match tag {
            Some(filter) => filter.label.clone(),
            None => format!("{}:{} (unknown)", dim.key, dim.value),
        })
        .collect()
}

fn author_names(item: &LabelledContent<'_>) -> Vec<String> {
    item.author_details
        .iter()
        .zip(&item.content.authors)
        .map(|(author, id)| match author {
            Some(a) => a.name.clone(),
            None => format!("{id} (unknown)"),
        })
        .collect()
}

// ============================================================================
// Scan output
// ============================================================================

/// Format scan output as an inventory of patterns, catalog data and pages.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Patterns".to_string());
    for (i, pattern) in manifest.patterns.iter().enumerate() {
        let meta = &pattern.meta;
        lines.push(entity_header(i + 1, &meta.title, None));
        lines.push(format!("{}Source: {}", indent(1), pattern.source_path));
        if !meta.filter_dimensions.is_empty() {
            let dims: Vec<String> = meta
                .filter_dimensions
                .iter()
                .map(|d| format!("{}:{}", d.key, d.value))
                .collect();
            lines.push(format!("{}Dimensions: {}", indent(1), dims.join(" ")));
        }
        if !meta.authors.is_empty() {
            lines.push(format!("{}Authors: {}", indent(1), meta.authors.join(", ")));
        }
        let desc = truncate_desc(meta.description.trim(), 60);
        if !desc.is_empty() {
            lines.push(format!("{}{}", indent(1), desc));
        }
    }

    lines.push(String::new());
    lines.push("Catalog".to_string());
    let data = &manifest.data;
    lines.push(format!(
        "{}{} in {}",
        indent(1),
        plural(data.filters.len(), "filter", "filters"),
        plural(data.filter_groups.len(), "group", "groups")
    ));
    lines.push(format!(
        "{}{}, {}",
        indent(1),
        plural(data.authors.len(), "author", "authors"),
        plural(data.team.len(), "team member", "team members")
    ));

    if !manifest.pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, page) in manifest.pages.iter().enumerate() {
            let marker = page.is_link.then_some("link");
            lines.push(format!("{}{}", indent(1), entity_header(i + 1, &page.title, marker)));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    }
    if source_root.join(&manifest.config.assets_dir).is_dir() {
        lines.push(format!("{}{}/", indent(1), manifest.config.assets_dir));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate output
// ============================================================================

/// Format generate output from the run's report.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = vec!["Catalog → index.html".to_string()];

    lines.push(format!(
        "Patterns → pattern/ ({})",
        plural(report.patterns, "page", "pages")
    ));
    if report.author_pages > 0 {
        lines.push(format!(
            "Authors → author/ ({})",
            plural(report.author_pages, "page", "pages")
        ));
    }
    if report.team_page {
        lines.push("Team → team.html".to_string());
    }

    lines.push("Assets".to_string());
    lines.push(format!("{}{}", indent(1), report.stylesheet));
    lines.push(format!("{}{}", indent(1), report.script));
    if report.assets_copied > 0 {
        lines.push(format!(
            "{}{} copied",
            indent(1),
            plural(report.assets_copied, "static file", "static files")
        ));
    }

    match report.search_entries {
        Some(n) => lines.push(format!(
            "Search → {} ({})",
            SEARCH_INDEX_FILE,
            plural(n, "entry", "entries")
        )),
        None => lines.push("Search → disabled".to_string()),
    }
    match report.sitemap_urls {
        Some(n) => lines.push(format!("Sitemap → {} ({})", SITEMAP_FILE, plural(n, "URL", "URLs"))),
        None => lines.push("Sitemap → skipped".to_string()),
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}",
        plural(report.patterns, "pattern", "patterns"),
        plural(report.author_pages, "author page", "author pages"),
        plural(report.pages, "page", "pages")
    ));
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the reference check: catalog counts and every unresolved reference.
pub fn format_check_output(manifest: &Manifest, unresolved: &[UnresolvedReference]) -> Vec<String> {
    let mut lines = vec![format!(
        "Checked {}, {}, {}",
        plural(manifest.patterns.len(), "pattern", "patterns"),
        plural(manifest.data.filters.len(), "filter", "filters"),
        plural(manifest.data.authors.len(), "author", "authors")
    )];

    if unresolved.is_empty() {
        lines.push("No unresolved references".to_string());
    } else {
        lines.push(format!("Unresolved references ({})", unresolved.len()));
        for reference in unresolved {
            lines.push(format!("{}{}", indent(1), reference));
        }
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(manifest: &Manifest, unresolved: &[UnresolvedReference]) {
    for line in format_check_output(manifest, unresolved) {
        println!("{}", line);
    }
}

// ============================================================================
// Query output
// ============================================================================

/// Format query results.
///
/// `selection` describes what was asked for (checked filters or an author)
/// and `total` is the catalog size the results are drawn from.
pub fn format_query_output(
    selection: &str,
    items: &[LabelledContent<'_>],
    total: usize,
) -> Vec<String> {
    let mut lines = vec![selection.to_string()];

    for (i, item) in items.iter().enumerate() {
        lines.push(entity_header(i + 1, &item.content.title, None));
        let tags = tag_labels(item);
        if !tags.is_empty() {
            lines.push(format!("{}Tags: {}", indent(1), tags.join(", ")));
        }
        let authors = author_names(item);
        if !authors.is_empty() {
            lines.push(format!("{}Authors: {}", indent(1), authors.join(", ")));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{} of {}",
        items.len(),
        plural(total, "pattern", "patterns")
    ));
    lines
}

/// Describe the checked filters of a query.
pub fn filter_selection(checked: &[&Filter]) -> String {
    if checked.is_empty() {
        return "Filters: none".to_string();
    }
    let keys: Vec<String> = checked
        .iter()
        .map(|f| format!("{}:{}", f.key, f.value))
        .collect();
    format!("Filters: {}", keys.join(" "))
}

/// Print query output to stdout.
pub fn print_query_output(selection: &str, items: &[LabelledContent<'_>], total: usize) {
    for line in format_query_output(selection, items, total) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan;
    use crate::test_helpers::{content, sample_store, setup_fixtures};

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn truncate_desc_short() {
        assert_eq!(truncate_desc("Short text", 40), "Short text");
    }

    #[test]
    fn truncate_desc_exact() {
        let text = "a".repeat(40);
        assert_eq!(truncate_desc(&text, 40), text);
    }

    #[test]
    fn truncate_desc_long() {
        let text = "a".repeat(50);
        let expected = format!("{}...", "a".repeat(40));
        assert_eq!(truncate_desc(&text, 40), expected);
    }

    #[test]
    fn truncate_desc_multibyte() {
        assert_eq!(truncate_desc("ééééé", 2), "éé...");
    }

    #[test]
    fn format_index_padding() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn entity_header_with_marker() {
        assert_eq!(entity_header(2, "github", Some("link")), "002 github (link)");
        assert_eq!(entity_header(1, "Sidecar", None), "001 Sidecar");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "page", "pages"), "1 page");
        assert_eq!(plural(0, "page", "pages"), "0 pages");
    }

    // =========================================================================
    // Scan
    // =========================================================================

    #[test]
    fn scan_output_lists_fixture_patterns() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let lines = format_scan_output(&manifest, tmp.path());

        assert_eq!(lines[0], "Patterns");
        assert_eq!(lines[1], "001 Blue/Green Deployment");
        assert_eq!(lines[2], "    Source: pattern/blue-green.md");
        assert!(lines.contains(&"    5 filters in 2 groups".to_string()));
        assert!(lines.contains(&"    2 authors, 2 team members".to_string()));
        assert!(lines.contains(&"    002 github (link)".to_string()));
        assert!(lines.contains(&"    config.toml".to_string()));
        assert!(lines.contains(&"    public/".to_string()));
    }

    // =========================================================================
    // Generate
    // =========================================================================

    #[test]
    fn generate_output_summarizes_report() {
        let report = GenerateReport {
            patterns: 3,
            author_pages: 1,
            team_page: true,
            pages: 1,
            stylesheet: "assets/style.abc.css".to_string(),
            script: "assets/filter.def.js".to_string(),
            search_entries: Some(4),
            sitemap_urls: None,
            assets_copied: 1,
            ..Default::default()
        };
        let lines = format_generate_output(&report);
        assert_eq!(lines[0], "Catalog → index.html");
        assert!(lines.contains(&"Patterns → pattern/ (3 pages)".to_string()));
        assert!(lines.contains(&"Authors → author/ (1 page)".to_string()));
        assert!(lines.contains(&"Team → team.html".to_string()));
        assert!(lines.contains(&"    1 static file copied".to_string()));
        assert!(lines.contains(&"Search → search-index.json (4 entries)".to_string()));
        assert!(lines.contains(&"Sitemap → skipped".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "Generated 3 patterns, 1 author page, 1 page"
        );
    }

    // =========================================================================
    // Check
    // =========================================================================

    #[test]
    fn check_output_lists_references() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let unresolved = vec![UnresolvedReference::Author {
            content_id: "blue-green".to_string(),
            author_id: "ghost".to_string(),
        }];
        let lines = format_check_output(&manifest, &unresolved);
        assert_eq!(lines[0], "Checked 3 patterns, 5 filters, 2 authors");
        assert_eq!(lines[1], "Unresolved references (1)");
        assert_eq!(lines[2], "    blue-green: unknown author ghost");
    }

    #[test]
    fn check_output_clean() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let lines = format_check_output(&manifest, &[]);
        assert_eq!(lines[1], "No unresolved references");
    }

    // =========================================================================
    // Query
    // =========================================================================

    #[test]
    fn query_output_lists_matches() {
        let store = sample_store();
        let items = store.labelled_filtered_content();
        let selection = filter_selection(&store.checked_filters());
        let lines = format_query_output(&selection, &items, store.content().len());

        assert_eq!(lines[0], "Filters: lang:go tier:prod");
        assert_eq!(lines[1], "001 A");
        assert_eq!(lines[2], "    Tags: go, prod");
        assert_eq!(lines[3], "    Authors: Ada");
        assert_eq!(lines.last().unwrap(), "1 of 3 patterns");
    }

    #[test]
    fn query_output_marks_unknown_references() {
        let store = crate::store::CatalogStore::new(
            vec![content("x", &[("lang", "cobol")], &["ghost"])],
            Default::default(),
        );
        let items = store.labelled_content();
        let lines = format_query_output("Filters: none", &items, 1);
        assert_eq!(lines[2], "    Tags: lang:cobol (unknown)");
        assert_eq!(lines[3], "    Authors: ghost (unknown)");
    }

    #[test]
    fn filter_selection_none() {
        assert_eq!(filter_selection(&[]), "Filters: none");
    }
}
