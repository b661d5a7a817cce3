//! HTML site generation.
//!
//! Stage 2 of the patternbook build pipeline. Takes the scan manifest, loads
//! it into a [`CatalogStore`], and renders the final static site from the
//! store's derived views.
//!
//! ## Generated Pages
//!
//! - **Catalog** (`/index.html`): filter sidebar from [`CatalogStore::filter_list`],
//!   one card per pattern from [`CatalogStore::labelled_content`]. Cards that
//!   don't match the initially checked filters are rendered `hidden`.
//! - **Pattern pages** (`/pattern/{id}.html`): rendered markdown with tags,
//!   byline and an outline of the page's headings
//! - **Author pages** (`/author/{id}.html`): one per known author, from
//!   [`CatalogStore::labelled_content_by_author`]
//! - **Team page** (`/team.html`): only when `team.yml` lists anyone
//! - **Pages** (`/{slug}.html`): top-level markdown pages
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── team.html
//! ├── about.html
//! ├── pattern/
//! │   └── sidecar.html
//! ├── author/
//! │   └── jdoe.html
//! ├── assets/
//! │   ├── style.3f2a9c1e.css     # Fingerprinted, safe to cache forever
//! │   └── filter.8b0d44f2.js
//! ├── search-index.json
//! ├── sitemap.xml
//! └── robots.txt                 # Copied from assets_dir
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Base styles (colors injected from config)
//! - `static/filter.js`: Client-side filtering with the same AND-across,
//!   OR-within semantics as the store
//!
//! Both are written under a content hash so a deploy never serves stale
//! styles against new markup.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. Markdown is
//! rendered in parallel with rayon before any page is written.

use crate::config::{self, SiteConfig};
use crate::markdown::{MarkdownRenderer, OutlineHeader, RenderedMarkdown};
use crate::naming::{author_url, output_file, page_url, pattern_url};
use crate::search::{self, SEARCH_INDEX_FILE, SearchIndex};
use crate::sitemap::{self, SITEMAP_FILE, SitemapError, SitemapUrl};
use crate::store::{CatalogStore, LabelledContent};
use crate::types::{Author, Filter, Manifest, Page};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),
}

/// What a generate run produced, for CLI output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    pub patterns: usize,
    pub author_pages: usize,
    pub team_page: bool,
    pub pages: usize,
    /// Stylesheet path relative to the output root.
    pub stylesheet: String,
    pub script: String,
    pub search_entries: Option<usize>,
    pub sitemap_urls: Option<usize>,
    pub assets_copied: usize,
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS_STATIC: &str = include_str!("../static/filter.js");
const ASSETS_DIR: &str = "assets";

/// Fingerprinted asset URLs, site-absolute.
#[derive(Debug, Clone)]
struct Assets {
    stylesheet: String,
    script: String,
}

/// Everything the page renderers share.
struct SiteContext<'a> {
    config: &'a SiteConfig,
    assets: &'a Assets,
    nav_pages: Vec<&'a Page>,
    has_team: bool,
}

/// Read the scan manifest from `manifest_path` and generate the site.
pub fn generate(
    manifest_path: &Path,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    generate_site(&manifest, source_dir, output_dir)
}

/// Generate the site from an in-memory manifest.
///
/// `source_dir` is the site root: embedded SVGs and `assets_dir` are resolved
/// against it.
pub fn generate_site(
    manifest: &Manifest,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let config = &manifest.config;
    let store = CatalogStore::new(manifest.content(), manifest.data.clone());

    fs::create_dir_all(output_dir)?;
    let assets = write_assets(config, output_dir)?;

    let renderer = MarkdownRenderer::new(source_dir, &config.markdown);
    let rendered_patterns: HashMap<&str, RenderedMarkdown> = manifest
        .patterns
        .par_iter()
        .map(|p| (p.meta.id.as_str(), renderer.render(&p.body)))
        .collect();
    let content_pages: Vec<(&Page, RenderedMarkdown)> = manifest
        .pages
        .iter()
        .filter(|p| !p.is_link)
        .map(|p| (p, renderer.render(&p.body)))
        .collect();
    debug!(
        patterns = rendered_patterns.len(),
        pages = content_pages.len(),
        "markdown rendered"
    );

    let site = SiteContext {
        config,
        assets: &assets,
        nav_pages: manifest.pages.iter().filter(|p| p.in_nav).collect(),
        has_team: !store.team().is_empty(),
    };
    let empty = RenderedMarkdown::default();

    write_page(output_dir, "index", render_index(&store, &site))?;

    let labelled = store.labelled_content();
    for item in &labelled {
        let rendered = rendered_patterns
            .get(item.content.id.as_str())
            .unwrap_or(&empty);
        write_page(
            output_dir,
            &format!("pattern/{}", item.content.id),
            render_pattern_page(item, rendered, &site),
        )?;
    }
    info!(count = labelled.len(), "pattern pages generated");

    let mut author_pages = Vec::new();
    for (id, items) in store.labelled_content_by_author() {
        let Some(author) = store.find_author(id) else {
            debug!(author = %id, "no author record; page skipped");
            continue;
        };
        write_page(
            output_dir,
            &format!("author/{id}"),
            render_author_page(author, &items, &site),
        )?;
        author_pages.push(id);
    }

    if site.has_team {
        write_page(output_dir, "team", render_team_page(store.team(), &site))?;
    }

    for (page, rendered) in &content_pages {
        write_page(output_dir, &page.slug, render_content_page(page, rendered, &site))?;
    }

    let search_entries = if config.search.enabled {
        let mut entries: Vec<_> = labelled
            .iter()
            .map(|item| {
                let rendered = rendered_patterns
                    .get(item.content.id.as_str())
                    .unwrap_or(&empty);
                search::pattern_entry(item, rendered, config)
            })
            .collect();
        entries.extend(
            content_pages
                .iter()
                .filter_map(|(page, rendered)| search::page_entry(page, rendered, config)),
        );
        let index = SearchIndex::new(entries);
        fs::write(output_dir.join(SEARCH_INDEX_FILE), index.to_json()?)?;
        Some(index.entries.len())
    } else {
        debug!("search index disabled");
        None
    };

    let sitemap_urls = if !config.sitemap.enabled {
        warn!("sitemap disabled; sitemap.xml not written");
        None
    } else if config.base_url.is_empty() {
        warn!("base_url is not set; sitemap.xml not written");
        None
    } else {
        let mut urls = vec![SitemapUrl::new("/")];
        urls.extend(labelled.iter().map(|item| {
            SitemapUrl::new(pattern_url(&item.content.id, config.clean_urls))
                .with_lastmod(item.content.date.clone())
        }));
        urls.extend(
            author_pages
                .iter()
                .map(|id| SitemapUrl::new(author_url(id, config.clean_urls))),
        );
        if site.has_team {
            urls.push(SitemapUrl::new(page_url("team", config.clean_urls)));
        }
        urls.extend(
            content_pages
                .iter()
                .map(|(page, _)| SitemapUrl::new(page_url(&page.slug, config.clean_urls))),
        );
        let xml = sitemap::build_sitemap(
            config.site_root_url(),
            &urls,
            &config.sitemap.changefreq,
        )?;
        fs::write(output_dir.join(SITEMAP_FILE), xml)?;
        Some(urls.len())
    };

    let assets_source = source_dir.join(&config.assets_dir);
    let assets_copied = if assets_source.is_dir() {
        copy_dir_recursive(&assets_source, output_dir)?
    } else {
        0
    };

    info!(output = %output_dir.display(), "site generated");
    Ok(GenerateReport {
        output_dir: output_dir.to_path_buf(),
        patterns: labelled.len(),
        author_pages: author_pages.len(),
        team_page: site.has_team,
        pages: content_pages.len(),
        stylesheet: assets.stylesheet.trim_start_matches('/').to_string(),
        script: assets.script.trim_start_matches('/').to_string(),
        search_entries,
        sitemap_urls,
        assets_copied,
    })
}

/// Short content hash used in asset file names.
fn fingerprint(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
        .chars()
        .take(8)
        .collect()
}

fn write_assets(config: &SiteConfig, output_dir: &Path) -> Result<Assets, GenerateError> {
    let color_css = config::generate_color_css(&config.colors);
    let css = format!("{}\n\n{}", color_css, CSS_STATIC);

    let assets_dir = output_dir.join(ASSETS_DIR);
    fs::create_dir_all(&assets_dir)?;

    let css_name = format!("style.{}.css", fingerprint(&css));
    let js_name = format!("filter.{}.js", fingerprint(JS_STATIC));
    fs::write(assets_dir.join(&css_name), &css)?;
    fs::write(assets_dir.join(&js_name), JS_STATIC)?;

    Ok(Assets {
        stylesheet: format!("/{ASSETS_DIR}/{css_name}"),
        script: format!("/{ASSETS_DIR}/{js_name}"),
    })
}

fn write_page(output_dir: &Path, stem: &str, markup: Markup) -> Result<(), GenerateError> {
    let path = output_dir.join(output_file(stem));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, markup.into_string())?;
    debug!(path = %path.display(), "wrote page");
    Ok(())
}

/// Copy a directory tree, returning the number of files copied.
fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<usize> {
    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copied += copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, current: &str, site: &SiteContext<'_>, content: Markup) -> Markup {
    let full_title = if title == site.config.title {
        title.to_string()
    } else {
        format!("{} | {}", title, site.config.title)
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (full_title) }
                @if !site.config.description.is_empty() {
                    meta name="description" content=(site.config.description);
                }
                link rel="stylesheet" href=(site.assets.stylesheet);
            }
            body {
                (site_header(site, current))
                (content)
            }
        }
    }
}

fn current_class(is_current: bool) -> Option<&'static str> {
    is_current.then_some("current")
}

/// Renders the site header with the title link and navigation
fn site_header(site: &SiteContext<'_>, current: &str) -> Markup {
    let clean = site.config.clean_urls;
    html! {
        header.site-header {
            a.site-title href="/" { (site.config.title) }
            nav.site-nav {
                ul {
                    li class=[current_class(current == "index")] {
                        a href="/" { "Patterns" }
                    }
                    @if site.has_team {
                        li class=[current_class(current == "team")] {
                            a href=(page_url("team", clean)) { "Team" }
                        }
                    }
                    @for page in &site.nav_pages {
                        @if page.is_link {
                            li {
                                a href=(page.body.trim()) target="_blank" rel="noopener" {
                                    (page.link_title)
                                }
                            }
                        } @else {
                            li class=[current_class(current == page.slug)] {
                                a href=(page_url(&page.slug, clean)) { (page.link_title) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn tag_style(filter: &Filter) -> Option<String> {
    (!filter.color.is_empty()).then(|| format!("--tag-color: {}", filter.color))
}

/// Renders the resolved tags of a content item; unknown dimensions are left out.
fn render_tags(item: &LabelledContent<'_>) -> Markup {
    let tags: Vec<&Filter> = item.known_tags().collect();
    html! {
        @if !tags.is_empty() {
            ul.tags {
                @for tag in &tags {
                    li.tag style=[tag_style(tag)] { (tag.label) }
                }
            }
        }
    }
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

fn avatar(person: &Author) -> Markup {
    html! {
        @if person.image.is_empty() {
            span.avatar-initials { (initials(&person.name)) }
        } @else {
            img src=(person.image) alt=(person.name) loading="lazy";
        }
    }
}

/// Renders a catalog card. The card's dimensions are embedded as JSON for
/// the client-side filter.
fn render_card(item: &LabelledContent<'_>, site: &SiteContext<'_>, hidden: bool) -> Markup {
    let clean = site.config.clean_urls;
    let content = item.content;
    let dimensions =
        serde_json::to_string(&content.filter_dimensions).unwrap_or_else(|_| "[]".to_string());
    html! {
        article.pattern-card data-id=(content.id) data-dimensions=(dimensions) hidden[hidden] {
            a href=(pattern_url(&content.id, clean)) {
                h2 { (content.title) }
            }
            @if !content.description.is_empty() {
                p.description { (content.description) }
            }
            (render_tags(item))
            @if let Some(author) = item.primary_author() {
                a.author-thumb href=(author_url(&author.id, clean)) {
                    (avatar(author))
                    span { (author.name) }
                }
            }
        }
    }
}

fn render_toc(outline: &[OutlineHeader]) -> Markup {
    html! {
        nav.toc {
            h2 { "On this page" }
            ul {
                @for header in outline {
                    li class={ "level-" (header.level) } {
                        a href=(header.link) { (header.title) }
                    }
                }
            }
        }
    }
}

fn person_card(person: &Author) -> Markup {
    html! {
        div.person-card {
            (avatar(person))
            div {
                h2.person-name { (person.name) }
                @if !person.title.is_empty() {
                    p.person-title { (person.title) }
                }
                @if !person.links.is_empty() {
                    ul.person-links {
                        @for link in &person.links {
                            li {
                                a href=(link.uri) rel="noopener" { (link.link_type.label()) }
                            }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the catalog page with the filter sidebar and card grid
fn render_index(store: &CatalogStore, site: &SiteContext<'_>) -> Markup {
    let visible: HashSet<&str> = store
        .filtered_content()
        .into_iter()
        .map(|c| c.id.as_str())
        .collect();
    let items = store.labelled_content();
    let groups = store.filter_groups_by_key();
    let ungrouped: Vec<&Filter> = store
        .checked_filters()
        .into_iter()
        .filter(|f| !groups.contains_key(f.key.as_str()))
        .collect();

    let content = html! {
        main.catalog {
            aside.filter-sidebar {
                form id="filters" {
                    @for section in store.filter_list() {
                        fieldset.filter-group data-key=(section.key) {
                            legend { (section.label) }
                            @for filter in &section.filters {
                                label.filter-option {
                                    input type="checkbox" name=(filter.key) value=(filter.value) checked[filter.checked];
                                    span.filter-swatch style=[tag_style(filter)] {}
                                    (filter.label)
                                }
                            }
                        }
                    }
                    // Checked filters with no group have no visible box but
                    // still constrain the results, here and in filter.js.
                    @if !ungrouped.is_empty() {
                        div.ungrouped-filters hidden {
                            @for filter in &ungrouped {
                                input type="checkbox" name=(filter.key) value=(filter.value) checked;
                            }
                        }
                    }
                    button id="reset-filters" type="button" { "Reset filters" }
                }
            }
            section.catalog-results {
                @if !site.config.description.is_empty() {
                    p.site-description { (site.config.description) }
                }
                p.result-count {
                    span id="result-count" { (visible.len()) }
                    " of " (items.len()) " patterns"
                }
                div.card-grid {
                    @for item in &items {
                        (render_card(item, site, !visible.contains(item.content.id.as_str())))
                    }
                }
            }
        }
        script src=(site.assets.script) defer {}
    };

    base_document(&site.config.title, "index", site, content)
}

/// Renders a pattern page
fn render_pattern_page(
    item: &LabelledContent<'_>,
    rendered: &RenderedMarkdown,
    site: &SiteContext<'_>,
) -> Markup {
    let clean = site.config.clean_urls;
    let content = item.content;
    let authors: Vec<&Author> = item.known_authors().collect();

    let body = html! {
        main.pattern-page {
            article.pattern {
                header.pattern-header {
                    h1 { (content.title) }
                    @if !content.description.is_empty() {
                        p.description { (content.description) }
                    }
                    (render_tags(item))
                    @if !authors.is_empty() || content.date.is_some() {
                        p.byline {
                            @if !authors.is_empty() {
                                "By "
                                @for (idx, author) in authors.iter().enumerate() {
                                    @if idx > 0 { ", " }
                                    a href=(author_url(&author.id, clean)) { (author.name) }
                                }
                            }
                            @if let Some(date) = &content.date {
                                " "
                                time datetime=(date) { (date) }
                            }
                        }
                    }
                }
                @if !rendered.outline.is_empty() {
                    (render_toc(&rendered.outline))
                }
                div.pattern-body {
                    (PreEscaped(&rendered.html))
                }
            }
        }
    };

    base_document(&content.title, "", site, body)
}

/// Renders an author's page with their patterns
fn render_author_page(
    author: &Author,
    items: &[LabelledContent<'_>],
    site: &SiteContext<'_>,
) -> Markup {
    let content = html! {
        main.author-page {
            (person_card(author))
            h1 { "Patterns by " (author.name) }
            div.card-grid {
                @for item in items {
                    (render_card(item, site, false))
                }
            }
        }
    };

    base_document(&author.name, "", site, content)
}

/// Renders the team page
fn render_team_page(team: &[Author], site: &SiteContext<'_>) -> Markup {
    let content = html! {
        main.team-page {
            h1 { "Team" }
            div.team-grid {
                @for member in team {
                    (person_card(member))
                }
            }
        }
    };

    base_document("Team", "team", site, content)
}

/// Renders a top-level markdown page
fn render_content_page(page: &Page, rendered: &RenderedMarkdown, site: &SiteContext<'_>) -> Markup {
    let content = html! {
        main.content-page {
            article {
                @if !rendered.outline.is_empty() {
                    (render_toc(&rendered.outline))
                }
                (PreEscaped(&rendered.html))
            }
        }
    };

    base_document(&page.title, &page.slug, site, content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CatalogData;
    use crate::test_helpers::{content, filter, read_output, sample_store, setup_fixtures};
    use crate::types::{AuthorLink, LinkType};

    fn test_assets() -> Assets {
        Assets {
            stylesheet: "/assets/style.test.css".to_string(),
            script: "/assets/filter.test.js".to_string(),
        }
    }

    fn site<'a>(config: &'a SiteConfig, assets: &'a Assets) -> SiteContext<'a> {
        SiteContext {
            config,
            assets,
            nav_pages: Vec::new(),
            has_team: false,
        }
    }

    fn link_page() -> Page {
        Page {
            title: "github".to_string(),
            link_title: "github".to_string(),
            slug: "github".to_string(),
            body: "https://github.com/example\n".to_string(),
            in_nav: true,
            sort_key: 20,
            is_link: true,
        }
    }

    // =========================================================================
    // Components
    // =========================================================================

    #[test]
    fn base_document_includes_doctype_and_stylesheet() {
        let config = SiteConfig::default();
        let assets = test_assets();
        let doc = base_document("Test", "", &site(&config, &assets), html! { p { "x" } })
            .into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains(r#"href="/assets/style.test.css""#));
        assert!(doc.contains("<title>Test | Pattern Library</title>"));
    }

    #[test]
    fn header_lists_nav_pages_and_team() {
        let config = SiteConfig::default();
        let assets = test_assets();
        let github = link_page();
        let mut ctx = site(&config, &assets);
        ctx.nav_pages = vec![&github];
        ctx.has_team = true;

        let header = site_header(&ctx, "team").into_string();
        assert!(header.contains(r#"href="https://github.com/example""#));
        assert!(header.contains(r#"target="_blank""#));
        assert!(header.contains(r#"<li class="current"><a href="/team">Team</a>"#));
    }

    #[test]
    fn header_hides_team_when_empty() {
        let config = SiteConfig::default();
        let assets = test_assets();
        let header = site_header(&site(&config, &assets), "index").into_string();
        assert!(!header.contains("Team"));
    }

    #[test]
    fn initials_from_name() {
        assert_eq!(initials("Jane Doe"), "JD");
        assert_eq!(initials("ada"), "A");
        assert_eq!(initials("Mary Ann Evans"), "MA");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn person_card_shows_links() {
        let person = Author {
            id: "jdoe".to_string(),
            name: "Jane Doe".to_string(),
            title: "Engineer".to_string(),
            image: String::new(),
            links: vec![AuthorLink {
                link_type: LinkType::Github,
                uri: "https://github.com/jdoe".to_string(),
            }],
        };
        let card = person_card(&person).into_string();
        assert!(card.contains("avatar-initials"));
        assert!(card.contains("Engineer"));
        assert!(card.contains(r#"<a href="https://github.com/jdoe" rel="noopener">GitHub</a>"#));
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        assert_eq!(fingerprint("body {}"), fingerprint("body {}"));
        assert_ne!(fingerprint("a"), fingerprint("b"));
        assert_eq!(fingerprint("x").len(), 8);
    }

    // =========================================================================
    // Page renderers
    // =========================================================================

    #[test]
    fn index_hides_cards_outside_checked_filters() {
        let store = sample_store();
        let config = SiteConfig::default();
        let assets = test_assets();
        let html = render_index(&store, &site(&config, &assets)).into_string();

        // lang:go AND tier:prod is checked: only A matches
        assert!(html.contains(r#"<span id="result-count">1</span>"#));
        assert!(html.contains(r#"data-id="A" data-dimensions="#));
        assert_eq!(html.matches(" hidden").count(), 2);
        assert!(html.contains("Language"));
        assert!(html.contains(r#"<script src="/assets/filter.test.js" defer></script>"#));
    }

    #[test]
    fn index_keeps_checked_filter_without_group_in_form() {
        let store = CatalogStore::new(
            vec![
                content("A", &[("x", "1")], &[]),
                content("B", &[("x", "2")], &[]),
            ],
            CatalogData {
                filters: vec![filter("x", "1", true), filter("x", "2", false)],
                ..Default::default()
            },
        );
        let config = SiteConfig::default();
        let assets = test_assets();
        let html = render_index(&store, &site(&config, &assets)).into_string();

        assert!(html.contains(r#"<span id="result-count">1</span>"#));
        assert!(html.contains(
            r#"<div class="ungrouped-filters" hidden><input type="checkbox" name="x" value="1" checked></div>"#
        ));
        // only the checked one is carried
        assert!(!html.contains(r#"value="2""#));
        assert!(html.contains(r#"data-id="B" data-dimensions="[{&quot;key&quot;:&quot;x&quot;,&quot;value&quot;:&quot;2&quot;}]" hidden"#));
    }

    #[test]
    fn index_shows_everything_after_reset() {
        let mut store = sample_store();
        store.reset_all_filters();
        let config = SiteConfig::default();
        let assets = test_assets();
        let html = render_index(&store, &site(&config, &assets)).into_string();
        assert!(html.contains(r#"<span id="result-count">3</span>"#));
        assert!(!html.contains(" hidden"));
        assert!(!html.contains("checked"));
    }

    #[test]
    fn card_shows_primary_author() {
        let store = sample_store();
        let config = SiteConfig::default();
        let assets = test_assets();
        let items = store.labelled_content();
        let card = render_card(&items[0], &site(&config, &assets), false).into_string();
        assert!(card.contains(r#"href="/author/ada""#));
        assert!(card.contains("<span>Ada</span>"));

        let no_author = render_card(&items[1], &site(&config, &assets), false).into_string();
        assert!(!no_author.contains("author-thumb"));
    }

    #[test]
    fn card_links_follow_clean_urls() {
        let store = sample_store();
        let config = SiteConfig {
            clean_urls: false,
            ..SiteConfig::default()
        };
        let assets = test_assets();
        let items = store.labelled_content();
        let card = render_card(&items[0], &site(&config, &assets), false).into_string();
        assert!(card.contains(r#"href="/pattern/A.html""#));
        assert!(card.contains(r#"href="/author/ada.html""#));
    }

    #[test]
    fn pattern_page_has_toc_and_byline() {
        let store = sample_store();
        let config = SiteConfig::default();
        let assets = test_assets();
        let items = store.labelled_content();
        let rendered = RenderedMarkdown {
            html: "<h2 id=\"usage\">Usage</h2>".to_string(),
            outline: vec![OutlineHeader {
                title: "Usage".to_string(),
                link: "#usage".to_string(),
                level: 2,
            }],
            text: "Usage".to_string(),
        };
        let html = render_pattern_page(&items[0], &rendered, &site(&config, &assets)).into_string();
        assert!(html.contains(r##"<li class="level-2"><a href="#usage">Usage</a></li>"##));
        assert!(html.contains(r#"By <a href="/author/ada">Ada</a>"#));
        assert!(html.contains("<h2 id=\"usage\">Usage</h2>"));
    }

    #[test]
    fn author_page_lists_items() {
        let store = sample_store();
        let config = SiteConfig::default();
        let assets = test_assets();
        let by_author = store.labelled_content_by_author();
        let ada = store.find_author("ada").unwrap();
        let html = render_author_page(ada, &by_author["ada"], &site(&config, &assets)).into_string();
        assert!(html.contains("Patterns by Ada"));
        assert_eq!(html.matches("pattern-card").count(), 1);
    }

    // =========================================================================
    // Whole site
    // =========================================================================

    #[test]
    fn fixture_site_generates_catalog_and_embeds() {
        let tmp = setup_fixtures();
        let manifest = crate::scan::scan(tmp.path()).unwrap();
        let dist = tmp.path().join("dist");
        let report = generate_site(&manifest, tmp.path(), &dist).unwrap();

        let index = read_output(&dist, "index.html");
        assert!(index.contains(r#"<form id="filters">"#));
        assert!(!index.contains("ungrouped-filters"));

        let sidecar = read_output(&dist, "pattern/sidecar.html");
        assert!(sidecar.contains(r#"<figure class="code-embed"><pre><code class="language-json">"#));
        assert!(sidecar.contains("envoyproxy/envoy:v1.29"));
        assert!(sidecar.contains("youtube-nocookie.com/embed/aBcD_1234-x"));
        assert!(sidecar.contains(r##"<a href="#walkthrough">Walkthrough</a>"##));

        assert!(read_output(&dist, &report.stylesheet).contains(".video-embed"));
    }
}
