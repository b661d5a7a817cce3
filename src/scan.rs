//! Filesystem scanning and manifest generation.
//!
//! Stage 1 of the patternbook build pipeline. Walks the site source, parses
//! pattern pages into catalog [`Content`] records, loads the catalog data and
//! configuration, and produces the [`Manifest`] that the generate stage
//! consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! site/                            # Site root
//! ├── config.toml                  # Site configuration (optional)
//! ├── 010-about.md                 # Page (numbered = appears in nav)
//! ├── 020-github.md                # External link page (URL-only content)
//! ├── data/                        # Catalog data, see crate::data
//! │   ├── filters.yml
//! │   ├── filter-groups.yml
//! │   ├── authors.yml
//! │   └── team.yml
//! ├── pattern/                     # Pattern pages
//! │   ├── sidecar/
//! │   │   ├── index.md             # id "sidecar"
//! │   │   └── diagram.svg          # Embedded with `!!! @/pattern/sidecar/diagram.svg`
//! │   ├── log-router.md            # id "log-router"
//! │   └── .drafts/                 # Hidden = skipped
//! └── public/                      # Copied verbatim to the output root
//! ```
//!
//! ## Pattern Front Matter
//!
//! ```yaml
//! ---
//! title: Sidecar
//! description: Run a helper container next to the application.
//! image: /images/sidecar.png
//! filterDimensions:
//!   - { key: type, value: networking }
//! authors: [jdoe]
//! date: 2024-03-01
//! ---
//! ```
//!
//! Every key is optional. Without a `title` the first `# ` heading of the
//! body is used, and failing that the pattern id.
//!
//! ## Ordering
//!
//! Patterns are sorted by id. That order becomes the store's content order,
//! so every derived view is stable across builds.

use crate::config::{self, SiteConfig};
use crate::data::{self, DataError};
use crate::naming::parse_entry_name;
use crate::types::{Content, FilterDimension, Manifest, Page, Pattern};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    #[error("Invalid front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Duplicate pattern id {id}: {first} and {second}")]
    DuplicatePattern {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("Page {path} would overwrite the generated {slug}.html; rename it")]
    ReservedPageName { slug: String, path: PathBuf },
    #[error("Duplicate page {slug}: {first} and {second}")]
    DuplicatePage {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Index file of a directory-style pattern.
const PATTERN_INDEX: &str = "index.md";

/// Page slugs taken by generated pages.
const RESERVED_PAGE_SLUGS: &[&str] = &["index", "team"];

/// Pattern metadata as written in the front matter.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FrontMatter {
    title: Option<String>,
    description: String,
    image: String,
    filter_dimensions: Vec<FilterDimension>,
    authors: Vec<String>,
    date: Option<String>,
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    // Load site config (uses defaults if config.toml doesn't exist)
    let config = config::load_config(root)?;

    let patterns = scan_patterns(root, &config)?;
    let pages = parse_pages(root)?;
    let data = data::load_catalog_data(&root.join(&config.data_dir))?;

    info!(
        patterns = patterns.len(),
        pages = pages.len(),
        filters = data.filters.len(),
        authors = data.authors.len(),
        "scan complete"
    );

    Ok(Manifest {
        patterns,
        pages,
        data,
        config,
    })
}

/// Find and parse every pattern page under the content directory.
fn scan_patterns(root: &Path, config: &SiteConfig) -> Result<Vec<Pattern>, ScanError> {
    let content_dir = root.join(&config.content_dir);
    if !content_dir.is_dir() {
        warn!(path = %content_dir.display(), "content directory not found; no patterns");
        return Ok(Vec::new());
    }

    let mut sources: BTreeMap<String, PathBuf> = BTreeMap::new();
    let walker = WalkDir::new(&content_dir)
        .min_depth(1)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(id) = pattern_id(path, entry.depth()) else {
            continue;
        };
        if let Some(first) = sources.get(&id) {
            return Err(ScanError::DuplicatePattern {
                id,
                first: first.clone(),
                second: path.to_path_buf(),
            });
        }
        sources.insert(id, path.to_path_buf());
    }

    sources
        .into_iter()
        .map(|(id, path)| parse_pattern(id, &path, root))
        .collect()
}

/// `<id>.md` directly in the content dir, or `<id>/index.md` one level down.
fn pattern_id(path: &Path, depth: usize) -> Option<String> {
    let is_markdown = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false);
    if !is_markdown {
        return None;
    }
    match depth {
        1 => path.file_stem().map(|s| s.to_string_lossy().to_string()),
        2 if path.file_name().is_some_and(|n| n == PATTERN_INDEX) => path
            .parent()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().to_string()),
        _ => None,
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn parse_pattern(id: String, path: &Path, root: &Path) -> Result<Pattern, ScanError> {
    let source = fs::read_to_string(path)?;
    let (yaml, body) = split_front_matter(&source);

    let front: FrontMatter = match yaml {
        Some(yaml) if !yaml.trim().is_empty() => {
            serde_yaml::from_str(yaml).map_err(|source| ScanError::FrontMatter {
                path: path.to_path_buf(),
                source,
            })?
        }
        _ => {
            debug!(pattern = %id, "no front matter");
            FrontMatter::default()
        }
    };

    let title = front
        .title
        .filter(|t| !t.trim().is_empty())
        .or_else(|| first_heading(body))
        .unwrap_or_else(|| id.clone());

    let source_path = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/");

    Ok(Pattern {
        meta: Content {
            id,
            title,
            description: front.description,
            image: front.image,
            filter_dimensions: front.filter_dimensions,
            authors: front.authors,
            date: front.date,
        },
        body: body.to_string(),
        source_path,
    })
}

/// Split a leading `---` delimited YAML block from the markdown body.
///
/// Returns `(None, source)` when the document has no complete front matter.
pub fn split_front_matter(source: &str) -> (Option<&str>, &str) {
    let Some(rest) = source.strip_prefix("---") else {
        return (None, source);
    };
    let Some(rest) = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) else {
        return (None, source);
    };
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, source)
}

fn first_heading(markdown: &str) -> Option<String> {
    markdown
        .lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Parse all markdown files in the site root into pages.
///
/// Each `.md` file becomes a page. Numbered files (`NNN-name.md`) appear in
/// navigation sorted by number; unnumbered files are generated but hidden.
/// If a file's only content is a URL, it becomes an external link in the nav.
fn parse_pages(root: &Path) -> Result<Vec<Page>, ScanError> {
    let mut md_files: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("md"))
                    .unwrap_or(false)
        })
        .collect();

    md_files.sort();

    let mut pages = Vec::new();
    let mut sources: BTreeMap<String, PathBuf> = BTreeMap::new();
    for md_path in &md_files {
        let stem = md_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let parsed = parse_entry_name(&stem);
        let (in_nav, sort_key) = match parsed.number {
            Some(num) => (true, num),
            None => (false, u32::MAX),
        };
        let link_title = parsed.display_title;
        let slug = parsed.name;
        if slug.is_empty() {
            warn!(path = %md_path.display(), "page has no name after its number; skipped");
            continue;
        }
        if RESERVED_PAGE_SLUGS
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(&slug))
        {
            return Err(ScanError::ReservedPageName {
                slug,
                path: md_path.clone(),
            });
        }
        if let Some(first) = sources.get(&slug) {
            return Err(ScanError::DuplicatePage {
                slug,
                first: first.clone(),
                second: md_path.clone(),
            });
        }
        sources.insert(slug.clone(), md_path.clone());

        let content = fs::read_to_string(md_path)?;
        let trimmed = content.trim();

        // A page whose only content is a URL becomes an external link
        let is_link = !trimmed.contains('\n')
            && (trimmed.starts_with("http://") || trimmed.starts_with("https://"));

        let title = if is_link {
            link_title.clone()
        } else {
            first_heading(&content).unwrap_or_else(|| link_title.clone())
        };

        pages.push(Page {
            title,
            link_title,
            slug,
            body: content,
            in_nav,
            sort_key,
            is_link,
        });
    }

    pages.sort_by_key(|p| p.sort_key);
    Ok(pages)
}
