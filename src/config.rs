//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by the user's `config.toml` in the site root.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "Pattern Library"
//! description = "A catalog of patterns"
//! base_url = ""             # Absolute site URL; required for sitemap.xml
//! clean_urls = true         # Link to /pattern/foo instead of /pattern/foo.html
//! data_dir = "data"         # filters.yml, filter-groups.yml, authors.yml, team.yml
//! content_dir = "pattern"   # Pattern pages
//! assets_dir = "public"     # Copied verbatim to the output root
//!
//! [search]
//! enabled = true
//! max_text_chars = 5000     # Page text kept per search entry
//!
//! [sitemap]
//! enabled = true
//! changefreq = "weekly"
//!
//! [markdown]
//! code_class_prefix = "language-"
//! svg_fill_variable = "var(--bs-emphasis-color)"
//! svg_margin_style = "margin-top: 20px; margin-bottom: 20px;"
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#1b1b1f"
//! text_muted = "#67676c"
//! border = "#e2e2e3"
//! link = "#3451b2"
//! link_hover = "#3a5ccc"
//! accent = "#f4f4f6"
//!
//! [colors.dark]
//! background = "#1b1b1f"
//! text = "#dfdfd6"
//! text_muted = "#98989f"
//! border = "#3c3f44"
//! link = "#a8b1ff"
//! link_hover = "#c8abfa"
//! accent = "#202127"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! base_url = "https://patterns.example.com"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title shown in the header and `<title>`.
    pub title: String,
    /// One-line site description, used on the catalog page.
    pub description: String,
    /// Absolute URL the site is served from, without trailing slash.
    pub base_url: String,
    /// Emit extension-less links (`/pattern/foo`).
    pub clean_urls: bool,
    /// Directory holding the catalog YAML files, relative to the site root.
    pub data_dir: String,
    /// Directory holding pattern pages, relative to the site root.
    pub content_dir: String,
    /// Static files copied verbatim to the output root.
    pub assets_dir: String,
    pub search: SearchConfig,
    pub sitemap: SitemapConfig,
    pub markdown: MarkdownConfig,
    pub colors: ColorConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Pattern Library".to_string(),
            description: "A catalog of patterns".to_string(),
            base_url: String::new(),
            clean_urls: true,
            data_dir: "data".to_string(),
            content_dir: "pattern".to_string(),
            assets_dir: "public".to_string(),
            search: SearchConfig::default(),
            sitemap: SitemapConfig::default(),
            markdown: MarkdownConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

const CHANGEFREQ_VALUES: &[&str] = &[
    "always", "hourly", "daily", "weekly", "monthly", "yearly", "never",
];

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.is_empty()
            && !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(
                "base_url must start with http:// or https://".into(),
            ));
        }
        if !CHANGEFREQ_VALUES.contains(&self.sitemap.changefreq.as_str()) {
            return Err(ConfigError::Validation(format!(
                "sitemap.changefreq must be one of {}",
                CHANGEFREQ_VALUES.join(", ")
            )));
        }
        if self.search.max_text_chars == 0 {
            return Err(ConfigError::Validation(
                "search.max_text_chars must be greater than 0".into(),
            ));
        }
        for (name, dir) in [
            ("data_dir", &self.data_dir),
            ("content_dir", &self.content_dir),
            ("assets_dir", &self.assets_dir),
        ] {
            if dir.is_empty() || Path::new(dir).is_absolute() {
                return Err(ConfigError::Validation(format!(
                    "{name} must be a non-empty relative path"
                )));
            }
        }
        Ok(())
    }

    /// `base_url` with any trailing slash removed.
    pub fn site_root_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Search index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Write `search-index.json`.
    pub enabled: bool,
    /// Maximum characters of page text per search entry.
    pub max_text_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_text_chars: 5000,
        }
    }
}

/// Sitemap settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    /// Write `sitemap.xml` (also requires `base_url`).
    pub enabled: bool,
    /// `<changefreq>` for every URL.
    pub changefreq: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            changefreq: "weekly".to_string(),
        }
    }
}

/// Markdown rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    /// Class prefix for fenced code blocks (`language-rust`).
    pub code_class_prefix: String,
    /// Replacement for solid black fills in embedded SVGs.
    pub svg_fill_variable: String,
    /// Inline style set on embedded `<svg>` roots.
    pub svg_margin_style: String,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            code_class_prefix: "language-".to_string(),
            svg_fill_variable: "var(--bs-emphasis-color)".to_string(),
            svg_margin_style: "margin-top: 20px; margin-bottom: 20px;".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Muted/secondary text color (descriptions, dates, filter counts).
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
    /// Card and sidebar background.
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1b1b1f".to_string(),
            text_muted: "#67676c".to_string(),
            border: "#e2e2e3".to_string(),
            link: "#3451b2".to_string(),
            link_hover: "#3a5ccc".to_string(),
            accent: "#f4f4f6".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#1b1b1f".to_string(),
            text: "#dfdfd6".to_string(),
            text_muted: "#98989f".to_string(),
            border: "#3c3f44".to_string(),
            link: "#a8b1ff".to_string(),
            link_hover: "#c8abfa".to_string(),
            accent: "#202127".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from the site root as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the site root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Patternbook Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Site title shown in the header and page titles.
title = "Pattern Library"

# One-line description shown on the catalog page.
description = "A catalog of patterns"

# Absolute URL the site is served from. Required for sitemap.xml.
base_url = ""

# Link to /pattern/foo instead of /pattern/foo.html.
clean_urls = true

# Directories, relative to the site root.
data_dir = "data"        # filters.yml, filter-groups.yml, authors.yml, team.yml
content_dir = "pattern"  # pattern pages: <id>/index.md or <id>.md
assets_dir = "public"    # copied verbatim to the output root

# ---------------------------------------------------------------------------
# Search index (search-index.json)
# ---------------------------------------------------------------------------
[search]
enabled = true
# Maximum characters of page text kept per entry.
max_text_chars = 5000

# ---------------------------------------------------------------------------
# Sitemap (sitemap.xml)
# ---------------------------------------------------------------------------
[sitemap]
enabled = true
# One of: always, hourly, daily, weekly, monthly, yearly, never
changefreq = "weekly"

# ---------------------------------------------------------------------------
# Markdown rendering
# ---------------------------------------------------------------------------
[markdown]
# Class prefix for fenced code blocks: ```rust -> class="language-rust"
code_class_prefix = "language-"
# Solid black fills in embedded SVGs are replaced with this value so
# diagrams follow light/dark mode.
svg_fill_variable = "var(--bs-emphasis-color)"
# Inline style set on every embedded <svg>.
svg_margin_style = "margin-top: 20px; margin-bottom: 20px;"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#1b1b1f"
text_muted = "#67676c"
border = "#e2e2e3"
link = "#3451b2"
link_hover = "#3a5ccc"
accent = "#f4f4f6"       # Cards and sidebar

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#1b1b1f"
text = "#dfdfd6"
text_muted = "#98989f"
border = "#3c3f44"
link = "#a8b1ff"
link_hover = "#c8abfa"
accent = "#202127"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    fn vars(scheme: &ColorScheme, indent: &str) -> String {
        [
            ("--color-bg", &scheme.background),
            ("--color-text", &scheme.text),
            ("--color-text-muted", &scheme.text_muted),
            ("--color-border", &scheme.border),
            ("--color-link", &scheme.link),
            ("--color-link-hover", &scheme.link_hover),
            ("--color-accent", &scheme.accent),
        ]
        .iter()
        .map(|(name, value)| format!("{indent}{name}: {value};"))
        .collect::<Vec<_>>()
        .join("\n")
    }

    format!(
        ":root {{\n{light}\n}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{dark}\n    }}\n}}",
        light = vars(&colors.light, "    "),
        dark = vars(&colors.dark, "        "),
    )
}
