//! Clean-up transform for SVG diagrams embedded into pattern pages.
//!
//! Diagrams are usually exported from drawing tools and carry noise that
//! renders badly inline: fixed dimensions, clipping groups, hard-coded black
//! fills that disappear in dark mode. [`optimize_svg`] streams the document
//! through `quick-xml` and rewrites it:
//!
//! - XML declaration, doctype, comments, processing instructions and
//!   whitespace-only text are dropped
//! - `fill="#000000"` on any element becomes [`SvgOptions::fill_variable`]
//! - the root `<svg>` loses `width`/`height` (a `viewBox` is derived from
//!   them when missing) and gets [`SvgOptions::margin_style`] as its `style`
//! - `clip-path` is removed from `<g>` elements

use crate::config::MarkdownConfig;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SvgError {
    #[error("malformed SVG: {0}")]
    Parse(String),
    #[error("failed to write SVG: {0}")]
    Write(String),
    #[error("document has no <svg> root element")]
    NoRoot,
}

#[derive(Debug, Clone)]
pub struct SvgOptions {
    pub fill_variable: String,
    pub margin_style: String,
}

/// Defaults come from [`MarkdownConfig::default`], which owns them.
impl Default for SvgOptions {
    fn default() -> Self {
        Self::from(&MarkdownConfig::default())
    }
}

impl From<&MarkdownConfig> for SvgOptions {
    fn from(config: &MarkdownConfig) -> Self {
        Self {
            fill_variable: config.svg_fill_variable.clone(),
            margin_style: config.svg_margin_style.clone(),
        }
    }
}

const SOLID_BLACK: &str = "#000000";

/// Rewrite an SVG document for inline embedding.
pub fn optimize_svg(source: &str, options: &SvgOptions) -> Result<String, SvgError> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);
    let mut writer = Writer::new(Vec::new());
    let mut seen_root = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| SvgError::Parse(e.to_string()))?;
        let rewritten = match event {
            Event::Start(e) => {
                let is_root = !seen_root && e.name().as_ref() == b"svg";
                seen_root |= is_root;
                Event::Start(rewrite_element(&e, is_root, options)?)
            }
            Event::Empty(e) => {
                let is_root = !seen_root && e.name().as_ref() == b"svg";
                seen_root |= is_root;
                Event::Empty(rewrite_element(&e, is_root, options)?)
            }
            Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_) => continue,
            Event::Eof => break,
            other => other,
        };
        writer
            .write_event(rewritten)
            .map_err(|e| SvgError::Write(e.to_string()))?;
    }

    if !seen_root {
        return Err(SvgError::NoRoot);
    }
    String::from_utf8(writer.into_inner()).map_err(|e| SvgError::Write(e.to_string()))
}

fn rewrite_element(
    element: &BytesStart<'_>,
    is_root: bool,
    options: &SvgOptions,
) -> Result<BytesStart<'static>, SvgError> {
    let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| SvgError::Parse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| SvgError::Parse(e.to_string()))?
            .into_owned();
        attrs.push((key, value));
    }

    if name == "g" {
        attrs.retain(|(k, _)| k != "clip-path");
    }
    for (key, value) in attrs.iter_mut() {
        if key == "fill" && value.eq_ignore_ascii_case(SOLID_BLACK) {
            *value = options.fill_variable.clone();
        }
    }
    if is_root {
        attrs = rewrite_root_attributes(attrs, options);
    }

    let mut rewritten = BytesStart::new(name);
    for (key, value) in &attrs {
        rewritten.push_attribute((key.as_str(), value.as_str()));
    }
    Ok(rewritten)
}

fn rewrite_root_attributes(
    mut attrs: Vec<(String, String)>,
    options: &SvgOptions,
) -> Vec<(String, String)> {
    let width = attr_value(&attrs, "width").and_then(parse_length);
    let height = attr_value(&attrs, "height").and_then(parse_length);
    let has_view_box = attrs.iter().any(|(k, _)| k == "viewBox");

    attrs.retain(|(k, _)| k != "width" && k != "height" && k != "style");
    if !has_view_box && let (Some(w), Some(h)) = (width, height) {
        attrs.push(("viewBox".to_string(), format!("0 0 {w} {h}")));
    }
    attrs.push(("style".to_string(), options.margin_style.clone()));
    attrs
}

fn attr_value<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Parse a plain or `px` length. Percentages and other units yield `None`.
fn parse_length(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
    number.parse::<f64>().ok().filter(|n| n.is_finite() && *n > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optimize(source: &str) -> String {
        optimize_svg(source, &SvgOptions::default()).unwrap()
    }

    #[test]
    fn drops_declaration_and_comments() {
        let out = optimize(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- exported -->
<svg viewBox="0 0 10 10"><rect width="1" height="1"/></svg>"#,
        );
        assert!(!out.contains("<?xml"));
        assert!(!out.contains("exported"));
        assert!(out.starts_with("<svg"));
    }

    #[test]
    fn removes_root_dimensions_and_derives_view_box() {
        let out = optimize(r#"<svg width="200px" height="100"><rect width="5" height="5"/></svg>"#);
        assert!(out.contains(r#"viewBox="0 0 200 100""#));
        assert!(!out.contains(r#"width="200px""#));
        // Child dimensions are untouched
        assert!(out.contains(r#"<rect width="5" height="5"/>"#));
    }

    #[test]
    fn keeps_existing_view_box() {
        let out = optimize(r#"<svg width="200" height="100" viewBox="0 0 20 10"></svg>"#);
        assert!(out.contains(r#"viewBox="0 0 20 10""#));
        assert!(!out.contains("0 0 200 100"));
    }

    #[test]
    fn rewrites_black_fill_everywhere() {
        let out = optimize(
            r##"<svg><g fill="#000000"><path fill="#000000" d="M0 0"/><path fill="#ff0000"/></g></svg>"##,
        );
        assert_eq!(out.matches("var(--bs-emphasis-color)").count(), 2);
        assert!(out.contains("#ff0000"));
    }

    #[test]
    fn strips_clip_path_from_groups_only() {
        let out = optimize(
            r#"<svg><g clip-path="url(#a)"><rect clip-path="url(#b)"/></g></svg>"#,
        );
        assert!(!out.contains("url(#a)"));
        assert!(out.contains("url(#b)"));
    }

    #[test]
    fn root_style_is_replaced_with_margin() {
        let out = optimize(r#"<svg style="background: red"></svg>"#);
        assert!(out.contains(r#"style="margin-top: 20px; margin-bottom: 20px;""#));
        assert!(!out.contains("background"));
    }

    #[test]
    fn custom_options_apply() {
        let options = SvgOptions {
            fill_variable: "currentColor".to_string(),
            margin_style: "margin: 0".to_string(),
        };
        let out = optimize_svg(r##"<svg><path fill="#000000"/></svg>"##, &options).unwrap();
        assert!(out.contains(r#"fill="currentColor""#));
        assert!(out.contains(r#"style="margin: 0""#));
    }

    #[test]
    fn options_follow_markdown_config() {
        let config = MarkdownConfig {
            svg_fill_variable: "var(--ink)".to_string(),
            ..MarkdownConfig::default()
        };
        let options = SvgOptions::from(&config);
        assert_eq!(options.fill_variable, "var(--ink)");
        assert_eq!(options.margin_style, config.svg_margin_style);

        let defaults = SvgOptions::default();
        assert_eq!(defaults.fill_variable, MarkdownConfig::default().svg_fill_variable);
        assert_eq!(defaults.margin_style, MarkdownConfig::default().svg_margin_style);
    }

    #[test]
    fn output_has_no_blank_lines() {
        let out = optimize("<svg>\n\n  <g>\n\n    <rect/>\n\n  </g>\n</svg>\n");
        assert!(!out.contains("\n\n"));
    }

    #[test]
    fn missing_root_is_error() {
        let result = optimize_svg("<html></html>", &SvgOptions::default());
        assert!(matches!(result, Err(SvgError::NoRoot)));
    }

    #[test]
    fn parse_length_units() {
        assert_eq!(parse_length("120"), Some(120.0));
        assert_eq!(parse_length("120px"), Some(120.0));
        assert_eq!(parse_length("100%"), None);
        assert_eq!(parse_length("0"), None);
    }
}
