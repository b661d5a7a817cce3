//! Markdown rendering for pattern pages and top-level pages.
//!
//! Wraps `pulldown-cmark` with four rewrites applied on the event stream
//! before HTML is produced:
//!
//! - **Fenced code**: rendered as `<pre><code class="language-xxx">` where
//!   `xxx` is the first word of the info string. The rest of the info string
//!   is ignored. Content is HTML-escaped.
//! - **SVG embedding**: a paragraph starting with `!!!` is replaced by the SVG
//!   file named by its last word, cleaned up by [`crate::svg`]. `@/` and plain
//!   relative paths both resolve against the site root:
//!
//!   ```text
//!   !!! Architecture diagram @/pattern/sidecar/diagram.svg
//!   ```
//!
//! - **Heading anchors**: `h2`–`h6` get slug ids (an explicit `{#id}` wins)
//!   and are collected into an outline for the page's table of contents.
//! - **Embed components**: an HTML block made of a `<youtube>` or
//!   `<code-embed>` element, on its own line between blank lines:
//!
//!   ```text
//!   <youtube id="dQw4w9WgXcQ" />
//!   <code-embed file="@/pattern/sidecar/task.json" lang="json" />
//!   ```
//!
//!   `youtube` becomes a privacy-enhanced player iframe. `code-embed` inlines
//!   the named file as a fenced block; `lang` defaults to the file extension.
//!
//! Alongside the HTML the renderer returns the page's plain text (prose and
//! inline code, no fenced code, diagrams or embeds) for the search index.

use crate::config::MarkdownConfig;
use crate::naming::{SlugRegistry, slugify};
use crate::svg::{SvgOptions, optimize_svg};
use maud::{PreEscaped, html};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use quick_xml::Reader;
use quick_xml::events::Event as XmlEvent;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const SVG_DIRECTIVE: &str = "!!!";
const YOUTUBE_EMBED_URL: &str = "https://www.youtube-nocookie.com/embed/";

/// One entry of a page outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineHeader {
    pub title: String,
    /// Fragment link, `#anchor`.
    pub link: String,
    pub level: u8,
}

#[derive(Debug, Clone, Default)]
pub struct RenderedMarkdown {
    pub html: String,
    pub outline: Vec<OutlineHeader>,
    /// Whitespace-collapsed page text.
    pub text: String,
}

pub struct MarkdownRenderer<'a> {
    site_root: &'a Path,
    config: &'a MarkdownConfig,
}

/// A custom element written as an HTML block.
#[derive(Debug, Clone, PartialEq)]
enum Component {
    Youtube { id: String },
    CodeEmbed { file: String, lang: Option<String> },
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_HEADING_ATTRIBUTES
}

fn level_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Index of the first event at or after `from` matching `is_end`.
fn find_end(events: &[Event<'_>], from: usize, is_end: impl Fn(&Event<'_>) -> bool) -> usize {
    events[from..]
        .iter()
        .position(is_end)
        .map(|offset| from + offset)
        .unwrap_or(events.len())
}

/// Raw source of an HTML block's events.
fn html_text(events: &[Event<'_>]) -> String {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Html(t) => Some(t.as_ref()),
            _ => None,
        })
        .collect()
}

/// Recognise a `<youtube>` or `<code-embed>` element at the start of an HTML
/// block.
///
/// Returns `None` for any other HTML, and `Some(Err(..))` for a component
/// with missing or invalid attributes.
fn parse_component(block: &str) -> Option<Result<Component, String>> {
    let trimmed = block.trim_start();
    if !trimmed.starts_with("<youtube") && !trimmed.starts_with("<code-embed") {
        return None;
    }
    let mut reader = Reader::from_str(trimmed);
    let element = match reader.read_event() {
        Ok(XmlEvent::Start(e) | XmlEvent::Empty(e)) => e,
        Ok(_) => return None,
        Err(e) => return Some(Err(format!("malformed element: {e}"))),
    };

    let mut attrs = Vec::new();
    for attr in element.attributes() {
        let parsed = attr.map_err(|e| e.to_string()).and_then(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|e| e.to_string())?.into_owned();
            Ok((key, value))
        });
        match parsed {
            Ok(pair) => attrs.push(pair),
            Err(e) => return Some(Err(format!("malformed attribute: {e}"))),
        }
    }
    let value_of = |key: &str| {
        attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    match element.name().as_ref() {
        b"youtube" => Some(match value_of("id") {
            Some(id) if is_video_id(&id) => Ok(Component::Youtube { id }),
            Some(id) => Err(format!("invalid YouTube id '{id}'")),
            None => Err("youtube element needs an id attribute".to_string()),
        }),
        b"code-embed" => Some(match value_of("file") {
            Some(file) => Ok(Component::CodeEmbed {
                file,
                lang: value_of("lang"),
            }),
            None => Err("code-embed element needs a file attribute".to_string()),
        }),
        _ => None,
    }
}

fn is_video_id(id: &str) -> bool {
    id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Concatenated text of inline events.
fn inline_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

impl<'a> MarkdownRenderer<'a> {
    pub fn new(site_root: &'a Path, config: &'a MarkdownConfig) -> Self {
        Self { site_root, config }
    }

    pub fn render(&self, source: &str) -> RenderedMarkdown {
        let events: Vec<Event<'_>> = Parser::new_ext(source, parser_options()).collect();

        let mut slugs = SlugRegistry::default();
        for event in &events {
            if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
                slugs.reserve(id);
            }
        }

        let mut out: Vec<Event<'_>> = Vec::with_capacity(events.len());
        let mut outline = Vec::new();
        let mut text = String::new();
        let mut i = 0;

        while i < events.len() {
            match &events[i] {
                Event::Start(Tag::Paragraph) => {
                    let end = find_end(&events, i + 1, |e| matches!(e, Event::End(TagEnd::Paragraph)));
                    let content = inline_text(&events[i + 1..end]);
                    if content.trim_start().starts_with(SVG_DIRECTIVE) {
                        out.push(Event::Html(CowStr::from(self.embed_svg(&content))));
                        i = end + 1;
                        continue;
                    }
                }
                Event::Start(Tag::HtmlBlock) => {
                    let end = find_end(&events, i + 1, |e| matches!(e, Event::End(TagEnd::HtmlBlock)));
                    if let Some(component) = parse_component(&html_text(&events[i + 1..end])) {
                        out.push(Event::Html(CowStr::from(self.render_component(component))));
                        i = end + 1;
                        continue;
                    }
                }
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    let end = find_end(&events, i + 1, |e| matches!(e, Event::End(TagEnd::CodeBlock)));
                    let code = inline_text(&events[i + 1..end]);
                    out.push(Event::Html(CowStr::from(self.render_fence(info, &code))));
                    i = end + 1;
                    continue;
                }
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }) if level_number(*level) >= 2 => {
                    let end = find_end(&events, i + 1, |e| matches!(e, Event::End(TagEnd::Heading(_))));
                    let title = inline_text(&events[i + 1..end]).trim().to_string();
                    let anchor = match id {
                        Some(explicit) => explicit.to_string(),
                        None => slugs.unique(&slugify(&title)),
                    };
                    outline.push(OutlineHeader {
                        title: title.clone(),
                        link: format!("#{anchor}"),
                        level: level_number(*level),
                    });
                    out.push(Event::Start(Tag::Heading {
                        level: *level,
                        id: Some(CowStr::from(anchor)),
                        classes: classes.clone(),
                        attrs: attrs.clone(),
                    }));
                    text.push_str(&title);
                    text.push(' ');
                    out.extend(events[i + 1..end].iter().cloned());
                    if let Some(end_event) = events.get(end) {
                        out.push(end_event.clone());
                    }
                    i = end + 1;
                    continue;
                }
                _ => {}
            }

            match &events[i] {
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                Event::SoftBreak
                | Event::HardBreak
                | Event::End(
                    TagEnd::Paragraph
                    | TagEnd::Heading(_)
                    | TagEnd::Item
                    | TagEnd::TableCell
                    | TagEnd::CodeBlock,
                ) => text.push(' '),
                _ => {}
            }
            out.push(events[i].clone());
            i += 1;
        }

        let mut html = String::with_capacity(source.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, out.into_iter());

        RenderedMarkdown {
            html,
            outline,
            text: text.split_whitespace().collect::<Vec<_>>().join(" "),
        }
    }

    fn render_fence(&self, info: &str, code: &str) -> String {
        let class = info
            .split_whitespace()
            .next()
            .map(|lang| format!("{}{}", self.config.code_class_prefix, lang));
        let mut rendered = html! { pre { code class=[class] { (code) } } }.into_string();
        rendered.push('\n');
        rendered
    }

    /// Resolve the path named by an `!!!` directive against the site root.
    pub fn resolve_svg_path(&self, directive: &str) -> Option<PathBuf> {
        let target = directive.split_whitespace().last()?;
        Some(self.resolve_site_path(target))
    }

    /// `@/x`, `/x` and `x` all name `x` under the site root.
    pub fn resolve_site_path(&self, target: &str) -> PathBuf {
        let relative = target.strip_prefix('@').unwrap_or(target);
        self.site_root.join(relative.trim_start_matches('/'))
    }

    fn render_component(&self, component: Result<Component, String>) -> String {
        match component {
            Ok(Component::Youtube { id }) => {
                let mut rendered = html! {
                    div.video-embed {
                        iframe
                            src={ (YOUTUBE_EMBED_URL) (id) }
                            title="YouTube video player"
                            allow="accelerometer; clipboard-write; encrypted-media; gyroscope; picture-in-picture"
                            loading="lazy"
                            allowfullscreen {}
                    }
                }
                .into_string();
                rendered.push('\n');
                rendered
            }
            Ok(Component::CodeEmbed { file, lang }) => self.embed_code(&file, lang.as_deref()),
            Err(message) => {
                warn!(error = %message, "embed component ignored");
                notice("embed-missing", &message)
            }
        }
    }

    fn embed_code(&self, file: &str, lang: Option<&str>) -> String {
        let path = self.resolve_site_path(file);
        let code = match fs::read_to_string(&path) {
            Ok(code) => code,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "embedded file not readable");
                return notice("embed-missing", &format!("File not found: {}", path.display()));
            }
        };
        let lang = lang
            .map(str::to_string)
            .or_else(|| path.extension().map(|ext| ext.to_string_lossy().into_owned()))
            .unwrap_or_default();
        let fence = self.render_fence(&lang, &code);
        let mut rendered = html! {
            figure.code-embed {
                (PreEscaped(fence))
                figcaption { (file.trim_start_matches('@').trim_start_matches('/')) }
            }
        }
        .into_string();
        rendered.push('\n');
        rendered
    }

    fn embed_svg(&self, directive: &str) -> String {
        let Some(path) = self.resolve_svg_path(directive.trim_start().trim_start_matches(SVG_DIRECTIVE)) else {
            warn!("SVG directive without a file name");
            return notice("svg-missing", "SVG not found: (no file given)");
        };
        if !path.is_file() {
            warn!(path = %path.display(), "embedded SVG not found");
            return notice("svg-missing", &format!("SVG not found: {}", path.display()));
        }
        let options = SvgOptions::from(self.config);
        let optimized = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|source| optimize_svg(&source, &options).map_err(|e| e.to_string()));
        match optimized {
            Ok(svg) => format!("<figure class=\"diagram\">{svg}</figure>\n"),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "embedded SVG could not be parsed");
                notice("svg-missing", &format!("SVG could not be parsed: {}", path.display()))
            }
        }
    }
}

fn notice(class: &str, message: &str) -> String {
    let mut rendered = html! { p class=(class) { (message) } }.into_string();
    rendered.push('\n');
    rendered
}
