//! `sitemap.xml` in the sitemaps.org format.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use thiserror::Error;

pub const SITEMAP_FILE: &str = "sitemap.xml";
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("failed to write sitemap: {0}")]
    Write(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    /// Site-relative path, e.g. `/pattern/sidecar`.
    pub path: String,
    pub lastmod: Option<String>,
}

impl SitemapUrl {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            lastmod: None,
        }
    }

    pub fn with_lastmod(mut self, lastmod: Option<String>) -> Self {
        self.lastmod = lastmod;
        self
    }
}

/// Render the urlset. `base_url` must not end with a slash.
pub fn build_sitemap(
    base_url: &str,
    urls: &[SitemapUrl],
    changefreq: &str,
) -> Result<String, SitemapError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NS));
    emit(&mut writer, Event::Start(urlset))?;

    for url in urls {
        emit(&mut writer, Event::Start(BytesStart::new("url")))?;
        text_element(&mut writer, "loc", &format!("{base_url}{}", url.path))?;
        if let Some(lastmod) = &url.lastmod {
            text_element(&mut writer, "lastmod", lastmod)?;
        }
        text_element(&mut writer, "changefreq", changefreq)?;
        emit(&mut writer, Event::End(BytesEnd::new("url")))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("urlset")))?;
    let mut xml =
        String::from_utf8(writer.into_inner()).map_err(|e| SitemapError::Write(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

fn text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), SitemapError> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SitemapError> {
    writer
        .write_event(event)
        .map_err(|e| SitemapError::Write(e.to_string()))
}
