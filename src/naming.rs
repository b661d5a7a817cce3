//! Name handling: the `NNN-name` page convention and heading slugs.
//!
//! Top-level pages use an optional numeric prefix for nav ordering:
//! - `010-about.md` → number 10, name `about`, title "about"
//! - `020-how-to-contribute.md` → title "how to contribute"
//! - `notes.md` → unnumbered, hidden from nav
//!
//! Heading anchors use [`slugify`]: lowercase, ASCII alphanumerics kept,
//! everything else collapsed into single dashes.
//!
//! Site URLs and output paths are derived here too, so links, the search
//! index and the sitemap always agree on where a page lives.

/// Result of parsing a numbered entry name like `020-how-to-contribute`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present (e.g., `20` from `020-how-to-contribute`)
    pub number: Option<u32>,
    /// Raw name part after `NNN-`, dashes preserved. Empty if number-only.
    /// For unnumbered entries, this is the full input.
    pub name: String,
    /// Display title: name with dashes converted to spaces.
    pub display_title: String,
}

/// Parse an entry name following the `NNN-name` convention.
pub fn parse_entry_name(name: &str) -> ParsedName {
    if let Some((prefix, rest)) = name.split_once('-')
        && let Ok(num) = prefix.parse::<u32>()
    {
        return ParsedName {
            number: Some(num),
            name: rest.to_string(),
            display_title: rest.replace('-', " "),
        };
    }
    if let Ok(num) = name.parse::<u32>() {
        return ParsedName {
            number: Some(num),
            name: String::new(),
            display_title: String::new(),
        };
    }
    ParsedName {
        number: None,
        name: name.to_string(),
        display_title: name.replace('-', " "),
    }
}

/// Turn heading text into an anchor id.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c == '_' {
            pending_dash = false;
            slug.push('_');
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Hands out unique anchor ids within one document.
///
/// The first use of a slug is returned as-is; repeats get `-1`, `-2`, ...
#[derive(Debug, Default)]
pub struct SlugRegistry {
    seen: std::collections::HashMap<String, usize>,
}

impl SlugRegistry {
    pub fn unique(&mut self, base: &str) -> String {
        let base = if base.is_empty() { "section" } else { base };
        let Some(&last) = self.seen.get(base) else {
            self.seen.insert(base.to_string(), 0);
            return base.to_string();
        };
        let mut n = last + 1;
        let mut candidate = format!("{base}-{n}");
        while self.seen.contains_key(&candidate) {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        self.seen.insert(base.to_string(), n);
        self.seen.insert(candidate.clone(), 0);
        candidate
    }

    /// Record an explicitly assigned id so generated ones avoid it.
    pub fn reserve(&mut self, id: &str) {
        self.seen.entry(id.to_string()).or_insert(0);
    }
}

/// Site-relative URL of a pattern page.
pub fn pattern_url(id: &str, clean_urls: bool) -> String {
    page_url(&format!("pattern/{id}"), clean_urls)
}

/// Site-relative URL of an author's page.
pub fn author_url(id: &str, clean_urls: bool) -> String {
    page_url(&format!("author/{id}"), clean_urls)
}

/// Site-relative URL for an output file stem such as `team` or `pattern/x`.
pub fn page_url(stem: &str, clean_urls: bool) -> String {
    if clean_urls {
        format!("/{stem}")
    } else {
        format!("/{stem}.html")
    }
}

/// Output file for a stem, relative to the output root. Always `.html`.
pub fn output_file(stem: &str) -> String {
    format!("{stem}.html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_with_multi_word_name() {
        let p = parse_entry_name("020-how-to-contribute");
        assert_eq!(p.number, Some(20));
        assert_eq!(p.name, "how-to-contribute");
        assert_eq!(p.display_title, "how to contribute");
    }

    #[test]
    fn number_only() {
        let p = parse_entry_name("001");
        assert_eq!(p.number, Some(1));
        assert_eq!(p.name, "");
    }

    #[test]
    fn unnumbered_with_dashes() {
        let p = parse_entry_name("release-notes");
        assert_eq!(p.number, None);
        assert_eq!(p.name, "release-notes");
        assert_eq!(p.display_title, "release notes");
    }

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("  What is ECS?  "), "what-is-ecs");
        assert_eq!(slugify("task_definition.json"), "task_definition-json");
        assert_eq!(slugify("Über"), "ber");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slug_registry_dedupes() {
        let mut slugs = SlugRegistry::default();
        assert_eq!(slugs.unique("usage"), "usage");
        assert_eq!(slugs.unique("usage"), "usage-1");
        assert_eq!(slugs.unique("usage"), "usage-2");
        assert_eq!(slugs.unique(""), "section");
    }

    #[test]
    fn slug_registry_skips_suffixes_already_taken() {
        let mut slugs = SlugRegistry::default();
        assert_eq!(slugs.unique("usage-1"), "usage-1");
        assert_eq!(slugs.unique("usage"), "usage");
        assert_eq!(slugs.unique("usage"), "usage-2");
        assert_eq!(slugs.unique("usage"), "usage-3");
    }

    #[test]
    fn slug_registry_respects_reserved_ids() {
        let mut slugs = SlugRegistry::default();
        slugs.reserve("setup");
        assert_eq!(slugs.unique("setup"), "setup-1");
    }

    #[test]
    fn urls_follow_clean_urls_setting() {
        assert_eq!(pattern_url("sidecar", true), "/pattern/sidecar");
        assert_eq!(pattern_url("sidecar", false), "/pattern/sidecar.html");
        assert_eq!(author_url("ada", true), "/author/ada");
        assert_eq!(page_url("team", false), "/team.html");
        assert_eq!(output_file("pattern/sidecar"), "pattern/sidecar.html");
    }
}
