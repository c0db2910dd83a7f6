//! Markdown scanning with pulldown-cmark.
//!
//! Only the structure the navigation tooling cares about is extracted: the
//! first level-1 heading, all headings with their anchors, and link targets
//! with the line they appear on. Page bodies are never rendered here.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::Serialize;

/// A heading in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// Heading level (1-6).
    pub level: u8,

    /// Heading text.
    pub text: String,

    /// Anchor ID (explicit `{#id}` or derived from the text).
    pub id: String,
}

/// A link found in a document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocLink {
    /// Destination as written.
    pub dest: String,

    /// 1-based line of the link in the scanned body.
    pub line: usize,
}

/// Result of scanning a Markdown body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkdownScan {
    /// Text of the first level-1 heading.
    pub title: Option<String>,

    /// All headings in document order.
    pub headings: Vec<Heading>,

    /// All links in document order.
    pub links: Vec<DocLink>,
}

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

/// Scan a Markdown body (frontmatter already removed).
pub fn scan_markdown(body: &str) -> MarkdownScan {
    let mut scan = MarkdownScan::default();
    let mut current_heading: Option<(u8, Option<String>, String)> = None;
    let line_starts = line_starts(body);

    for (event, range) in Parser::new_ext(body, options()).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                current_heading = Some((
                    heading_level(level),
                    id.map(|i| i.to_string()),
                    String::new(),
                ));
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, id, text)) = current_heading.take() {
                    let text = text.trim().to_string();
                    if level == 1 && scan.title.is_none() && !text.is_empty() {
                        scan.title = Some(text.clone());
                    }
                    let id = id.unwrap_or_else(|| slugify(&text));
                    scan.headings.push(Heading { level, text, id });
                }
            }

            Event::Start(Tag::Link { dest_url, .. }) => {
                scan.links.push(DocLink {
                    dest: dest_url.to_string(),
                    line: line_of(&line_starts, range.start),
                });
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                }
            }

            _ => {}
        }
    }

    scan
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn line_starts(body: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(body.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

fn line_of(line_starts: &[usize], offset: usize) -> usize {
    line_starts.partition_point(|&start| start <= offset)
}

/// Convert heading text to an anchor slug.
///
/// Letters (any script) and digits are kept and lowercased; everything else
/// collapses into single dashes.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
