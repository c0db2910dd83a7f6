//! Frontmatter parsing for Markdown documents.

use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Frontmatter metadata for a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Page title; overrides the first heading.
    #[serde(default)]
    pub title: Option<String>,

    /// Page description.
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the page shows a sidebar.
    #[serde(default = "default_true")]
    pub sidebar: bool,

    /// Page layout name (e.g. `home`, `doc`).
    #[serde(default)]
    pub layout: Option<String>,

    /// Whether the page shows its last-updated time.
    #[serde(default = "default_true", alias = "lastUpdated")]
    pub last_updated: bool,

    /// Remaining fields, kept for renderers that understand them.
    #[serde(default, flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

fn default_true() -> bool {
    true
}

impl Default for Frontmatter {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            sidebar: true,
            layout: None,
            last_updated: true,
            extra: HashMap::new(),
        }
    }
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into frontmatter and body.
///
/// The opening delimiter must be the first line of the file and the closing
/// delimiter must sit on a line of its own.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };

    let delimiter = format.delimiter();
    let rest = &content[delimiter.len()..];
    let rest = rest.strip_prefix('\r').unwrap_or(rest);
    let after_first = rest.strip_prefix('\n')?;

    let mut offset = 0;
    for line in after_first.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            let frontmatter = after_first[..offset].trim();
            let body = &after_first[offset + line.len()..];
            return Some((format, frontmatter, body));
        }
        offset += line.len();
    }

    None
}

/// Parse frontmatter from a document, returning it with the remaining body.
///
/// A document without frontmatter yields the defaults and its full content.
pub fn parse_frontmatter<'a>(content: &'a str, path: &Path) -> Result<(Frontmatter, &'a str)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Ok((Frontmatter::default(), content));
    };

    if fm_str.is_empty() {
        return Ok((Frontmatter::default(), body));
    }

    let frontmatter: Frontmatter = match format {
        FrontmatterFormat::Yaml => {
            serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
        FrontmatterFormat::Toml => {
            toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
    };

    Ok((frontmatter, body))
}
