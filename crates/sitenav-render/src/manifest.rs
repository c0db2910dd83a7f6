//! JSON navigation manifest.
//!
//! The manifest carries the site-wide navigation once and, per page, the
//! resolved sidebar and prev/next links. An external page renderer can read
//! it instead of re-implementing sidebar resolution.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Serialize;
use sitenav_content::{ContentTree, Document};
use sitenav_core::{Config, NavGroup, NavLink, ThemeConfig};
use thiserror::Error;
use tracing::debug;

use crate::html::format_timestamp;

/// Manifest writing errors.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// File name of the manifest inside the output directory.
pub const MANIFEST_FILE: &str = "navigation.json";

/// A link as written to the manifest, with its served href.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEntry {
    /// Display label.
    pub text: String,

    /// Link as configured.
    pub link: String,

    /// Href under the base path; external links are unchanged.
    pub href: String,

    /// Whether the link leaves the site.
    pub external: bool,
}

impl LinkEntry {
    fn new(config: &Config, link: &NavLink) -> Self {
        Self {
            text: link.text.clone(),
            link: link.link.clone(),
            href: config.href(&link.link),
            external: link.is_external(),
        }
    }
}

/// A sidebar group as written to the manifest.
#[derive(Debug, Clone, Serialize)]
pub struct GroupEntry {
    /// Group heading.
    pub text: String,

    /// Whether the group starts collapsed.
    pub collapsed: bool,

    /// Links in display order.
    pub items: Vec<LinkEntry>,
}

impl GroupEntry {
    fn new(config: &Config, group: &NavGroup) -> Self {
        Self {
            text: group.text.clone(),
            collapsed: group.collapsed,
            items: group
                .items
                .iter()
                .map(|item| LinkEntry::new(config, item))
                .collect(),
        }
    }
}

/// Site-wide data shared by every page.
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    /// Site title.
    pub title: String,

    /// Base path.
    pub base: String,

    /// Site description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Site language.
    pub lang: String,

    /// Theme settings.
    pub theme: ThemeConfig,

    /// Top-level nav.
    pub nav: Vec<LinkEntry>,

    /// Social links.
    pub social_links: Vec<LinkEntry>,
}

impl SiteData {
    /// Collect the site-wide data from a configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            title: config.site.title.clone(),
            base: config.site.base.clone(),
            description: config.site.description.clone(),
            lang: config.site.lang.clone(),
            theme: config.theme.clone(),
            nav: config
                .nav
                .iter()
                .map(|link| LinkEntry::new(config, link))
                .collect(),
            social_links: config
                .social_links
                .iter()
                .map(|social| LinkEntry {
                    text: social.icon.clone(),
                    link: social.link.clone(),
                    href: config.href(&social.link),
                    external: sitenav_core::route::is_external(&social.link),
                })
                .collect(),
        }
    }
}

/// Navigation data of a single page.
#[derive(Debug, Clone, Serialize)]
pub struct PageEntry {
    /// Source path relative to the content directory.
    pub path: String,

    /// Page title.
    pub title: String,

    /// Sidebar key that matched, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<String>,

    /// Sidebar groups; empty when the page has no sidebar.
    pub groups: Vec<GroupEntry>,

    /// Previous page in the sidebar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<LinkEntry>,

    /// Next page in the sidebar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<LinkEntry>,

    /// Formatted last-updated time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl PageEntry {
    /// Resolve the navigation of one document.
    #[must_use]
    pub fn new(config: &Config, doc: &Document) -> Self {
        let resolved = doc
            .frontmatter
            .sidebar
            .then(|| config.sidebar.resolve(&doc.route))
            .flatten();

        let (sidebar, groups) = match resolved {
            Some(sidebar) => (
                Some(sidebar.prefix.to_string()),
                sidebar
                    .groups
                    .iter()
                    .map(|group| GroupEntry::new(config, group))
                    .collect(),
            ),
            None => (None, Vec::new()),
        };

        let around = config.sidebar.prev_next(&doc.route);
        let last_updated = doc
            .last_modified
            .filter(|_| config.theme.last_updated.enabled && doc.frontmatter.last_updated)
            .map(|ts| format_timestamp(&ts, &config.theme.last_updated.format));

        Self {
            path: doc.path.clone(),
            title: doc.title.clone(),
            sidebar,
            groups,
            prev: around.prev.map(|link| LinkEntry::new(config, &link)),
            next: around.next.map(|link| LinkEntry::new(config, &link)),
            last_updated,
        }
    }
}

/// The full navigation manifest.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    /// Site-wide data.
    pub site: SiteData,

    /// Per-page data keyed by route.
    pub pages: BTreeMap<String, PageEntry>,
}

impl Manifest {
    /// Build the manifest for every collected document.
    #[must_use]
    pub fn build(config: &Config, content: &ContentTree) -> Self {
        let pages = content
            .documents()
            .map(|doc| (doc.route.clone(), PageEntry::new(config, doc)))
            .collect();

        Self {
            site: SiteData::new(config),
            pages,
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write `navigation.json` into `output_dir`.
    pub fn write(&self, output_dir: &Path) -> Result<(), ManifestError> {
        let json = self.to_json()?;
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(MANIFEST_FILE);
        fs::write(&path, json)?;
        debug!(path = %path.display(), pages = self.pages.len(), "wrote manifest");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::from_toml(
            r#"
[site]
title = "Notes"
base = "/vitepresspages/"

[theme.last_updated]
enabled = false

[[nav]]
text = "Networking"
link = "/net/"

[[nav]]
text = "GitHub"
link = "https://github.com/example"

[[sidebar."/net/"]]
text = "Basics"
items = [
  { text = "Overview", link = "/net/" },
  { text = "TCP", link = "/net/tcp" },
  { text = "RFC 793", link = "https://www.rfc-editor.org/rfc/rfc793" },
  { text = "UDP", link = "/net/udp" },
]
"#,
        )
        .expect("parse config")
    }

    fn content() -> ContentTree {
        ContentTree::from_documents([
            Document::parse("index.md", "# Home\n").expect("parse"),
            Document::parse("net/index.md", "# Networking\n").expect("parse"),
            Document::parse("net/tcp.md", "# TCP\n").expect("parse"),
            Document::parse("net/udp.md", "---\nsidebar: false\n---\n# UDP\n").expect("parse"),
        ])
    }

    #[test]
    fn test_site_data_applies_base_to_internal_links_only() {
        let config = config();
        let site = SiteData::new(&config);

        assert_eq!(site.nav[0].href, "/vitepresspages/net/");
        assert!(!site.nav[0].external);
        assert_eq!(site.nav[1].href, "https://github.com/example");
        assert!(site.nav[1].external);
    }

    #[test]
    fn test_page_entry_resolves_sidebar_and_neighbours() {
        let config = config();
        let manifest = Manifest::build(&config, &content());

        let tcp = &manifest.pages["/net/tcp"];
        assert_eq!(tcp.title, "TCP");
        assert_eq!(tcp.sidebar.as_deref(), Some("/net/"));
        let texts: Vec<_> = tcp.groups[0].items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, ["Overview", "TCP", "RFC 793", "UDP"]);
        assert_eq!(tcp.prev.as_ref().map(|l| l.href.as_str()), Some("/vitepresspages/net/"));
        // external entries are skipped when picking neighbours
        assert_eq!(tcp.next.as_ref().map(|l| l.text.as_str()), Some("UDP"));
        assert!(tcp.last_updated.is_none());
    }

    #[test]
    fn test_page_without_sidebar_keeps_site_nav() {
        let config = config();
        let manifest = Manifest::build(&config, &content());

        let home = &manifest.pages["/"];
        assert!(home.sidebar.is_none());
        assert!(home.groups.is_empty());
        assert_eq!(manifest.site.nav.len(), 2);

        let udp = &manifest.pages["/net/udp"];
        assert!(udp.groups.is_empty());
        assert_eq!(udp.prev.as_ref().map(|l| l.text.as_str()), Some("TCP"));
    }

    #[test]
    fn test_json_shape() {
        let config = config();
        let json = Manifest::build(&config, &content()).to_json().expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["site"]["base"], "/vitepresspages/");
        assert_eq!(value["pages"]["/net/tcp"]["groups"][0]["text"], "Basics");
        assert!(value["pages"]["/"].get("prev").is_none());
    }

    #[test]
    fn test_write_creates_output_dir() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let output = dir.path().join("out");

        Manifest::build(&config(), &content())
            .write(&output)
            .expect("write manifest");

        let written = fs::read_to_string(output.join(MANIFEST_FILE)).expect("read");
        assert!(written.contains("\"/net/tcp\""));
    }
}
