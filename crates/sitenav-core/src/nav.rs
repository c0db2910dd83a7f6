//! Navigation model: top nav links, sidebar groups and the prefix map that
//! picks a sidebar for a page.
//!
//! The model is plain data loaded from the site configuration. Resolution
//! follows the usual documentation-site rule: the sidebar key with the
//! longest prefix of the current route wins.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    route::{ensure_leading_slash, is_external, normalize_route, route_has_prefix},
};

/// A labeled link to a document or an external page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    /// Display label.
    pub text: String,

    /// Site-relative document path or external URL.
    pub link: String,
}

impl NavLink {
    /// Create a new link.
    pub fn new(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: link.into(),
        }
    }

    /// Whether this link leaves the site.
    pub fn is_external(&self) -> bool {
        is_external(&self.link)
    }

    /// Normalized route of the link target, `None` for external links.
    pub fn route(&self) -> Option<String> {
        (!self.is_external()).then(|| normalize_route(&self.link))
    }

    /// Whether this link targets the page at `route`.
    pub fn is_active(&self, route: &str) -> bool {
        self.route()
            .is_some_and(|target| target == normalize_route(route))
    }
}

/// A labeled, collapsible cluster of links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavGroup {
    /// Group heading.
    pub text: String,

    /// Whether the group starts collapsed.
    #[serde(default)]
    pub collapsed: bool,

    /// Links in display order.
    #[serde(default)]
    pub items: Vec<NavLink>,
}

impl NavGroup {
    /// Create an empty, expanded group.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            collapsed: false,
            items: Vec::new(),
        }
    }

    /// Set the collapsed flag.
    #[must_use]
    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    /// Append a link.
    #[must_use]
    pub fn with_item(mut self, text: impl Into<String>, link: impl Into<String>) -> Self {
        self.items.push(NavLink::new(text, link));
        self
    }

    /// Whether any item in the group targets `route`.
    pub fn contains(&self, route: &str) -> bool {
        self.items.iter().any(|item| item.is_active(route))
    }
}

/// Social/profile link shown in the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    /// Icon name (e.g. `github`).
    pub icon: String,

    /// Absolute URL.
    pub link: String,
}

/// Sidebar groups resolved for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSidebar<'a> {
    /// The sidebar key that matched, as written in the configuration.
    pub prefix: &'a str,

    /// Groups under that key, in display order.
    pub groups: &'a [NavGroup],
}

impl<'a> ResolvedSidebar<'a> {
    /// All links across the resolved groups, in display order.
    pub fn links(&self) -> impl Iterator<Item = &'a NavLink> + 'a {
        self.groups.iter().flat_map(|group| group.items.iter())
    }

    /// Index of the group holding the link for `route`.
    pub fn active_group(&self, route: &str) -> Option<usize> {
        self.groups.iter().position(|group| group.contains(route))
    }
}

/// Previous and next pages around a document in its sidebar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrevNext {
    /// Link before the current page.
    pub prev: Option<NavLink>,

    /// Link after the current page.
    pub next: Option<NavLink>,
}

/// Mapping from path prefix to ordered sidebar groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SidebarMap {
    entries: BTreeMap<String, Vec<NavGroup>>,
}

impl SidebarMap {
    /// Create an empty sidebar map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the groups for a prefix, returning any groups it replaced.
    pub fn insert(
        &mut self,
        prefix: impl Into<String>,
        groups: Vec<NavGroup>,
    ) -> Option<Vec<NavGroup>> {
        self.entries.insert(prefix.into(), groups)
    }

    /// Groups configured under exactly this key.
    pub fn get(&self, prefix: &str) -> Option<&[NavGroup]> {
        self.entries.get(prefix).map(Vec::as_slice)
    }

    /// Number of prefix keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no sidebar is configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prefix keys as written in the configuration.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(prefix, groups)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[NavGroup])> {
        self.entries
            .iter()
            .map(|(prefix, groups)| (prefix.as_str(), groups.as_slice()))
    }

    /// Resolve the sidebar for a document path.
    ///
    /// The key with the longest prefix of the page's route wins. Returns
    /// `None` when no key matches.
    pub fn resolve(&self, page_path: &str) -> Option<ResolvedSidebar<'_>> {
        let route = normalize_route(page_path);

        self.entries
            .iter()
            .filter(|(prefix, _)| route_has_prefix(&route, prefix))
            .max_by_key(|(prefix, _)| ensure_leading_slash(prefix).len())
            .map(|(prefix, groups)| ResolvedSidebar {
                prefix: prefix.as_str(),
                groups: groups.as_slice(),
            })
    }

    /// Flattened links under one key, in display order.
    pub fn links(&self, prefix: &str) -> Vec<&NavLink> {
        self.get(prefix)
            .map(|groups| groups.iter().flat_map(|g| g.items.iter()).collect())
            .unwrap_or_default()
    }

    /// Previous and next internal links around the page in its sidebar.
    ///
    /// Both are `None` when the page has no sidebar or is not listed in it.
    pub fn prev_next(&self, page_path: &str) -> PrevNext {
        let Some(sidebar) = self.resolve(page_path) else {
            return PrevNext::default();
        };

        let links: Vec<&NavLink> = sidebar.links().filter(|l| !l.is_external()).collect();
        let Some(pos) = links.iter().position(|l| l.is_active(page_path)) else {
            return PrevNext::default();
        };

        PrevNext {
            prev: pos
                .checked_sub(1)
                .and_then(|i| links.get(i))
                .map(|l| (*l).clone()),
            next: links.get(pos + 1).map(|l| (*l).clone()),
        }
    }

    /// Reject keys that collide once normalized (`net/` and `/net/`).
    pub fn validate(&self) -> Result<()> {
        let mut seen: BTreeMap<String, &str> = BTreeMap::new();
        for prefix in self.entries.keys() {
            if prefix.trim().is_empty() {
                return Err(CoreError::sidebar(prefix, "sidebar key cannot be empty"));
            }
            let normalized = ensure_leading_slash(prefix);
            if let Some(previous) = seen.insert(normalized, prefix) {
                return Err(CoreError::sidebar(
                    prefix,
                    format!("key collides with '{previous}'"),
                ));
            }
        }
        Ok(())
    }
}

impl FromIterator<(String, Vec<NavGroup>)> for SidebarMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<NavGroup>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Where a link was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOrigin {
    /// Top-level nav entry.
    Nav,
    /// Sidebar item.
    Sidebar { prefix: String, group: String },
}

impl fmt::Display for LinkOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nav => write!(f, "nav"),
            Self::Sidebar { prefix, group } => write!(f, "sidebar '{prefix}' > '{group}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SidebarMap {
        let mut map = SidebarMap::new();
        map.insert(
            "/net/",
            vec![
                NavGroup::new("Basics")
                    .with_item("Overview", "/net/")
                    .with_item("TCP/IP overhead", "/net/tcpip-overhead"),
                NavGroup::new("Transport")
                    .with_collapsed(true)
                    .with_item("TCP", "/net/tcp")
                    .with_item("RFC 793", "https://www.rfc-editor.org/rfc/rfc793")
                    .with_item("UDP", "/net/udp.md"),
            ],
        );
        map.insert(
            "/net/advanced/",
            vec![NavGroup::new("Advanced").with_item("QUIC", "/net/advanced/quic")],
        );
        map.insert("/", vec![NavGroup::new("Home").with_item("Index", "/")]);
        map
    }

    #[test]
    fn test_link_routes() {
        let link = NavLink::new("TCP", "/net/tcp.md");
        assert_eq!(link.route().as_deref(), Some("/net/tcp"));
        assert!(link.is_active("/net/tcp"));
        assert!(link.is_active("net/tcp.html"));
        assert!(!link.is_active("/net/udp"));

        let external = NavLink::new("GitHub", "https://github.com");
        assert!(external.route().is_none());
        assert!(!external.is_active("/"));
    }

    #[test]
    fn test_group_defaults_from_toml() {
        let group: NavGroup = toml::from_str(
            r#"
text = "Networking"
items = [{ text = "TCP", link = "/net/tcp" }]
"#,
        )
        .expect("parse group");
        assert!(!group.collapsed);
        assert_eq!(group.items.len(), 1);
        assert!(group.contains("/net/tcp"));
    }

    #[test]
    fn test_resolve_longest_prefix_wins() {
        let map = sample();

        let sidebar = map.resolve("/net/advanced/quic").expect("resolve");
        assert_eq!(sidebar.prefix, "/net/advanced/");

        let sidebar = map.resolve("/net/tcp").expect("resolve");
        assert_eq!(sidebar.prefix, "/net/");
        assert_eq!(sidebar.groups.len(), 2);

        let sidebar = map.resolve("/os/sched").expect("resolve");
        assert_eq!(sidebar.prefix, "/");
    }

    #[test]
    fn test_resolve_without_match() {
        let mut map = SidebarMap::new();
        map.insert("/net/", vec![NavGroup::new("Net")]);
        assert!(map.resolve("/os/sched").is_none());
        assert!(SidebarMap::new().resolve("/").is_none());
    }

    #[test]
    fn test_resolve_preserves_group_and_item_order() {
        let map = sample();
        let sidebar = map.resolve("/net/tcp").expect("resolve");

        let groups: Vec<_> = sidebar.groups.iter().map(|g| g.text.as_str()).collect();
        assert_eq!(groups, vec!["Basics", "Transport"]);

        let links: Vec<_> = sidebar.links().map(|l| l.text.as_str()).collect();
        assert_eq!(
            links,
            vec!["Overview", "TCP/IP overhead", "TCP", "RFC 793", "UDP"]
        );
        assert_eq!(sidebar.active_group("/net/tcp"), Some(1));
        assert_eq!(sidebar.active_group("/net/missing"), None);
    }

    #[test]
    fn test_prev_next_skips_external_links() {
        let map = sample();

        let around_tcp = map.prev_next("/net/tcp");
        assert_eq!(
            around_tcp.prev.map(|l| l.link),
            Some("/net/tcpip-overhead".to_string())
        );
        assert_eq!(around_tcp.next.map(|l| l.link), Some("/net/udp.md".to_string()));

        let first = map.prev_next("/net/");
        assert!(first.prev.is_none());
        assert!(first.next.is_some());

        let last = map.prev_next("/net/udp");
        assert!(last.next.is_none());

        assert_eq!(map.prev_next("/net/unlisted"), PrevNext::default());
    }

    #[test]
    fn test_validate_rejects_colliding_keys() {
        let mut map = SidebarMap::new();
        map.insert("/net/", vec![]);
        map.insert("net/", vec![]);
        let err = map.validate().expect_err("collision");
        assert!(err.to_string().contains("collides"));

        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_links_for_prefix() {
        let map = sample();
        assert_eq!(map.links("/net/").len(), 5);
        assert!(map.links("/missing/").is_empty());
    }

    #[test]
    fn test_link_origin_display() {
        assert_eq!(LinkOrigin::Nav.to_string(), "nav");
        let origin = LinkOrigin::Sidebar {
            prefix: "/net/".to_string(),
            group: "Basics".to_string(),
        };
        assert_eq!(origin.to_string(), "sidebar '/net/' > 'Basics'");
    }
}
