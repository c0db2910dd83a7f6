//! Navigation and content link checks.

use std::collections::{HashMap, HashSet};

use sitenav_content::ContentTree;
use sitenav_core::{
    Config, LinkOrigin, NavLink,
    route::{is_external, normalize_route, resolve_relative, split_suffix},
};
use tracing::{debug, info};

use crate::diagnostic::{Diagnostic, DiagnosticKind, Report};

/// Runs every check of a site configuration against its content.
#[derive(Debug)]
pub struct LinkChecker<'a> {
    config: &'a Config,
    content: &'a ContentTree,
}

impl<'a> LinkChecker<'a> {
    /// Create a checker over a loaded configuration and collected content.
    pub fn new(config: &'a Config, content: &'a ContentTree) -> Self {
        Self { config, content }
    }

    /// Run all checks.
    pub fn run(&self) -> Report {
        let mut report = Report::new();

        self.check_collection(&mut report);
        self.check_config_links(&mut report);
        self.check_sidebar_structure(&mut report);
        self.check_content_links(&mut report);
        self.check_orphans(&mut report);
        self.check_social_links(&mut report);

        info!(
            errors = report.error_count(),
            warnings = report.warning_count(),
            "check complete"
        );
        report
    }

    fn check_collection(&self, report: &mut Report) {
        for problem in self.content.problems() {
            report.push(Diagnostic::new(
                DiagnosticKind::CollectionFailure,
                &problem.path,
                &problem.message,
            ));
        }
    }

    /// Base path prefix an internal link must not carry, `None` at the root.
    fn base_prefix(&self) -> Option<&str> {
        let base = self.config.site.base.as_str();
        (base != "/").then_some(base)
    }

    fn leaks_base(&self, link: &str) -> bool {
        self.base_prefix().is_some_and(|base| {
            let route = normalize_route(link);
            route.starts_with(base) || format!("{route}/") == base
        })
    }

    /// Every nav and sidebar link must reach a document.
    fn check_config_links(&self, report: &mut Report) {
        for (origin, link) in self.config.all_links() {
            if link.is_external() {
                continue;
            }

            if self.leaks_base(&link.link) {
                report.push(Diagnostic::new(
                    DiagnosticKind::BaseLeak,
                    origin.to_string(),
                    format!(
                        "'{}' already contains the base path '{}'; links are written relative to the base",
                        link.link, self.config.site.base
                    ),
                ));
                continue;
            }

            if self.content.lookup(&link.link).is_none() {
                let kind = match origin {
                    LinkOrigin::Nav => DiagnosticKind::DeadNavLink,
                    LinkOrigin::Sidebar { .. } => DiagnosticKind::DeadSidebarLink,
                };
                report.push(Diagnostic::new(
                    kind,
                    origin.to_string(),
                    format!("'{}' ({}) has no document", link.link, link.text),
                ));
            }
        }
    }

    /// Prefixes must cover content; groups must be non-empty and distinct.
    fn check_sidebar_structure(&self, report: &mut Report) {
        for (prefix, groups) in self.config.sidebar.iter() {
            let location = format!("sidebar '{prefix}'");

            if !self.content.has_documents_under(prefix) {
                report.push(Diagnostic::new(
                    DiagnosticKind::EmptyPrefix,
                    &location,
                    "no document lives under this prefix",
                ));
            }

            let mut group_names = HashSet::new();
            let mut seen_routes: HashMap<String, &NavLink> = HashMap::new();

            for group in groups {
                if !group_names.insert(group.text.as_str()) {
                    report.push(Diagnostic::new(
                        DiagnosticKind::DuplicateGroup,
                        &location,
                        format!("group '{}' is defined more than once", group.text),
                    ));
                }

                if group.items.is_empty() {
                    report.push(Diagnostic::new(
                        DiagnosticKind::EmptyGroup,
                        &location,
                        format!("group '{}' has no items", group.text),
                    ));
                }

                for item in &group.items {
                    let Some(route) = item.route() else {
                        continue;
                    };
                    if let Some(first) = seen_routes.get(&route) {
                        report.push(Diagnostic::new(
                            DiagnosticKind::DuplicateLink,
                            &location,
                            format!(
                                "'{}' ({}) is already listed as '{}'",
                                item.link, item.text, first.text
                            ),
                        ));
                    } else {
                        seen_routes.insert(route, item);
                    }
                }
            }
        }
    }

    /// Links inside documents must reach documents too.
    fn check_content_links(&self, report: &mut Report) {
        for doc in self.content.documents() {
            for link in &doc.links {
                let Some(route) = resolve_relative(&doc.route, &link.dest) else {
                    continue;
                };
                if self.content.lookup(&route).is_none() && !is_asset(&link.dest) {
                    report.push(Diagnostic::new(
                        DiagnosticKind::DeadContentLink,
                        format!("{}:{}", doc.path, link.line),
                        format!("'{}' has no document", link.dest),
                    ));
                }
            }
        }
    }

    /// Documents nobody links to.
    fn check_orphans(&self, report: &mut Report) {
        let mut reachable: HashSet<String> = HashSet::new();

        for (_, link) in self.config.all_links() {
            if let Some(doc) = self.content.lookup(&link.link) {
                reachable.insert(doc.route.clone());
            }
        }

        for doc in self.content.documents() {
            for link in &doc.links {
                if let Some(target) = resolve_relative(&doc.route, &link.dest)
                    .and_then(|route| self.content.lookup(&route))
                    && target.route != doc.route
                {
                    reachable.insert(target.route.clone());
                }
            }
        }

        for doc in self.content.documents() {
            if doc.route == "/" || reachable.contains(&doc.route) {
                continue;
            }
            debug!(route = %doc.route, "document is unreachable");
            report.push(Diagnostic::new(
                DiagnosticKind::OrphanDocument,
                &doc.path,
                format!("'{}' is not linked from the nav, the sidebar or any page", doc.title),
            ));
        }
    }

    fn check_social_links(&self, report: &mut Report) {
        for social in &self.config.social_links {
            let link = social.link.trim();
            let absolute = ["https://", "http://"].iter().any(|scheme| {
                link.get(..scheme.len())
                    .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
            });
            if !absolute || !is_external(link) {
                report.push(Diagnostic::new(
                    DiagnosticKind::InvalidSocialLink,
                    format!("social link '{}'", social.icon),
                    format!("'{}' is not an absolute http(s) URL", social.link),
                ));
            }
        }
    }
}

/// Whether a link as written names a static file (`../img/logo.png`) rather
/// than a document. Dotted page names such as `v1.2` are documents.
fn is_asset(link: &str) -> bool {
    let (path, _) = split_suffix(link.trim());
    path.rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .is_some_and(|(stem, ext)| {
            !stem.is_empty()
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
                && ext.chars().any(|c| c.is_ascii_alphabetic())
                && !["md", "html"].iter().any(|doc| ext.eq_ignore_ascii_case(doc))
        })
}

#[cfg(test)]
mod tests {
    use sitenav_content::Document;

    use super::*;

    fn doc(path: &str, source: &str) -> Document {
        Document::parse(path, source).expect("parse document")
    }

    fn site() -> ContentTree {
        ContentTree::from_documents([
            doc("index.md", "# Home\n"),
            doc("net/index.md", "# Networking\n\n[TCP](./tcp.md)\n"),
            doc("net/tcp.md", "# TCP\n\n[UDP](udp.md) [logo](/logo.png) [top](#tcp)\n"),
            doc("net/udp.md", "# UDP\n"),
            doc("os/cfs.md", "# CFS\n"),
        ])
    }

    fn config(extra: &str) -> Config {
        Config::from_toml(&format!(
            r#"
[site]
title = "Notes"
base = "/vitepresspages/"

[[nav]]
text = "Home"
link = "/"

[[nav]]
text = "GitHub"
link = "https://github.com/example"

[[sidebar."/net/"]]
text = "Networking"
items = [
  {{ text = "Overview", link = "/net/" }},
  {{ text = "TCP", link = "/net/tcp" }},
  {{ text = "UDP", link = "/net/udp.md" }},
]

[[sidebar."/os/"]]
text = "OS"
items = [{{ text = "CFS", link = "/os/cfs" }}]
{extra}
"#
        ))
        .expect("parse config")
    }

    #[test]
    fn test_clean_site_passes_strict() {
        let config = config("");
        let content = site();
        let report = LinkChecker::new(&config, &content).run();
        assert!(report.is_ok(true), "{:?}", report.diagnostics());
    }

    #[test]
    fn test_dead_sidebar_and_nav_links() {
        let mut config = config(
            r#"
[[sidebar."/db/"]]
text = "Databases"
items = [{ text = "B-trees", link = "/db/btree" }]
"#,
        );
        config.nav.push(NavLink::new("Missing", "/missing"));
        let content = site();

        let report = LinkChecker::new(&config, &content).run();

        let dead: Vec<_> = report.of_kind(DiagnosticKind::DeadSidebarLink).collect();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].location, "sidebar '/db/' > 'Databases'");
        assert!(dead[0].message.contains("/db/btree"));

        assert_eq!(report.of_kind(DiagnosticKind::DeadNavLink).count(), 1);
        assert_eq!(report.of_kind(DiagnosticKind::EmptyPrefix).count(), 1);
        assert!(!report.is_ok(false));
    }

    #[test]
    fn test_base_leak() {
        let mut config = config("");
        config
            .nav
            .push(NavLink::new("Leaky", "/vitepresspages/net/tcp"));
        let content = site();

        let report = LinkChecker::new(&config, &content).run();
        let leaks: Vec<_> = report.of_kind(DiagnosticKind::BaseLeak).collect();
        assert_eq!(leaks.len(), 1);
        assert_eq!(leaks[0].location, "nav");
        assert_eq!(report.of_kind(DiagnosticKind::DeadNavLink).count(), 0);
    }

    #[test]
    fn test_base_leak_ignored_at_root_base() {
        let mut config = config("");
        config.set_base("/");
        config.nav.push(NavLink::new("Net", "/net/"));
        let content = site();

        let report = LinkChecker::new(&config, &content).run();
        assert_eq!(report.of_kind(DiagnosticKind::BaseLeak).count(), 0);
    }

    #[test]
    fn test_duplicate_and_empty_groups() {
        let config = config(
            r#"
[[sidebar."/os/"]]
text = "OS"
items = [{ text = "CFS again", link = "/os/cfs.md" }]

[[sidebar."/os/"]]
text = "Later"
"#,
        );
        let content = site();

        let report = LinkChecker::new(&config, &content).run();
        assert_eq!(report.of_kind(DiagnosticKind::DuplicateGroup).count(), 1);
        assert_eq!(report.of_kind(DiagnosticKind::DuplicateLink).count(), 1);
        assert_eq!(report.of_kind(DiagnosticKind::EmptyGroup).count(), 1);
        assert!(report.is_ok(false));
        assert!(!report.is_ok(true));
    }

    #[test]
    fn test_dead_content_link() {
        let config = config("");
        let content = ContentTree::from_documents([
            doc("index.md", "# Home\n"),
            doc("net/index.md", "# Net\n"),
            doc("net/tcp.md", "# TCP\n\nSee [gone](../os/gone.md).\n"),
            doc("net/udp.md", "# UDP\n"),
            doc("os/cfs.md", "# CFS\n"),
        ]);

        let report = LinkChecker::new(&config, &content).run();
        let dead: Vec<_> = report.of_kind(DiagnosticKind::DeadContentLink).collect();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].location, "net/tcp.md:3");
    }

    #[test]
    fn test_orphan_documents() {
        let config = config("");
        let content = ContentTree::from_documents([
            doc("index.md", "# Home\n"),
            doc("net/index.md", "# Net\n"),
            doc("net/tcp.md", "# TCP\n\n[draft](./draft.md)\n"),
            doc("net/udp.md", "# UDP\n"),
            doc("net/draft.md", "# Draft\n"),
            doc("os/cfs.md", "# CFS\n"),
            doc("os/lonely.md", "# Lonely\n\n[self](./lonely.md)\n"),
        ]);

        let report = LinkChecker::new(&config, &content).run();
        let orphans: Vec<_> = report
            .of_kind(DiagnosticKind::OrphanDocument)
            .map(|d| d.location.as_str())
            .collect();
        assert_eq!(orphans, vec!["os/lonely.md"]);
    }

    #[test]
    fn test_social_links() {
        let config = config(
            r#"
[[social_links]]
icon = "github"
link = "https://github.com/example"

[[social_links]]
icon = "rss"
link = "/feed.xml"
"#,
        );
        let content = site();

        let report = LinkChecker::new(&config, &content).run();
        let invalid: Vec<_> = report.of_kind(DiagnosticKind::InvalidSocialLink).collect();
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].location, "social link 'rss'");
    }

    #[test]
    fn test_collection_failures_are_errors() {
        let config = config("");
        let content = site();
        let mut report = LinkChecker::new(&config, &content).run();
        assert!(report.is_ok(true));

        report.push(Diagnostic::new(
            DiagnosticKind::CollectionFailure,
            "bad.md",
            "unreadable",
        ));
        assert!(!report.is_ok(false));
    }

    #[test]
    fn test_is_asset() {
        assert!(is_asset("/logo.png"));
        assert!(is_asset("../img/diagram.svg#layer"));
        assert!(!is_asset("./tcp.md"));
        assert!(!is_asset("/net/tcp"));
        assert!(!is_asset("/net/"));
        assert!(!is_asset("/net/.hidden"));
        assert!(!is_asset("./v1.2"));
    }

    #[test]
    fn test_dotted_document_links_are_checked() {
        let config = config("");
        let content = ContentTree::from_documents([
            doc("index.md", "# Home\n"),
            doc("net/index.md", "# Net\n\n[v1.2](./v1.2.md) [v1.3](./v1.3)\n"),
            doc("net/tcp.md", "# TCP\n"),
            doc("net/udp.md", "# UDP\n"),
            doc("net/v1.2.md", "# v1.2\n"),
            doc("os/cfs.md", "# CFS\n"),
        ]);

        let report = LinkChecker::new(&config, &content).run();
        let dead: Vec<_> = report
            .of_kind(DiagnosticKind::DeadContentLink)
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(dead, vec!["'./v1.3' has no document"]);
    }

    #[test]
    fn test_percent_encoded_links_resolve() {
        let config = config("");
        let content = ContentTree::from_documents([
            doc("index.md", "# Home\n"),
            doc(
                "net/index.md",
                "# Net\n\n[tcp](./%E7%BD%91%E7%BB%9C.md) [note](./my%20note.md)\n",
            ),
            doc("net/网络.md", "# 网络\n"),
            doc("net/my note.md", "# Note\n"),
            doc("net/tcp.md", "# TCP\n"),
            doc("net/udp.md", "# UDP\n"),
            doc("os/cfs.md", "# CFS\n"),
        ]);

        let report = LinkChecker::new(&config, &content).run();
        assert_eq!(report.of_kind(DiagnosticKind::DeadContentLink).count(), 0);
        assert_eq!(report.of_kind(DiagnosticKind::OrphanDocument).count(), 0);
    }

    #[test]
    fn test_dead_link_line_follows_frontmatter() {
        let config = config("");
        let content = ContentTree::from_documents([
            doc("index.md", "# Home\n"),
            doc("net/index.md", "---\ntitle: Net\nlayout: doc\n---\n# Net\n\n[gone](./gone.md)\n"),
            doc("net/tcp.md", "# TCP\n"),
            doc("net/udp.md", "# UDP\n"),
            doc("os/cfs.md", "# CFS\n"),
        ]);

        let report = LinkChecker::new(&config, &content).run();
        let locations: Vec<_> = report
            .of_kind(DiagnosticKind::DeadContentLink)
            .map(|d| d.location.as_str())
            .collect();
        assert_eq!(locations, vec!["net/index.md:7"]);
    }
}
