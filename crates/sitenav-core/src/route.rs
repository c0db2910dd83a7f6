//! Route and link normalization.
//!
//! A route is the normalized site-relative path of a document, e.g.
//! `/net/tcp` for `net/tcp.md` and `/net/` for `net/index.md`. Links in the
//! configuration and inside documents are compared as routes, and turned into
//! hrefs only when rendered, by prefixing the base path once.

use std::{
    borrow::Cow,
    path::{Component, Path},
};

use percent_encoding::percent_decode_str;

/// Schemes and prefixes that mark a link as leaving the site.
const EXTERNAL_PREFIXES: &[&str] = &["http://", "https://", "mailto:", "tel:", "//"];

/// Whether a link points outside the site.
pub fn is_external(link: &str) -> bool {
    let link = link.trim();
    EXTERNAL_PREFIXES.iter().any(|prefix| {
        link.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// Split a link into its path part and its `?query` / `#fragment` suffix.
pub fn split_suffix(link: &str) -> (&str, &str) {
    match link.find(['#', '?']) {
        Some(pos) => link.split_at(pos),
        None => (link, ""),
    }
}

/// Normalize a site-relative path into a route.
///
/// - `net/tcp.md` → `/net/tcp`
/// - `/net/tcp.html#top` → `/net/tcp`
/// - `/net/index` → `/net/`
/// - `""` → `/`
pub fn normalize_route(path: &str) -> String {
    let (path, _) = split_suffix(path.trim());

    let mut route = String::with_capacity(path.len() + 1);
    route.push('/');
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        route.push_str(segment);
        route.push('/');
    }

    // Keep the trailing slash only if the input had one (or is the root).
    if route.len() > 1 && !path.ends_with('/') {
        route.pop();
    }

    for ext in [".md", ".html"] {
        if let Some(stripped) = route.strip_suffix(ext)
            && !stripped.ends_with('/')
        {
            route.truncate(stripped.len());
            break;
        }
    }

    if route == "/index" {
        return "/".to_string();
    }
    if let Some(dir) = route.strip_suffix("/index") {
        return format!("{dir}/");
    }

    route
}

/// Normalize a base path so it starts and ends with `/`.
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// Turn a link into the href a browser sees when the site is hosted under
/// `base`.
///
/// External links are returned untouched. Internal links are normalized and
/// prefixed with the base exactly once; the query and fragment are kept.
pub fn with_base(base: &str, link: &str) -> String {
    if is_external(link) {
        return link.to_string();
    }

    let (path, suffix) = split_suffix(link.trim());
    let route = normalize_route(path);
    let base = normalize_base(base);

    format!("{base}{}{suffix}", route.trim_start_matches('/'))
}

/// Content-relative Markdown files that can back a route, most specific first.
///
/// `/net/tcp` may be `net/tcp.md` or `net/tcp/index.md`; `/net/` is only
/// `net/index.md`.
pub fn document_candidates(route: &str) -> Vec<String> {
    let route = normalize_route(route);
    let relative = route.trim_start_matches('/');

    if relative.is_empty() {
        vec!["index.md".to_string()]
    } else if relative.ends_with('/') {
        vec![format!("{relative}index.md")]
    } else {
        vec![format!("{relative}.md"), format!("{relative}/index.md")]
    }
}

/// Route for a content-relative Markdown path, or `None` if the path is not
/// a Markdown file.
pub fn route_for_document(relative: &Path) -> Option<String> {
    let ext = relative.extension()?.to_str()?;
    if !ext.eq_ignore_ascii_case("md") {
        return None;
    }

    let mut segments = Vec::new();
    for component in relative.with_extension("").components() {
        match component {
            Component::Normal(part) => segments.push(part.to_str()?.to_string()),
            Component::CurDir => {}
            _ => return None,
        }
    }

    Some(normalize_route(&segments.join("/")))
}

/// Resolve a link found inside the document at `from_route`.
///
/// Returns `None` for external links and fragment-only links, which never
/// name another document.
pub fn resolve_relative(from_route: &str, link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() || is_external(link) {
        return None;
    }

    let (path, _) = split_suffix(link);
    if path.is_empty() {
        return None;
    }

    // `%E7%BD%91%E7%BB%9C.md` and `my%20note.md` name files on disk
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(path));
    let path: &str = &decoded;

    if path.starts_with('/') {
        return Some(normalize_route(path));
    }

    let from = normalize_route(from_route);
    let dir = &from[..=from.rfind('/').unwrap_or(0)];

    let mut stack: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }

    let mut joined = stack.join("/");
    if path.ends_with('/') || path.ends_with("/.") || path == "." || path.ends_with("..") {
        joined.push('/');
    }
    Some(normalize_route(&joined))
}

/// Whether `route` falls under the sidebar prefix `prefix`.
///
/// This is a plain string prefix test after both sides gain a leading slash,
/// so `/net` matches `/network` while `/net/` does not.
pub fn route_has_prefix(route: &str, prefix: &str) -> bool {
    let route = normalize_route(route);
    let prefix = ensure_leading_slash(prefix);
    route.starts_with(prefix.as_str())
}

/// Normalize a sidebar key: leading `/`, no query or fragment.
pub fn ensure_leading_slash(prefix: &str) -> String {
    let (path, _) = split_suffix(prefix.trim());
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_normalize_route() {
        assert_eq!(normalize_route(""), "/");
        assert_eq!(normalize_route("/"), "/");
        assert_eq!(normalize_route("net/tcp.md"), "/net/tcp");
        assert_eq!(normalize_route("/net/tcp.html#top"), "/net/tcp");
        assert_eq!(normalize_route("/net/tcp?x=1"), "/net/tcp");
        assert_eq!(normalize_route("/net//tcp"), "/net/tcp");
        assert_eq!(normalize_route("/net/"), "/net/");
        assert_eq!(normalize_route("/net/index"), "/net/");
        assert_eq!(normalize_route("/net/index.md"), "/net/");
        assert_eq!(normalize_route("/index.md"), "/");
        assert_eq!(normalize_route("/计算机网络/tcpip协议开销"), "/计算机网络/tcpip协议开销");
    }

    #[test]
    fn test_is_external() {
        assert!(is_external("https://github.com"));
        assert!(is_external("HTTP://example.com"));
        assert!(is_external("mailto:me@example.com"));
        assert!(is_external("//cdn.example.com/x.js"));
        assert!(!is_external("/net/tcp"));
        assert!(!is_external("net/tcp.md"));
    }

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base(""), "/");
        assert_eq!(normalize_base("/"), "/");
        assert_eq!(normalize_base("vitepresspages"), "/vitepresspages/");
        assert_eq!(normalize_base("/vitepresspages"), "/vitepresspages/");
        assert_eq!(normalize_base("/a/b/"), "/a/b/");
    }

    #[test]
    fn test_with_base() {
        assert_eq!(with_base("/", "/net/tcp"), "/net/tcp");
        assert_eq!(
            with_base("/vitepresspages/", "/net/tcp.md"),
            "/vitepresspages/net/tcp"
        );
        assert_eq!(with_base("/vitepresspages/", "/"), "/vitepresspages/");
        assert_eq!(
            with_base("/vitepresspages/", "/net/tcp#handshake"),
            "/vitepresspages/net/tcp#handshake"
        );
        assert_eq!(
            with_base("/vitepresspages/", "https://github.com/x"),
            "https://github.com/x"
        );
    }

    #[test]
    fn test_with_base_follows_base_changes() {
        for base in ["/", "/docs/", "/a/b/"] {
            let href = with_base(base, "/net/tcp");
            assert!(href.starts_with(base));
            assert!(href.ends_with("net/tcp"));
            assert_eq!(href.matches("net/tcp").count(), 1);
        }
    }

    #[test]
    fn test_document_candidates() {
        assert_eq!(document_candidates("/"), vec!["index.md"]);
        assert_eq!(document_candidates("/net/"), vec!["net/index.md"]);
        assert_eq!(
            document_candidates("/net/tcp"),
            vec!["net/tcp.md", "net/tcp/index.md"]
        );
    }

    #[test]
    fn test_route_for_document() {
        assert_eq!(
            route_for_document(&PathBuf::from("net/tcp.md")).as_deref(),
            Some("/net/tcp")
        );
        assert_eq!(
            route_for_document(&PathBuf::from("net/index.md")).as_deref(),
            Some("/net/")
        );
        assert_eq!(
            route_for_document(&PathBuf::from("index.md")).as_deref(),
            Some("/")
        );
        assert!(route_for_document(&PathBuf::from("logo.svg")).is_none());
        assert!(route_for_document(&PathBuf::from("../outside.md")).is_none());
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(
            resolve_relative("/net/tcp", "./udp.md").as_deref(),
            Some("/net/udp")
        );
        assert_eq!(
            resolve_relative("/net/tcp", "../os/sched.md#fifo").as_deref(),
            Some("/os/sched")
        );
        assert_eq!(
            resolve_relative("/net/", "tcp").as_deref(),
            Some("/net/tcp")
        );
        assert_eq!(
            resolve_relative("/net/tcp", "/os/").as_deref(),
            Some("/os/")
        );
        assert_eq!(resolve_relative("/net/tcp", "..").as_deref(), Some("/"));
        assert!(resolve_relative("/net/tcp", "#section").is_none());
        assert!(resolve_relative("/net/tcp", "https://example.com").is_none());
    }

    #[test]
    fn test_resolve_relative_decodes_percent_escapes() {
        assert_eq!(
            resolve_relative("/计算机网络/", "./%E7%BD%91%E7%BB%9C.md").as_deref(),
            Some("/计算机网络/网络")
        );
        assert_eq!(
            resolve_relative("/notes/a", "my%20note.md#top").as_deref(),
            Some("/notes/my note")
        );
        // invalid UTF-8 after decoding keeps the raw text
        assert_eq!(
            resolve_relative("/notes/a", "./bad%FF.md").as_deref(),
            Some("/notes/bad%FF")
        );
    }

    #[test]
    fn test_route_has_prefix() {
        assert!(route_has_prefix("/net/tcp", "/net/"));
        assert!(route_has_prefix("net/tcp.md", "net/"));
        assert!(route_has_prefix("/network", "/net"));
        assert!(!route_has_prefix("/network", "/net/"));
        assert!(route_has_prefix("/anything", "/"));
    }
}
