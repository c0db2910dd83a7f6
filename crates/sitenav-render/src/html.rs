//! Navigation HTML fragments.
//!
//! Renders the nav bar, the sidebar and the doc footer of a page. Every
//! internal href goes through the configured base path.

use std::fmt::Write as _;

use chrono::{
    DateTime, Utc,
    format::{Item, StrftimeItems},
};
use sitenav_content::Document;
use sitenav_core::{Config, NavLink, config::SearchProvider};
use thiserror::Error;
use tracing::debug;

use crate::template::{TemplateContext, TemplateError, TemplateRegistry};

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// Renders navigation fragments for pages of one site.
#[derive(Debug)]
pub struct NavRenderer<'a> {
    config: &'a Config,
    templates: TemplateRegistry,
}

impl<'a> NavRenderer<'a> {
    /// Create a renderer with the built-in templates.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self::with_templates(config, TemplateRegistry::new())
    }

    /// Create a renderer with custom templates.
    #[must_use]
    pub fn with_templates(config: &'a Config, templates: TemplateRegistry) -> Self {
        Self { config, templates }
    }

    /// Render the header: site title, top nav and social links.
    ///
    /// The nav does not depend on the sidebar; only the active entry changes
    /// with the route.
    pub fn render_nav(&self, route: &str) -> Result<String> {
        let mut links = String::new();
        for link in &self.config.nav {
            links.push_str(&self.render_link(link, route)?);
        }

        let mut social = String::new();
        for item in &self.config.social_links {
            let ctx = TemplateContext::new()
                .with_var("icon", html_escape(&item.icon))
                .with_var("href", html_escape(&self.config.href(&item.link)));
            social.push_str(&self.templates.render("social", &ctx)?);
        }

        let mut ctx = TemplateContext::new()
            .with_var("home_href", html_escape(&self.config.href("/")))
            .with_var("title", html_escape(&self.config.site.title))
            .with_var("links", links)
            .with_var("social", social);

        if let Some(logo) = &self.config.theme.logo {
            ctx.insert(
                "logo",
                format!(
                    r#"<img class="logo" src="{}" alt="">"#,
                    html_escape(&self.config.href(logo))
                ),
            );
        }

        if self.config.theme.search.provider == SearchProvider::Local {
            ctx.insert(
                "search",
                r#"<div class="nav-bar-search" data-provider="local"></div>"#,
            );
        }

        Ok(self.templates.render("nav", &ctx)?)
    }

    /// Render the sidebar for a route, or `None` if no sidebar matches.
    ///
    /// Groups and items keep their configured order. A collapsed group that
    /// holds the current page is rendered open.
    pub fn render_sidebar(&self, route: &str) -> Result<Option<String>> {
        let Some(sidebar) = self.config.sidebar.resolve(route) else {
            debug!(route, "no sidebar for route");
            return Ok(None);
        };

        let mut groups = String::new();
        for group in sidebar.groups {
            let mut items = String::new();
            for item in &group.items {
                items.push_str(&self.render_link(item, route)?);
            }

            let mut ctx = TemplateContext::new()
                .with_var("text", html_escape(&group.text))
                .with_var("items", items);
            if !group.collapsed || group.contains(route) {
                ctx.insert("open", " open");
            }
            groups.push_str(&self.templates.render("group", &ctx)?);
        }

        let ctx = TemplateContext::new()
            .with_var("prefix", html_escape(sidebar.prefix))
            .with_var("groups", groups);
        Ok(Some(self.templates.render("sidebar", &ctx)?))
    }

    /// Render the doc footer with prev/next links and the last-updated text.
    pub fn render_footer(&self, route: &str, last_updated: Option<DateTime<Utc>>) -> Result<String> {
        let theme = &self.config.theme;
        let around = self.config.sidebar.prev_next(route);
        let mut ctx = TemplateContext::new();

        if let Some(prev) = around.prev {
            ctx.insert(
                "prev",
                self.footer_link("prev", &theme.doc_footer.prev, &prev),
            );
        }
        if let Some(next) = around.next {
            ctx.insert(
                "next",
                self.footer_link("next", &theme.doc_footer.next, &next),
            );
        }

        if theme.last_updated.enabled
            && let Some(timestamp) = last_updated
        {
            let formatted = format_timestamp(&timestamp, &theme.last_updated.format);
            ctx.insert(
                "last_updated",
                format!(
                    r#"<p class="last-updated">{}: <time datetime="{}">{}</time></p>"#,
                    html_escape(&theme.last_updated.text),
                    timestamp.to_rfc3339(),
                    html_escape(&formatted)
                ),
            );
        }

        Ok(self.templates.render("footer", &ctx)?)
    }

    /// Render all navigation fragments of a document.
    pub fn render_page(&self, doc: &Document) -> Result<String> {
        let last_updated = doc
            .frontmatter
            .last_updated
            .then_some(doc.last_modified)
            .flatten();

        let mut ctx = TemplateContext::new()
            .with_var("route", html_escape(&doc.route))
            .with_var("nav", self.render_nav(&doc.route)?)
            .with_var("footer", self.render_footer(&doc.route, last_updated)?);

        if doc.frontmatter.sidebar
            && let Some(sidebar) = self.render_sidebar(&doc.route)?
        {
            ctx.insert("sidebar", sidebar);
        }

        Ok(self.templates.render("page", &ctx)?)
    }

    fn render_link(&self, link: &NavLink, route: &str) -> Result<String> {
        let mut attrs = String::new();
        if link.is_external() {
            attrs.push_str(r#" target="_blank" rel="noreferrer""#);
        } else if link.is_active(route) {
            attrs.push_str(r#" class="active" aria-current="page""#);
        }

        let ctx = TemplateContext::new()
            .with_var("href", html_escape(&self.config.href(&link.link)))
            .with_var("text", html_escape(&link.text))
            .with_var("attrs", attrs);
        Ok(self.templates.render("link", &ctx)?)
    }

    fn footer_link(&self, rel: &str, label: &str, link: &NavLink) -> String {
        format!(
            r#"<a class="pager-{rel}" rel="{rel}" href="{}"><span class="desc">{}</span><span class="title">{}</span></a>"#,
            html_escape(&self.config.href(&link.link)),
            html_escape(label),
            html_escape(&link.text)
        )
    }
}

/// Format a timestamp with a `strftime` pattern, falling back to RFC 3339
/// when the pattern is invalid.
pub fn format_timestamp(timestamp: &DateTime<Utc>, format: &str) -> String {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return timestamp.to_rfc3339();
    }

    let mut out = String::new();
    if write!(out, "{}", timestamp.format(format)).is_err() {
        return timestamp.to_rfc3339();
    }
    out
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
