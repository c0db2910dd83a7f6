//! HTML template system for navigation fragments.
//!
//! Variables are written as `{{ name }}`; `{{ name? }}` renders as empty
//! when the variable is missing. Values are inserted verbatim, so callers
//! escape text before putting it into a context.

use std::collections::HashMap;

use thiserror::Error;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Template not found.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Invalid template syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Template context with variables for interpolation.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Create context with initial variables.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// A named template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    /// Create a new template with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Get the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the template with the given context.
    ///
    /// Inserted values are never scanned for placeholders again.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut result = String::with_capacity(self.content.len());
        let mut rest = self.content.as_str();

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| {
                TemplateError::InvalidSyntax(format!("unclosed {{{{ in template '{}'", self.name))
            })?;

            let var_name = after[..end].trim();
            let (var_name, optional) = match var_name.strip_suffix('?') {
                Some(stripped) => (stripped.trim(), true),
                None => (var_name, false),
            };

            match context.get(var_name) {
                Some(value) => result.push_str(value),
                None if optional => {}
                None => return Err(TemplateError::MissingVariable(var_name.to_string())),
            }

            rest = &after[end + 2..];
        }
        result.push_str(rest);

        Ok(result)
    }
}

/// Registry of templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create a new registry with the built-in templates.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        self.register(Template::new("nav", DEFAULT_NAV_TEMPLATE));
        self.register(Template::new("link", DEFAULT_LINK_TEMPLATE));
        self.register(Template::new("social", DEFAULT_SOCIAL_TEMPLATE));
        self.register(Template::new("sidebar", DEFAULT_SIDEBAR_TEMPLATE));
        self.register(Template::new("group", DEFAULT_GROUP_TEMPLATE));
        self.register(Template::new("footer", DEFAULT_FOOTER_TEMPLATE));
        self.register(Template::new("page", DEFAULT_PAGE_TEMPLATE));
    }

    /// Register a template, replacing any template with the same name.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        template.render(context)
    }
}

/// Header bar with site title, top nav and social links.
pub const DEFAULT_NAV_TEMPLATE: &str = r#"<header class="nav-bar">
  <a class="nav-bar-title" href="{{ home_href }}">{{ logo? }}<span>{{ title }}</span></a>
  <nav class="nav-bar-links"><ul>{{ links }}</ul></nav>{{ search? }}
  <div class="nav-bar-social">{{ social? }}</div>
</header>
"#;

/// A single list item link.
pub const DEFAULT_LINK_TEMPLATE: &str =
    r#"<li><a href="{{ href }}"{{ attrs? }}>{{ text }}</a></li>"#;

/// A social icon link.
pub const DEFAULT_SOCIAL_TEMPLATE: &str = r#"<a class="social-link social-{{ icon }}" href="{{ href }}" aria-label="{{ icon }}" target="_blank" rel="noreferrer">{{ icon }}</a>"#;

/// Sidebar wrapper.
pub const DEFAULT_SIDEBAR_TEMPLATE: &str = r#"<aside class="sidebar" data-prefix="{{ prefix }}">
{{ groups }}</aside>
"#;

/// One collapsible sidebar group.
pub const DEFAULT_GROUP_TEMPLATE: &str = r#"  <details class="sidebar-group"{{ open? }}>
    <summary>{{ text }}</summary>
    <ul>{{ items }}</ul>
  </details>
"#;

/// Doc footer with last-updated text and prev/next links.
pub const DEFAULT_FOOTER_TEMPLATE: &str = r#"<footer class="doc-footer">
  {{ last_updated? }}
  <nav class="prev-next">{{ prev? }}{{ next? }}</nav>
</footer>
"#;

/// All navigation fragments of one page.
pub const DEFAULT_PAGE_TEMPLATE: &str = r#"<!-- {{ route }} -->
{{ nav }}{{ sidebar? }}{{ footer }}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_template() {
        let template = Template::new("test", "Hello, {{ name }}!");
        let ctx = TemplateContext::new().with_var("name", "World");

        let result = template.render(&ctx).expect("render");
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_optional_variable() {
        let template = Template::new("test", "<a{{ attrs? }}>x</a>");
        let result = template.render(&TemplateContext::new()).expect("render");
        assert_eq!(result, "<a>x</a>");
    }

    #[test]
    fn test_missing_required_variable() {
        let template = Template::new("test", "{{ required }}");
        let err = template.render(&TemplateContext::new()).expect_err("missing");
        assert!(matches!(err, TemplateError::MissingVariable(ref v) if v == "required"));
    }

    #[test]
    fn test_unclosed_delimiter() {
        let template = Template::new("broken", "{{ open");
        let err = template.render(&TemplateContext::new()).expect_err("unclosed");
        assert!(matches!(err, TemplateError::InvalidSyntax(_)));
    }

    #[test]
    fn test_inserted_values_are_not_expanded() {
        let template = Template::new("test", "{{ a }}|{{ b }}");
        let ctx = TemplateContext::new()
            .with_var("a", "{{ b }}")
            .with_var("b", "B");
        assert_eq!(template.render(&ctx).expect("render"), "{{ b }}|B");
    }

    #[test]
    fn test_registry_defaults() {
        let registry = TemplateRegistry::new();
        for name in ["nav", "link", "social", "sidebar", "group", "footer", "page"] {
            assert!(registry.get(name).is_some(), "missing template {name}");
        }
        assert!(matches!(
            registry.render("nope", &TemplateContext::new()),
            Err(TemplateError::NotFound(_))
        ));
    }

    #[test]
    fn test_registry_override() {
        let mut registry = TemplateRegistry::new();
        registry.register(Template::new("link", "[{{ text }}]({{ href }})"));
        let ctx = TemplateContext::new()
            .with_var("text", "TCP")
            .with_var("href", "/net/tcp");
        assert_eq!(registry.render("link", &ctx).expect("render"), "[TCP](/net/tcp)");
    }
}
