//! Site configuration management.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    nav::{LinkOrigin, NavGroup, NavLink, SidebarMap, SocialLink},
    route::{is_external, normalize_base, with_base},
};

/// Main configuration structure for sitenav.
///
/// This is the whole site record: site settings, theme options, the top nav,
/// the sidebar map and social links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Theme options.
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Top-level navigation entries.
    #[serde(default)]
    pub nav: Vec<NavLink>,

    /// Sidebar groups keyed by path prefix.
    #[serde(default)]
    pub sidebar: SidebarMap,

    /// Social links shown in the header.
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Base path the site is served under (e.g. "/vitepresspages/").
    #[serde(default = "default_base")]
    pub base: String,

    /// Site description for meta tags.
    #[serde(default)]
    pub description: Option<String>,

    /// Language of the site.
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Directory holding the Markdown content, relative to the config file.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Directory names skipped while collecting content.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

/// Theme options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Logo asset path.
    #[serde(default)]
    pub logo: Option<String>,

    /// Search settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Last-updated text settings.
    #[serde(default)]
    pub last_updated: LastUpdatedConfig,

    /// Label above the page outline.
    #[serde(default)]
    pub outline: Option<String>,

    /// Labels of the previous/next links in the doc footer.
    #[serde(default)]
    pub doc_footer: DocFooterConfig,
}

/// Search provider wired into the theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProvider {
    /// Built-in local search.
    #[default]
    Local,
    /// No search box.
    None,
}

/// Search configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search provider.
    #[serde(default)]
    pub provider: SearchProvider,
}

/// Last-updated configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastUpdatedConfig {
    /// Whether to show the last-updated timestamp.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Label shown before the timestamp.
    #[serde(default = "default_last_updated_text")]
    pub text: String,

    /// `strftime` format of the timestamp.
    #[serde(default = "default_last_updated_format")]
    pub format: String,
}

/// Doc footer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocFooterConfig {
    /// Label of the previous-page link.
    #[serde(default = "default_prev_label")]
    pub prev: String,

    /// Label of the next-page link.
    #[serde(default = "default_next_label")]
    pub next: String,
}

// Default value functions
fn default_base() -> String {
    "/".to_string()
}

fn default_lang() -> String {
    "en-US".to_string()
}

fn default_content_dir() -> String {
    "docs".to_string()
}

fn default_exclude() -> Vec<String> {
    vec!["node_modules".to_string(), "public".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_last_updated_text() -> String {
    "Last updated".to_string()
}

fn default_last_updated_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

fn default_prev_label() -> String {
    "Previous page".to_string()
}

fn default_next_label() -> String {
    "Next page".to_string()
}

impl Default for LastUpdatedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            text: default_last_updated_text(),
            format: default_last_updated_format(),
        }
    }
}

impl Default for DocFooterConfig {
    fn default() -> Self {
        Self {
            prev: default_prev_label(),
            next: default_next_label(),
        }
    }
}

impl SiteConfig {
    /// Create site settings with defaults for everything but the title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            base: default_base(),
            description: None,
            lang: default_lang(),
            content_dir: default_content_dir(),
            exclude: default_exclude(),
        }
    }
}

impl Config {
    /// Create a configuration with no navigation.
    pub fn new(site: SiteConfig) -> Self {
        Self {
            site,
            theme: ThemeConfig::default(),
            nav: Vec::new(),
            sidebar: SidebarMap::new(),
            social_links: Vec::new(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            CoreError::Toml(source) => CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                source,
            ),
            other => other,
        })?;

        tracing::debug!(
            path = %path.display(),
            nav = config.nav.len(),
            sidebars = config.sidebar.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, so `SITENAV__*`
    /// environment variables override file values.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("SITENAV").separator("__"))
            .build()?;

        let mut config: Config = settings.try_deserialize()?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Replace the base path, keeping it normalized.
    pub fn set_base(&mut self, base: &str) {
        self.site.base = normalize_base(base);
    }

    /// Bring loosely written values into canonical form.
    fn normalize(&mut self) {
        let base = normalize_base(&self.site.base);
        if base != self.site.base {
            tracing::debug!(from = %self.site.base, to = %base, "normalized base path");
            self.site.base = base;
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.site.title.trim().is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.content_dir.trim().is_empty() {
            return Err(CoreError::config("site.content_dir cannot be empty"));
        }

        for link in &self.nav {
            if link.link.trim().is_empty() {
                return Err(CoreError::config(format!(
                    "nav entry '{}' has an empty link",
                    link.text
                )));
            }
        }

        for (prefix, groups) in self.sidebar.iter() {
            for group in groups {
                if let Some(item) = group.items.iter().find(|i| i.link.trim().is_empty()) {
                    return Err(CoreError::sidebar(
                        prefix,
                        format!("item '{}' in group '{}' has an empty link", item.text, group.text),
                    ));
                }
            }
        }

        self.sidebar.validate()?;

        for social in &self.social_links {
            if !is_external(&social.link) {
                tracing::warn!(link = %social.link, "social link is not an absolute URL");
            }
        }

        Ok(())
    }

    /// Every link in the top nav and the sidebar, in declaration order.
    pub fn all_links(&self) -> Vec<(LinkOrigin, &NavLink)> {
        let nav = self.nav.iter().map(|link| (LinkOrigin::Nav, link));
        let sidebar = self.sidebar.iter().flat_map(|(prefix, groups)| {
            groups.iter().flat_map(move |group: &NavGroup| {
                group.items.iter().map(move |link| {
                    (
                        LinkOrigin::Sidebar {
                            prefix: prefix.to_string(),
                            group: group.text.clone(),
                        },
                        link,
                    )
                })
            })
        });
        nav.chain(sidebar).collect()
    }

    /// Href of an internal link as served under the base path.
    pub fn href(&self, link: &str) -> String {
        with_base(&self.site.base, link)
    }

    /// Content directory resolved against the directory of the config file.
    pub fn content_dir(&self, config_path: &Path) -> std::path::PathBuf {
        let dir = Path::new(&self.site.content_dir);
        if dir.is_absolute() {
            return dir.to_path_buf();
        }
        config_path
            .parent()
            .map_or_else(|| dir.to_path_buf(), |parent| parent.join(dir))
    }
}
