//! Resolve command - show the sidebar a document gets

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use serde::Serialize;
use sitenav_core::{Config, NavGroup, PrevNext, route::normalize_route};

use crate::load_config;

/// Sidebar resolution for one document.
#[derive(Debug, Serialize)]
pub struct Resolution<'a> {
    /// Normalized route of the document.
    pub route: String,

    /// Sidebar key that matched.
    pub prefix: Option<&'a str>,

    /// Groups shown in the sidebar.
    pub groups: &'a [NavGroup],

    /// Neighbouring pages.
    #[serde(flatten)]
    pub around: PrevNext,
}

impl<'a> Resolution<'a> {
    /// Resolve `path` against the configured sidebar.
    pub fn new(config: &'a Config, path: &str) -> Self {
        let route = normalize_route(path);
        let (prefix, groups) = match config.sidebar.resolve(&route) {
            Some(sidebar) => (Some(sidebar.prefix), sidebar.groups),
            None => (None, &[][..]),
        };

        Self {
            prefix,
            groups,
            around: config.sidebar.prev_next(&route),
            route,
        }
    }
}

/// Run the resolve command.
pub fn run(config_path: &Path, path: &str, json: bool) -> Result<()> {
    tracing::info!(?config_path, path, json, "Resolving sidebar");

    let config = load_config(config_path)?;
    let resolution = Resolution::new(&config, path);

    if json {
        let out = serde_json::to_string_pretty(&resolution)
            .wrap_err("Failed to serialize resolution")?;
        println!("{out}");
        return Ok(());
    }

    println!("Route:   {}", resolution.route);
    let Some(prefix) = resolution.prefix else {
        println!("Sidebar: none");
        return Ok(());
    };

    println!("Sidebar: {prefix}");
    for group in resolution.groups {
        let state = if group.collapsed { " (collapsed)" } else { "" };
        println!();
        println!("  {}{state}", group.text);
        for item in &group.items {
            let marker = if item.is_active(&resolution.route) { "▸" } else { " " };
            println!("  {marker} {} → {}", item.text, config.href(&item.link));
        }
    }

    println!();
    if let Some(prev) = &resolution.around.prev {
        println!("Prev:    {} ({})", prev.text, prev.link);
    }
    if let Some(next) = &resolution.around.next {
        println!("Next:    {} ({})", next.text, next.link);
    }

    Ok(())
}
