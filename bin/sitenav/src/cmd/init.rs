//! Init command - scaffold a configuration from the content layout

use std::{collections::BTreeMap, fs, path::Path};

use color_eyre::eyre::{Result, WrapErr, bail};
use sitenav_content::{ContentCollector, Document};
use sitenav_core::{Config, NavGroup, NavLink, SiteConfig};

/// Run the init command.
///
/// Writes a configuration whose sidebar has one key per top-level content
/// directory.
pub fn run(config_path: &Path, content_dir: &str, title: &str, force: bool) -> Result<Config> {
    tracing::info!(?config_path, content_dir, title, force, "Scaffolding configuration");

    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    let mut site = SiteConfig::new(title);
    site.content_dir = content_dir.to_string();
    let mut config = Config::new(site);

    let scan_dir = config.content_dir(config_path);
    let content = ContentCollector::new(&scan_dir)
        .with_exclude(config.site.exclude.iter().cloned())
        .collect()
        .wrap_err_with(|| format!("Failed to collect content from {}", scan_dir.display()))?;

    for problem in content.problems() {
        println!("  ⚠ skipped {}: {}", problem.path, problem.message);
    }

    let docs: Vec<&Document> = content.documents().collect();
    scaffold(&mut config, &docs);

    let toml = config.to_toml().wrap_err("Failed to serialize configuration")?;
    if let Some(parent) = config_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).wrap_err("Failed to create directories")?;
    }
    fs::write(config_path, toml).wrap_err("Failed to write configuration")?;

    tracing::info!(?config_path, sections = config.sidebar.len(), "Wrote configuration");
    println!("Created: {}", config_path.display());
    println!("  Documents: {}", docs.len());
    println!("  Sections:  {}", config.sidebar.len());

    Ok(config)
}

/// Fill the nav and sidebar from the collected documents.
///
/// Pages at the top of the content directory become nav entries after
/// "Home". Every top-level directory becomes a nav entry and a sidebar key
/// holding one group; the directory's index page comes first, the rest
/// follow in path order.
pub fn scaffold(config: &mut Config, docs: &[&Document]) {
    if docs.iter().any(|doc| doc.route == "/") {
        config.nav.push(NavLink::new("Home", "/"));
    }

    let mut pages: Vec<&Document> = Vec::new();
    let mut sections: BTreeMap<&str, Vec<&Document>> = BTreeMap::new();
    for &doc in docs {
        match doc.path.split_once('/') {
            Some((dir, _)) => sections.entry(dir).or_default().push(doc),
            None if doc.route != "/" => pages.push(doc),
            None => {}
        }
    }

    pages.sort_by(|a, b| a.path.cmp(&b.path));
    for doc in pages {
        config.nav.push(NavLink::new(doc.title.as_str(), doc.route.as_str()));
    }

    for (dir, mut pages) in sections {
        let prefix = format!("/{dir}/");
        pages.sort_by(|a, b| {
            (a.route != prefix)
                .cmp(&(b.route != prefix))
                .then_with(|| a.path.cmp(&b.path))
        });

        let index = pages.iter().find(|doc| doc.route == prefix);
        let text = index.map_or(dir, |doc| doc.title.as_str());
        let target = index.or(pages.first()).map_or(prefix.clone(), |doc| doc.route.clone());

        let group = pages
            .iter()
            .fold(NavGroup::new(text), |group, doc| {
                group.with_item(doc.title.as_str(), doc.route.as_str())
            });

        config.nav.push(NavLink::new(text, target));
        config.sidebar.insert(prefix, vec![group]);
    }
}
