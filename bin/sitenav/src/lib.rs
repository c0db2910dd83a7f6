//! sitenav CLI Library
//!
//! Command implementations for the `sitenav` binary, exposed as a library so
//! they can be driven from integration tests.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (check, resolve, render, init)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use sitenav::cmd;
//!
//! // Check a site
//! cmd::check::run(Path::new("sitenav.toml"), false).unwrap();
//! ```

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};

pub mod cmd;

pub use sitenav_check::{LinkChecker, Report};
pub use sitenav_content::{ContentCollector, ContentTree};
pub use sitenav_core::Config;
pub use sitenav_render::{BuildStats, Builder};

/// Prefix of environment variables that override configuration values.
pub const ENV_PREFIX: &str = "SITENAV__";

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

/// Load the configuration, layering `SITENAV__*` overrides when any are set.
pub fn load_config(path: &Path) -> Result<Config> {
    let has_overrides = std::env::vars_os()
        .any(|(key, _)| key.to_string_lossy().starts_with(ENV_PREFIX));

    let config = if has_overrides {
        tracing::debug!("applying environment overrides");
        Config::load_with_env(path)
    } else {
        Config::load(path)
    };
    config.wrap_err_with(|| format!("Failed to load configuration from {}", path.display()))
}

/// Collect the content tree the configuration points at.
pub fn collect_content(config: &Config, config_path: &Path) -> Result<ContentTree> {
    let content_dir = config.content_dir(config_path);
    ContentCollector::new(&content_dir)
        .with_exclude(config.site.exclude.iter().cloned())
        .collect()
        .wrap_err_with(|| format!("Failed to collect content from {}", content_dir.display()))
}
