//! Build orchestration.
//!
//! Collects content, resolves navigation for every page and writes the
//! manifest plus optional per-page HTML fragments.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use rayon::prelude::*;
use sitenav_content::{CollectorError, ContentCollector, ContentTree};
use sitenav_core::Config;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    html::{HtmlError, NavRenderer},
    manifest::{Manifest, ManifestError},
};

/// Directory inside the output that holds per-page fragments.
pub const FRAGMENTS_DIR: &str = "fragments";

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// HTML generation error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    /// Manifest error.
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of pages in the manifest.
    pub pages: usize,

    /// Number of HTML fragments written.
    pub fragments: usize,

    /// Files skipped because they failed to collect.
    pub skipped: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Writes navigation output for a site.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    content_dir: PathBuf,
    output_dir: PathBuf,
    fragments: bool,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(
        config: Config,
        content_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            content_dir: content_dir.into(),
            output_dir: output_dir.into(),
            fragments: true,
        }
    }

    /// Enable or disable per-page HTML fragments.
    #[must_use]
    pub fn with_fragments(mut self, fragments: bool) -> Self {
        self.fragments = fragments;
        self
    }

    /// Execute the build.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            content = %self.content_dir.display(),
            output = %self.output_dir.display(),
            base = %self.config.site.base,
            "starting build"
        );

        let content = ContentCollector::new(&self.content_dir)
            .with_exclude(self.config.site.exclude.iter().cloned())
            .collect()?;

        for problem in content.problems() {
            warn!(path = %problem.path, error = %problem.message, "skipping file");
        }
        stats.skipped = content.problems().len();

        self.clean_output()?;

        let manifest = Manifest::build(&self.config, &content);
        stats.pages = manifest.pages.len();
        manifest.write(&self.output_dir)?;

        if self.fragments {
            stats.fragments = self.write_fragments(&content)?;
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            pages = stats.pages,
            fragments = stats.fragments,
            skipped = stats.skipped,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Remove stale output.
    fn clean_output(&self) -> Result<()> {
        let fragments = self.output_dir.join(FRAGMENTS_DIR);
        if fragments.exists() {
            debug!(dir = %fragments.display(), "cleaning fragments directory");
            fs::remove_dir_all(&fragments)?;
        }
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Render and write one fragment per document, in parallel.
    fn write_fragments(&self, content: &ContentTree) -> Result<usize> {
        let renderer = NavRenderer::new(&self.config);
        let docs: Vec<_> = content.documents().collect();

        info!(count = docs.len(), "writing navigation fragments");

        let results: Vec<_> = docs
            .par_iter()
            .map(|doc| {
                let html = renderer.render_page(doc)?;
                let path = fragment_path(&self.output_dir, &doc.route);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, html)?;
                debug!(path = %path.display(), "wrote fragment");
                Ok::<_, BuildError>(())
            })
            .collect();

        let mut written = 0;
        for result in results {
            result?;
            written += 1;
        }
        Ok(written)
    }
}

/// Output path of the fragment for a route.
///
/// Directory routes map to `index.html` inside the directory.
#[must_use]
pub fn fragment_path(output_dir: &Path, route: &str) -> PathBuf {
    let mut path = output_dir.join(FRAGMENTS_DIR);
    let mut segments: Vec<&str> = route.split('/').filter(|s| !s.is_empty()).collect();

    // `v1.2` keeps its dot; the suffix is appended, never swapped in
    let file = match segments.pop() {
        Some(name) if !route.ends_with('/') => format!("{name}.html"),
        Some(name) => {
            segments.push(name);
            "index.html".to_string()
        }
        None => "index.html".to_string(),
    };

    path.extend(segments);
    path.push(file);
    path
}
