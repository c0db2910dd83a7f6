//! Render command - write the navigation manifest and fragments

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use sitenav_render::{BuildStats, Builder};

use crate::load_config;

/// Run the render command.
///
/// Writes `navigation.json` and, unless disabled, one HTML fragment per page.
pub fn run(
    config_path: &Path,
    output: &Path,
    base: Option<&str>,
    fragments: bool,
) -> Result<BuildStats> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, ?base, fragments, "Starting render");

    let mut config = load_config(config_path)?;

    if let Some(base) = base {
        tracing::info!(base, "Overriding base path from CLI");
        config.set_base(base);
    }

    let content_dir = config.content_dir(config_path);
    let stats = Builder::new(config, content_dir, output)
        .with_fragments(fragments)
        .build()
        .wrap_err("Render failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Render completed successfully!");
    println!();
    println!("  Pages:      {}", stats.pages);
    println!("  Fragments:  {}", stats.fragments);
    if stats.skipped > 0 {
        println!("  Skipped:    {}", stats.skipped);
    }
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output.display());
    println!();

    tracing::info!(?stats, ?duration, "Render completed successfully");

    Ok(stats)
}
