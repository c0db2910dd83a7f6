//! Check command - validate navigation against content

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use sitenav_check::{Diagnostic, LinkChecker, Report};

use crate::{collect_content, load_config};

/// Run the check command.
///
/// Loads the configuration, collects content and prints every finding.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking navigation and content");

    let report = check_site(config_path)?;
    print_report(&report);

    if report.error_count() > 0 {
        bail!("Check failed with {} error(s)", report.error_count());
    }

    if strict && report.warning_count() > 0 {
        bail!(
            "Check failed with {} warning(s) (strict mode)",
            report.warning_count()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Load, collect and check a site; findings are returned, not printed.
pub fn check_site(config_path: &Path) -> Result<Report> {
    println!("Checking configuration...");
    let config = match load_config(config_path) {
        Ok(config) => {
            println!("  ✓ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ✗ Configuration invalid: {e:#}");
            return Err(e);
        }
    };

    println!("\nCollecting content...");
    let content = collect_content(&config, config_path)?;
    if content.problems().is_empty() {
        println!("  ✓ {} documents collected", content.len());
    } else {
        println!(
            "  ✗ {}/{} files failed to parse",
            content.problems().len(),
            content.len() + content.problems().len()
        );
    }

    println!("\nChecking links...");
    let report = LinkChecker::new(&config, &content).run();
    println!("  ✓ {} navigation links checked", config.all_links().len());

    Ok(report)
}

fn print_report(report: &Report) {
    println!();
    println!("Summary:");
    println!("  Errors:   {}", report.error_count());
    println!("  Warnings: {}", report.warning_count());

    print_section("Errors:", "✗", report.errors());
    print_section("Warnings:", "⚠", report.warnings());
}

fn print_section<'a>(title: &str, marker: &str, diagnostics: impl Iterator<Item = &'a Diagnostic>) {
    let mut diagnostics = diagnostics.peekable();
    if diagnostics.peek().is_none() {
        return;
    }

    println!();
    println!("{title}");
    for diagnostic in diagnostics {
        println!("  {marker} {diagnostic}");
    }
}
