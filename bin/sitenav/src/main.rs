//! sitenav CLI
//!
//! Checks, resolves and renders the navigation of a Markdown documentation
//! site.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for sitenav.
#[derive(Parser)]
#[command(
    name = "sitenav",
    version,
    about = "Navigation model and link checker for documentation sites"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "sitenav.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Check navigation links against the content
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Show the sidebar resolved for a document path
    Resolve {
        /// Document path or route (e.g., net/tcp.md or /net/tcp)
        path: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write the navigation manifest and HTML fragments
    Render {
        /// Output directory
        #[arg(short, long, default_value = "public")]
        output: std::path::PathBuf,
        /// Override site base path (e.g., /docs/)
        #[arg(long)]
        base: Option<String>,
        /// Skip per-page HTML fragments
        #[arg(long)]
        no_fragments: bool,
    },
    /// Scaffold a configuration from the content layout
    Init {
        /// Content directory, relative to the configuration file
        #[arg(long, default_value = "docs")]
        content_dir: String,
        /// Site title
        #[arg(long, default_value = "Documentation")]
        title: String,
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    sitenav::init_tracing(cli.verbose);

    match cli.command {
        Commands::Check { strict } => {
            sitenav::cmd::check::run(&cli.config, strict)?;
        }
        Commands::Resolve { path, json } => {
            sitenav::cmd::resolve::run(&cli.config, &path, json)?;
        }
        Commands::Render {
            output,
            base,
            no_fragments,
        } => {
            sitenav::cmd::render::run(&cli.config, &output, base.as_deref(), !no_fragments)?;
        }
        Commands::Init {
            content_dir,
            title,
            force,
        } => {
            sitenav::cmd::init::run(&cli.config, &content_dir, &title, force)?;
        }
    }

    Ok(())
}
