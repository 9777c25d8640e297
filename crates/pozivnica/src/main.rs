//! Pozivnica CLI - wedding invitation generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "pozivnica")]
#[command(about = "Static wedding invitation generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to pozivnica.toml config file
    #[arg(short, long, default_value = "pozivnica.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Options shared by the generating commands.
#[derive(Args, Debug, Clone)]
pub struct GenerateOptions {
    /// Wedding data as inline JSON instead of the data directory
    #[arg(long)]
    data: Option<String>,

    /// Minify stylesheets
    #[arg(long)]
    minify: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold config, sample data and a minimal template set
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate a classic preview with every theme
    Preview {
        /// Wedding slug
        slug: String,

        #[command(flatten)]
        options: GenerateOptions,
    },

    /// Generate a preview for one 2026 layout, or for all of them
    Layout {
        /// Layout name (the slug when --all is given)
        name: Option<String>,

        /// Wedding slug
        slug: Option<String>,

        /// Generate every layout
        #[arg(long, conflicts_with = "list")]
        all: bool,

        /// List available layouts
        #[arg(short, long)]
        list: bool,

        #[command(flatten)]
        options: GenerateOptions,
    },

    /// Generate the final site for a chosen theme
    Final {
        /// Wedding slug
        slug: String,

        /// Chosen theme
        theme: String,

        /// Layout the theme belongs to
        #[arg(long, default_value = "classic")]
        layout: String,

        /// Delete the preview afterwards
        #[arg(long)]
        cleanup: bool,

        #[command(flatten)]
        options: GenerateOptions,
    },

    /// Delete expired previews
    Cleanup {
        /// Report what would be deleted without deleting
        #[arg(long)]
        dry_run: bool,
    },

    /// Serve the public directory
    Serve {
        /// Port to listen on (defaults to config or 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory to serve (defaults to config or "public")
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Preview { slug, options } => {
            commands::preview::run(&cli.config, &slug, options).await?;
        }
        Commands::Layout {
            name,
            slug,
            all,
            list,
            options,
        } => {
            let target = if list {
                commands::layout::Target::List
            } else if all {
                commands::layout::Target::All { slug: name.or(slug) }
            } else {
                commands::layout::Target::One { name, slug }
            };
            commands::layout::run(&cli.config, target, options).await?;
        }
        Commands::Final {
            slug,
            theme,
            layout,
            cleanup,
            options,
        } => {
            commands::finalize::run(&cli.config, &slug, &theme, &layout, cleanup, options).await?;
        }
        Commands::Cleanup { dry_run } => {
            commands::cleanup::run(&cli.config, dry_run).await?;
        }
        Commands::Serve { port, dir, no_open } => {
            commands::serve::run(&cli.config, port, dir, !no_open).await?;
        }
    }

    Ok(())
}
