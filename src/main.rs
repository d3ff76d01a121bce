//! CLI entry point for folio

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Searchable, progressively revealed post feed", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Posts directory or JSON file (overrides posts_dir in _config.yml)
    #[arg(short, long, global = true)]
    posts: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank posts against a query
    #[command(alias = "s")]
    Search {
        /// Free-text query
        query: String,

        /// Maximum number of results to print
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Print the feed for a query and page
    #[command(alias = "ls")]
    List {
        /// Free-text query
        #[arg(short, long)]
        query: Option<String>,

        /// Number of pages revealed
        #[arg(long, default_value = "1")]
        page: usize,

        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse the feed interactively
    #[command(alias = "b")]
    Browse {
        /// Initial query
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let load = || -> Result<folio::Folio> {
        let app = folio::Folio::new(&base_dir)?;
        Ok(match &cli.posts {
            Some(posts) => app.with_posts_source(posts),
            None => app,
        })
    };

    match &cli.command {
        Commands::Search { query, limit } => {
            let app = load()?;
            folio::commands::search::run(&app, query, *limit)?;
        }

        Commands::List { query, page, json } => {
            let app = load()?;
            folio::commands::list::run(&app, query.as_deref(), *page, *json)?;
        }

        Commands::Browse { query } => {
            let app = load()?;
            tracing::info!("Browsing {:?}", app.posts_source);
            folio::commands::browse::run(&app, query.as_deref()).await?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
