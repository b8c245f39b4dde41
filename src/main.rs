//! Webclone main entry point
//!
//! This is the command-line interface for the Webclone website snapshot tool.

use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use webclone::config::{load_or_default, Config};
use webclone::crawler::{read_target_url, Pipeline};
use webclone::output::{load_statistics, print_statistics};
use webclone::storage::open_storage;

/// Webclone: snapshot a web page and the pages it links to
///
/// Webclone downloads one homepage and every reachable page it links to,
/// and records elapsed time and size for each in a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "webclone")]
#[command(version = "1.0.0")]
#[command(about = "Snapshot a web page and its direct links", long_about = None)]
struct Cli {
    /// Website URL to download (prompted for when omitted)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show recorded runs from the database and exit
    #[arg(long, conflicts_with = "url")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Invalid default configuration".to_string(),
    })?;

    if cli.stats {
        handle_stats(&config)
    } else {
        handle_download(&config, cli.url).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webclone=info,warn"),
            1 => EnvFilter::new("webclone=debug,info"),
            2 => EnvFilter::new("webclone=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --stats mode: shows recorded runs and their links
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.output.database_path))
        .with_context(|| format!("Failed to open {}", config.output.database_path))?;

    let stats = load_statistics(&storage)?;
    print_statistics(&stats)?;

    Ok(())
}

/// Handles the main download operation
///
/// Setup failures (database, HTTP client, reading the prompt) are returned.
/// A run that is abandoned is logged and the process still exits normally.
async fn handle_download(config: &Config, url: Option<String>) -> anyhow::Result<()> {
    tracing::info!("Database: {}", config.output.database_path);
    let storage = open_storage(Path::new(&config.output.database_path))
        .with_context(|| format!("Failed to open {}", config.output.database_path))?;

    let mut pipeline =
        Pipeline::new(config, storage).context("Failed to build the HTTP client")?;

    let url = match url {
        Some(url) => url,
        None => {
            let stdin = io::stdin();
            read_target_url(stdin.lock(), io::stdout()).context("Failed to read the URL")?
        }
    };

    match pipeline.run(&url).await {
        Ok(report) => {
            println!(
                "Saved {} into {} ({} of {} links downloaded)",
                report.target_name,
                report.directory.display(),
                report.downloaded,
                report.links_found
            );
        }
        Err(failure) => match failure.run_id {
            Some(run_id) => {
                tracing::error!("{} (run {} left unfinalized)", failure, run_id)
            }
            None => tracing::error!("{}", failure),
        },
    }

    Ok(())
}
