use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cache;
mod report;
mod search;

#[derive(Debug, Parser)]
#[command(name = "dealfinder")]
#[command(about = "Search a grocery weekly ad for deals on the items you care about")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Running without a subcommand searches with these arguments.
    #[command(flatten)]
    search: SearchArgs,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search the weekly ad (the default command)
    Search(SearchArgs),
    /// Inspect or clear cached weekly-ad snapshots
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Debug, Clone, Default, Args)]
struct SearchArgs {
    /// Item to search for; repeat or comma-separate for several
    #[arg(short, long = "search", value_name = "TERM", value_delimiter = ',')]
    search: Vec<String>,

    /// Store number, e.g. 0865 (defaults to the generic weekly ad)
    #[arg(long, value_name = "NUMBER")]
    store: Option<String>,

    /// YAML search profile (overrides DEALFINDER_CONFIG_PATH)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read a browser-rendered page from disk instead of fetching it
    #[arg(long, value_name = "PATH")]
    html_file: Option<PathBuf>,

    /// Skip the snapshot cache for this run
    #[arg(long)]
    no_cache: bool,

    /// Maximum snapshot age in seconds
    #[arg(long, value_name = "SECS")]
    cache_ttl: Option<u64>,

    /// Print results as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum CacheCommands {
    /// List cached snapshots with their age
    Show,
    /// Remove one store's snapshot, or all snapshots
    Clear {
        #[arg(long, value_name = "NUMBER")]
        store: Option<String>,
    },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = dealfinder_core::load_app_config().context("invalid configuration")?;
    init_tracing(&config.log_level);
    tracing::debug!(env = %config.env, "configuration loaded");

    match cli.command {
        Some(Commands::Search(args)) => search::run_search(&args, &config).await,
        Some(Commands::Cache { command }) => cache::run_cache_command(&command, &config),
        None => search::run_search(&cli.search, &config).await,
    }
}
