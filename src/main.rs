//! Webcrawler main entry point
//!
//! This is the command-line interface for the durable breadth-first crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use webcrawler::config::{apply_overrides, load_config_with_hash, Config, Overrides};
use webcrawler::crawler::{crawl, Coordinator};
use webcrawler::storage::{Frontier, KvStore, PageStore, SqlitePageStore};

/// Webcrawler: a durable breadth-first crawler
///
/// Crawls from an initial URL up to a maximum depth, directly, through a
/// forward proxy or through an overlay network's HTTP proxy. The frontier and
/// visited index survive restarts, so an interrupted crawl resumes where it
/// stopped.
#[derive(Parser, Debug)]
#[command(name = "webcrawler")]
#[command(version)]
#[command(about = "A durable breadth-first web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used without one)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Number of pages fetched concurrently per batch
    #[arg(long)]
    max_concurrency: Option<usize>,

    /// Maximum link depth from the initial URL
    #[arg(long)]
    max_depth: Option<u32>,

    /// Initial URL, used when the frontier is empty
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Fetch through the forward proxy
    #[arg(long)]
    proxy: bool,

    /// Forward proxy URL
    #[arg(long, value_name = "URL")]
    proxy_url: Option<String>,

    /// Fetch through the overlay network proxy
    #[arg(long)]
    overlay: bool,

    /// Keep the frontier and visited index in memory only
    #[arg(long)]
    mem: bool,

    /// Comma-separated TLD allow-list, e.g. "com,br,i2p"
    #[arg(long)]
    tlds: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the frontier and exit
    #[arg(long, conflicts_with_all = ["search", "sync_only"])]
    show_queue: bool,

    /// Search stored pages by word, title or description and exit
    #[arg(long, value_name = "TERM", conflicts_with_all = ["show_queue", "sync_only"])]
    search: Option<String>,

    /// Mark stored pages as visited and exit
    #[arg(long, conflicts_with_all = ["show_queue", "search"])]
    sync_only: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            max_concurrency: self.max_concurrency,
            max_depth: self.max_depth,
            initial_url: self.url.clone(),
            proxy_enabled: self.proxy,
            proxy_url: self.proxy_url.clone(),
            overlay_enabled: self.overlay,
            memory_cache: self.mem,
            tlds: self.tlds.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(&cli)?;

    // Handle different modes
    if cli.show_queue {
        handle_show_queue(&config)
    } else if let Some(term) = &cli.search {
        handle_search(&config, term)
    } else if cli.sync_only {
        handle_sync(config)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webcrawler=info,warn"),
            1 => EnvFilter::new("webcrawler=debug,info"),
            2 => EnvFilter::new("webcrawler=trace,debug"),
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

/// Loads the config file if one was given, then applies command-line flags
fn load(cli: &Cli) -> anyhow::Result<Config> {
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    apply_overrides(config, &cli.overrides()).context("Invalid command-line override")
}

/// Handles --show-queue: prints every frontier entry
fn handle_show_queue(config: &Config) -> anyhow::Result<()> {
    let store = KvStore::open(config.cache.mode, &config.cache.dir)
        .context("Failed to open frontier cache")?;
    let frontier = Frontier::new(Arc::new(store));

    let entries = frontier.read_all().context("Failed to read frontier")?;
    for entry in &entries {
        println!("{}\t{}", entry.depth, entry.url);
    }
    println!("{} URLs queued", entries.len());

    Ok(())
}

/// Handles --search: prints word-frequency hits, then the combined result set
fn handle_search(config: &Config, term: &str) -> anyhow::Result<()> {
    let pages = SqlitePageStore::new(Path::new(&config.output.database_path))
        .context("Failed to open page store")?;

    println!("=== Pages containing \"{}\" (by frequency) ===", term);
    for hit in pages.search_by_word_frequency(&term.to_lowercase())? {
        println!("{}", serde_json::to_string(&hit)?);
    }

    println!("\n=== All matches ===");
    let results = pages.search(term)?;
    for hit in &results {
        println!("{}", serde_json::to_string(hit)?);
    }
    println!("{} pages found", results.len());

    Ok(())
}

/// Handles --sync-only: rebuilds visited marks from the page store
fn handle_sync(config: Config) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config).context("Failed to open stores")?;
    let marked = coordinator.sync().context("Recovery sync failed")?;
    println!("{} URLs marked visited", marked);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Initial URL: {}, TLDs: {}",
        config.crawler.initial_url,
        if config.filter.tlds.is_empty() {
            "any"
        } else {
            config.filter.tlds.as_str()
        }
    );

    let summary = crawl(config).await.context("Crawl failed")?;
    if summary.aborted {
        anyhow::bail!(
            "Crawl stopped after {} storage errors, {} pages stored",
            summary.storage_errors,
            summary.processed()
        );
    }
    tracing::info!("Crawl finished: {} pages stored", summary.processed());

    Ok(())
}
