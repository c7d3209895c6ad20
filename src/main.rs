//! Link-Harvest main entry point
//!
//! This is the command-line interface for the Link-Harvest link mapper.

use anyhow::Context;
use clap::Parser;
use link_harvest::config::{load_config, validate, Config};
use link_harvest::crawler::{build_http_client, probe_url, Coordinator, ProgressEvent, ProgressSink};
use link_harvest::output::{prepare_output_dir, print_detailed_stats, save_results};
use link_harvest::url::parse_seed;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Link-Harvest: a bounded-depth link mapper
///
/// Link-Harvest fetches a seed page, records every link it references,
/// classifies them by content type, and follows same-site page links up to
/// the requested depth.
#[derive(Parser, Debug)]
#[command(name = "link-harvest")]
#[command(version)]
#[command(about = "A bounded-depth link mapper", long_about = None)]
struct Cli {
    /// Seed URL (http or https)
    #[arg(value_name = "URL")]
    url: String,

    /// Maximum depth to follow same-site page links
    #[arg(value_name = "MAX_DEPTH")]
    max_depth: Option<u32>,

    /// Directory receiving the session folder
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of concurrent page fetches
    #[arg(long, value_name = "N")]
    workers: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Overall run deadline in seconds
    #[arg(long, value_name = "SECS")]
    deadline: Option<u64>,

    /// Do not write any result files
    #[arg(long)]
    no_save: bool,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Validate settings and show what would be harvested without fetching
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let seed = parse_seed(&cli.url).with_context(|| format!("invalid seed URL '{}'", cli.url))?;

    if cli.dry_run {
        print_dry_run(&config, seed.as_str());
        return Ok(());
    }

    // The output location must be usable before any fetch is issued
    if let Some(dir) = &config.output.output_dir {
        prepare_output_dir(Path::new(dir))
            .with_context(|| format!("cannot create output directory '{}'", dir))?;
    }

    let client = build_http_client(&config).context("failed to build HTTP client")?;

    tracing::info!("Testing connection to {}", seed);
    match probe_url(&client, seed.as_str()).await {
        Ok(status) => tracing::info!("Connection OK (status {})", status),
        Err(e) => tracing::warn!("Connection test failed: {} (continuing)", e),
    }

    let progress: ProgressSink = Arc::new(|event: ProgressEvent| match event {
        ProgressEvent::Fetching { depth, url } => {
            tracing::info!("[Depth {}] Scraping: {}", depth, url);
        }
        ProgressEvent::CategoryTotal { category, count } => {
            tracing::info!("{}: {}", category.label(), count);
        }
    });

    let output = config.output.clone();
    let result = Coordinator::new(seed.as_str(), config)?
        .with_client(client)
        .with_progress(progress)
        .run()
        .await;

    if let Some(dir) = &output.output_dir {
        match save_results(&result, Path::new(dir), output.write_markdown) {
            Ok(session_dir) => tracing::info!("Results saved to: {}", session_dir.display()),
            Err(e) => tracing::error!("Error saving results: {}", e),
        }
    }

    if !cli.quiet {
        print_detailed_stats(&result);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_harvest=info,warn"),
            1 => EnvFilter::new("link_harvest=debug,info"),
            2 => EnvFilter::new("link_harvest=trace,debug"),
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

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(workers) = cli.workers {
        config.crawler.max_concurrent_pages_open = workers;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.request_timeout_secs = timeout;
    }
    if cli.deadline.is_some() {
        config.crawler.run_deadline_secs = cli.deadline;
    }
    if cli.insecure {
        config.crawler.accept_invalid_certs = true;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.output_dir = Some(dir.display().to_string());
    }
    if cli.no_save {
        config.output.output_dir = None;
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective settings
fn print_dry_run(config: &Config, seed: &str) {
    println!("=== Link-Harvest Dry Run ===\n");
    println!("Seed: {}", seed);

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages_open
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout_secs);
    match config.crawler.run_deadline_secs {
        Some(secs) => println!("  Run deadline: {}s", secs),
        None => println!("  Run deadline: none"),
    }
    println!(
        "  Accept invalid certificates: {}",
        config.crawler.accept_invalid_certs
    );

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    match &config.output.output_dir {
        Some(dir) => println!("  Directory: {}", dir),
        None => println!("  Directory: none (results are not saved)"),
    }
    println!("  Markdown summary: {}", config.output.write_markdown);

    println!("\nConfiguration is valid");
}
