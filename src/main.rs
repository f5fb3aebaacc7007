//! Showcase-Harvest main entry point
//!
//! This is the command-line interface for the hackathon showcase harvester.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use showcase_harvest::config::{load_config_with_hash, Config};
use showcase_harvest::crawler::Progress;
use showcase_harvest::output::{print_reports, StageReport};
use showcase_harvest::pipeline::{Pipeline, StageInput};
use showcase_harvest::Stage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Completions between progress log lines
const PROGRESS_EVERY: usize = 10;

/// Showcase-Harvest: hackathon project, event and prize tables
///
/// Showcase-Harvest walks the ETHGlobal showcase listing, project pages,
/// the hackathon index and each event's prize page, and writes one CSV
/// table per stage.
#[derive(Parser, Debug)]
#[command(name = "showcase-harvest")]
#[command(version)]
#[command(about = "Harvest hackathon showcases into CSV tables", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Validate config and show each stage's input and output without fetching
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Command,
}

/// Command-line overrides applied on top of the configuration file
#[derive(Args, Debug)]
struct Overrides {
    /// Showcase event filter (e.g. "bangkok")
    #[arg(long, global = true)]
    event: Option<String>,

    /// Number of showcase listing pages
    #[arg(long, global = true)]
    pages: Option<u32>,

    /// Maximum number of pages in flight
    #[arg(long, global = true)]
    concurrency: Option<u32>,

    /// Directory the CSV tables are written to
    #[arg(short, long, global = true)]
    output_dir: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect project URLs from the showcase listing
    Links,

    /// Scrape every project page listed in the project URL table
    Details {
        /// Read project URLs from this table instead of the links output
        #[arg(long, value_name = "CSV")]
        input: Option<PathBuf>,
    },

    /// Collect event URLs from the hackathon index
    Events,

    /// Derive name, location and year for every event
    EventDetails {
        /// Read event URLs from this table instead of the events output
        #[arg(long, value_name = "CSV")]
        input: Option<PathBuf>,
    },

    /// Scrape the prize page of every event
    Prizes {
        /// Read event URLs from this table instead of the events output
        #[arg(long, value_name = "CSV")]
        input: Option<PathBuf>,
    },

    /// Run every stage in order
    All,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    apply_overrides(&mut config, &cli.overrides);

    let pipeline = Pipeline::new(config)
        .context("invalid configuration")?
        .with_progress(Arc::new(log_progress));

    if cli.dry_run {
        return handle_dry_run(&pipeline, &cli.command);
    }

    let reports = run_command(&pipeline, cli.command).await?;
    if !cli.quiet {
        print_reports(&reports);
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
            0 => EnvFilter::new("showcase_harvest=info,warn"),
            1 => EnvFilter::new("showcase_harvest=debug,info"),
            2 => EnvFilter::new("showcase_harvest=trace,debug"),
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

fn apply_overrides(config: &mut Config, overrides: &Overrides) {
    if let Some(event) = &overrides.event {
        config.showcase.event = event.clone();
    }
    if let Some(pages) = overrides.pages {
        config.showcase.total_pages = pages;
    }
    if let Some(concurrency) = overrides.concurrency {
        config.scraper.max_concurrency = concurrency;
    }
    if let Some(dir) = &overrides.output_dir {
        config.output.directory = dir.clone();
    }
}

fn log_progress(progress: Progress) {
    if progress.completed % PROGRESS_EVERY == 0 || progress.completed == progress.total {
        tracing::info!(
            "Progress: {}/{} pages done, {} failed",
            progress.completed,
            progress.total,
            progress.failed
        );
    }
}

async fn run_command(pipeline: &Pipeline, command: Command) -> anyhow::Result<Vec<StageReport>> {
    let report = match command {
        Command::Links => pipeline.project_links().await?,
        Command::Details { input } => {
            let urls = pipeline.read_input(Stage::ProjectDetails, input.as_deref())?;
            pipeline.project_details(urls).await?
        }
        Command::Events => pipeline.events().await?,
        Command::EventDetails { input } => {
            let urls = pipeline.read_input(Stage::EventDetails, input.as_deref())?;
            pipeline.event_details(urls).await?
        }
        Command::Prizes { input } => {
            let urls = pipeline.read_input(Stage::Prizes, input.as_deref())?;
            pipeline.prizes(urls).await?
        }
        Command::All => return Ok(pipeline.run_all().await?),
    };

    Ok(vec![report])
}

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(pipeline: &Pipeline, command: &Command) -> anyhow::Result<()> {
    let config = pipeline.config();
    println!("=== Showcase-Harvest Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Base URL: {}", config.scraper.base_url);
    println!("  Max concurrency: {}", config.scraper.max_concurrency);
    println!("  Request timeout: {}s", config.scraper.request_timeout_secs);
    println!("  Connect timeout: {}s", config.scraper.connect_timeout_secs);
    println!(
        "  Retries: {} (delay {}ms)",
        config.scraper.max_retries, config.scraper.retry_delay_ms
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nShowcase:");
    println!("  Event: {}", config.showcase.event);
    println!("  Pages: {}", config.showcase.total_pages);

    println!("\nStages:");
    for plan in pipeline.plan()? {
        if !selected(command, plan.stage) {
            continue;
        }
        println!("  {}:", plan.stage);
        match &plan.input {
            StageInput::Urls(urls) => {
                println!("    Input: {} URLs", urls.len());
                if let (Some(first), Some(last)) = (urls.first(), urls.last()) {
                    println!("      first: {}", first);
                    if urls.len() > 1 {
                        println!("      last:  {}", last);
                    }
                }
            }
            StageInput::Table { path, column } => {
                println!("    Input: column '{}' of {}{}", column, path.display(), presence(path));
            }
        }
        println!("    Output: {}", plan.output.display());
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

fn selected(command: &Command, stage: Stage) -> bool {
    match command {
        Command::Links => stage == Stage::ProjectLinks,
        Command::Details { .. } => stage == Stage::ProjectDetails,
        Command::Events => stage == Stage::Events,
        Command::EventDetails { .. } => stage == Stage::EventDetails,
        Command::Prizes { .. } => stage == Stage::Prizes,
        Command::All => true,
    }
}

fn presence(path: &Path) -> &'static str {
    if path.exists() {
        ""
    } else {
        " (not yet written)"
    }
}
