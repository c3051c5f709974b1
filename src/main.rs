//! hostcrawl main entry point
//!
//! This is the command-line interface for the same-host crawler. Settings come
//! from an optional TOML file, then flags; a missing seed URL or page budget is
//! asked for interactively.

use anyhow::{bail, Context};
use clap::Parser;
use hostcrawl::config::{load_config, validate, Config};
use hostcrawl::crawler::Crawler;
use hostcrawl::output::print_report;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// hostcrawl: crawl every page on one host
///
/// Starting from a seed URL, hostcrawl follows links that stay on the seed's
/// host and are allowed by robots.txt. It stops after a fixed number of pages.
#[derive(Parser, Debug)]
#[command(name = "hostcrawl")]
#[command(version)]
#[command(about = "A same-host web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// URL to start crawling from
    #[arg(short, long, value_name = "URL")]
    url: Option<String>,

    /// Maximum number of pages to crawl, start page included
    #[arg(short = 'n', long, value_name = "N")]
    max_pages: Option<usize>,

    /// Maximum number of pages fetched at once
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Per-request timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

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

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    let crawler = Crawler::from_config(&config)
        .context("Failed to start crawl")?
        .on_visit(|url| println!("visited: {}", url));

    let report = crawler.run().await;
    print_report(&report);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hostcrawl=info,warn"),
            1 => EnvFilter::new("hostcrawl=debug,info"),
            2 => EnvFilter::new("hostcrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(io::stderr)
        .init();
}

/// Layers file, flags and prompts into one validated configuration
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(url) = &cli.url {
        config.crawler.seed_url = Some(url.clone());
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = Some(max_pages);
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency_limit = concurrency;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.crawler.fetch_timeout_ms = timeout_ms;
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();

    if config.crawler.seed_url.is_none() {
        let seed = prompt(
            &mut input,
            "Enter URL you want to crawl (must start with \"https://\"): ",
        )?;
        config.crawler.seed_url = Some(seed);
    }

    if config.crawler.max_pages.is_none() {
        let answer = prompt(&mut input, "Enter max number of pages you want to crawl: ")?;
        let max_pages = answer
            .parse::<usize>()
            .with_context(|| format!("Page budget must be a positive integer, got '{}'", answer))?;
        config.crawler.max_pages = Some(max_pages);
    }

    validate(&config).context("Invalid crawl settings")?;
    Ok(config)
}

/// Prints `message` and reads one trimmed line of input
fn prompt(input: &mut impl BufRead, message: &str) -> anyhow::Result<String> {
    println!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("No input provided");
    }
    Ok(line.trim().to_string())
}
