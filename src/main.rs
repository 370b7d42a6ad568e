//! Site-Ripple main entry point
//!
//! This is the command-line interface for the Site-Ripple crawler.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use site_ripple::config::{validate, CrawlConfig};
use site_ripple::crawler::run_crawl;
use site_ripple::output::{print_statistics, render_json, CrawlStatistics};
use tracing_subscriber::EnvFilter;

/// Site-Ripple: a bounded, single-host web crawler
///
/// Site-Ripple crawls the pages reachable from a seed URL on the seed's own
/// host, recording each page's first heading, first paragraph, links and
/// images. It stops after a fixed number of pages.
#[derive(Parser, Debug)]
#[command(name = "site-ripple")]
#[command(version = "1.0.0")]
#[command(about = "A bounded, single-host web crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from (scheme defaults to http)
    #[arg(value_name = "SEED_URL")]
    seed_url: String,

    /// Maximum number of requests in flight at once
    #[arg(value_name = "MAX_CONCURRENCY", value_parser = clap::value_parser!(u32).range(1..))]
    max_concurrency: u32,

    /// Maximum number of distinct pages to visit
    #[arg(value_name = "MAX_PAGES", value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: u32,

    /// What to print once the crawl finishes
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Output formats for the crawl result
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// The page map as pretty-printed JSON
    Json,
    /// Crawl statistics
    Summary,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = CrawlConfig::new(
        cli.seed_url,
        cli.max_concurrency as usize,
        cli.max_pages as usize,
    );

    if let Err(e) = validate(&config) {
        tracing::error!("Invalid arguments: {}", e);
        return Err(e).context("invalid arguments");
    }

    tracing::info!("Starting to crawl '{}'...", config.seed_url);

    let report = run_crawl(config).await.context("crawl could not start")?;

    match cli.format {
        OutputFormat::Json => {
            let rendered = render_json(&report.pages).context("failed to render page map")?;
            println!("{}", rendered);
        }
        OutputFormat::Summary => print_statistics(&CrawlStatistics::from_report(&report)),
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the crawl result.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_ripple=info,warn"),
            1 => EnvFilter::new("site_ripple=debug,info"),
            2 => EnvFilter::new("site_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
