//! Pixelsweep main entry point
//!
//! Command-line interface for the broken-image link checker.

use clap::Parser;
use pixelsweep::config::load_config;
use pixelsweep::crawler::run_crawl;
use pixelsweep::report::{default_report_path, print_summary, write_csv, CrawlSummary};
use pixelsweep::state::CancelToken;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Pixelsweep: a broken-image link checker
///
/// Crawls a website from the given start URL, staying within its
/// domain, and verifies every referenced image. Broken and redirected
/// images are written to a timestamped CSV report.
#[derive(Parser, Debug)]
#[command(name = "pixelsweep")]
#[command(version = "1.0.0")]
#[command(about = "A broken-image link checker", long_about = None)]
struct Cli {
    /// Start URL (prompted interactively when omitted)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Path for the CSV report (default: broken_images_<timestamp>.csv)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli).await {
        tracing::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(2);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;

    let input = match cli.url {
        Some(url) => url,
        None => prompt_start_url()?,
    };
    let input = input.trim().to_string();

    // The run aborts here, before any crawling, on a bad scheme.
    if !input.starts_with("http") {
        anyhow::bail!("Invalid URL '{input}': please include http:// or https://");
    }
    let start_url = Url::parse(&input)?;

    let cancel = CancelToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n[Stopping] Interrupt received, finishing with partial results...");
            signal_token.cancel();
        }
    });

    println!("\n[Start] Scanning {start_url}\n");
    let started = std::time::Instant::now();

    let state = run_crawl(config, &start_url, cancel).await?;

    let summary = CrawlSummary::from_state(&state, started.elapsed());
    print_summary(&summary);

    let path = cli.output.unwrap_or_else(default_report_path);
    write_csv(&state.report, &path)?;
    println!("[Saved] CSV report written to: {}", path.display());

    Ok(())
}

/// Reads the start URL from stdin when it was not given as an argument
fn prompt_start_url() -> anyhow::Result<String> {
    print!("Enter the start URL (e.g. https://example.com): ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pixelsweep=info,warn"),
            1 => EnvFilter::new("pixelsweep=debug,info"),
            2 => EnvFilter::new("pixelsweep=trace,debug"),
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
