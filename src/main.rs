//! # indonewscop
//!
//! Takes one or more news article URLs, extracts title, date, author(s) and
//! body text, then saves each article as a Markdown file with YAML front
//! matter and appends it to a JSONL and a CSV catalog.
//!
//! ## Usage
//!
//! ```sh
//! indonewscop URL1 URL2 ...
//! indonewscop --from-file urls.txt
//! indonewscop --output-dir ./articles --jsonl catalog.jsonl --csv catalog.csv URL...
//! ```
//!
//! Please respect each site's Terms of Service and robots.txt. Paywalls and
//! authentication are never bypassed.
//!
//! ## Architecture
//!
//! URLs are processed one at a time:
//! 1. **Robots**: Check the origin's robots.txt (unless `--skip-robots`)
//! 2. **Fetching**: Download the page, retrying transient failures
//! 3. **Extraction**: Structured extractor first, markup fallback second
//! 4. **Output**: Markdown file, JSONL line, CSV row
//! 5. **Delay**: Sleep before the next URL

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod error;
mod extract;
mod fetch;
mod models;
mod outputs;
mod pipeline;
mod robots;
mod utils;

use cli::Cli;
use fetch::{ClientSettings, HttpFetcher, RetryFetch, build_client};
use outputs::Outputs;
use pipeline::RunOptions;
use robots::RobotsGate;
use utils::ensure_writable_dir;

/// Base delay of the fetch retry backoff.
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let urls = args.collect_urls().await?;
    if urls.is_empty() {
        eprintln!("No URLs provided. Pass URLs as arguments or with --from-file.");
        std::process::exit(2);
    }

    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let settings = ClientSettings {
        user_agent: args.user_agent.clone(),
        timeout: args.timeout(),
        accept_invalid_certs: args.insecure,
    };
    let client = build_client(&settings)?;
    let fetcher = RetryFetch::new(HttpFetcher::new(client.clone()), args.retries, RETRY_BASE_DELAY);
    let mut robots = RobotsGate::new(client, &args.user_agent);
    let outputs = Outputs {
        markdown_dir: args.output_dir.clone(),
        jsonl: args.jsonl_path().cloned(),
        csv: args.csv_path().cloned(),
    };

    info!(
        count = urls.len(),
        skip_robots = args.skip_robots,
        delay = ?args.delay(),
        "Starting run"
    );

    let options = RunOptions {
        skip_robots: args.skip_robots,
        delay: args.delay(),
    };
    let summary = pipeline::run(&urls, &fetcher, &mut robots, &outputs, &options).await?;

    println!("Done.");
    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        total = urls.len(),
        saved = summary.saved,
        skipped = summary.skipped,
        failed = summary.failed,
        incomplete = summary.incomplete,
        pauses = summary.pauses,
        "Execution complete"
    );
    Ok(())
}
