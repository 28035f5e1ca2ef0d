//! Command-line interface definitions for indonewscop.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option can be provided via a command-line flag or an `INDONEWSCOP_*`
//! environment variable.

use crate::utils::read_urls_from_file;
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

/// User agent sent with page and robots.txt requests unless overridden.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; IndoNewsCop/1.0; +https://github.com/indonewscop/indonewscop)";

/// Command-line arguments for indonewscop.
///
/// # Examples
///
/// ```sh
/// # A couple of URLs with the default outputs
/// indonewscop https://example.com/news/1 https://example.com/news/2
///
/// # URLs from a file, custom output locations
/// indonewscop --from-file urls.txt --output-dir ./articles --jsonl out/catalog.jsonl --csv out/catalog.csv
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about = "Extract and save article metadata and content.")]
pub struct Cli {
    /// Article URLs
    pub urls: Vec<String>,

    /// Path to a text file with one URL per line
    #[arg(long, env = "INDONEWSCOP_FROM_FILE")]
    pub from_file: Option<PathBuf>,

    /// Directory for Markdown files
    #[arg(long, env = "INDONEWSCOP_OUTPUT_DIR", default_value = "./articles")]
    pub output_dir: PathBuf,

    /// Path to append JSONL catalog
    #[arg(long, env = "INDONEWSCOP_JSONL", default_value = "./catalog.jsonl")]
    pub jsonl: PathBuf,

    /// Do not write the JSONL catalog
    #[arg(long)]
    pub no_jsonl: bool,

    /// Path to append CSV catalog
    #[arg(long, env = "INDONEWSCOP_CSV", default_value = "./catalog.csv")]
    pub csv: PathBuf,

    /// Do not write the CSV catalog
    #[arg(long)]
    pub no_csv: bool,

    /// Seconds to sleep between requests
    #[arg(long, env = "INDONEWSCOP_DELAY", default_value_t = 2.0, allow_negative_numbers = true)]
    pub delay: f64,

    /// Skip robots.txt check (at your own risk)
    #[arg(long)]
    pub skip_robots: bool,

    /// User-Agent header for all requests
    #[arg(long, env = "INDONEWSCOP_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "INDONEWSCOP_TIMEOUT", default_value_t = 20)]
    pub timeout: u64,

    /// Retry attempts for transient fetch failures
    #[arg(long, env = "INDONEWSCOP_RETRIES", default_value_t = 2)]
    pub retries: usize,

    /// Accept invalid TLS certificates
    #[arg(long)]
    pub insecure: bool,
}

impl Cli {
    /// Delay between URLs; negative values become zero and values too large
    /// for a `Duration` saturate.
    pub fn delay(&self) -> Duration {
        if self.delay > 0.0 {
            Duration::try_from_secs_f64(self.delay).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn jsonl_path(&self) -> Option<&PathBuf> {
        (!self.no_jsonl).then_some(&self.jsonl)
    }

    pub fn csv_path(&self) -> Option<&PathBuf> {
        (!self.no_csv).then_some(&self.csv)
    }

    /// Positional URLs followed by the URLs listed in `--from-file`.
    pub async fn collect_urls(&self) -> Result<Vec<String>, Box<dyn Error>> {
        let mut urls: Vec<String> = self
            .urls
            .iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
        if let Some(path) = &self.from_file {
            urls.extend(read_urls_from_file(path).await?);
        }
        Ok(urls)
    }
}
