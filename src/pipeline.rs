//! Sequential per-URL pipeline.
//!
//! For each URL: robots.txt check, fetch, extract, write every output, then
//! pause before the next URL. A robots.txt refusal skips the URL without
//! output and without the pause; a failed fetch still writes a record
//! holding the URL.

use crate::extract::extract_article;
use crate::fetch::Fetch;
use crate::models::ArticleRecord;
use crate::outputs::Outputs;
use crate::robots::RobotsCheck;
use crate::utils::truncate_for_log;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Per-run settings taken from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub skip_robots: bool,
    pub delay: Duration,
}

/// Per-run counters reported at the end.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Records written (including bare ones).
    pub saved: usize,
    /// URLs refused by robots.txt.
    pub skipped: usize,
    /// URLs whose fetch failed.
    pub failed: usize,
    /// Fetched pages missing a title or body text.
    pub incomplete: usize,
    /// Delays slept between URLs.
    pub pauses: usize,
}

/// Process every URL in order and report what happened.
///
/// Only output write failures abort the run.
#[instrument(level = "info", skip_all, fields(total = urls.len()))]
pub async fn run<F, R>(
    urls: &[String],
    fetcher: &F,
    robots: &mut R,
    outputs: &Outputs,
    options: &RunOptions,
) -> Result<RunSummary, Box<dyn Error>>
where
    F: Fetch,
    R: RobotsCheck,
{
    let total = urls.len();
    let mut summary = RunSummary::default();
    for (i, url) in urls.iter().enumerate() {
        let n = i + 1;
        if !options.skip_robots && !robots.allowed(url).await {
            eprintln!("[SKIP] Robots.txt disallows fetching: {url}");
            warn!(%url, "Skipped by robots.txt");
            summary.skipped += 1;
            continue;
        }

        println!("[{n}/{total}] Fetching: {url}");
        let (record, fetched) = process_url(fetcher, url).await;
        if !fetched {
            summary.failed += 1;
        } else if !record.is_complete() {
            summary.incomplete += 1;
        }

        let md_path = outputs.write(&record).await?;
        summary.saved += 1;
        println!("    ✓ Saved {}", md_path.display());

        if n < total {
            tokio::time::sleep(options.delay).await;
            summary.pauses += 1;
        }
    }
    Ok(summary)
}

/// Fetch and extract one URL.
///
/// A failed fetch still yields a record holding the URL; the flag reports
/// whether the page was retrieved.
#[instrument(level = "info", skip(fetcher))]
pub async fn process_url<F: Fetch>(fetcher: &F, url: &str) -> (ArticleRecord, bool) {
    match fetcher.fetch(url).await {
        Ok(page) => {
            if page.final_url != page.url {
                debug!(final_url = %page.final_url, status = page.status, "Followed redirect");
            }
            let record = extract_article(&page);
            info!(
                title = %truncate_for_log(record.title.as_deref().unwrap_or_default(), 80),
                authors = record.authors.len(),
                date = record.date.as_deref().unwrap_or_default(),
                text_bytes = record.text.as_ref().map(String::len).unwrap_or(0),
                "Extracted article"
            );
            (record, true)
        }
        Err(e) => {
            error!(%url, error = %e, "Fetch failed; saving URL only");
            (ArticleRecord::bare(url), false)
        }
    }
}
