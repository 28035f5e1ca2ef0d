//! Markdown output: one file per article with a YAML front-matter block.
//!
//! # File naming
//!
//! `{YYYY-MM-DD_}{slug}.md`. The date prefix is present only when the
//! article date parses. The slug comes from the title, else the site name,
//! else the URL host; when nothing sluggable remains, the first 10 hex
//! characters of the URL's SHA-1 are used instead.
//!
//! # Layout
//!
//! ```text
//! ---
//! title: "Flood waters recede in Jakarta"
//! url: https://news.example.com/2024/03/05/floods
//! site: Example News
//! date: 2024-03-05T09:00:00+07:00
//! authors:
//!   - Siti Rahma
//! ---
//! Residents returned home on Tuesday...
//! ```

use crate::extract::dates::calendar_date;
use crate::models::ArticleRecord;
use crate::utils::{SLUG_MAX_LEN, short_hash, slugify, url_host};
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Title shown in front matter and used for the slug.
pub fn display_title(record: &ArticleRecord) -> String {
    record
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .or_else(|| record.sitename.clone().filter(|s| !s.trim().is_empty()))
        .unwrap_or_else(|| url_host(&record.url))
}

/// Markdown file name for a record.
pub fn file_name(record: &ArticleRecord) -> String {
    let date_part = record
        .date
        .as_deref()
        .and_then(calendar_date)
        .map(|d| format!("{}_", d.format("%Y-%m-%d")))
        .unwrap_or_default();
    let mut slug = slugify(&display_title(record), SLUG_MAX_LEN);
    if slug == "untitled" {
        slug = short_hash(&record.url);
    }
    format!("{date_part}{slug}.md")
}

/// Render a YAML scalar, quoting only when YAML needs it.
fn yaml_scalar(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    match serde_yaml::to_string(value) {
        Ok(s) => s.trim_end_matches('\n').to_string(),
        Err(_) => format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\"")),
    }
}

/// Full file contents: front matter followed by the trimmed body text.
pub fn render(record: &ArticleRecord) -> String {
    let title = display_title(record)
        .replace('\\', "\\\\")
        .replace('"', "'");
    let mut lines = vec![
        "---".to_string(),
        format!("title: \"{title}\""),
        format!("url: {}", yaml_scalar(&record.url)),
        format!("site: {}", yaml_scalar(record.sitename.as_deref().unwrap_or_default())),
        format!("date: {}", yaml_scalar(record.date.as_deref().unwrap_or_default())),
        "authors:".to_string(),
    ];
    lines.extend(record.authors.iter().map(|a| format!("  - {}", yaml_scalar(a))));
    lines.push("---".to_string());
    lines.push(String::new());

    let body = record.text.as_deref().unwrap_or_default().trim();
    format!("{}{}\n", lines.join("\n"), body)
}

/// Write the record's Markdown file into `out_dir`, replacing any file of
/// the same name.
#[instrument(level = "info", skip_all, fields(url = %record.url))]
pub async fn save(record: &ArticleRecord, out_dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(out_dir).await?;
    let path = out_dir.join(file_name(record));
    fs::write(&path, render(record)).await?;
    info!(path = %path.display(), "Wrote Markdown");
    Ok(path)
}
