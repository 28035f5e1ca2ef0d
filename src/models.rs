//! Data models for fetched pages and extracted articles.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Page`]: Raw HTML as returned by the HTTP fetcher
//! - [`ArticleRecord`]: Extracted metadata and body text for a single URL
//! - [`CsvRow`]: Flattened view of an [`ArticleRecord`] for the CSV catalog
//!
//! The field order of [`ArticleRecord`] is the key order of every JSONL line.

use serde::{Deserialize, Serialize};

/// A fetched HTML page.
#[derive(Debug, Clone)]
pub struct Page {
    /// The URL that was requested.
    pub url: String,
    /// The URL after redirects.
    pub final_url: String,
    /// HTTP status code of the final response.
    pub status: u16,
    /// The decoded response body.
    pub body: String,
}

/// Metadata and body text extracted from a single article URL.
///
/// Every field except `url` may be missing. A record holding only its `url`
/// is still written to all outputs so the catalogs list every URL that was
/// attempted.
///
/// # JSON shape
///
/// ```text
/// {"url": "...", "title": "...", "authors": ["..."], "date": "2024-03-05T09:00:00+07:00",
///  "text": "...", "sitename": "..."}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// The requested article URL.
    pub url: String,
    /// The article headline.
    pub title: Option<String>,
    /// Author names in byline order, without duplicates.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Publication date as an ISO 8601 string.
    pub date: Option<String>,
    /// Article body as plain text, paragraphs separated by blank lines.
    pub text: Option<String>,
    /// Publisher name, or the URL host when the page does not name one.
    pub sitename: Option<String>,
}

impl ArticleRecord {
    /// A record carrying nothing but its URL.
    pub fn bare(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Default::default()
        }
    }

    /// Whether both a title and body text were extracted.
    pub fn is_complete(&self) -> bool {
        has_content(&self.title) && has_content(&self.text)
    }

    /// Whether anything beyond the URL was extracted.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.authors.is_empty()
            && self.date.is_none()
            && self.text.is_none()
            && self.sitename.is_none()
    }

    /// Fill `date`, `authors` and `sitename` from `other` where this record lacks them.
    pub fn fill_missing_from(&mut self, other: &ArticleRecord) {
        if self.date.is_none() {
            self.date = other.date.clone();
        }
        if self.authors.is_empty() {
            self.authors = other.authors.clone();
        }
        if self.sitename.is_none() {
            self.sitename = other.sitename.clone();
        }
    }
}

fn has_content(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// One row of the CSV catalog.
///
/// Column order is the header order: `url,title,date,authors,sitename,text`.
#[derive(Debug, Serialize)]
pub struct CsvRow<'a> {
    pub url: &'a str,
    pub title: &'a str,
    pub date: &'a str,
    /// Authors joined with `", "`.
    pub authors: String,
    pub sitename: &'a str,
    pub text: &'a str,
}

impl<'a> From<&'a ArticleRecord> for CsvRow<'a> {
    fn from(record: &'a ArticleRecord) -> Self {
        Self {
            url: &record.url,
            title: record.title.as_deref().unwrap_or_default(),
            date: record.date.as_deref().unwrap_or_default(),
            authors: record.authors.join(", "),
            sitename: record.sitename.as_deref().unwrap_or_default(),
            text: record.text.as_deref().unwrap_or_default(),
        }
    }
}
