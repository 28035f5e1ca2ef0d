//! Meta-tag lookups and field cleanup for titles and bylines.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

static AUTHOR_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(?:,|;|\||&|\s+and\s+|\s+dan\s+)\s*").unwrap());
static BY_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:written\s+)?(?:by|oleh|penulis)\s*:?\s+").unwrap());

const TITLE_SEPARATORS: &[&str] = &[" | ", " - ", " – ", " — ", " :: ", " » "];
const MAX_AUTHOR_LEN: usize = 80;

/// `<meta>` values keyed by lowercased `property`, `name` or `itemprop`.
///
/// The first non-empty value for a key wins.
pub struct MetaTags {
    values: HashMap<String, String>,
}

impl MetaTags {
    pub fn from_document(document: &Html) -> Self {
        let selector = Selector::parse("meta[content]").unwrap();
        let mut values = HashMap::new();
        for meta in document.select(&selector) {
            let el = meta.value();
            let Some(content) = el.attr("content").map(collapse_whitespace) else {
                continue;
            };
            if content.is_empty() {
                continue;
            }
            for attr in ["property", "name", "itemprop"] {
                if let Some(key) = el.attr(attr) {
                    values
                        .entry(key.trim().to_lowercase())
                        .or_insert_with(|| content.clone());
                }
            }
        }
        Self { values }
    }

    /// Value of the first key (in `keys` order) present on the page.
    pub fn first(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| self.values.get(*k).cloned())
    }

    /// Values of every key present on the page, in `keys` order.
    pub fn all(&self, keys: &[&str]) -> Vec<String> {
        keys.iter()
            .filter_map(|k| self.values.get(*k).cloned())
            .collect()
    }
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-collapsed text of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Text of the first element matching `selector` that has any.
pub fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .map(element_text)
        .find(|t| !t.is_empty())
}

/// Strip a trailing site name from a `<title>`-style headline.
///
/// `"Flood waters recede in Jakarta | Example News"` becomes
/// `"Flood waters recede in Jakarta"`. The cut is only made when the part kept
/// has at least three words; otherwise the title is returned unchanged.
pub fn clean_title(raw: &str) -> Option<String> {
    let title = collapse_whitespace(raw);
    if title.is_empty() {
        return None;
    }
    let last_separator = TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| title.rfind(sep))
        .max();
    let Some(pos) = last_separator else {
        return Some(title);
    };

    let head = title[..pos].trim();
    if head.split_whitespace().count() >= 3 {
        Some(head.to_string())
    } else {
        Some(title)
    }
}

/// Split raw byline values into individual author names.
///
/// Handles `"By A and B"`, `"A, B & C"`, drops URLs (some sites put profile
/// links in `article:author`), overly long values, and duplicates (case
/// insensitive, first spelling kept).
pub fn normalize_authors<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .flat_map(|value| {
            let collapsed = collapse_whitespace(value.as_ref());
            let stripped = BY_PREFIX.replace(&collapsed, "").into_owned();
            AUTHOR_SPLIT
                .split(&stripped)
                .map(|part| BY_PREFIX.replace(part.trim(), "").trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|name| is_plausible_name(name))
        .unique_by(|name| name.to_lowercase())
        .collect()
}

fn is_plausible_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().count() <= MAX_AUTHOR_LEN
        && !name.starts_with("http://")
        && !name.starts_with("https://")
        && !name.starts_with("www.")
        && name.chars().any(char::is_alphabetic)
}
