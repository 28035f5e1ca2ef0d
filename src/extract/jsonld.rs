//! schema.org JSON-LD article metadata.
//!
//! News sites embed `<script type="application/ld+json">` blocks describing
//! the article. Blocks may hold a single object, an array of objects, or an
//! object with an `@graph` array; all three are searched for the first node
//! whose `@type` is an article type.

use super::metadata::collapse_whitespace;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

const ARTICLE_TYPES: &[&str] = &[
    "NewsArticle",
    "Article",
    "BlogPosting",
    "ReportageNewsArticle",
    "AnalysisNewsArticle",
    "OpinionNewsArticle",
    "BackgroundNewsArticle",
    "ReviewNewsArticle",
    "LiveBlogPosting",
    "Report",
];

/// Article fields read from a JSON-LD node.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct JsonLdArticle {
    pub headline: Option<String>,
    pub date_published: Option<String>,
    pub date_modified: Option<String>,
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub body: Option<String>,
}

/// The first article node found in the document's JSON-LD blocks.
pub fn find_article(document: &Html) -> Option<JsonLdArticle> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();
    for script in document.select(&selector) {
        let raw = script.text().collect::<String>();
        let value: Value = match serde_json::from_str(raw.trim()) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "Skipping unparsable JSON-LD block");
                continue;
            }
        };
        if let Some(node) = find_article_node(&value) {
            return Some(read_article(node));
        }
    }
    None
}

fn find_article_node(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find_map(find_article_node),
        Value::Object(map) => {
            if is_article_type(map.get("@type")) {
                return Some(value);
            }
            map.get("@graph").and_then(find_article_node)
        }
        _ => None,
    }
}

fn is_article_type(ty: Option<&Value>) -> bool {
    match ty {
        Some(Value::String(s)) => ARTICLE_TYPES.contains(&s.as_str()),
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| is_article_type(Some(item))),
        _ => false,
    }
}

fn read_article(node: &Value) -> JsonLdArticle {
    JsonLdArticle {
        headline: string_field(node, "headline").or_else(|| string_field(node, "name")),
        date_published: string_field(node, "datePublished")
            .or_else(|| string_field(node, "dateCreated")),
        date_modified: string_field(node, "dateModified"),
        authors: node.get("author").map(names).unwrap_or_default(),
        publisher: node
            .get("publisher")
            .and_then(|p| names(p).into_iter().next()),
        body: string_field(node, "articleBody"),
    }
}

fn string_field(node: &Value, key: &str) -> Option<String> {
    node.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Names from a `Person`/`Organization` value: a string, an object with
/// `name`, or an array of either.
fn names(value: &Value) -> Vec<String> {
    let found: Vec<String> = match value {
        Value::String(s) => vec![collapse_whitespace(s)],
        Value::Object(_) => string_field(value, "name")
            .map(|name| collapse_whitespace(&name))
            .into_iter()
            .collect(),
        Value::Array(items) => items.iter().flat_map(names).collect(),
        _ => Vec::new(),
    };
    found.into_iter().filter(|s| !s.is_empty()).collect()
}
