//! Article body text.
//!
//! Body text is built from `<p>` elements only. Anything nested inside
//! page furniture (navigation, share bars, related-story rails, captions,
//! comment sections, ads) is left out.

use super::metadata::{collapse_whitespace, element_text};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Elements whose contents never belong to the article body.
const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "aside", "footer", "header", "form", "figure",
    "figcaption", "button", "iframe", "template", "svg",
];

static BOILERPLATE_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:^|[\s_-])(?:share|sharing|social|related|recommend|comment|comments|newsletter|subscribe|advert|ads|ad-slot|promo|sponsor|caption|breadcrumb|tags|footer|nav|menu|sidebar|byline|author-bio|paywall|cookie)(?:$|[\s_-])",
    )
    .unwrap()
});

/// Containers tried, in order, when looking for the main article body.
const CONTAINER_SELECTORS: &[&str] = &[
    r#"[itemprop="articleBody"]"#,
    "article",
    ".article-body",
    ".article__body",
    ".article-content",
    ".entry-content",
    ".post-content",
    ".story-body",
    ".content-body",
    "#article-body",
    "main",
];

const PARAGRAPH_SELECTOR: &str = "p";

/// Paragraphs of the best-matching article container, or `None` when the
/// page has no recognizable container.
pub fn container_paragraphs(document: &Html) -> Option<Vec<String>> {
    for css in CONTAINER_SELECTORS {
        let selector = Selector::parse(css).unwrap();
        let best = document
            .select(&selector)
            .map(|container| paragraphs_within(container, 1))
            .max_by_key(|paras| paras.iter().map(String::len).sum::<usize>());
        if let Some(paras) = best.filter(|p| !p.is_empty()) {
            return Some(paras);
        }
    }
    None
}

/// Every paragraph in `<body>` at least `min_len` characters long.
pub fn body_paragraphs(document: &Html, min_len: usize) -> Vec<String> {
    let selector = Selector::parse("body").unwrap();
    document
        .select(&selector)
        .next()
        .map(|body| paragraphs_within(body, min_len))
        .unwrap_or_default()
}

/// `<p>` text under `root`, boilerplate skipped, consecutive duplicates
/// removed.
pub fn paragraphs_within(root: ElementRef<'_>, min_len: usize) -> Vec<String> {
    let selector = Selector::parse(PARAGRAPH_SELECTOR).unwrap();
    let mut paragraphs: Vec<String> = Vec::new();
    for element in root.select(&selector) {
        if is_boilerplate_within(element, root) {
            continue;
        }
        let text = element_text(element);
        if text.chars().count() < min_len.max(1) {
            continue;
        }
        if paragraphs.last() != Some(&text) {
            paragraphs.push(text);
        }
    }
    paragraphs
}

/// Split a plain-text body (e.g. JSON-LD `articleBody`) into paragraphs.
pub fn split_plain_text(body: &str) -> Vec<String> {
    body.split("\n\n")
        .flat_map(|block| block.split('\n'))
        .map(collapse_whitespace)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Join paragraphs into the stored body text.
pub fn join_paragraphs(paragraphs: &[String]) -> Option<String> {
    if paragraphs.is_empty() {
        None
    } else {
        Some(paragraphs.join("\n\n"))
    }
}

fn is_boilerplate(element: ElementRef<'_>) -> bool {
    let el = element.value();
    if BOILERPLATE_TAGS.contains(&el.name()) {
        return true;
    }
    if el.attr("hidden").is_some() || el.attr("aria-hidden") == Some("true") {
        return true;
    }
    [el.attr("class"), el.attr("id")]
        .into_iter()
        .flatten()
        .any(|v| BOILERPLATE_ATTR.is_match(v))
}

fn is_boilerplate_within(element: ElementRef<'_>, root: ElementRef<'_>) -> bool {
    if is_boilerplate(element) {
        return true;
    }
    element
        .ancestors()
        .take_while(|node| node.id() != root.id())
        .filter_map(ElementRef::wrap)
        .any(is_boilerplate)
}
