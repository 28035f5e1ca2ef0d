//! Metadata and body text extraction.
//!
//! Two extractors run over the same parsed document:
//!
//! | Extractor | Favors | Title | Date | Authors | Text |
//! |-----------|--------|-------|------|---------|------|
//! | [`StructuredExtractor`] | precision | JSON-LD, OpenGraph, Twitter, DC | JSON-LD, `article:*`, DC meta | JSON-LD, author meta | article container |
//! | [`FallbackExtractor`] | recall | `<h1>`, `<title>` | `<time>`, date classes, URL path | `rel=author`, byline classes | every `<p>` in `<body>` |
//!
//! [`coalesce`] decides which result is kept.

pub mod dates;
pub mod jsonld;
pub mod metadata;
pub mod text;

use crate::models::{ArticleRecord, Page};
use crate::utils::url_host;
use dates::{date_from_url, normalize_date};
use jsonld::JsonLdArticle;
use metadata::{MetaTags, clean_title, first_text, normalize_authors};
use scraper::{Html, Selector};
use tracing::{debug, instrument};

/// Minimum paragraph length for the recall-first extractor.
const FALLBACK_MIN_PARAGRAPH: usize = 30;

const TITLE_META: &[&str] = &[
    "og:title",
    "twitter:title",
    "dc.title",
    "dcterms.title",
    "headline",
    "sailthru.title",
    "parsely-title",
];

const DATE_META: &[&str] = &[
    "article:published_time",
    "og:article:published_time",
    "datepublished",
    "pubdate",
    "publishdate",
    "publish-date",
    "publication_date",
    "date",
    "dc.date",
    "dc.date.issued",
    "dcterms.created",
    "dcterms.date",
    "sailthru.date",
    "parsely-pub-date",
    "content_publisheddate",
    "article:modified_time",
    "og:updated_time",
];

const AUTHOR_META: &[&str] = &[
    "author",
    "article:author",
    "dc.creator",
    "dcterms.creator",
    "parsely-author",
    "sailthru.author",
    "byl",
    "content_author",
];

const SITENAME_META: &[&str] = &["og:site_name", "application-name", "twitter:site"];

/// Pulls an [`ArticleRecord`] out of a parsed page.
pub trait Extractor {
    fn name(&self) -> &'static str;
    fn extract(&self, document: &Html, url: &str) -> ArticleRecord;
}

/// Precision-first extraction from structured data.
#[derive(Debug, Default)]
pub struct StructuredExtractor;

impl Extractor for StructuredExtractor {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn extract(&self, document: &Html, url: &str) -> ArticleRecord {
        let meta = MetaTags::from_document(document);
        let ld = jsonld::find_article(document).unwrap_or_default();

        let title = ld
            .headline
            .clone()
            .or_else(|| meta.first(TITLE_META))
            .or_else(|| first_text(document, "title"))
            .and_then(|t| clean_title(&t));

        let date = ld
            .date_published
            .iter()
            .cloned()
            .chain(meta.all(DATE_META))
            .chain(ld.date_modified.iter().cloned())
            .find_map(|raw| normalize_date(&raw));

        let mut authors = normalize_authors(&ld.authors);
        if authors.is_empty() {
            authors = normalize_authors(meta.all(AUTHOR_META));
        }

        let sitename = meta
            .first(SITENAME_META)
            .filter(|s| !s.starts_with('@'))
            .or_else(|| ld.publisher.clone())
            .or_else(|| non_empty(url_host(url)));

        ArticleRecord {
            url: url.to_string(),
            title,
            authors,
            date,
            text: structured_text(document, &ld),
            sitename,
        }
    }
}

fn structured_text(document: &Html, ld: &JsonLdArticle) -> Option<String> {
    let from_markup = text::container_paragraphs(document).unwrap_or_default();
    let from_ld = ld
        .body
        .as_deref()
        .map(text::split_plain_text)
        .unwrap_or_default();

    let markup_len: usize = from_markup.iter().map(String::len).sum();
    let ld_len: usize = from_ld.iter().map(String::len).sum();
    if ld_len > markup_len {
        text::join_paragraphs(&from_ld)
    } else {
        text::join_paragraphs(&from_markup)
    }
}

/// Recall-first extraction from visible markup.
#[derive(Debug, Default)]
pub struct FallbackExtractor;

impl Extractor for FallbackExtractor {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn extract(&self, document: &Html, url: &str) -> ArticleRecord {
        let title = first_text(document, "h1")
            .or_else(|| first_text(document, "title"))
            .and_then(|t| clean_title(&t));

        let date = time_datetime(document)
            .into_iter()
            .chain(first_text(document, "time"))
            .chain(first_text(
                document,
                ".published, .post-date, .entry-date, .article-date, .date, [class*=\"date\"]",
            ))
            .find_map(|raw| normalize_date(&raw))
            .or_else(|| date_from_url(url));

        let bylines = [
            r#"[rel="author"]"#,
            r#"[itemprop="author"] [itemprop="name"]"#,
            r#"[itemprop="author"]"#,
            ".byline",
            ".author-name",
            ".author",
            r#"[class*="byline"]"#,
        ]
        .iter()
        .filter_map(|css| first_text(document, css));
        let authors = bylines
            .map(|b| normalize_authors([b]))
            .find(|names| !names.is_empty())
            .unwrap_or_default();

        let paragraphs = text::body_paragraphs(document, FALLBACK_MIN_PARAGRAPH);

        ArticleRecord {
            url: url.to_string(),
            title,
            authors,
            date,
            text: text::join_paragraphs(&paragraphs),
            sitename: non_empty(url_host(url)),
        }
    }
}

fn time_datetime(document: &Html) -> Option<String> {
    let selector = Selector::parse("time[datetime]").unwrap();
    document
        .select(&selector)
        .filter_map(|t| t.value().attr("datetime"))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// Pick between the primary and fallback results.
///
/// - primary has title and text: primary wins outright
/// - fallback has title and text: fallback wins, missing `date`, `authors`
///   and `sitename` filled from primary
/// - otherwise whatever primary produced, or a bare record
pub fn coalesce(url: &str, primary: Option<ArticleRecord>, fallback: Option<ArticleRecord>) -> ArticleRecord {
    if let Some(p) = primary.as_ref().filter(|p| p.is_complete()) {
        return p.clone();
    }
    if let Some(mut f) = fallback.filter(|f| f.is_complete()) {
        if let Some(p) = primary.as_ref() {
            f.fill_missing_from(p);
        }
        return f;
    }
    primary
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| ArticleRecord::bare(url))
}

/// Extract an article record from a fetched page.
///
/// The fallback extractor only runs when the structured extractor comes up
/// short. The record's `url` is always the requested URL.
#[instrument(level = "debug", skip_all, fields(url = %page.url))]
pub fn extract_article(page: &Page) -> ArticleRecord {
    let document = Html::parse_document(&page.body);
    let primary = StructuredExtractor.extract(&document, &page.url);
    debug!(
        extractor = StructuredExtractor.name(),
        complete = primary.is_complete(),
        "Ran extractor"
    );
    if primary.is_complete() {
        return primary;
    }
    let fallback = FallbackExtractor.extract(&document, &page.url);
    debug!(
        extractor = FallbackExtractor.name(),
        complete = fallback.is_complete(),
        "Ran extractor"
    );
    coalesce(&page.url, Some(primary), Some(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, body: &str) -> Page {
        Page {
            url: url.to_string(),
            final_url: url.to_string(),
            status: 200,
            body: body.to_string(),
        }
    }

    const STRUCTURED: &str = r#"<html><head>
        <title>Flood waters recede in Jakarta | Example News</title>
        <meta property="og:title" content="Flood waters recede in Jakarta">
        <meta property="og:site_name" content="Example News">
        <meta property="article:published_time" content="2024-03-05T09:00:00+07:00">
        <meta name="author" content="By Siti Rahma and Budi Santoso">
    </head><body>
        <nav><a href="/">Home</a></nav>
        <article>
            <h1>Flood waters recede in Jakarta</h1>
            <p>Residents returned home on Tuesday as flood waters receded.</p>
            <p>Officials warned that more rain is expected later this week.</p>
        </article>
    </body></html>"#;

    #[test]
    fn test_structured_page() {
        let record = extract_article(&page("https://news.example.com/2024/03/05/floods", STRUCTURED));
        assert_eq!(record.url, "https://news.example.com/2024/03/05/floods");
        assert_eq!(record.title.as_deref(), Some("Flood waters recede in Jakarta"));
        assert_eq!(record.date.as_deref(), Some("2024-03-05T09:00:00+07:00"));
        assert_eq!(record.authors, vec!["Siti Rahma", "Budi Santoso"]);
        assert_eq!(record.sitename.as_deref(), Some("Example News"));
        assert_eq!(
            record.text.as_deref(),
            Some("Residents returned home on Tuesday as flood waters receded.\n\nOfficials warned that more rain is expected later this week.")
        );
    }

    #[test]
    fn test_json_ld_takes_precedence() {
        let html = r#"<html><head>
            <meta property="og:title" content="OG headline">
            <script type="application/ld+json">{"@type":"NewsArticle","headline":"LD headline",
              "datePublished":"2024-01-02","author":{"name":"Jane Doe"},
              "publisher":{"name":"LD Publisher"},
              "articleBody":"Paragraph one of the body.\n\nParagraph two of the body."}</script>
        </head><body><p>Unrelated.</p></body></html>"#;
        let record = extract_article(&page("https://example.com/a", html));
        assert_eq!(record.title.as_deref(), Some("LD headline"));
        assert_eq!(record.date.as_deref(), Some("2024-01-02"));
        assert_eq!(record.authors, vec!["Jane Doe"]);
        assert_eq!(record.sitename.as_deref(), Some("LD Publisher"));
        assert_eq!(
            record.text.as_deref(),
            Some("Paragraph one of the body.\n\nParagraph two of the body.")
        );
    }

    #[test]
    fn test_fallback_fills_in_for_plain_markup() {
        let html = r#"<html><head>
            <meta property="article:published_time" content="2024-03-05">
        </head><body>
            <h1>Plain markup story</h1>
            <span class="byline">By Dewi Lestari</span>
            <div class="content">
                <p>This is a reasonably long paragraph of story text.</p>
                <p>Short one.</p>
                <p>And here is another long paragraph of story text.</p>
            </div>
        </body></html>"#;
        let record = extract_article(&page("https://blog.example.org/story", html));
        assert_eq!(record.title.as_deref(), Some("Plain markup story"));
        assert_eq!(record.authors, vec!["Dewi Lestari"]);
        assert_eq!(record.date.as_deref(), Some("2024-03-05"));
        assert_eq!(record.sitename.as_deref(), Some("blog.example.org"));
        assert_eq!(
            record.text.as_deref(),
            Some("This is a reasonably long paragraph of story text.\n\nAnd here is another long paragraph of story text.")
        );
    }

    #[test]
    fn test_fallback_date_from_time_and_url() {
        let html = r#"<body><h1>Dated story here</h1>
            <time datetime="2023-11-20T08:30:00Z">20 Nov</time>
            <p>A paragraph that is long enough to be kept as text.</p></body>"#;
        let record = FallbackExtractor.extract(&Html::parse_document(html), "https://example.com/x");
        assert_eq!(record.date.as_deref(), Some("2023-11-20T08:30:00+00:00"));

        let html = r#"<body><h1>Undated story</h1></body>"#;
        let record = FallbackExtractor.extract(
            &Html::parse_document(html),
            "https://example.com/2022/07/01/undated",
        );
        assert_eq!(record.date.as_deref(), Some("2022-07-01"));
    }

    #[test]
    fn test_empty_page_keeps_host_only() {
        let record = extract_article(&page("https://example.com/empty", "<html><body></body></html>"));
        assert_eq!(record.url, "https://example.com/empty");
        assert!(record.title.is_none());
        assert!(record.text.is_none());
        assert_eq!(record.sitename.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_coalesce_prefers_complete_primary() {
        let primary = ArticleRecord {
            url: "u".into(),
            title: Some("T".into()),
            text: Some("X".into()),
            ..Default::default()
        };
        let fallback = ArticleRecord {
            url: "u".into(),
            title: Some("Other".into()),
            text: Some("Y".into()),
            ..Default::default()
        };
        assert_eq!(coalesce("u", Some(primary.clone()), Some(fallback)), primary);
    }

    #[test]
    fn test_coalesce_merges_into_fallback() {
        let primary = ArticleRecord {
            url: "u".into(),
            title: Some("T".into()),
            date: Some("2024-01-01".into()),
            authors: vec!["A".into()],
            ..Default::default()
        };
        let fallback = ArticleRecord {
            url: "u".into(),
            title: Some("F".into()),
            text: Some("Y".into()),
            sitename: Some("host".into()),
            ..Default::default()
        };
        let merged = coalesce("u", Some(primary), Some(fallback));
        assert_eq!(merged.title.as_deref(), Some("F"));
        assert_eq!(merged.date.as_deref(), Some("2024-01-01"));
        assert_eq!(merged.authors, vec!["A"]);
        assert_eq!(merged.sitename.as_deref(), Some("host"));
    }

    #[test]
    fn test_coalesce_last_resort() {
        let partial = ArticleRecord {
            url: "u".into(),
            title: Some("Only title".into()),
            ..Default::default()
        };
        assert_eq!(coalesce("u", Some(partial.clone()), None), partial);
        assert_eq!(coalesce("u", None, None), ArticleRecord::bare("u"));
        assert_eq!(
            coalesce("u", Some(ArticleRecord::bare("u")), Some(ArticleRecord::bare("u"))),
            ArticleRecord::bare("u")
        );
    }
}
