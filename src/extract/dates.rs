//! Publication date normalization.
//!
//! Pages announce dates in many shapes. Everything that parses is rewritten
//! as ISO 8601:
//!
//! | input | output |
//! |-------|--------|
//! | `2024-03-05T09:00:00+07:00` | `2024-03-05T09:00:00+07:00` |
//! | `2024-03-05T02:00:00Z` | `2024-03-05T02:00:00+00:00` |
//! | `2024-03-05 09:00:00` (no offset) | `2024-03-05T09:00:00+00:00` |
//! | `Tue, 05 Mar 2024 09:00:00 +0700` | `2024-03-05T09:00:00+07:00` |
//! | `March 5, 2024`, `Mar. 5, 2024`, `5 Mar 2024`, `2024/03/05` | `2024-03-05` |
//! | `Selasa, 05 Maret 2024 10:00 WIB` | `2024-03-05T10:00:00+07:00` |
//! | `05/03/2024 10:00` | `2024-03-05T10:00:00+00:00` |
//!
//! Indonesian weekday and month names are understood, as are the `WIB`,
//! `WITA` and `WIT` zone abbreviations. Slashed day-first dates are read as
//! `dd/mm/yyyy`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:published|updated|posted|diterbitkan|dipublikasikan)(?:\s+on)?\s*:?\s*)").unwrap()
});
static WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:mon|tue|wed|thu|fri|sat|sun|senin|selasa|rabu|kamis|jum'?at|sabtu|minggu|ahad)[a-z]*\.?,?\s+",
    )
    .unwrap()
});
static AT_TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i),?\s+(?:pukul|jam)\s+").unwrap());
static ZONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\b(WITA|WIB|WIT)$").unwrap());
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([A-Za-z]+)\b(\.?)").unwrap());
static URL_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/((?:19|20)\d{2})[/-](\d{1,2})[/-](\d{1,2})(?:/|$)").unwrap());

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S %z",
    "%d %B %Y %H:%M %z",
    "%d %B %Y %H:%M:%S %z",
    "%d %B %Y, %H:%M %z",
    "%d/%m/%Y %H:%M %z",
    "%d/%m/%Y, %H:%M %z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d %B %Y %H:%M",
    "%d %B %Y, %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y, %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%d/%m/%Y",
];

/// Month spellings (English and Indonesian, full and abbreviated) and the
/// English abbreviation they are rewritten to. Both `%B` and RFC 2822 read
/// the abbreviation.
const MONTHS: &[(&[&str], &str)] = &[
    (&["jan", "january", "januari"], "Jan"),
    (&["feb", "february", "februari", "pebruari"], "Feb"),
    (&["mar", "march", "maret"], "Mar"),
    (&["apr", "april"], "Apr"),
    (&["may", "mei"], "May"),
    (&["jun", "june", "juni"], "Jun"),
    (&["jul", "july", "juli"], "Jul"),
    (&["aug", "august", "agu", "agt", "agustus"], "Aug"),
    (&["sep", "sept", "september"], "Sep"),
    (&["oct", "october", "okt", "oktober"], "Oct"),
    (&["nov", "november", "nop", "nopember"], "Nov"),
    (&["dec", "december", "des", "desember"], "Dec"),
];

/// Rewrite a date string as ISO 8601, or `None` when it does not parse.
pub fn normalize_date(raw: &str) -> Option<String> {
    let cleaned = clean(raw);
    if cleaned.is_empty() {
        return None;
    }
    if let Some(dt) = parse_with_offset(&cleaned) {
        return Some(dt.to_rfc3339());
    }
    if let Some(naive) = parse_naive_datetime(&cleaned) {
        return Some(naive.and_utc().to_rfc3339());
    }
    parse_date_only(&cleaned).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Calendar day of an ISO 8601 date or date-time, in the value's own offset.
pub fn calendar_date(value: &str) -> Option<NaiveDate> {
    let cleaned = clean(value);
    if let Some(dt) = parse_with_offset(&cleaned) {
        return Some(dt.date_naive());
    }
    if let Some(naive) = parse_naive_datetime(&cleaned) {
        return Some(naive.date());
    }
    parse_date_only(&cleaned)
}

/// A `/YYYY/MM/DD/` date embedded in an article URL path.
pub fn date_from_url(url: &str) -> Option<String> {
    let caps = URL_DATE.captures(url)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.format("%Y-%m-%d").to_string())
}

fn clean(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let without_prefix = PREFIX.replace(&collapsed, "");
    let without_weekday = WEEKDAY.replace(without_prefix.trim(), "");
    let joined = AT_TIME.replace(&without_weekday, " ");
    let zoned = ZONE.replace(joined.trim(), |caps: &Captures| match &caps[1] {
        "WIB" => " +0700",
        "WITA" => " +0800",
        _ => " +0900",
    });
    WORD.replace_all(&zoned, |caps: &Captures| match english_month(&caps[1]) {
        Some(month) => month.to_string(),
        None => caps[0].to_string(),
    })
    .trim()
    .to_string()
}

fn english_month(word: &str) -> Option<&'static str> {
    let word = word.to_lowercase();
    MONTHS
        .iter()
        .find(|(spellings, _)| spellings.contains(&word.as_str()))
        .map(|(_, name)| *name)
}

fn parse_with_offset(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }
    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
}

fn parse_naive_datetime(s: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn parse_date_only(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
