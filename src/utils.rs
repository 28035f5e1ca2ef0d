//! Utility functions for string manipulation and file system operations.
//!
//! This module provides helper functions used throughout the application:
//! - Slugification and hashing for Markdown file names
//! - URL list loading for `--from-file`
//! - String truncation for logging
//! - File system validation for output directories

use once_cell::sync::Lazy;
use regex::Regex;
use sha1::{Digest, Sha1};
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};
use url::Url;

/// Maximum slug length before trailing separators are trimmed.
pub const SLUG_MAX_LEN: usize = 80;

static SLUG_STRIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s\-_.]").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Convert a title to a file-name-friendly slug.
///
/// Lowercases the text, drops everything outside `[a-z0-9 -_.]`, replaces
/// whitespace runs with a single hyphen and truncates to `max_len` characters
/// (trailing `-`/`_` trimmed after truncation). An empty result becomes
/// `"untitled"`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify("Hello World", 80), "hello-world");
/// assert_eq!(slugify("!!!", 80), "untitled");
/// ```
pub fn slugify(text: &str, max_len: usize) -> String {
    let lowered = text.trim().to_lowercase();
    let stripped = SLUG_STRIP.replace_all(&lowered, "");
    let mut slug = WHITESPACE_RUN.replace_all(&stripped, "-").into_owned();
    if slug.chars().count() > max_len {
        slug = slug.chars().take(max_len).collect::<String>();
        slug = slug.trim_end_matches(['-', '_']).to_string();
    }
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// First 10 hex characters of the SHA-1 digest of `text`.
pub fn short_hash(text: &str) -> String {
    let digest = Sha1::digest(text.as_bytes());
    let mut hexed = hex::encode(digest);
    hexed.truncate(10);
    hexed
}

/// Host part of a URL, or an empty string when it has none.
pub fn url_host(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Parse a URL list: one per line, blank lines and `#` comments skipped.
pub fn parse_url_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Read a URL list file (see [`parse_url_list`]).
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_urls_from_file(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let contents = fs::read_to_string(path).await?;
    let urls = parse_url_list(&contents);
    info!(count = urls.len(), "Loaded URLs from file");
    Ok(urls)
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes (backing off to a char
/// boundary) with an ellipsis and byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a scratch file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let check_path = path.join("..__write_check__");
    stdfs::File::create(&check_path)?;
    let _ = stdfs::remove_file(&check_path);
    debug!("Output directory is writable");
    Ok(())
}

/// Create the parent directory of `path` if it has one.
pub async fn ensure_parent_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// A fresh, empty directory under the system temp dir. Test helper.
#[cfg(test)]
pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "indonewscop-{}-{}-{}",
        name,
        std::process::id(),
        n
    ));
    let _ = stdfs::remove_dir_all(&dir);
    stdfs::create_dir_all(&dir).unwrap();
    dir
}

/// Serve canned HTTP responses on a local port and return the base URL.
/// Each route is `(path, status, body)`; unknown paths get a 404. Test helper.
#[cfg(test)]
pub async fn serve_canned(routes: Vec<(&'static str, u16, &'static str)>) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let request = String::from_utf8_lossy(&buf[..n]);
            let path = request.split_whitespace().nth(1).unwrap_or("/");
            let (status, body) = routes
                .iter()
                .find(|(route, _, _)| *route == path)
                .map(|(_, status, body)| (*status, *body))
                .unwrap_or((404, "not found"));
            let response = format!(
                "HTTP/1.1 {status} Canned\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{addr}")
}
