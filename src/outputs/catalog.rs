//! Append-only JSONL and CSV catalogs.
//!
//! Both catalogs grow by one entry per processed URL across runs. Parent
//! directories are created on demand. The CSV header is written only when
//! the file is new (or empty).

use crate::models::{ArticleRecord, CsvRow};
use crate::utils::ensure_parent_dir;
use std::error::Error;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

/// Append `record` as one JSON line.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn append_jsonl(record: &ArticleRecord, path: &Path) -> Result<(), Box<dyn Error>> {
    ensure_parent_dir(path).await?;
    let mut line = serde_json::to_string(record)?;
    line.push('\n');

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;
    debug!(bytes = line.len(), "Appended JSONL record");
    Ok(())
}

/// Append `record` as one CSV row (`url,title,date,authors,sitename,text`).
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn append_csv(record: &ArticleRecord, path: &Path) -> Result<(), Box<dyn Error>> {
    ensure_parent_dir(path).await?;
    let needs_header = tokio::fs::metadata(path)
        .await
        .map(|m| m.len() == 0)
        .unwrap_or(true);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    writer.serialize(CsvRow::from(record))?;
    let row = writer.into_inner().map_err(|e| e.into_error())?;

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(&row).await?;
    file.flush().await?;
    debug!(header = needs_header, bytes = row.len(), "Appended CSV row");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::scratch_dir;

    fn record(n: usize) -> ArticleRecord {
        ArticleRecord {
            url: format!("https://example.com/{n}"),
            title: Some(format!("Story, number {n}")),
            authors: vec!["Siti Rahma".to_string(), "Budi Santoso".to_string()],
            date: Some("2024-03-05".to_string()),
            text: Some("Line one.\n\nLine \"two\".".to_string()),
            sitename: Some("Example".to_string()),
        }
    }

    #[tokio::test]
    async fn test_jsonl_appends_lines() {
        let path = scratch_dir("jsonl").join("nested").join("catalog.jsonl");
        append_jsonl(&record(1), &path).await.unwrap();
        append_jsonl(&ArticleRecord::bare("https://example.com/2"), &path)
            .await
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: ArticleRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first, record(1));
        let second: ArticleRecord = serde_json::from_str(lines[1]).unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_csv_header_written_once() {
        let path = scratch_dir("csv").join("catalog.csv");
        append_csv(&record(1), &path).await.unwrap();
        append_csv(&record(2), &path).await.unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["url", "title", "date", "authors", "sitename", "text"]
        );
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "Story, number 1");
        assert_eq!(&rows[0][3], "Siti Rahma, Budi Santoso");
        assert_eq!(&rows[1][5], "Line one.\n\nLine \"two\".");
    }

    #[tokio::test]
    async fn test_csv_appends_after_existing_rows() {
        let path = scratch_dir("csv-existing").join("catalog.csv");
        std::fs::write(&path, "url,title,date,authors,sitename,text\r\nhttps://example.com/0,,,,,\r\n")
            .unwrap();
        append_csv(&ArticleRecord::bare("https://example.com/1"), &path)
            .await
            .unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "url,title,date,authors,sitename,text\r\nhttps://example.com/0,,,,,\r\nhttps://example.com/1,,,,,\r\n"
        );
    }

    #[tokio::test]
    async fn test_csv_existing_empty_file_gets_header() {
        let path = scratch_dir("csv-empty").join("catalog.csv");
        std::fs::write(&path, "").unwrap();
        append_csv(&ArticleRecord::bare("https://example.com/x"), &path)
            .await
            .unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("url,title,date,authors,sitename,text\r\n"));
        assert!(contents.contains("https://example.com/x,,,,,"));
    }
}
