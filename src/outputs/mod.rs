//! Output generation for Markdown files and the JSONL/CSV catalogs.
//!
//! # Submodules
//!
//! - [`markdown`]: One Markdown file per article, with YAML front matter
//! - [`catalog`]: Append-only JSONL and CSV catalogs
//!
//! # Output Structure
//!
//! ```text
//! articles/
//! ├── 2024-03-05_flood-waters-recede-in-jakarta.md
//! └── example.com.md
//! catalog.jsonl
//! catalog.csv
//! ```

pub mod catalog;
pub mod markdown;

use crate::models::ArticleRecord;
use std::error::Error;
use std::path::PathBuf;

/// Where a run writes its artifacts. Disabled catalogs are `None`.
#[derive(Debug, Clone)]
pub struct Outputs {
    pub markdown_dir: PathBuf,
    pub jsonl: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

impl Outputs {
    /// Write every artifact for `record`; returns the Markdown path.
    pub async fn write(&self, record: &ArticleRecord) -> Result<PathBuf, Box<dyn Error>> {
        let md_path = markdown::save(record, &self.markdown_dir).await?;
        if let Some(path) = &self.jsonl {
            catalog::append_jsonl(record, path).await?;
        }
        if let Some(path) = &self.csv {
            catalog::append_csv(record, path).await?;
        }
        Ok(md_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::scratch_dir;

    #[tokio::test]
    async fn test_write_all_outputs() {
        let dir = scratch_dir("outputs");
        let outputs = Outputs {
            markdown_dir: dir.join("articles"),
            jsonl: Some(dir.join("catalog.jsonl")),
            csv: Some(dir.join("catalog.csv")),
        };
        let record = ArticleRecord {
            url: "https://example.com/a".to_string(),
            title: Some("Hello World".to_string()),
            ..Default::default()
        };
        let md = outputs.write(&record).await.unwrap();
        assert_eq!(md, dir.join("articles").join("hello-world.md"));
        assert!(dir.join("catalog.jsonl").is_file());
        assert!(dir.join("catalog.csv").is_file());
    }

    #[tokio::test]
    async fn test_disabled_catalogs_are_skipped() {
        let dir = scratch_dir("outputs-md-only");
        let outputs = Outputs {
            markdown_dir: dir.join("articles"),
            jsonl: None,
            csv: None,
        };
        outputs
            .write(&ArticleRecord::bare("https://example.com/a"))
            .await
            .unwrap();
        assert!(!dir.join("catalog.jsonl").exists());
        assert_eq!(std::fs::read_dir(dir.join("articles")).unwrap().count(), 1);
    }
}
