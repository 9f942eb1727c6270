//! Records shared between discovery, aggregation and generation.

use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;

/// Publication date of a page, taken from its file name.
///
/// `Unknown` orders before every known date, so a newest-first sort puts
/// undated pages at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum NewsDate {
    #[default]
    Unknown,
    Known(NaiveDate),
}

impl fmt::Display for NewsDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewsDate::Known(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            NewsDate::Unknown => f.write_str("undated"),
        }
    }
}

/// One discovered Markdown page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Resolved title: frontmatter `title`, then first heading, then file name.
    pub title: String,
    /// Frontmatter tags in written order.
    pub tags: Vec<String>,
    /// Path relative to the docs directory, e.g. `news/2025-04-23-launch.md`.
    pub source_path: PathBuf,
    pub date: NewsDate,
    /// Clean URL relative to the docs root, e.g. `news/2025-04-23-launch/`.
    pub url_path: String,
}
