//! Content discovery.
//!
//! Walks a directory of Markdown pages and turns each one into a
//! [`PageRecord`]: resolved title, tags, file-name date, and clean URL.
//!
//! ## Layout
//!
//! ```text
//! docs/
//! ├── index.md                         # Home
//! ├── faq.md                           # tags: [faq]
//! ├── news/
//! │   ├── index.md                     # News listing (not a post)
//! │   ├── 2025-04-23-iso-published.md  # Dated post
//! │   └── roadmap.md                   # Undated post → listed last
//! └── swhid-specification/
//!     └── index.md                     # Generated; skipped by the tags scan
//! ```
//!
//! ## Failure policy
//!
//! Discovery never fails. A missing directory is an empty result; a file that
//! cannot be read (I/O error, invalid UTF-8) is logged and skipped; frontmatter
//! problems are logged and the page is kept with whatever metadata survived.
//!
//! Records come back in path order. Any other ordering (news by date, tags by
//! title) is applied later by [`crate::index`].

use crate::config::SiteConfig;
use crate::frontmatter;
use crate::metadata;
use crate::naming;
use crate::store::FileStore;
use crate::types::PageRecord;
use std::io;
use std::path::{Path, PathBuf};

/// Which files under the scanned directory count as pages.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// File names skipped wherever they appear.
    pub exclude_names: Vec<String>,
    /// `index.md` files below a directory with one of these names are skipped.
    pub skip_index_under: Vec<String>,
}

impl Filter {
    /// News posts: direct children of the news directory, minus the listing page.
    pub fn news(config: &SiteConfig) -> Self {
        Self {
            recursive: false,
            exclude_names: vec![config.news.index.clone()],
            skip_index_under: Vec::new(),
        }
    }

    /// Tagged pages: the whole docs tree, minus generated index pages.
    pub fn tagged(config: &SiteConfig) -> Self {
        Self {
            recursive: true,
            exclude_names: Vec::new(),
            skip_index_under: config.tags.skip_index_under.clone(),
        }
    }

    /// Whether `rel_path` (relative to the docs directory) should be scanned.
    pub fn accepts(&self, rel_path: &Path) -> bool {
        if !is_markdown(rel_path) {
            return false;
        }
        let name = rel_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if self.exclude_names.iter().any(|ex| *ex == name) {
            return false;
        }
        if name == "index.md" {
            let under_skipped = rel_path
                .parent()
                .into_iter()
                .flat_map(Path::components)
                .any(|c| {
                    let c = c.as_os_str().to_string_lossy();
                    self.skip_index_under.iter().any(|s| *s == c)
                });
            if under_skipped {
                return false;
            }
        }
        true
    }
}

/// A file that was found but could not be turned into a page.
#[derive(Debug)]
pub struct Skipped {
    pub path: PathBuf,
    pub error: io::Error,
}

/// Result of one discovery pass.
#[derive(Debug, Default)]
pub struct Discovery {
    pub pages: Vec<PageRecord>,
    pub skipped: Vec<Skipped>,
}

/// Discover pages under `docs_dir/within`.
///
/// Record paths are relative to `docs_dir`, so `news/x.md` rather than
/// `docs/news/x.md`.
pub fn discover(
    store: &dyn FileStore,
    docs_dir: &Path,
    within: &Path,
    filter: &Filter,
) -> Discovery {
    let dir = docs_dir.join(within);
    let files = match store.list_files(&dir, filter.recursive) {
        Ok(files) => files,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("{} does not exist, nothing to discover", dir.display());
            return Discovery::default();
        }
        Err(err) => {
            tracing::warn!("Could not list {}: {err}", dir.display());
            return Discovery::default();
        }
    };

    let mut discovery = Discovery::default();
    for path in files {
        let rel = path.strip_prefix(docs_dir).unwrap_or(&path).to_path_buf();
        if !filter.accepts(&rel) {
            continue;
        }
        match store.read_to_string(&path) {
            Ok(text) => discovery.pages.push(build_record(&path, rel, &text)),
            Err(error) => {
                tracing::warn!("Could not read {}: {error}", path.display());
                discovery.skipped.push(Skipped { path, error });
            }
        }
    }
    discovery
}

/// Discover news posts.
pub fn discover_news(store: &dyn FileStore, config: &SiteConfig) -> Discovery {
    discover(
        store,
        &config.docs_dir,
        &config.news.dir,
        &Filter::news(config),
    )
}

/// Discover every page of the docs tree (tagged or not).
pub fn discover_pages(store: &dyn FileStore, config: &SiteConfig) -> Discovery {
    discover(
        store,
        &config.docs_dir,
        Path::new(""),
        &Filter::tagged(config),
    )
}

/// Build a record from a page's text. `path` is only used in log messages.
pub fn build_record(path: &Path, rel: PathBuf, text: &str) -> PageRecord {
    let header = frontmatter::parse(text);
    for warning in &header.warnings {
        tracing::warn!("{}: {warning}", path.display());
    }

    let stem = rel
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = rel
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    PageRecord {
        title: metadata::resolve_title(&header, &stem),
        tags: header.tags,
        date: naming::date_from_file_name(&file_name),
        url_path: naming::url_path(&rel),
        source_path: rel,
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}
