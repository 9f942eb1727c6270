//! Shared test utilities.
//!
//! Provides fixture setup and lookup helpers over discovered pages.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let store = DiskStore::new(tmp.path());
//! let found = discover_pages(&store, &SiteConfig::default());
//!
//! let faq = find_page(&found.pages, "Frequently Asked Questions");
//! assert_eq!(faq.tags, vec!["faq", "specification"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::naming::slash_path;
use crate::types::PageRecord;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can write generated files into without
/// affecting other tests or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Page lookups: panic with a clear message on miss
// =========================================================================

/// Find a page by resolved title. Panics if not found.
pub fn find_page<'a>(pages: &'a [PageRecord], title: &str) -> &'a PageRecord {
    pages.iter().find(|p| p.title == title).unwrap_or_else(|| {
        let titles = page_titles(pages);
        panic!("page '{title}' not found. Available: {titles:?}")
    })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All page titles in discovery order.
pub fn page_titles(pages: &[PageRecord]) -> Vec<&str> {
    pages.iter().map(|p| p.title.as_str()).collect()
}

/// All source paths (relative to the docs directory, `/`-separated) in
/// discovery order.
pub fn page_paths(pages: &[PageRecord]) -> Vec<String> {
    pages.iter().map(|p| slash_path(&p.source_path)).collect()
}
