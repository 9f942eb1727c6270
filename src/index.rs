//! Derived indexes over discovered pages.
//!
//! Both indexes borrow the records they list; the `Vec<PageRecord>` from
//! discovery stays the owner.
//!
//! - [`TagIndex`]: tag → pages carrying it. Tags iterate in byte order, pages
//!   within a tag by title. A page tagged `a, b` is listed under both.
//! - [`NewsIndex`]: news posts newest first. Undated posts go last, and posts
//!   sharing a date keep their discovery (path) order.

use crate::types::PageRecord;
use std::collections::BTreeMap;

/// Pages grouped by tag.
#[derive(Debug, Default)]
pub struct TagIndex<'a> {
    tags: BTreeMap<&'a str, Vec<&'a PageRecord>>,
}

impl<'a> TagIndex<'a> {
    pub fn build(pages: &'a [PageRecord]) -> Self {
        let mut tags: BTreeMap<&'a str, Vec<&'a PageRecord>> = BTreeMap::new();
        for page in pages {
            for tag in &page.tags {
                tags.entry(tag.as_str()).or_default().push(page);
            }
        }
        for listed in tags.values_mut() {
            listed.sort_by(|a, b| a.title.cmp(&b.title));
        }
        Self { tags }
    }

    /// Tags in lexicographic order with their pages sorted by title.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[&'a PageRecord])> + '_ {
        self.tags.iter().map(|(tag, pages)| (*tag, pages.as_slice()))
    }

    pub fn get(&self, tag: &str) -> Option<&[&'a PageRecord]> {
        self.tags.get(tag).map(Vec::as_slice)
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Total (tag, page) pairs across all tags.
    pub fn listing_count(&self) -> usize {
        self.tags.values().map(Vec::len).sum()
    }
}

/// News posts newest first.
#[derive(Debug, Default)]
pub struct NewsIndex<'a> {
    entries: Vec<&'a PageRecord>,
}

impl<'a> NewsIndex<'a> {
    pub fn build(pages: &'a [PageRecord]) -> Self {
        let mut entries: Vec<&'a PageRecord> = pages.iter().collect();
        // Stable: equal dates keep discovery order
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a PageRecord> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
