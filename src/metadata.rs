//! Page title resolution.
//!
//! A page title can come from three places. Each is tried in order and the
//! first non-empty value wins:
//!
//! 1. **Frontmatter** `title:`: the writer said exactly what they want.
//! 2. **First heading**: a `# Title` (or a `## Title` that precedes any `#`).
//! 3. **File name**: humanized stem: `core_team.md` → "Core Team".
//!
//! The third tier always produces something, so every discovered page has a
//! title even when its frontmatter was discarded.

use crate::frontmatter::Header;
use crate::naming;

/// Resolve a metadata field from multiple sources.
///
/// Takes a list of optional values in priority order and returns the first
/// non-None, non-empty value (after trimming).
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

/// Resolve a page title from its scanned header and file stem.
pub fn resolve_title(header: &Header, stem: &str) -> String {
    let fallback = naming::humanize(stem);
    resolve(&[
        header.title.as_deref(),
        header.heading.as_deref(),
        Some(fallback.as_str()),
    ])
    .unwrap_or(fallback)
}
