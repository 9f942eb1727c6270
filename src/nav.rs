//! Site navigation: assembly, serialization, and merging.
//!
//! ## Assembly
//!
//! [`build_navigation`] produces the fixed top-level menu of the site:
//!
//! ```text
//! - Home: index.md
//! - Specification: '!include .monorepo-overlays/spec-<latest>.mkdocs.yml'
//! - <other version>: '!include .monorepo-overlays/spec-<version>.mkdocs.yml'
//! - Governance: '!include sources/governance/mkdocs.yml'
//! - FAQ: faq.md
//! - News:
//!   - All news: news/index.md
//!   - <post title>: news/<post file>      # newest first
//! - Publications: publications.md
//! - Core Team: coreteam.md
//! ```
//!
//! [`render`] turns that into the indented block substituted for
//! `{{NAVIGATION}}` in the main template (two spaces per level, starting at
//! one level because the placeholder sits under `nav:`).
//!
//! ## Merging
//!
//! [`merge_nav`] swaps a hand-written navigation fragment into an already
//! generated config. A top-level section is the `nav:` line plus the lines
//! after it that are indented by two spaces or are `# ` comments; the first
//! line of any other shape (including a blank line) ends it. When there is no
//! `nav:` section the fragment goes right after the `plugins:` section, and
//! when that is absent too, at the end of the file.
//!
//! Trailing line breaks of the fragment are dropped, so merging the same
//! fragment again leaves the file unchanged.

use crate::index::NewsIndex;
use crate::naming;
use crate::version::VersionManifest;
use std::borrow::Cow;
use std::ops::Range;
use std::path::Path;

const GOVERNANCE_INCLUDE: &str = "sources/governance/mkdocs.yml";

/// What a navigation entry points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    /// A page path relative to the docs directory.
    Page(String),
    /// A sub-site pulled in with the monorepo `!include` tag.
    Include(String),
    /// A nested menu.
    Section(Vec<NavEntry>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub label: String,
    pub target: NavTarget,
}

impl NavEntry {
    pub fn page(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: NavTarget::Page(path.into()),
        }
    }

    pub fn include(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: NavTarget::Include(path.into()),
        }
    }

    pub fn section(label: impl Into<String>, children: Vec<NavEntry>) -> Self {
        Self {
            label: label.into(),
            target: NavTarget::Section(children),
        }
    }
}

/// Overlay file generated for `version`, relative to the project root.
pub fn overlay_file_name(version: &str) -> String {
    format!("spec-{version}.mkdocs.yml")
}

/// Assemble the site menu.
///
/// `news_dir` is the news directory relative to the docs directory and
/// `news_listing` the file name of its listing page.
pub fn build_navigation(
    versions: &VersionManifest,
    overlays_dir: &Path,
    news: &NewsIndex<'_>,
    news_dir: &Path,
    news_listing: &str,
) -> Vec<NavEntry> {
    let overlays = naming::slash_path(overlays_dir);
    let overlay = |version: &str| format!("{overlays}/{}", overlay_file_name(version));

    let mut nav = vec![NavEntry::page("Home", "index.md")];

    let latest = versions.latest();
    if let Some(latest) = latest {
        nav.push(NavEntry::include("Specification", overlay(latest)));
    }
    for version in versions.display_order() {
        if Some(version.as_str()) != latest {
            nav.push(NavEntry::include(version.clone(), overlay(&version)));
        }
    }

    nav.push(NavEntry::include("Governance", GOVERNANCE_INCLUDE));
    nav.push(NavEntry::page("FAQ", "faq.md"));

    let mut news_entries = vec![NavEntry::page(
        "All news",
        naming::slash_path(&news_dir.join(news_listing)),
    )];
    news_entries.extend(
        news.iter()
            .map(|post| NavEntry::page(post.title.clone(), naming::slash_path(&post.source_path))),
    );
    nav.push(NavEntry::section("News", news_entries));

    nav.push(NavEntry::page("Publications", "publications.md"));
    nav.push(NavEntry::page("Core Team", "coreteam.md"));
    nav
}

/// Serialize entries as an indented YAML list, one entry per line.
///
/// The first level is indented by two spaces. No trailing newline.
pub fn render(entries: &[NavEntry]) -> String {
    let mut lines = Vec::new();
    render_level(entries, 1, &mut lines);
    lines.join("\n")
}

fn render_level(entries: &[NavEntry], depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for entry in entries {
        let label = yaml_scalar(&entry.label);
        match &entry.target {
            NavTarget::Page(path) => {
                lines.push(format!("{indent}- {label}: {}", yaml_scalar(path)));
            }
            NavTarget::Include(path) => {
                lines.push(format!("{indent}- {label}: '!include {path}'"));
            }
            NavTarget::Section(children) => {
                lines.push(format!("{indent}- {label}:"));
                render_level(children, depth + 1, lines);
            }
        }
    }
}

/// Version list for the `{{VERSIONS}}` placeholder: `    - <version>` per line.
pub fn render_versions(versions: &[String]) -> String {
    versions
        .iter()
        .map(|v| format!("    - {}", yaml_scalar(v)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Quote a plain scalar only when YAML would misread it.
fn yaml_scalar(value: &str) -> Cow<'_, str> {
    const LEADING: &[char] = &[
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@',
        '`',
    ];
    let needs_quotes = value.is_empty()
        || value.starts_with(LEADING)
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.ends_with(':')
        || value.contains(": ")
        || value.contains(" #");
    if needs_quotes {
        Cow::Owned(format!("'{}'", value.replace('\'', "''")))
    } else {
        Cow::Borrowed(value)
    }
}

// ============================================================================
// Merge
// ============================================================================

/// Where a merged fragment ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePlacement {
    /// Existing `nav:` section(s) replaced.
    Replaced { sections: usize },
    /// Inserted after the `plugins:` section.
    AfterPlugins,
    /// Appended at the end of the file.
    Appended,
}

/// Result of [`merge_nav`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    pub text: String,
    pub placement: MergePlacement,
}

/// Put `fragment` in place of the `nav:` section of `config`.
pub fn merge_nav(config: &str, fragment: &str) -> Merged {
    // Trailing line breaks would pile up as blank lines on every merge
    let fragment = fragment.trim_end_matches(['\n', '\r']);
    let replacement = format!("nav:\n{fragment}\n");

    let sections = find_sections(config, "nav", true);
    if !sections.is_empty() {
        let mut text = String::with_capacity(config.len() + fragment.len());
        let mut cursor = 0;
        for range in &sections {
            text.push_str(&config[cursor..range.start]);
            text.push_str(&replacement);
            cursor = range.end;
        }
        text.push_str(&config[cursor..]);
        return Merged {
            text,
            placement: MergePlacement::Replaced {
                sections: sections.len(),
            },
        };
    }

    if let Some(plugins) = find_sections(config, "plugins", false).first() {
        let at = plugins.end;
        let text = format!("{}\n{replacement}{}", &config[..at], &config[at..]);
        return Merged {
            text,
            placement: MergePlacement::AfterPlugins,
        };
    }

    Merged {
        text: format!("{config}\n{replacement}"),
        placement: MergePlacement::Appended,
    }
}

/// Byte ranges of every top-level `key:` section.
///
/// A section is `key:` at the start of a line, any whitespace up to and
/// including the last newline of that whitespace run, then every following
/// line that starts with two spaces (or `# ` when `comments` is set). The
/// final line of the text counts even without a newline, and so does a bare
/// `key:` that ends the text.
fn find_sections(text: &str, key: &str, comments: bool) -> Vec<Range<usize>> {
    let header = format!("{key}:");
    let member = |line: &str| line.starts_with("  ") || (comments && line.starts_with("# "));
    let mut sections = Vec::new();
    let mut line_start = Some(0);

    while let Some(start) = line_start {
        let line_rest = &text[start..];
        if let Some(after) = line_rest.strip_prefix(header.as_str()) {
            let ws_len = after
                .char_indices()
                .find(|(_, c)| !c.is_whitespace())
                .map_or(after.len(), |(i, _)| i);
            let body_start = match after[..ws_len].rfind('\n') {
                Some(last_nl) => Some(start + header.len() + last_nl + 1),
                None if ws_len == after.len() => Some(text.len()),
                None => None,
            };
            if let Some(mut end) = body_start {
                while let Some(nl) = text[end..].find('\n') {
                    if member(&text[end..end + nl]) {
                        end += nl + 1;
                    } else {
                        break;
                    }
                }
                if member(&text[end..]) && !text[end..].contains('\n') {
                    end = text.len();
                }
                sections.push(start..end);
                line_start = Some(end).filter(|&e| e < text.len());
                continue;
            }
        }
        line_start = line_rest.find('\n').map(|nl| start + nl + 1);
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageRecord;
    use crate::version::VersionOrdering;
    use std::path::PathBuf;

    fn manifest(versions: &[&str], latest: Option<&str>) -> VersionManifest {
        VersionManifest::new(
            versions.iter().map(|v| v.to_string()).collect(),
            latest.map(str::to_string),
            VersionOrdering::new("dev"),
        )
    }

    fn post(file: &str, title: &str) -> PageRecord {
        let rel = PathBuf::from("news").join(file);
        PageRecord {
            title: title.to_string(),
            tags: Vec::new(),
            date: naming::date_from_file_name(file),
            url_path: naming::url_path(&rel),
            source_path: rel,
        }
    }

    fn build(versions: &VersionManifest, posts: &[PageRecord]) -> Vec<NavEntry> {
        let news = NewsIndex::build(posts);
        build_navigation(
            versions,
            Path::new(".monorepo-overlays"),
            &news,
            Path::new("news"),
            "index.md",
        )
    }

    // =========================================================================
    // Assembly and rendering
    // =========================================================================

    #[test]
    fn full_navigation_rendered() {
        let versions = manifest(&["v1.0", "v2.0", "dev"], None);
        let posts = vec![
            post("2025-01-01-b.md", "Older"),
            post("2025-04-23-a.md", "Newer"),
        ];
        let text = render(&build(&versions, &posts));
        assert_eq!(
            text,
            "  - Home: index.md
  - Specification: '!include .monorepo-overlays/spec-v2.0.mkdocs.yml'
  - v1.0: '!include .monorepo-overlays/spec-v1.0.mkdocs.yml'
  - dev: '!include .monorepo-overlays/spec-dev.mkdocs.yml'
  - Governance: '!include sources/governance/mkdocs.yml'
  - FAQ: faq.md
  - News:
    - All news: news/index.md
    - Newer: news/2025-04-23-a.md
    - Older: news/2025-01-01-b.md
  - Publications: publications.md
  - Core Team: coreteam.md"
        );
    }

    #[test]
    fn no_versions_no_specification_entry() {
        let nav = build(&manifest(&[], None), &[]);
        let labels: Vec<&str> = nav.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Home", "Governance", "FAQ", "News", "Publications", "Core Team"]
        );
    }

    #[test]
    fn explicit_latest_listed_once() {
        let nav = build(&manifest(&["v1.0", "v2.0"], Some("v1.0")), &[]);
        let includes: Vec<&str> = nav
            .iter()
            .filter(|e| matches!(e.target, NavTarget::Include(_)))
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(includes, vec!["Specification", "v2.0", "Governance"]);
    }

    #[test]
    fn titles_with_colons_quoted() {
        let posts = vec![post("2025-01-01-x.md", "SWHID: now an ISO standard")];
        let text = render(&build(&manifest(&[], None), &posts));
        assert!(text.contains("    - 'SWHID: now an ISO standard': news/2025-01-01-x.md"));
    }

    #[test]
    fn versions_block() {
        let versions = vec!["v2.0".to_string(), "dev".to_string()];
        assert_eq!(render_versions(&versions), "    - v2.0\n    - dev");
        assert_eq!(render_versions(&[]), "");
    }

    #[test]
    fn yaml_scalar_quoting() {
        assert_eq!(yaml_scalar("plain"), "plain");
        assert_eq!(yaml_scalar("it's"), "it's");
        assert_eq!(yaml_scalar("'quoted'"), "'''quoted'''");
        assert_eq!(yaml_scalar("- dash"), "'- dash'");
        assert_eq!(yaml_scalar("ends:"), "'ends:'");
        assert_eq!(yaml_scalar("[Draft] Notes"), "'[Draft] Notes'");
        assert_eq!(yaml_scalar(""), "''");
    }

    // =========================================================================
    // Merge
    // =========================================================================

    #[test]
    fn merge_replaces_only_nav_section() {
        let config = "site_name: SWHID\nnav:\n  - Old: old.md\n  - Older: older.md\ntheme:\n  name: material\n";
        let merged = merge_nav(config, "  - New: new.md");
        assert_eq!(merged.placement, MergePlacement::Replaced { sections: 1 });
        assert_eq!(
            merged.text,
            "site_name: SWHID\nnav:\n  - New: new.md\ntheme:\n  name: material\n"
        );
    }

    #[test]
    fn merge_section_ends_at_blank_line() {
        let config = "nav:\n  - Old: old.md\n\nextra:\n  x: 1\n";
        let merged = merge_nav(config, "  - New: new.md");
        assert_eq!(merged.text, "nav:\n  - New: new.md\n\nextra:\n  x: 1\n");
    }

    #[test]
    fn merge_consumes_top_level_comments_in_nav() {
        let config = "nav:\n  - A: a.md\n# keep out\n  - B: b.md\nz: 1\n";
        let merged = merge_nav(config, "  - C: c.md");
        assert_eq!(merged.text, "nav:\n  - C: c.md\nz: 1\n");
    }

    #[test]
    fn merge_inserts_after_plugins() {
        let config = "site_name: x\nplugins:\n  - search\n  - tags\ntheme: material\n";
        let merged = merge_nav(config, "  - A: a.md");
        assert_eq!(merged.placement, MergePlacement::AfterPlugins);
        assert_eq!(
            merged.text,
            "site_name: x\nplugins:\n  - search\n  - tags\n\nnav:\n  - A: a.md\ntheme: material\n"
        );
    }

    #[test]
    fn merge_appends_without_anchor() {
        let config = "site_name: x\n";
        let merged = merge_nav(config, "  - A: a.md");
        assert_eq!(merged.placement, MergePlacement::Appended);
        assert_eq!(merged.text, "site_name: x\n\nnav:\n  - A: a.md\n");
    }

    #[test]
    fn merge_ignores_nav_with_inline_value() {
        let config = "nav: []\nplugins:\n  - search\n";
        let merged = merge_nav(config, "  - A: a.md");
        assert_eq!(merged.placement, MergePlacement::AfterPlugins);
    }

    #[test]
    fn merge_ignores_similar_keys() {
        let config = "navigation:\n  x: 1\n  nav:\n    - y\n";
        assert_eq!(merge_nav(config, "  - A").placement, MergePlacement::Appended);
    }

    #[test]
    fn merge_is_stable_when_repeated() {
        let config = "site_name: x\nnav:\n  - Old: old.md\ntheme: material\n";
        let fragment = "  - A: a.md\n  - B: b.md\n";
        let once = merge_nav(config, fragment).text;
        let twice = merge_nav(&once, fragment).text;
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_nav_at_end_without_trailing_newline() {
        let config = "a: 1\nnav:\n  - Keep: keep.md\n  - Old: old.md";
        let merged = merge_nav(config, "  - New: new.md");
        assert_eq!(merged.placement, MergePlacement::Replaced { sections: 1 });
        assert_eq!(merged.text, "a: 1\nnav:\n  - New: new.md\n");
        assert!(!merged.text.contains("old.md"));
    }

    #[test]
    fn merge_bare_nav_key_at_end() {
        let merged = merge_nav("a: 1\nnav:", "  - New: new.md");
        assert_eq!(merged.placement, MergePlacement::Replaced { sections: 1 });
        assert_eq!(merged.text, "a: 1\nnav:\n  - New: new.md\n");
    }

    #[test]
    fn merge_after_plugins_ending_without_newline() {
        let merged = merge_nav("plugins:\n  - search", "  - New: new.md");
        assert_eq!(merged.placement, MergePlacement::AfterPlugins);
        assert_eq!(merged.text, "plugins:\n  - search\nnav:\n  - New: new.md\n");
    }
}
