//! Filename conventions shared by every page type.
//!
//! - **Date prefix**: news posts are named `YYYY-MM-DD-slug.md`. The prefix
//!   orders the news list; a file without one (or with an impossible date such
//!   as `2025-02-30-`) gets [`NewsDate::Unknown`] and sorts after every dated post.
//! - **Humanized title**: the last-resort title for a page with neither a
//!   frontmatter title nor a heading. `core_team.md` → "Core Team".
//! - **Clean URLs**: MkDocs serves `faq.md` at `faq/` and `news/index.md` at
//!   `news/`. [`url_path`] reproduces that mapping so generated links resolve.

use crate::types::NewsDate;
use chrono::NaiveDate;
use regex::Regex;
use std::path::{Component, Path};
use std::sync::LazyLock;

static DATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})-").expect("date prefix pattern is valid")
});

/// Date encoded in a leading `YYYY-MM-DD-` of a file name.
///
/// - `"2025-04-23-launch.md"` → `Known(2025-04-23)`
/// - `"2025-04-23.md"` → `Unknown` (the trailing dash is required)
/// - `"2025-13-01-x.md"` → `Unknown` (not a calendar date)
/// - `"launch.md"` → `Unknown`
pub fn date_from_file_name(file_name: &str) -> NewsDate {
    let Some(caps) = DATE_PREFIX.captures(file_name) else {
        return NewsDate::Unknown;
    };
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    match (field(1), field(2), field(3)) {
        (Some(y), Some(m), Some(d)) => i32::try_from(y)
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, m, d))
            .map_or(NewsDate::Unknown, NewsDate::Known),
        _ => NewsDate::Unknown,
    }
}

/// Turn a file stem into a display title.
///
/// Underscores and dashes become spaces, then each word is title-cased: the
/// first letter after a non-letter is uppercased, the rest lowercased.
pub fn humanize(stem: &str) -> String {
    let spaced = stem.replace(['_', '-'], " ");
    let mut out = String::with_capacity(spaced.len());
    let mut prev_letter = false;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if prev_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(c);
            prev_letter = false;
        }
    }
    out
}

/// Directory-style URL for a page, relative to the docs root.
///
/// The extension is replaced with `/`; an `index` page collapses into its
/// parent directory:
///
/// - `faq.md` → `faq/`
/// - `news/2025-04-23-launch.md` → `news/2025-04-23-launch/`
/// - `governance/index.md` → `governance/`
/// - `index.md` → `` (the site root)
pub fn url_path(rel_path: &Path) -> String {
    let mut segments: Vec<String> = rel_path
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::RootDir => Some(String::new()),
            Component::Prefix(p) => Some(p.as_os_str().to_string_lossy().into_owned()),
            Component::CurDir => None,
        })
        .collect();

    let stem = rel_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if stem != "index" {
        segments.push(stem);
    }

    if segments.is_empty() {
        String::new()
    } else {
        format!("{}/", segments.join("/"))
    }
}

/// Forward-slash form of a relative path, for links and nav entries.
pub fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::RootDir => Some(String::new()),
            Component::Prefix(p) => Some(p.as_os_str().to_string_lossy().into_owned()),
            Component::CurDir => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NewsDate {
        NewsDate::Known(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    // =========================================================================
    // Date prefix
    // =========================================================================

    #[test]
    fn date_from_dated_file_name() {
        assert_eq!(date_from_file_name("2025-04-23-launch.md"), ymd(2025, 4, 23));
    }

    #[test]
    fn date_requires_trailing_dash() {
        assert_eq!(date_from_file_name("2025-04-23.md"), NewsDate::Unknown);
    }

    #[test]
    fn date_must_be_a_calendar_date() {
        assert_eq!(date_from_file_name("2025-02-30-x.md"), NewsDate::Unknown);
        assert_eq!(date_from_file_name("2025-13-01-x.md"), NewsDate::Unknown);
    }

    #[test]
    fn date_must_be_leading() {
        assert_eq!(date_from_file_name("post-2025-04-23-x.md"), NewsDate::Unknown);
    }

    #[test]
    fn undated_file_name() {
        assert_eq!(date_from_file_name("no-date.md"), NewsDate::Unknown);
    }

    #[test]
    fn non_ascii_digits_rejected() {
        assert_eq!(date_from_file_name("٢٠٢٥-04-23-x.md"), NewsDate::Unknown);
    }

    // =========================================================================
    // Humanize
    // =========================================================================

    #[test]
    fn humanize_underscores_and_dashes() {
        assert_eq!(humanize("core_team"), "Core Team");
        assert_eq!(humanize("no-date"), "No Date");
    }

    #[test]
    fn humanize_lowercases_rest_of_word() {
        assert_eq!(humanize("FAQ-list"), "Faq List");
    }

    #[test]
    fn humanize_keeps_digits() {
        assert_eq!(humanize("2025-04-23-launch"), "2025 04 23 Launch");
    }

    // =========================================================================
    // URL paths
    // =========================================================================

    #[test]
    fn url_for_plain_page() {
        assert_eq!(url_path(Path::new("faq.md")), "faq/");
    }

    #[test]
    fn url_for_nested_page() {
        assert_eq!(
            url_path(Path::new("news/2025-04-23-launch.md")),
            "news/2025-04-23-launch/"
        );
    }

    #[test]
    fn url_for_index_collapses_to_parent() {
        assert_eq!(url_path(Path::new("governance/index.md")), "governance/");
        assert_eq!(url_path(Path::new("a/b/index.md")), "a/b/");
    }

    #[test]
    fn url_for_root_index_is_empty() {
        assert_eq!(url_path(Path::new("index.md")), "");
    }

    #[test]
    fn url_only_strips_the_extension() {
        assert_eq!(url_path(Path::new("notes.md.md")), "notes.md/");
    }

    #[test]
    fn slash_path_joins_components() {
        assert_eq!(slash_path(Path::new("news/a.md")), "news/a.md");
        assert_eq!(slash_path(Path::new("./news/a.md")), "news/a.md");
        assert_eq!(slash_path(Path::new("../shared/nav.yml")), "../shared/nav.yml");
    }
}
