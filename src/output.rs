//! CLI output formatting for every task.
//!
//! Output leads with what was produced (versions, news posts, tags) and shows
//! file paths as secondary, indented context:
//!
//! ```text
//! Versions
//!     001 v2.0 (latest)
//!     002 v1.0
//!     003 dev
//!
//! Overlays
//!     v2.0 → .monorepo-overlays/spec-v2.0.mkdocs.yml
//!     dev → .monorepo-overlays/spec-dev.mkdocs.yml
//!         Rewrote 1 docs_dir line
//!
//! News
//!     001 SWHID is an ISO standard (2025-04-23)
//!         Source: news/2025-04-23-iso.md
//!
//! Generated mkdocs.yml (3 overlays, 1 news post)
//! ```
//!
//! Each task has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::generate::{
    CheckReport, ConfigReport, ImplementationsReport, MergeReport, NewsSummary, TagsReport,
};
use crate::nav::MergePlacement;
use crate::naming::slash_path;
use crate::template::OverlayTemplate;
use std::path::{Path, PathBuf};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn display(path: &Path) -> String {
    slash_path(path)
}

fn versions_section(versions: &[String], latest: Option<&str>, lines: &mut Vec<String>) {
    lines.push("Versions".to_string());
    if versions.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, version) in versions.iter().enumerate() {
        let marker = if Some(version.as_str()) == latest {
            " (latest)"
        } else {
            ""
        };
        lines.push(format!("{}{} {version}{marker}", indent(1), format_index(i + 1)));
    }
}

fn news_section(news: &[NewsSummary], lines: &mut Vec<String>) {
    lines.push("News".to_string());
    if news.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, post) in news.iter().enumerate() {
        lines.push(format!(
            "{}{} {} ({})",
            indent(1),
            format_index(i + 1),
            post.title,
            post.date
        ));
        lines.push(format!("{}Source: {}", indent(2), display(&post.path)));
    }
}

fn tags_section(tags: &[(String, usize)], lines: &mut Vec<String>) {
    lines.push("Tags".to_string());
    if tags.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (tag, count) in tags {
        lines.push(format!("{}{tag} ({})", indent(1), plural(*count, "page", "pages")));
    }
}

fn skipped_section(skipped: &[PathBuf], lines: &mut Vec<String>) {
    if skipped.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push("Skipped (unreadable)".to_string());
    for path in skipped {
        lines.push(format!("{}{}", indent(1), display(path)));
    }
}

// ============================================================================
// Config
// ============================================================================

pub fn format_config_output(report: &ConfigReport) -> Vec<String> {
    let mut lines = Vec::new();
    versions_section(&report.versions, report.latest.as_deref(), &mut lines);

    if !report.overlays.is_empty() {
        lines.push(String::new());
        lines.push("Overlays".to_string());
        for overlay in &report.overlays {
            lines.push(format!(
                "{}{} \u{2192} {}",
                indent(1),
                overlay.version,
                display(&overlay.output)
            ));
            if let OverlayTemplate::VersionSpecific(path) = &overlay.template {
                lines.push(format!("{}Template: {}", indent(2), display(path)));
            }
            if overlay.rewritten > 0 {
                lines.push(format!(
                    "{}Rewrote {} docs_dir {}",
                    indent(2),
                    overlay.rewritten,
                    if overlay.rewritten == 1 { "line" } else { "lines" }
                ));
            }
        }
    }

    lines.push(String::new());
    news_section(&report.news, &mut lines);
    skipped_section(&report.skipped, &mut lines);

    lines.push(String::new());
    lines.push(format!(
        "Generated {} ({}, {})",
        display(&report.output),
        plural(report.overlays.len(), "overlay", "overlays"),
        plural(report.news.len(), "news post", "news posts")
    ));
    lines
}

pub fn print_config_output(report: &ConfigReport) {
    for line in format_config_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tags
// ============================================================================

pub fn format_tags_output(report: &TagsReport) -> Vec<String> {
    let mut lines = Vec::new();
    tags_section(&report.tags, &mut lines);
    skipped_section(&report.skipped, &mut lines);
    lines.push(String::new());
    lines.push(format!(
        "Generated {} ({} across {} pages scanned)",
        display(&report.output),
        plural(report.tags.len(), "tag", "tags"),
        report.pages_scanned
    ));
    lines
}

pub fn print_tags_output(report: &TagsReport) {
    for line in format_tags_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Implementations
// ============================================================================

pub fn format_implementations_output(report: &ImplementationsReport) -> Vec<String> {
    vec![
        format!("Catalogue {}", display(&report.source)),
        format!(
            "Generated {} ({} listed)",
            display(&report.output),
            plural(report.implementations, "implementation", "implementations")
        ),
    ]
}

pub fn print_implementations_output(report: &ImplementationsReport) {
    for line in format_implementations_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Navigation merge
// ============================================================================

pub fn format_merge_output(report: &MergeReport) -> Vec<String> {
    let how = match report.placement {
        MergePlacement::Replaced { sections: 1 } => "replaced nav section".to_string(),
        MergePlacement::Replaced { sections } => format!("replaced {sections} nav sections"),
        MergePlacement::AfterPlugins => "inserted after plugins".to_string(),
        MergePlacement::Appended => "appended at end".to_string(),
    };
    vec![format!(
        "Merged {} \u{2192} {} ({how})",
        display(&report.fragment),
        display(&report.target)
    )]
}

pub fn print_merge_output(report: &MergeReport) {
    for line in format_merge_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = Vec::new();
    versions_section(&report.versions, report.latest.as_deref(), &mut lines);
    lines.push(String::new());
    news_section(&report.news, &mut lines);
    lines.push(String::new());
    tags_section(&report.tags, &mut lines);
    skipped_section(&report.skipped, &mut lines);
    lines.push(String::new());
    lines.push(format!(
        "Scanned {}, {} unreadable",
        plural(report.pages_scanned, "page", "pages"),
        report.skipped.len()
    ));
    lines
}

pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}
