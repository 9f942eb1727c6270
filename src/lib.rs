//! # mkdocs-prebuild
//!
//! Pre-build step for a versioned MkDocs documentation site. It derives the
//! files MkDocs reads from a handful of source-of-truth inputs:
//!
//! ```text
//! build/meta/versions.json ─┐
//! templates/*.template ─────┼─→ .monorepo-overlays/spec-<v>.mkdocs.yml, mkdocs.yml
//! docs/news/*.md ───────────┘
//! docs/**/*.md (frontmatter tags)  ─→ docs/tags/index.md
//! data/implementations.yaml        ─→ docs/implementations.md
//! nav.yml + mkdocs.yml             ─→ mkdocs.yml (nav section replaced)
//! ```
//!
//! Every run is a full rebuild. Running twice on unchanged inputs produces
//! byte-identical outputs.
//!
//! # Architecture
//!
//! Each task is a function `(FileStore, SiteConfig) → report` in
//! [`generate`]. Tasks share no state beyond the files they read, so they are
//! tested against an in-memory [`store::MemoryStore`] and run against a
//! [`store::DiskStore`] rooted at the project directory.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | `FileStore` trait with disk and in-memory implementations |
//! | [`config`] | `prebuild.toml` loading, merging over stock defaults, validation |
//! | [`frontmatter`] | Line scanner for the `---` header block and first heading |
//! | [`naming`] | Filename conventions: date prefix, humanized titles, clean URLs |
//! | [`metadata`] | Title resolution: frontmatter → heading → filename |
//! | [`types`] | Shared records (`PageRecord`, `NewsDate`) |
//! | [`scan`] | Content discovery: directory walk → `PageRecord`s |
//! | [`index`] | Tag index and date-ordered news index |
//! | [`version`] | Versions manifest and the version ordering policy |
//! | [`template`] | `{{NAME}}` substitution, overlay selection, development rewrite |
//! | [`nav`] | Navigation assembly, serialization, and merging |
//! | [`catalogue`] | Implementations catalogue loading and page rendering |
//! | [`generate`] | The pipeline tasks |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## A Scanner, Not a YAML Parser, for Frontmatter
//!
//! Page headers are written by hand and are often not valid YAML. The
//! [`frontmatter`] scanner accepts exactly `key: value` lines, inline
//! `[a, b]` lists and `- item` block lists, and reports everything else as a
//! recoverable warning instead of failing the page. Structured inputs that are
//! meant to be valid (the catalogue, the versions manifest) go through
//! `serde_yaml` and `serde_json`.
//!
//! ## The Development Version Is Special
//!
//! Versions compare as dotted numbers, except the development version, which
//! always sorts last. That exception is a named rule in
//! [`version::VersionOrdering`], not a trick hidden in the numeric comparison.
//!
//! ## Per-File Problems Never Fail a Task
//!
//! An unreadable page is logged and skipped. Missing optional inputs (no
//! versions manifest, no news directory) are empty inputs. Only a missing
//! template, catalogue, or merge input fails the task that needs it.

pub mod catalogue;
pub mod config;
pub mod frontmatter;
pub mod generate;
pub mod index;
pub mod metadata;
pub mod naming;
pub mod nav;
pub mod output;
pub mod scan;
pub mod store;
pub mod template;
pub mod types;
pub mod version;

#[cfg(test)]
pub(crate) mod test_helpers;
