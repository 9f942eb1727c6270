//! Pipeline tasks.
//!
//! Each task reads its inputs from a [`FileStore`], writes its outputs back,
//! and returns a report describing what it did. Tasks share no state, so a
//! failure in one does not affect the others.
//!
//! | Task | Reads | Writes |
//! |------|-------|--------|
//! | [`generate_config`] | versions manifest, templates, news posts | `<overlays>/spec-<v>.mkdocs.yml`, `mkdocs.yml` |
//! | [`generate_tags_page`] | every page under the docs directory | `docs/tags/index.md` |
//! | [`generate_implementations_page`] | `data/implementations.yaml` | `docs/implementations.md` |
//! | [`merge_nav_files`] | `mkdocs.yml`, `nav.yml` | `mkdocs.yml` |
//!
//! [`check`] runs discovery and aggregation without writing anything.
//!
//! ## Placeholders
//!
//! Overlay templates receive `{{VERSION}}`. The main template receives
//! `{{NAVIGATION}}` (see [`crate::nav`]) and `{{VERSIONS}}` (version list,
//! newest first, development version last).

use crate::catalogue::{self, CatalogueError};
use crate::config::SiteConfig;
use crate::index::{NewsIndex, TagIndex};
use crate::nav::{self, MergePlacement};
use crate::scan::{self, Discovery};
use crate::store::FileStore;
use crate::template::{
    self, LineRewrite, MAIN_TEMPLATE, OverlayTemplate, Substitutions, TemplateError,
};
use crate::types::{NewsDate, PageRecord};
use crate::version::{VersionError, VersionManifest, VersionOrdering};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Version(#[from] VersionError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
    #[error("required file not found: {0}")]
    Missing(PathBuf),
    #[error("IO error reading {0}: {1}")]
    Read(PathBuf, #[source] io::Error),
    #[error("IO error writing {0}: {1}")]
    Write(PathBuf, #[source] io::Error),
}

// ============================================================================
// Reports
// ============================================================================

/// One generated overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayReport {
    pub version: String,
    pub template: OverlayTemplate,
    pub output: PathBuf,
    /// Lines changed by the development rewrite (always 0 for other versions).
    pub rewritten: usize,
}

/// A news post as listed in the navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsSummary {
    pub title: String,
    pub path: PathBuf,
    pub date: NewsDate,
}

impl NewsSummary {
    fn from_record(page: &PageRecord) -> Self {
        Self {
            title: page.title.clone(),
            path: page.source_path.clone(),
            date: page.date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigReport {
    pub manifest: PathBuf,
    /// Versions newest first, development version last.
    pub versions: Vec<String>,
    pub latest: Option<String>,
    pub overlays: Vec<OverlayReport>,
    /// News posts in navigation order.
    pub news: Vec<NewsSummary>,
    pub skipped: Vec<PathBuf>,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagsReport {
    pub output: PathBuf,
    pub pages_scanned: usize,
    /// Tags in page order with the number of pages carrying each.
    pub tags: Vec<(String, usize)>,
    pub skipped: Vec<PathBuf>,
}

impl TagsReport {
    pub fn tagged_listings(&self) -> usize {
        self.tags.iter().map(|(_, n)| n).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplementationsReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub implementations: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub fragment: PathBuf,
    pub target: PathBuf,
    pub placement: MergePlacement,
}

/// What a build would produce, without producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub versions: Vec<String>,
    pub latest: Option<String>,
    pub news: Vec<NewsSummary>,
    pub pages_scanned: usize,
    pub tags: Vec<(String, usize)>,
    pub skipped: Vec<PathBuf>,
}

// ============================================================================
// Helpers
// ============================================================================

fn write_file(store: &mut dyn FileStore, path: &Path, contents: &str) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        store
            .create_dir_all(parent)
            .map_err(|e| GenerateError::Write(parent.to_path_buf(), e))?;
    }
    store
        .write(path, contents)
        .map_err(|e| GenerateError::Write(path.to_path_buf(), e))
}

fn read_required(store: &dyn FileStore, path: &Path) -> Result<String, GenerateError> {
    store.read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            GenerateError::Missing(path.to_path_buf())
        } else {
            GenerateError::Read(path.to_path_buf(), e)
        }
    })
}

fn skipped_paths(discovery: &Discovery) -> Vec<PathBuf> {
    discovery.skipped.iter().map(|s| s.path.clone()).collect()
}

fn tag_counts(index: &TagIndex<'_>) -> Vec<(String, usize)> {
    index
        .iter()
        .map(|(tag, pages)| (tag.to_string(), pages.len()))
        .collect()
}

pub fn load_versions(
    store: &dyn FileStore,
    config: &SiteConfig,
) -> Result<VersionManifest, VersionError> {
    VersionManifest::load(
        store,
        &config.versions.manifest,
        VersionOrdering::new(config.versions.dev.clone()),
    )
}

// ============================================================================
// Config overlays + main mkdocs.yml
// ============================================================================

/// Generate one overlay per version and the main MkDocs config.
///
/// Every template is read before anything is written, so a missing template
/// leaves previously generated files untouched.
pub fn generate_config(
    store: &mut dyn FileStore,
    config: &SiteConfig,
) -> Result<ConfigReport, GenerateError> {
    let manifest = load_versions(store, config)?;
    let rewrite = LineRewrite::new(&config.dev_rewrite.from, &config.dev_rewrite.to)?;

    let main_path = config.templates_dir.join(MAIN_TEMPLATE);
    let main_template = template::load_template(store, &main_path)?;

    let mut rendered = Vec::with_capacity(manifest.versions().len());
    for version in manifest.versions() {
        let choice = template::select_overlay_template(store, &config.templates_dir, version);
        tracing::debug!("{version}: using {}", choice.path().display());
        let text = template::load_template(store, choice.path())?;

        let content = template::materialize(&text, &Substitutions::new().with("VERSION", version));
        let (content, rewritten) = if manifest.ordering().is_dev(version) {
            rewrite.apply(&content)
        } else {
            (content, 0)
        };
        if manifest.ordering().is_dev(version) && rewritten == 0 {
            tracing::debug!("{version}: no development docs_dir line to rewrite");
        }
        rendered.push((version.clone(), choice, content, rewritten));
    }

    let news = scan::discover_news(store, config);
    let news_index = NewsIndex::build(&news.pages);
    let navigation = nav::build_navigation(
        &manifest,
        &config.overlays_dir,
        &news_index,
        &config.news.dir,
        &config.news.index,
    );
    let display_order = manifest.display_order();
    let main = template::materialize(
        &main_template,
        &Substitutions::new()
            .with("NAVIGATION", nav::render(&navigation))
            .with("VERSIONS", nav::render_versions(&display_order)),
    );

    store
        .create_dir_all(&config.overlays_dir)
        .map_err(|e| GenerateError::Write(config.overlays_dir.clone(), e))?;
    let mut overlays = Vec::with_capacity(rendered.len());
    for (version, choice, content, rewritten) in rendered {
        let output = config.overlays_dir.join(nav::overlay_file_name(&version));
        write_file(store, &output, &content)?;
        overlays.push(OverlayReport {
            version,
            template: choice,
            output,
            rewritten,
        });
    }
    write_file(store, &config.mkdocs_file, &main)?;

    Ok(ConfigReport {
        manifest: config.versions.manifest.clone(),
        versions: display_order,
        latest: manifest.latest().map(str::to_string),
        overlays,
        news: news_index.iter().map(NewsSummary::from_record).collect(),
        skipped: skipped_paths(&news),
        output: config.mkdocs_file.clone(),
    })
}

// ============================================================================
// Tags page
// ============================================================================

const TAGS_INTRO: &str = "# Tags\n\n\
    This page lists all the tags used across the SWHID documentation and news articles, \
    with links to the pages that contain each tag.\n\n";

/// Render the tags page. Links are relative to the page's own directory.
pub fn render_tags_page(index: &TagIndex<'_>) -> String {
    let mut out = String::from(TAGS_INTRO);
    if index.is_empty() {
        out.push_str("No tagged content found.\n");
        return out;
    }
    for (tag, pages) in index.iter() {
        let plural = if pages.len() == 1 { "" } else { "s" };
        out.push_str(&format!("## {tag}\n\n*{} page{plural}*\n\n", pages.len()));
        for page in pages {
            out.push_str(&format!("- [{}](../{})\n", page.title, page.url_path));
        }
        out.push('\n');
    }
    out
}

pub fn generate_tags_page(
    store: &mut dyn FileStore,
    config: &SiteConfig,
) -> Result<TagsReport, GenerateError> {
    let discovery = scan::discover_pages(store, config);
    let index = TagIndex::build(&discovery.pages);
    let output = config.tags_output();
    write_file(store, &output, &render_tags_page(&index))?;

    Ok(TagsReport {
        output,
        pages_scanned: discovery.pages.len(),
        tags: tag_counts(&index),
        skipped: skipped_paths(&discovery),
    })
}

// ============================================================================
// Implementations page
// ============================================================================

pub fn generate_implementations_page(
    store: &mut dyn FileStore,
    config: &SiteConfig,
) -> Result<ImplementationsReport, GenerateError> {
    let data = catalogue::load(store, &config.catalogue.data)?;
    let output = config.catalogue_output();
    write_file(store, &output, &catalogue::render_page(&data))?;

    Ok(ImplementationsReport {
        source: config.catalogue.data.clone(),
        output,
        implementations: data.implementations.len(),
    })
}

// ============================================================================
// Navigation merge
// ============================================================================

/// Replace the navigation of the generated config with the hand-written fragment.
pub fn merge_nav_files(
    store: &mut dyn FileStore,
    config: &SiteConfig,
) -> Result<MergeReport, GenerateError> {
    let current = read_required(store, &config.mkdocs_file)?;
    let fragment = read_required(store, &config.nav_fragment)?;
    let merged = nav::merge_nav(&current, &fragment);
    write_file(store, &config.mkdocs_file, &merged.text)?;

    Ok(MergeReport {
        fragment: config.nav_fragment.clone(),
        target: config.mkdocs_file.clone(),
        placement: merged.placement,
    })
}

// ============================================================================
// Check
// ============================================================================

pub fn check(store: &dyn FileStore, config: &SiteConfig) -> Result<CheckReport, GenerateError> {
    let manifest = load_versions(store, config)?;
    let news = scan::discover_news(store, config);
    let news_index = NewsIndex::build(&news.pages);
    let pages = scan::discover_pages(store, config);
    let tags = TagIndex::build(&pages.pages);

    let mut skipped = skipped_paths(&news);
    skipped.extend(skipped_paths(&pages));
    skipped.sort();
    skipped.dedup();

    Ok(CheckReport {
        versions: manifest.display_order(),
        latest: manifest.latest().map(str::to_string),
        news: news_index.iter().map(NewsSummary::from_record).collect(),
        pages_scanned: pages.pages.len(),
        tags: tag_counts(&tags),
        skipped,
    })
}
