//! Project configuration module.
//!
//! Handles loading, validating, and merging `prebuild.toml`. The file is
//! optional: without it every path falls back to the stock layout below, which
//! is the layout the documentation repository uses.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! docs_dir = "docs"                     # MkDocs source directory
//! templates_dir = "templates"           # *.template files
//! overlays_dir = ".monorepo-overlays"   # Generated per-version overlays
//! mkdocs_file = "mkdocs.yml"            # Generated main config
//! nav_fragment = "nav.yml"              # Hand-written nav for `merge-nav`
//!
//! [versions]
//! manifest = "build/meta/versions.json"
//! dev = "dev"                           # Development sentinel version
//!
//! [dev_rewrite]
//! from = "docs_dir: ../sources/specification-dev/Chapters"
//! to = "docs_dir: ../sources/specification/Chapters"
//!
//! [news]
//! dir = "news"                          # Relative to docs_dir
//! index = "index.md"                    # Excluded from the news list
//!
//! [tags]
//! output = "tags/index.md"              # Relative to docs_dir
//! skip_index_under = ["swhid-specification"]
//!
//! [catalogue]
//! data = "data/implementations.yaml"
//! output = "implementations.md"         # Relative to docs_dir
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [versions]
//! dev = "main"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::store::FileStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the project root.
pub const CONFIG_FILE: &str = "prebuild.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `prebuild.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// MkDocs source directory.
    pub docs_dir: PathBuf,
    /// Directory holding `*.template` files.
    pub templates_dir: PathBuf,
    /// Output directory for per-version overlays.
    pub overlays_dir: PathBuf,
    /// Generated main MkDocs config.
    pub mkdocs_file: PathBuf,
    /// Hand-written navigation fragment consumed by `merge-nav`.
    pub nav_fragment: PathBuf,
    pub versions: VersionsConfig,
    pub dev_rewrite: DevRewriteConfig,
    pub news: NewsConfig,
    pub tags: TagsConfig,
    pub catalogue: CatalogueConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            templates_dir: PathBuf::from("templates"),
            overlays_dir: PathBuf::from(".monorepo-overlays"),
            mkdocs_file: PathBuf::from("mkdocs.yml"),
            nav_fragment: PathBuf::from("nav.yml"),
            versions: VersionsConfig::default(),
            dev_rewrite: DevRewriteConfig::default(),
            news: NewsConfig::default(),
            tags: TagsConfig::default(),
            catalogue: CatalogueConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate that every required value is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paths = [
            ("docs_dir", &self.docs_dir),
            ("templates_dir", &self.templates_dir),
            ("overlays_dir", &self.overlays_dir),
            ("mkdocs_file", &self.mkdocs_file),
            ("nav_fragment", &self.nav_fragment),
            ("versions.manifest", &self.versions.manifest),
            ("news.dir", &self.news.dir),
            ("tags.output", &self.tags.output),
            ("catalogue.data", &self.catalogue.data),
            ("catalogue.output", &self.catalogue.output),
        ];
        for (key, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.versions.dev.trim().is_empty() {
            return Err(ConfigError::Validation(
                "versions.dev must not be empty".into(),
            ));
        }
        if self.dev_rewrite.from.trim().is_empty() {
            return Err(ConfigError::Validation(
                "dev_rewrite.from must not be empty".into(),
            ));
        }
        if self.news.index.is_empty() {
            return Err(ConfigError::Validation("news.index must not be empty".into()));
        }
        Ok(())
    }

    /// News directory, relative to the project root.
    pub fn news_dir(&self) -> PathBuf {
        self.docs_dir.join(&self.news.dir)
    }

    /// Tags page, relative to the project root.
    pub fn tags_output(&self) -> PathBuf {
        self.docs_dir.join(&self.tags.output)
    }

    /// Implementations page, relative to the project root.
    pub fn catalogue_output(&self) -> PathBuf {
        self.docs_dir.join(&self.catalogue.output)
    }
}

/// Version manifest location and the development sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VersionsConfig {
    /// JSON file with `versions` and `latest`.
    pub manifest: PathBuf,
    /// Label of the development version. Always ordered last.
    pub dev: String,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("build/meta/versions.json"),
            dev: "dev".to_string(),
        }
    }
}

/// Line rewritten in the development overlay after substitution.
///
/// `from` must match a whole line (leading indentation is kept); anything
/// else leaves the overlay untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DevRewriteConfig {
    pub from: String,
    pub to: String,
}

impl Default for DevRewriteConfig {
    fn default() -> Self {
        Self {
            from: "docs_dir: ../sources/specification-dev/Chapters".to_string(),
            to: "docs_dir: ../sources/specification/Chapters".to_string(),
        }
    }
}

/// News collection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewsConfig {
    /// News directory, relative to `docs_dir`.
    pub dir: PathBuf,
    /// File name inside the news directory that is not itself a news post.
    pub index: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("news"),
            index: "index.md".to_string(),
        }
    }
}

/// Tags page settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagsConfig {
    /// Output page, relative to `docs_dir`.
    pub output: PathBuf,
    /// `index.md` files below any directory with one of these names are skipped.
    pub skip_index_under: Vec<String>,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("tags/index.md"),
            skip_index_under: vec!["swhid-specification".to_string()],
        }
    }
}

/// Implementations catalogue settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogueConfig {
    /// YAML catalogue, relative to the project root.
    pub data: PathBuf,
    /// Output page, relative to `docs_dir`.
    pub output: PathBuf,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from("data/implementations.yaml"),
            output: PathBuf::from("implementations.md"),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the project config from `path`.
///
/// A missing file yields the stock defaults. A present file is merged over
/// the defaults, checked for unknown keys, and validated.
pub fn load_config(store: &dyn FileStore, path: &Path) -> Result<SiteConfig, ConfigError> {
    let overlay = if store.exists(path) {
        let content = store
            .read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Some(toml::from_str::<toml::Value>(&content)?)
    } else {
        None
    };
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `prebuild.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# mkdocs-prebuild configuration
# =============================
# All settings are optional. Values shown below are the defaults.
# Paths are relative to the project root unless noted otherwise.
# Unknown keys will cause an error.

# MkDocs source directory.
docs_dir = "docs"

# Directory holding mkdocs.yml.template, spec-overlay.yml.template and
# optional per-version overrides named spec-overlay-<version>.yml.template.
templates_dir = "templates"

# Generated per-version overlays: <overlays_dir>/spec-<version>.mkdocs.yml
overlays_dir = ".monorepo-overlays"

# Generated main configuration.
mkdocs_file = "mkdocs.yml"

# Hand-written navigation fragment merged by `mkdocs-prebuild merge-nav`.
nav_fragment = "nav.yml"

# ---------------------------------------------------------------------------
# Versions
# ---------------------------------------------------------------------------
[versions]
# JSON manifest: {"versions": ["v1.0", "dev"], "latest": "v1.0"}
# A missing manifest means "no versions".
manifest = "build/meta/versions.json"

# Development version label. It is always listed last and is only chosen as
# latest when it is the only version.
dev = "dev"

# ---------------------------------------------------------------------------
# Development overlay rewrite
# ---------------------------------------------------------------------------
[dev_rewrite]
# Whole line replaced in the development overlay only.
from = "docs_dir: ../sources/specification-dev/Chapters"
to = "docs_dir: ../sources/specification/Chapters"

# ---------------------------------------------------------------------------
# News
# ---------------------------------------------------------------------------
[news]
# Relative to docs_dir. Posts named YYYY-MM-DD-slug.md are sorted newest first.
dir = "news"
# Listing page inside the news directory; not a post itself.
index = "index.md"

# ---------------------------------------------------------------------------
# Tags page
# ---------------------------------------------------------------------------
[tags]
# Relative to docs_dir.
output = "tags/index.md"
# index.md files below directories with these names are not scanned.
skip_index_under = ["swhid-specification"]

# ---------------------------------------------------------------------------
# Implementations catalogue
# ---------------------------------------------------------------------------
[catalogue]
data = "data/implementations.yaml"
# Relative to docs_dir.
output = "implementations.md"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn default_config_layout() {
        let config = SiteConfig::default();
        assert_eq!(config.docs_dir, PathBuf::from("docs"));
        assert_eq!(config.overlays_dir, PathBuf::from(".monorepo-overlays"));
        assert_eq!(config.versions.dev, "dev");
        assert_eq!(config.news_dir(), PathBuf::from("docs/news"));
        assert_eq!(config.tags_output(), PathBuf::from("docs/tags/index.md"));
        assert_eq!(
            config.catalogue_output(),
            PathBuf::from("docs/implementations.md")
        );
    }

    #[test]
    fn default_config_is_valid() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[versions]
dev = "main"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.versions.dev, "main");
        // Defaults preserved
        assert_eq!(
            config.versions.manifest,
            PathBuf::from("build/meta/versions.json")
        );
        assert_eq!(config.docs_dir, PathBuf::from("docs"));
    }

    #[test]
    fn unknown_key_rejected() {
        let toml = r#"
[news]
directory = "posts"
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    // =========================================================================
    // merge_toml
    // =========================================================================

    #[test]
    fn merge_overlay_replaces_leaf_and_keeps_siblings() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str("[tags]\noutput = \"t.md\"\n").unwrap();
        let merged = merge_toml(base, overlay);
        let config: SiteConfig = merged.try_into().unwrap();
        assert_eq!(config.tags.output, PathBuf::from("t.md"));
        assert_eq!(config.tags.skip_index_under, vec!["swhid-specification"]);
    }

    #[test]
    fn merge_arrays_replace_not_append() {
        let base = stock_defaults_value();
        let overlay: toml::Value =
            toml::from_str("[tags]\nskip_index_under = [\"a\", \"b\"]\n").unwrap();
        let config: SiteConfig = merge_toml(base, overlay).try_into().unwrap();
        assert_eq!(config.tags.skip_index_under, vec!["a", "b"]);
    }

    // =========================================================================
    // load_config
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let store = MemoryStore::new();
        let config = load_config(&store, Path::new(CONFIG_FILE)).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let store = MemoryStore::new().with_file(
            CONFIG_FILE,
            "docs_dir = \"site\"\n[news]\ndir = \"posts\"\n",
        );
        let config = load_config(&store, Path::new(CONFIG_FILE)).unwrap();
        assert_eq!(config.news_dir(), PathBuf::from("site/posts"));
        assert_eq!(config.news.index, "index.md");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let store = MemoryStore::new().with_file(CONFIG_FILE, "docs_dir = [");
        let result = load_config(&store, Path::new(CONFIG_FILE));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validation_failure() {
        let store = MemoryStore::new().with_file(CONFIG_FILE, "[versions]\ndev = \"  \"\n");
        let result = load_config(&store, Path::new(CONFIG_FILE));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn empty_path_rejected() {
        let store = MemoryStore::new().with_file(CONFIG_FILE, "overlays_dir = \"\"\n");
        let err = load_config(&store, Path::new(CONFIG_FILE)).unwrap_err();
        assert!(err.to_string().contains("overlays_dir"));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }
}
