//! Published specification versions.
//!
//! The manifest is a small JSON file written by the release tooling:
//!
//! ```json
//! {"versions": ["v1.0", "v1.2", "v2.0", "dev"], "latest": ""}
//! ```
//!
//! ## Ordering policy
//!
//! Two rules, kept apart on purpose:
//!
//! 1. [`compare_dotted`]: plain dotted-numeric comparison. An optional
//!    leading `v` is ignored, components compare as integers (`v1.10 > v1.9`),
//!    and a shorter prefix sorts first (`v1.0 < v1.0.1`). Identifiers that are
//!    not dotted numbers sort below every numeric one, by text.
//! 2. [`VersionOrdering`]: the development version is smaller than everything
//!    else, whatever its name would compare as under rule 1.
//!
//! The display order (newest first) therefore always ends with the
//! development version, and the development version is only "latest" when
//! it is the only version published.

use crate::store::FileStore;
use serde::Deserialize;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VersionError {
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("invalid versions manifest {0}: {1}")]
    Json(PathBuf, #[source] serde_json::Error),
}

/// Compare two version identifiers numerically, component by component.
pub fn compare_dotted(a: &str, b: &str) -> Ordering {
    match (numeric_key(a), numeric_key(b)) {
        (Some(ka), Some(kb)) => ka.cmp(&kb).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}

fn numeric_key(version: &str) -> Option<Vec<u64>> {
    let digits = version
        .strip_prefix(['v', 'V'])
        .unwrap_or(version);
    if digits.is_empty() {
        return None;
    }
    digits.split('.').map(|part| part.parse::<u64>().ok()).collect()
}

/// Version comparator with the development-version exception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionOrdering {
    dev: String,
}

impl VersionOrdering {
    pub fn new(dev: impl Into<String>) -> Self {
        Self { dev: dev.into() }
    }

    pub fn is_dev(&self, version: &str) -> bool {
        version == self.dev
    }

    /// Ascending order. The development version is the minimum.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match (self.is_dev(a), self.is_dev(b)) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => compare_dotted(a, b),
        }
    }

    /// Newest first, development version last.
    pub fn display_order(&self, versions: &[String]) -> Vec<String> {
        let mut sorted = versions.to_vec();
        sorted.sort_by(|a, b| self.compare(b, a));
        sorted
    }

    /// Highest version. Only the development version if nothing else exists.
    pub fn latest<'v>(&self, versions: &'v [String]) -> Option<&'v str> {
        versions
            .iter()
            .max_by(|a, b| self.compare(a, b))
            .map(String::as_str)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawManifest {
    #[serde(default)]
    versions: Vec<String>,
    #[serde(default)]
    latest: Option<String>,
}

/// Versions to publish and which one is current.
///
/// Invariant: `latest` is `None` only when there are no versions, and is
/// otherwise a member of `versions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionManifest {
    versions: Vec<String>,
    latest: Option<String>,
    ordering: VersionOrdering,
}

impl VersionManifest {
    /// Build a manifest, resolving `latest` when it is empty or unknown.
    pub fn new(versions: Vec<String>, latest: Option<String>, ordering: VersionOrdering) -> Self {
        let latest = latest.filter(|l| !l.trim().is_empty());
        let latest = match latest {
            Some(l) if versions.contains(&l) => Some(l),
            other => {
                if let Some(unknown) = other {
                    tracing::warn!(
                        "Manifest latest version '{unknown}' is not in the version list; using the highest version"
                    );
                }
                ordering.latest(&versions).map(str::to_string)
            }
        };
        Self {
            versions,
            latest,
            ordering,
        }
    }

    /// Load from a JSON file. A missing file is an empty manifest.
    pub fn load(
        store: &dyn FileStore,
        path: &Path,
        ordering: VersionOrdering,
    ) -> Result<Self, VersionError> {
        if !store.exists(path) {
            tracing::debug!("{} not found, no versions", path.display());
            return Ok(Self::new(Vec::new(), None, ordering));
        }
        let content = store
            .read_to_string(path)
            .map_err(|e| VersionError::Io(path.to_path_buf(), e))?;
        let raw: RawManifest = serde_json::from_str(&content)
            .map_err(|e| VersionError::Json(path.to_path_buf(), e))?;
        Ok(Self::new(raw.versions, raw.latest, ordering))
    }

    /// Versions in manifest order.
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    pub fn latest(&self) -> Option<&str> {
        self.latest.as_deref()
    }

    pub fn ordering(&self) -> &VersionOrdering {
        &self.ordering
    }

    /// Versions newest first, development version last.
    pub fn display_order(&self) -> Vec<String> {
        self.ordering.display_order(&self.versions)
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn ordering() -> VersionOrdering {
        VersionOrdering::new("dev")
    }

    // =========================================================================
    // compare_dotted
    // =========================================================================

    #[test]
    fn dotted_compares_numerically() {
        assert_eq!(compare_dotted("v1.10", "v1.9"), Ordering::Greater);
        assert_eq!(compare_dotted("v2.0", "v10.0"), Ordering::Less);
    }

    #[test]
    fn dotted_shorter_prefix_first() {
        assert_eq!(compare_dotted("v1.0", "v1.0.1"), Ordering::Less);
    }

    #[test]
    fn dotted_prefix_optional() {
        assert_eq!(compare_dotted("1.2", "v1.1"), Ordering::Greater);
    }

    #[test]
    fn dotted_non_numeric_sorts_below_numeric() {
        assert_eq!(compare_dotted("nightly", "v0.1"), Ordering::Less);
        assert_eq!(compare_dotted("v1.x", "v0.1"), Ordering::Less);
        assert_eq!(compare_dotted("alpha", "beta"), Ordering::Less);
    }

    #[test]
    fn dotted_knows_nothing_about_dev() {
        // "dev" is just text here; the exception lives in VersionOrdering
        assert_eq!(compare_dotted("dev", "v1.0"), Ordering::Less);
        assert_eq!(compare_dotted("dev", "alpha"), Ordering::Greater);
    }

    // =========================================================================
    // VersionOrdering
    // =========================================================================

    #[test]
    fn dev_is_minimum_even_against_text() {
        let ord = ordering();
        assert_eq!(ord.compare("dev", "alpha"), Ordering::Less);
        assert_eq!(ord.compare("v0.0", "dev"), Ordering::Greater);
        assert_eq!(ord.compare("dev", "dev"), Ordering::Equal);
    }

    #[test]
    fn custom_dev_label() {
        let ord = VersionOrdering::new("main");
        let sorted = ord.display_order(&strings(&["main", "v1.0", "dev"]));
        assert_eq!(sorted, vec!["v1.0", "dev", "main"]);
    }

    #[test]
    fn display_order_descending_dev_last() {
        let sorted = ordering().display_order(&strings(&["v1.0", "v1.2", "v2.0", "dev"]));
        assert_eq!(sorted, vec!["v2.0", "v1.2", "v1.0", "dev"]);
    }

    #[test]
    fn display_order_dev_first_in_input() {
        let sorted = ordering().display_order(&strings(&["dev", "v0.0", "v1.0"]));
        assert_eq!(sorted, vec!["v1.0", "v0.0", "dev"]);
    }

    #[test]
    fn latest_is_highest_non_dev() {
        let versions = strings(&["v1.0", "v1.2", "v2.0", "dev"]);
        assert_eq!(ordering().latest(&versions), Some("v2.0"));
    }

    #[test]
    fn latest_dev_when_alone() {
        assert_eq!(ordering().latest(&strings(&["dev"])), Some("dev"));
    }

    #[test]
    fn latest_empty_manifest() {
        assert_eq!(ordering().latest(&[]), None);
    }

    // =========================================================================
    // VersionManifest
    // =========================================================================

    #[test]
    fn manifest_explicit_latest_kept() {
        let m = VersionManifest::new(
            strings(&["v1.0", "v2.0"]),
            Some("v1.0".into()),
            ordering(),
        );
        assert_eq!(m.latest(), Some("v1.0"));
    }

    #[test]
    fn manifest_empty_latest_resolved() {
        let m = VersionManifest::new(
            strings(&["v1.0", "v1.2", "v2.0", "dev"]),
            Some(String::new()),
            ordering(),
        );
        assert_eq!(m.latest(), Some("v2.0"));
        assert_eq!(m.display_order(), vec!["v2.0", "v1.2", "v1.0", "dev"]);
        // Manifest order untouched
        assert_eq!(m.versions(), ["v1.0", "v1.2", "v2.0", "dev"]);
    }

    #[test]
    fn manifest_unknown_latest_resolved() {
        let m = VersionManifest::new(strings(&["v1.0"]), Some("v9.9".into()), ordering());
        assert_eq!(m.latest(), Some("v1.0"));
    }

    #[test]
    fn manifest_no_versions_no_latest() {
        let m = VersionManifest::new(Vec::new(), Some("v1.0".into()), ordering());
        assert_eq!(m.latest(), None);
        assert!(m.is_empty());
    }

    #[test]
    fn load_missing_file_is_empty() {
        let store = MemoryStore::new();
        let m = VersionManifest::load(&store, Path::new("versions.json"), ordering()).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.latest(), None);
    }

    #[test]
    fn load_reads_json() {
        let store = MemoryStore::new().with_file(
            "build/meta/versions.json",
            r#"{"versions": ["v1.0", "dev"], "latest": null}"#,
        );
        let m = VersionManifest::load(&store, Path::new("build/meta/versions.json"), ordering())
            .unwrap();
        assert_eq!(m.versions(), ["v1.0", "dev"]);
        assert_eq!(m.latest(), Some("v1.0"));
    }

    #[test]
    fn load_missing_keys_default() {
        let store = MemoryStore::new().with_file("v.json", "{}");
        let m = VersionManifest::load(&store, Path::new("v.json"), ordering()).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn load_invalid_json_is_error() {
        let store = MemoryStore::new().with_file("v.json", "{\"versions\": [1, 2]}");
        let result = VersionManifest::load(&store, Path::new("v.json"), ordering());
        assert!(matches!(result, Err(VersionError::Json(_, _))));
    }
}
