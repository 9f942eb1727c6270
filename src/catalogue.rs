//! Implementations catalogue: loading and page rendering.
//!
//! The catalogue is a YAML file maintained by hand:
//!
//! ```yaml
//! reference_implementation:
//!   name: swhid-rs
//!   repository: https://github.com/swhid/swhid-rs
//!   types: [cnt, dir, rev, rel, snp]
//!   qualifiers: [origin, visit, anchor, path, lines, bytes]
//! test_suite:
//!   description: Conformance tests.
//!   repository: https://github.com/swhid/swhid-tests
//! implementations:
//!   - name: swh-model
//!     repository: https://gitlab.softwareheritage.org/swh/devel/swh-model
//!     language: Python
//!     types: [cnt, dir, rev, rel, snp]
//! ```
//!
//! Object types and qualifiers are closed sets. Values outside them are kept
//! (not rejected) and rendered after the fixed marker cells as `` `name?` ``
//! so the table columns stay aligned.

use crate::store::FileStore;
use serde::Deserialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("catalogue not found: {0}")]
    Missing(PathBuf),
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, #[source] io::Error),
    #[error("invalid catalogue {0}: {1}")]
    Yaml(PathBuf, #[source] serde_yaml::Error),
}

const NOT_SPECIFIED: &str = "Not specified";
/// License value meaning "no license"; never rendered as a link.
const NO_LICENSE: &str = "---";
const ABSENT: &str = "—";

// ============================================================================
// Closed enumerations
// ============================================================================

/// SWHID object type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ObjectType {
    Content,
    Directory,
    Revision,
    Release,
    Snapshot,
    Unknown(String),
}

impl ObjectType {
    /// Column order of the type markers.
    pub const ALL: [ObjectType; 5] = [
        ObjectType::Content,
        ObjectType::Directory,
        ObjectType::Revision,
        ObjectType::Release,
        ObjectType::Snapshot,
    ];

    pub fn label(&self) -> &str {
        match self {
            ObjectType::Content => "cnt",
            ObjectType::Directory => "dir",
            ObjectType::Revision => "rev",
            ObjectType::Release => "rel",
            ObjectType::Snapshot => "snp",
            ObjectType::Unknown(name) => name,
        }
    }

    fn legend(&self) -> &'static str {
        match self {
            ObjectType::Content => "Contents (files)",
            ObjectType::Directory => "Directories",
            ObjectType::Revision => "Revisions (commits)",
            ObjectType::Release => "Releases",
            ObjectType::Snapshot => "Snapshots",
            ObjectType::Unknown(_) => "",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ObjectType::Unknown(_))
    }
}

impl From<String> for ObjectType {
    fn from(value: String) -> Self {
        match value.trim() {
            "cnt" => ObjectType::Content,
            "dir" => ObjectType::Directory,
            "rev" => ObjectType::Revision,
            "rel" => ObjectType::Release,
            "snp" => ObjectType::Snapshot,
            _ => ObjectType::Unknown(value),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// SWHID qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Qualifier {
    Origin,
    Visit,
    Anchor,
    Path,
    Lines,
    Bytes,
    Unknown(String),
}

impl Qualifier {
    /// Column order of the qualifier markers.
    pub const ALL: [Qualifier; 6] = [
        Qualifier::Origin,
        Qualifier::Visit,
        Qualifier::Anchor,
        Qualifier::Path,
        Qualifier::Lines,
        Qualifier::Bytes,
    ];

    pub fn label(&self) -> &str {
        match self {
            Qualifier::Origin => "origin",
            Qualifier::Visit => "visit",
            Qualifier::Anchor => "anchor",
            Qualifier::Path => "path",
            Qualifier::Lines => "lines",
            Qualifier::Bytes => "bytes",
            Qualifier::Unknown(name) => name,
        }
    }

    fn legend(&self) -> &'static str {
        match self {
            Qualifier::Origin => "Software origin (context qualifier)",
            Qualifier::Visit => "Visit identifier (context qualifier)",
            Qualifier::Anchor => "Anchor identifier (context qualifier)",
            Qualifier::Path => "File path (context qualifier)",
            Qualifier::Lines => "Line range (fragment qualifier)",
            Qualifier::Bytes => "Byte range (fragment qualifier)",
            Qualifier::Unknown(_) => "",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Qualifier::Unknown(_))
    }
}

impl From<String> for Qualifier {
    fn from(value: String) -> Self {
        match value.trim() {
            "origin" => Qualifier::Origin,
            "visit" => Qualifier::Visit,
            "anchor" => Qualifier::Anchor,
            "path" => Qualifier::Path,
            "lines" => Qualifier::Lines,
            "bytes" => Qualifier::Bytes,
            _ => Qualifier::Unknown(value),
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Catalogue {
    pub reference_implementation: Option<ReferenceImplementation>,
    pub test_suite: Option<TestSuite>,
    pub implementations: Vec<CatalogueEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReferenceImplementation {
    pub name: Option<String>,
    pub repository: Option<String>,
    pub language: Option<String>,
    pub description: Option<String>,
    pub license: Option<String>,
    pub license_url: Option<String>,
    pub note: Option<String>,
    pub types: Vec<ObjectType>,
    pub qualifiers: Vec<Qualifier>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TestSuite {
    pub description: Option<String>,
    pub repository: Option<String>,
}

/// One row of the implementations table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogueEntry {
    pub name: String,
    pub repository: Option<String>,
    pub language: String,
    pub maintainer: String,
    pub license: Option<String>,
    pub license_url: Option<String>,
    pub description: String,
    pub types: Vec<ObjectType>,
    pub qualifiers: Vec<Qualifier>,
}

/// Read and parse the catalogue. A blank file is an empty catalogue.
pub fn load(store: &dyn FileStore, path: &Path) -> Result<Catalogue, CatalogueError> {
    let content = store.read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            CatalogueError::Missing(path.to_path_buf())
        } else {
            CatalogueError::Io(path.to_path_buf(), e)
        }
    })?;
    parse(&content).map_err(|e| CatalogueError::Yaml(path.to_path_buf(), e))
}

pub fn parse(content: &str) -> Result<Catalogue, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(Catalogue::default());
    }
    serde_yaml::from_str(content)
}

// ============================================================================
// Rendering
// ============================================================================

/// License cell text: a link when a URL is given and the license is not the
/// "no license" marker.
fn license_display(license: Option<&str>, url: Option<&str>) -> String {
    let license = license.unwrap_or(NOT_SPECIFIED);
    match url.filter(|u| !u.is_empty()) {
        Some(url) if license != NO_LICENSE => format!("[{license}]({url})"),
        _ => license.to_string(),
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Fixed-width presence markers followed by any unrecognized values.
fn marker_cells<T: PartialEq>(
    fixed: &[T],
    present: &[T],
    label: impl Fn(&T) -> &str,
    known: impl Fn(&T) -> bool,
) -> String {
    let mut cells: Vec<String> = fixed
        .iter()
        .map(|item| {
            if present.contains(item) {
                format!("`{}`", label(item))
            } else {
                ABSENT.to_string()
            }
        })
        .collect();
    cells.extend(
        present
            .iter()
            .filter(|item| !known(*item))
            .map(|item| format!("`{}?`", escape_cell(label(item)))),
    );
    cells.join(" ")
}

/// One table row, with a trailing newline.
pub fn render_row(entry: &CatalogueEntry) -> String {
    let name = escape_cell(&entry.name);
    let name_cell = match entry.repository.as_deref().filter(|r| !r.is_empty()) {
        Some(repo) => format!("[{name}]({repo})"),
        None => name,
    };
    let license = license_display(entry.license.as_deref(), entry.license_url.as_deref());
    let types = marker_cells(&ObjectType::ALL, &entry.types, ObjectType::label, ObjectType::is_known);
    let qualifiers = marker_cells(
        &Qualifier::ALL,
        &entry.qualifiers,
        Qualifier::label,
        Qualifier::is_known,
    );
    format!(
        "| {name_cell} | {} | {} | {} | {types} | {qualifiers} | {} |\n",
        escape_cell(&entry.language),
        escape_cell(&entry.maintainer),
        escape_cell(&license),
        escape_cell(&entry.description),
    )
}

fn code_list<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("`{item}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_reference(reference: &ReferenceImplementation, out: &mut String) {
    let repo = reference.repository.as_deref().unwrap_or_default();
    out.push_str(&format!(
        "The **{}** reference implementation is maintained by the SWHID Working Group.\n\n",
        reference.name.as_deref().unwrap_or("swhid-rs")
    ));
    out.push_str(&format!("- **Repository**: [{repo}]({repo})\n"));
    out.push_str(&format!(
        "- **Language**: {}\n",
        reference.language.as_deref().unwrap_or("Rust")
    ));
    out.push_str(&format!(
        "- **Description**: {}\n",
        reference.description.as_deref().unwrap_or_default()
    ));
    out.push_str(&format!(
        "- **License**: {}\n",
        license_display(reference.license.as_deref(), reference.license_url.as_deref())
    ));
    if let Some(note) = reference.note.as_deref().filter(|n| !n.is_empty()) {
        out.push_str(&format!("- **Note**: {note}\n"));
    }
    out.push_str(&format!(
        "\n**Supported Types**: {}\n\n",
        code_list(&reference.types)
    ));
    out.push_str(&format!(
        "**Supported Qualifiers**: {}\n\n",
        code_list(&reference.qualifiers)
    ));
}

fn render_test_suite(suite: &TestSuite, out: &mut String) {
    let repo = suite.repository.as_deref().unwrap_or_default();
    out.push_str("## Test Suite\n\n");
    out.push_str(suite.description.as_deref().unwrap_or_default());
    out.push_str("\n\n");
    out.push_str(&format!("- **Repository**: [{repo}]({repo})\n\n"));
    out.push_str(
        "The test suite can be used to validate that implementations correctly handle SWHID \
         parsing, generation, and validation according to the specification.\n\n",
    );
}

fn render_table(entries: &[CatalogueEntry], out: &mut String) {
    out.push_str("## Known Implementations\n\n");
    out.push_str(
        "The following table lists known implementations of the SWHID standard, along with \
         their supported types and qualifiers.\n\n",
    );
    out.push_str(
        "| Implementation | Language | Maintainer | License | Types | Qualifiers | Description |\n",
    );
    out.push_str(
        "|----------------|----------|-------------|---------|-------|------------|-------------|\n",
    );
    for entry in entries {
        out.push_str(&render_row(entry));
    }

    out.push_str("\n### Type and Qualifier Legend\n\n**Types**:\n");
    for t in &ObjectType::ALL {
        out.push_str(&format!("- `{}` - {}\n", t.label(), t.legend()));
    }
    out.push_str("\n**Qualifiers**:\n");
    for q in &Qualifier::ALL {
        out.push_str(&format!("- `{}` - {}\n", q.label(), q.legend()));
    }
    out.push('\n');
}

const CONTRIBUTING: &str = r#"## Adding a New Implementation

If you have created an implementation of the SWHID standard and would like it to be listed here, please open a pull request with the following information:

### Template for Adding a New Implementation

```yaml
- name: "Your Implementation Name"
  repository: "https://github.com/your-org/your-repo"
  language: "Programming Language"
  maintainer: "Your Name or Organization"
  description: "Brief description of your implementation"
  license: "License name (e.g., MIT, GPL v3, Apache 2.0)"
  license_url: "https://github.com/your-org/your-repo/blob/main/LICENSE"  # Optional: URL to license file
  types:
    - cnt    # Check all that apply
    - dir
    - rev
    - rel
    - snp
  qualifiers:
    - origin   # Check all that apply
    - visit
    - anchor
    - path
    - lines
    - bytes
```

### Required Information

- **Repository URL**: Link to the implementation's source code repository
- **Programming Language**: The primary language used
- **Maintainer**: Name or organization maintaining the implementation
- **Description**: Brief description of what the implementation provides
- **License**: License under which the implementation is released (e.g., MIT, GPL v3, Apache 2.0). Use `---` if no license is specified.
- **Supported Types**: List of SWHID object types supported (`cnt`, `dir`, `rev`, `rel`, `snp`)
- **Supported Qualifiers**: List of qualifiers supported (`origin`, `visit`, `anchor`, `path`, `lines`, `bytes`)

### Optional Information

- **License URL**: URL to the license file in the repository (e.g., `https://github.com/org/repo/blob/main/LICENSE`). If provided, the license name will be displayed as a clickable link.
- **Documentation**: Link to documentation or usage examples
- **Test Suite Compatibility**: Whether the implementation passes the SWHID test suite

To add your implementation, edit `data/implementations.yaml` and submit a pull request. The page will be automatically regenerated when your changes are merged.

"#;

/// Render the full implementations page.
pub fn render_page(catalogue: &Catalogue) -> String {
    let mut out = String::from(
        "# Implementations\n\n\
         This page provides information about SWHID implementations, the reference \
         implementation, and the test suite for validating implementations.\n\n\
         ## Reference Implementation\n\n",
    );
    if let Some(reference) = &catalogue.reference_implementation {
        render_reference(reference, &mut out);
    }
    if let Some(suite) = &catalogue.test_suite {
        render_test_suite(suite, &mut out);
    }
    if !catalogue.implementations.is_empty() {
        render_table(&catalogue.implementations, &mut out);
    }
    out.push_str(CONTRIBUTING);
    out
}
