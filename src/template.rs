//! Text templates with `{{NAME}}` placeholders.
//!
//! Substitution is a single left-to-right pass over the template:
//!
//! - a placeholder with a supplied value is replaced by that value;
//! - a placeholder without one is copied through unchanged;
//! - substituted values are never scanned again, so a value containing
//!   `{{VERSION}}` stays literal and substitution cannot loop.
//!
//! Because each placeholder is looked up independently, the order in which
//! values are supplied does not matter.
//!
//! Overlay templates can be overridden per version: if
//! `spec-overlay-<version>.yml.template` exists it is used instead of
//! `spec-overlay.yml.template` for that version. There is exactly one level of
//! override, no chain.

use crate::store::FileStore;
use regex::Regex;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default per-version overlay template.
pub const OVERLAY_TEMPLATE: &str = "spec-overlay.yml.template";
/// Main MkDocs config template.
pub const MAIN_TEMPLATE: &str = "mkdocs.yml.template";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template not found: {0}")]
    Missing(PathBuf),
    #[error("IO error reading template {0}: {1}")]
    Io(PathBuf, #[source] io::Error),
    #[error("invalid rewrite pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Placeholder values keyed by name (without braces).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    values: BTreeMap<String, String>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Replace every supplied `{{NAME}}` in `template`.
pub fn materialize(template: &str, subs: &Substitutions) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let replaced = after_open.find("}}").and_then(|close| {
            let name = &after_open[..close];
            let value = is_placeholder_name(name).then(|| subs.get(name)).flatten()?;
            Some((value, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after_open[close + 2..];
            }
            None => {
                // Step one brace so `{{{A}}` still finds `{{A}}`
                out.push('{');
                rest = &rest[open + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Read a template, reporting absence distinctly from other I/O failures.
pub fn load_template(store: &dyn FileStore, path: &Path) -> Result<String, TemplateError> {
    store.read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            TemplateError::Missing(path.to_path_buf())
        } else {
            TemplateError::Io(path.to_path_buf(), e)
        }
    })
}

/// Which overlay template a version is rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayTemplate {
    Default(PathBuf),
    VersionSpecific(PathBuf),
}

impl OverlayTemplate {
    pub fn path(&self) -> &Path {
        match self {
            OverlayTemplate::Default(p) | OverlayTemplate::VersionSpecific(p) => p,
        }
    }
}

/// Pick the overlay template for `version`: the version-specific file if it
/// exists, the default otherwise.
pub fn select_overlay_template(
    store: &dyn FileStore,
    templates_dir: &Path,
    version: &str,
) -> OverlayTemplate {
    let specific = templates_dir.join(format!("spec-overlay-{version}.yml.template"));
    if store.exists(&specific) {
        OverlayTemplate::VersionSpecific(specific)
    } else {
        OverlayTemplate::Default(templates_dir.join(OVERLAY_TEMPLATE))
    }
}

/// Whole-line rewrite applied to the development overlay.
///
/// Matches a line consisting of `from` (plus optional indentation and trailing
/// blanks) and replaces it with `to`, keeping the indentation. Anything else,
/// including a line that merely contains `from`, is left alone.
#[derive(Debug, Clone)]
pub struct LineRewrite {
    pattern: Regex,
    replacement: String,
}

impl LineRewrite {
    pub fn new(from: &str, to: &str) -> Result<Self, TemplateError> {
        let pattern = Regex::new(&format!(
            r"(?m)^([ \t]*){}[ \t]*(\r?)$",
            regex::escape(from.trim())
        ))?;
        let replacement = format!("${{1}}{}${{2}}", to.trim().replace('$', "$$"));
        Ok(Self {
            pattern,
            replacement,
        })
    }

    /// Apply to `text`, returning the result and the number of lines rewritten.
    pub fn apply(&self, text: &str) -> (String, usize) {
        let count = self.pattern.find_iter(text).count();
        if count == 0 {
            return (text.to_string(), 0);
        }
        let rewritten = self
            .pattern
            .replace_all(text, self.replacement.as_str())
            .into_owned();
        (rewritten, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    // =========================================================================
    // materialize
    // =========================================================================

    #[test]
    fn substitutes_supplied_placeholders() {
        let subs = Substitutions::new().with("VERSION", "v1.0");
        assert_eq!(
            materialize("site: spec-{{VERSION}}\ndir: {{VERSION}}/", &subs),
            "site: spec-v1.0\ndir: v1.0/"
        );
    }

    #[test]
    fn unknown_placeholder_left_verbatim() {
        let subs = Substitutions::new().with("A", "1");
        assert_eq!(materialize("{{A}} {{B}}", &subs), "1 {{B}}");
    }

    #[test]
    fn substitution_is_not_recursive() {
        let subs = Substitutions::new()
            .with("A", "{{B}}")
            .with("B", "boom");
        assert_eq!(materialize("{{A}}", &subs), "{{B}}");
    }

    #[test]
    fn self_referencing_value_does_not_loop() {
        let subs = Substitutions::new().with("A", "{{A}}{{A}}");
        assert_eq!(materialize("{{A}}", &subs), "{{A}}{{A}}");
    }

    #[test]
    fn order_of_supply_irrelevant() {
        let a = Substitutions::new().with("X", "1").with("Y", "2");
        let b = Substitutions::new().with("Y", "2").with("X", "1");
        let t = "{{Y}}{{X}}{{Y}}";
        assert_eq!(materialize(t, &a), materialize(t, &b));
        assert_eq!(materialize(t, &a), "212");
    }

    #[test]
    fn unterminated_and_odd_braces() {
        let subs = Substitutions::new().with("A", "1");
        assert_eq!(materialize("{{A", &subs), "{{A");
        assert_eq!(materialize("{{{A}}", &subs), "{1");
        assert_eq!(materialize("{{ A }}", &subs), "{{ A }}");
        assert_eq!(materialize("}}{{}}", &subs), "}}{{}}");
    }

    #[test]
    fn multibyte_text_preserved() {
        let subs = Substitutions::new().with("N", "—");
        assert_eq!(materialize("é {{N}} ü", &subs), "é — ü");
    }

    // =========================================================================
    // Overlay template selection
    // =========================================================================

    #[test]
    fn default_template_when_no_override() {
        let store = MemoryStore::new().with_file("templates/spec-overlay.yml.template", "x");
        let choice = select_overlay_template(&store, Path::new("templates"), "v1.0");
        assert_eq!(
            choice,
            OverlayTemplate::Default(PathBuf::from("templates/spec-overlay.yml.template"))
        );
    }

    #[test]
    fn version_specific_template_wins() {
        let store = MemoryStore::new()
            .with_file("templates/spec-overlay.yml.template", "x")
            .with_file("templates/spec-overlay-v1.0.yml.template", "y");
        let choice = select_overlay_template(&store, Path::new("templates"), "v1.0");
        assert_eq!(
            choice.path(),
            Path::new("templates/spec-overlay-v1.0.yml.template")
        );
        // Other versions unaffected
        let other = select_overlay_template(&store, Path::new("templates"), "v2.0");
        assert!(matches!(other, OverlayTemplate::Default(_)));
    }

    #[test]
    fn missing_template_reported() {
        let store = MemoryStore::new();
        let err = load_template(&store, Path::new("templates/x.template")).unwrap_err();
        assert!(matches!(err, TemplateError::Missing(_)));
    }

    // =========================================================================
    // LineRewrite
    // =========================================================================

    fn dev_rewrite() -> LineRewrite {
        LineRewrite::new(
            "docs_dir: ../sources/specification-dev/Chapters",
            "docs_dir: ../sources/specification/Chapters",
        )
        .unwrap()
    }

    #[test]
    fn rewrites_exact_line_keeping_indent() {
        let text = "site_name: dev\n  docs_dir: ../sources/specification-dev/Chapters\nx: 1\n";
        let (out, n) = dev_rewrite().apply(text);
        assert_eq!(n, 1);
        assert_eq!(
            out,
            "site_name: dev\n  docs_dir: ../sources/specification/Chapters\nx: 1\n"
        );
    }

    #[test]
    fn dots_are_literal() {
        let text = "docs_dir: XX/sources/specification-dev/Chapters\n";
        let (out, n) = dev_rewrite().apply(text);
        assert_eq!(n, 0);
        assert_eq!(out, text);
    }

    #[test]
    fn altered_line_left_alone() {
        let text = "docs_dir: ../sources/specification-dev/Chapters/extra\n";
        let (out, n) = dev_rewrite().apply(text);
        assert_eq!(n, 0);
        assert_eq!(out, text);
    }

    #[test]
    fn crlf_line_rewritten() {
        let text = "docs_dir: ../sources/specification-dev/Chapters\r\nnext: 1\r\n";
        let (out, _) = dev_rewrite().apply(text);
        assert_eq!(out, "docs_dir: ../sources/specification/Chapters\r\nnext: 1\r\n");
    }

    #[test]
    fn dollar_in_replacement_is_literal() {
        let rw = LineRewrite::new("a: 1", "a: $1").unwrap();
        assert_eq!(rw.apply("a: 1\n").0, "a: $1\n");
    }
}
