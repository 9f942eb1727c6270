//! Frontmatter scanner.
//!
//! Pages may open with a small metadata block:
//!
//! ```text
//! ---
//! title: "Release 1.1"
//! tags: [release, "spec update"]
//! authors:
//!   - Jane Doe
//! ---
//! # Body heading
//! ```
//!
//! This is deliberately not a YAML parser. Writers only ever put flat
//! `key: value` pairs and simple lists here, and a line scanner with a fixed
//! grammar gives the same answer for a page whether or not the rest of the
//! block happens to be valid YAML:
//!
//! ```text
//! document    = opening body-lines closing rest
//! opening     = "---" LF                      ; first four bytes of the file
//! closing     = line whose trimmed text is "---"
//! entry       = key ":" value                 ; key at column 0
//! value       = ""  block-item*               ; block list
//!             | "[" item ("," item)* "]"      ; inline list, not for title
//!             | text
//! block-item  = line whose trimmed text starts with "- "
//! ```
//!
//! Values have surrounding whitespace and quote characters removed. For the
//! `tags` key a bare comma-separated value is also a list (`tags: a, b`).
//! `title` is always text, so `title: [Draft] Notes` keeps its brackets.
//!
//! Nothing here fails. Problems become [`Warning`]s on the returned
//! [`Header`]; an unterminated block is discarded entirely so a half-written
//! header never leaks partial metadata.

use std::collections::BTreeMap;
use std::fmt;

/// Block delimiter line.
pub const DELIMITER: &str = "---";

const OPENING: &str = "---\n";
const TITLE_KEY: &str = "title";
const TAGS_KEY: &str = "tags";

/// A frontmatter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }
}

/// Recoverable problem found while scanning a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Opening delimiter without a closing one.
    Unterminated,
    /// A line inside the block that is not `key: value`, a list item, or a comment.
    MalformedLine { line: usize, text: String },
    /// A key seen twice; the first value is kept.
    DuplicateKey { line: usize, key: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Unterminated => write!(f, "frontmatter has no closing '{DELIMITER}' line"),
            Warning::MalformedLine { line, text } => {
                write!(f, "line {line}: not a 'key: value' entry: {text:?}")
            }
            Warning::DuplicateKey { line, key } => {
                write!(f, "line {line}: duplicate key '{key}' ignored")
            }
        }
    }
}

/// Metadata scanned from the top of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// Frontmatter `title`, trimmed and unquoted.
    pub title: Option<String>,
    /// Frontmatter `tags`, in written order, without duplicates.
    pub tags: Vec<String>,
    /// Every frontmatter entry, including `title` and `tags`.
    pub fields: BTreeMap<String, FieldValue>,
    /// First `# ` or `## ` heading of the body.
    pub heading: Option<String>,
    pub warnings: Vec<Warning>,
    closed: bool,
}

impl Header {
    /// Whether the document opened with a terminated frontmatter block,
    /// even an empty one.
    pub fn has_frontmatter(&self) -> bool {
        self.closed
    }
}

/// Scan a document's frontmatter and first heading.
pub fn parse(text: &str) -> Header {
    let mut header = Header::default();

    let body = match text.strip_prefix(OPENING) {
        Some(after_opening) => match scan_block(after_opening, &mut header) {
            Some(rest) => {
                header.closed = true;
                rest
            }
            None => {
                // Unterminated: drop whatever was collected
                header.fields.clear();
                header.warnings.push(Warning::Unterminated);
                text
            }
        },
        None => text,
    };

    header.title = header
        .fields
        .get(TITLE_KEY)
        .and_then(FieldValue::as_text)
        .map(str::to_string);
    header.tags = match header.fields.get(TAGS_KEY) {
        Some(FieldValue::List(items)) => dedup(items.clone()),
        Some(FieldValue::Text(text)) => dedup(split_inline_list(text)),
        None => Vec::new(),
    };
    header.heading = first_heading(body);
    header
}

/// First `# ` or `## ` line, whichever comes first.
pub fn first_heading(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let line = line.trim();
        line.strip_prefix("# ")
            .or_else(|| line.strip_prefix("## "))
            .map(|rest| rest.trim().to_string())
    })
}

/// Scan block lines into `header.fields`.
///
/// Returns the text after the closing delimiter, or `None` if there is none.
fn scan_block<'a>(block: &'a str, header: &mut Header) -> Option<&'a str> {
    let mut lines = block.split_inclusive('\n').peekable();
    // Line 1 is the opening delimiter
    let mut line_no = 1;
    let mut consumed = 0;

    while let Some(raw) = lines.next() {
        line_no += 1;
        consumed += raw.len();
        let line = raw.trim_end_matches(['\n', '\r']);
        let trimmed = line.trim();

        if trimmed == DELIMITER {
            return Some(&block[consumed..]);
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        // Indented or list lines not claimed by a key belong to nested
        // values we do not model.
        if line.starts_with([' ', '\t']) || trimmed.starts_with("- ") {
            continue;
        }

        let Some((key, value)) = split_entry(line) else {
            header.warnings.push(Warning::MalformedLine {
                line: line_no,
                text: line.to_string(),
            });
            continue;
        };

        let value = if value.is_empty() {
            let mut items = Vec::new();
            while let Some(next) = lines.peek() {
                let Some(item) = next.trim().strip_prefix("- ") else {
                    break;
                };
                let item = unquote(item);
                if !item.is_empty() {
                    items.push(item.to_string());
                }
                line_no += 1;
                consumed += next.len();
                lines.next();
            }
            if items.is_empty() {
                FieldValue::Text(String::new())
            } else {
                FieldValue::List(items)
            }
        } else if value.starts_with('[') && key != TITLE_KEY {
            FieldValue::List(split_inline_list(value))
        } else {
            FieldValue::Text(unquote(value).to_string())
        };

        if header.fields.contains_key(key) {
            header.warnings.push(Warning::DuplicateKey {
                line: line_no,
                key: key.to_string(),
            });
        } else {
            header.fields.insert(key.to_string(), value);
        }
    }
    None
}

/// Split `key: value` at the first colon. The key must be a bare identifier.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid_key.then(|| (key, value.trim()))
}

/// `[a, "b c"]` or `a, "b c"` → `["a", "b c"]`.
fn split_inline_list(value: &str) -> Vec<String> {
    let value = value.trim();
    let value = if value.starts_with('[') {
        value.trim_matches(['[', ']'])
    } else {
        value
    };
    value
        .split(',')
        .map(unquote)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn unquote(value: &str) -> &str {
    value.trim().trim_matches(['"', '\''])
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
