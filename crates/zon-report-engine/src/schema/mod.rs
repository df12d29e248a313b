//! Structural validation of raw documents.
//!
//! Validation walks the raw JSON value once and collects every problem it
//! finds instead of stopping at the first, so a producer can fix a document
//! in a single pass. A value that passes is decoded into a [`Document`].
//! Version support is checked separately (see [`SupportedVersions`]) so that
//! a well-formed document with an unknown version can still be shown
//! meta-only.

pub mod version;

pub use version::{CURRENT_VERSION, SchemaVersion, SupportedVersions};

use crate::document::Document;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// Meta fields a document must carry.
const REQUIRED_META: &[&str] = &["id", "title"];

/// Meta fields that default to an empty string but must be strings when present.
const OPTIONAL_META_STRINGS: &[&str] = &[
    "subtitle",
    "abstract",
    "label",
    "layout",
    "theme",
    "date",
    "audience",
    "scope",
    "generated_at",
];

/// What went wrong at a given location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViolationKind {
    #[error("required field is missing")]
    Missing,
    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    #[error("must not be empty")]
    Empty,
    #[error("`{0}` is not a `kind@vN` version tag")]
    MalformedVersion(String),
    #[error("block id `{id}` is used by blocks {first} and {second}")]
    DuplicateId {
        id: String,
        first: usize,
        second: usize,
    },
    #[error("could not decode document: {0}")]
    Decode(String),
}

/// A single schema violation with a JSON-pointer style location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub kind: ViolationKind,
}

impl Violation {
    fn new(path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{path}: {}", self.kind)
    }
}

/// Every violation found in one document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("document failed schema validation with {} violation(s)", .violations.len())]
pub struct SchemaError {
    pub violations: Vec<Violation>,
}

impl SchemaError {
    /// Block indices involved in duplicate-id violations, in report order.
    pub fn duplicate_blocks(&self) -> Vec<(usize, usize)> {
        self.violations
            .iter()
            .filter_map(|v| match v.kind {
                ViolationKind::DuplicateId { first, second, .. } => Some((first, second)),
                _ => None,
            })
            .collect()
    }
}

/// Validate a raw document and decode it.
pub fn validate(raw: &Value) -> Result<Document, SchemaError> {
    let mut violations = Vec::new();

    match raw.as_object() {
        Some(root) => {
            check_version(root, &mut violations);
            check_meta(root, &mut violations);
            check_blocks(root, &mut violations);
        }
        None => violations.push(Violation::new(
            "",
            ViolationKind::WrongType {
                expected: "object",
                found: type_name(raw),
            },
        )),
    }

    if !violations.is_empty() {
        return Err(SchemaError { violations });
    }

    serde_json::from_value(raw.clone()).map_err(|e| SchemaError {
        violations: vec![Violation::new("", ViolationKind::Decode(e.to_string()))],
    })
}

fn check_version(root: &Map<String, Value>, violations: &mut Vec<Violation>) {
    match root.get("version") {
        None | Some(Value::Null) => {
            violations.push(Violation::new("/version", ViolationKind::Missing))
        }
        Some(Value::String(tag)) => {
            if SchemaVersion::parse(tag).is_none() {
                violations.push(Violation::new(
                    "/version",
                    ViolationKind::MalformedVersion(tag.clone()),
                ));
            }
        }
        Some(other) => violations.push(wrong_type("/version", "string", other)),
    }
}

fn check_meta(root: &Map<String, Value>, violations: &mut Vec<Violation>) {
    let meta = match root.get("meta") {
        None | Some(Value::Null) => {
            violations.push(Violation::new("/meta", ViolationKind::Missing));
            return;
        }
        Some(Value::Object(meta)) => meta,
        Some(other) => {
            violations.push(wrong_type("/meta", "object", other));
            return;
        }
    };

    for field in REQUIRED_META {
        let path = format!("/meta/{field}");
        match meta.get(*field) {
            None | Some(Value::Null) => {
                violations.push(Violation::new(path, ViolationKind::Missing))
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                violations.push(Violation::new(path, ViolationKind::Empty))
            }
            Some(Value::String(_)) => {}
            Some(other) => violations.push(wrong_type(path, "string", other)),
        }
    }

    for field in OPTIONAL_META_STRINGS {
        if let Some(value) = meta.get(*field)
            && !value.is_string()
        {
            violations.push(wrong_type(format!("/meta/{field}"), "string", value));
        }
    }

    match meta.get("tags") {
        None => {}
        Some(Value::Array(tags)) => {
            for (i, tag) in tags.iter().enumerate() {
                if !tag.is_string() {
                    violations.push(wrong_type(format!("/meta/tags/{i}"), "string", tag));
                }
            }
        }
        Some(other) => violations.push(wrong_type("/meta/tags", "array", other)),
    }

    match meta.get("links") {
        None => {}
        Some(Value::Object(links)) => {
            for (name, url) in links {
                if !url.is_string() {
                    violations.push(wrong_type(format!("/meta/links/{name}"), "string", url));
                }
            }
        }
        Some(other) => violations.push(wrong_type("/meta/links", "object", other)),
    }
}

fn check_blocks(root: &Map<String, Value>, violations: &mut Vec<Violation>) {
    let blocks = match root.get("blocks") {
        None | Some(Value::Null) => {
            violations.push(Violation::new("/blocks", ViolationKind::Missing));
            return;
        }
        Some(Value::Array(blocks)) => blocks,
        Some(other) => {
            violations.push(wrong_type("/blocks", "array", other));
            return;
        }
    };

    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (index, entry) in blocks.iter().enumerate() {
        let base = format!("/blocks/{index}");
        let Some(block) = entry.as_object() else {
            violations.push(wrong_type(base, "object", entry));
            continue;
        };

        match block.get("id") {
            None | Some(Value::Null) => {
                violations.push(Violation::new(format!("{base}/id"), ViolationKind::Missing))
            }
            Some(Value::String(id)) if id.trim().is_empty() => {
                violations.push(Violation::new(format!("{base}/id"), ViolationKind::Empty))
            }
            Some(Value::String(id)) => {
                if let Some(&first) = seen.get(id.as_str()) {
                    violations.push(Violation::new(
                        format!("{base}/id"),
                        ViolationKind::DuplicateId {
                            id: id.clone(),
                            first,
                            second: index,
                        },
                    ));
                } else {
                    seen.insert(id.as_str(), index);
                }
            }
            Some(other) => violations.push(wrong_type(format!("{base}/id"), "string", other)),
        }

        match block.get("type") {
            None | Some(Value::Null) => {
                violations.push(Violation::new(format!("{base}/type"), ViolationKind::Missing))
            }
            Some(Value::String(kind)) if kind.trim().is_empty() => {
                violations.push(Violation::new(format!("{base}/type"), ViolationKind::Empty))
            }
            Some(Value::String(_)) => {}
            Some(other) => violations.push(wrong_type(format!("{base}/type"), "string", other)),
        }

        match block.get("data") {
            None | Some(Value::Null) => {
                violations.push(Violation::new(format!("{base}/data"), ViolationKind::Missing))
            }
            Some(Value::Object(_)) => {}
            Some(other) => violations.push(wrong_type(format!("{base}/data"), "object", other)),
        }

        if let Some(nav) = block.get("nav")
            && !nav.is_string()
            && !nav.is_null()
        {
            violations.push(wrong_type(format!("{base}/nav"), "string", nav));
        }
    }
}

fn wrong_type(path: impl Into<String>, expected: &'static str, found: &Value) -> Violation {
    Violation::new(
        path,
        ViolationKind::WrongType {
            expected,
            found: type_name(found),
        },
    )
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
