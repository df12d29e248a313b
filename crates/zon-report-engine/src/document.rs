use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// A validated report or board document.
///
/// Documents are produced once by an external pipeline and never mutated at
/// render time. Construct one through [`crate::schema::validate`] so the
/// structural invariants (unique block ids, typed meta fields) hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Schema generation tag, e.g. `zon-report@v1`
    pub version: String,
    pub meta: Meta,
    pub blocks: Vec<Block>,
    /// Top-level fields written by newer producers, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Descriptive document metadata.
///
/// Only `id` and `title` are mandatory on the wire; every other field
/// defaults to empty so older or minimal producers still validate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default, rename = "abstract")]
    pub summary: String,
    /// Document kind shown as a badge, e.g. "Board" or "Report"
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub layout: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub audience: String,
    #[serde(default)]
    pub scope: String,
    /// Free-text tags with set semantics; stored sorted for stable output
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub links: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One typed content unit of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Unique within the document; doubles as the navigation anchor
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav: Option<String>,
    /// Discriminant selecting the renderer
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Map<String, Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Block {
    /// The navigation label, if the block should appear in the menu.
    pub fn nav_label(&self) -> Option<&str> {
        self.nav
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }
}
