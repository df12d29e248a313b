//! Shared fixtures for unit tests.

use crate::chrome::{Chrome, ChromeResolver};
use crate::document::{Block, Meta};
use crate::registry::{BlockError, BlockRenderer, Fragment, RenderContext};
use serde_json::{Value, json};
use std::path::PathBuf;
use tempfile::TempDir;

/// Smallest document that passes validation: two blocks, no optional meta.
pub fn minimal_document() -> Value {
    json!({
        "version": "zon-report@v1",
        "meta": { "id": "doc-1", "title": "Minimal" },
        "blocks": [
            { "id": "intro", "type": "html", "data": { "html": "<p>Hello</p>" } },
            { "id": "note", "type": "callout", "data": { "title": "Note", "bullets": ["one"] } }
        ]
    })
}

/// A three-block playbook report: raw HTML, a roadmap timeline and a callout.
pub fn scenario_document() -> Value {
    json!({
        "version": "zon-report@v1",
        "meta": {
            "id": "report-20260205-194200",
            "title": "Podcast automation plan",
            "label": "Report",
            "layout": "playbook",
            "theme": "light",
            "date": "2026-02-05",
            "generated_at": "2026-02-05 19:42"
        },
        "blocks": [
            {
                "id": "tldr",
                "nav": "TL;DR",
                "type": "html",
                "data": { "html": "<p><strong>Ship the pipeline first</strong>, then tune prompts.</p>" }
            },
            {
                "id": "roadmap",
                "nav": "Roadmap",
                "type": "timeline",
                "data": {
                    "title": "Roadmap",
                    "orientation": "auto",
                    "items": [
                        { "label": "Day 0–2", "time": "Feb 5", "note": "Wire up the feed" },
                        { "label": "Week 1", "note": "First automated episode" },
                        { "label": "Week 2" },
                        { "label": "Week 3–4", "note": "Review and tune" }
                    ]
                }
            },
            {
                "id": "next",
                "nav": "Next",
                "type": "callout",
                "data": {
                    "variant": "info",
                    "title": "Next steps",
                    "bullets": ["Pick a host", "Record a pilot"]
                }
            }
        ]
    })
}

pub fn block(id: &str, kind: &str, data: Value) -> Block {
    let data = match data {
        Value::Object(map) => map,
        other => panic!("block data must be an object, got {other}"),
    };
    Block {
        id: id.to_string(),
        nav: None,
        kind: kind.to_string(),
        data,
        extra: Default::default(),
    }
}

pub fn block_with_nav(id: &str, nav: Option<&str>, kind: &str) -> Block {
    Block {
        nav: nav.map(str::to_string),
        ..block(id, kind, json!({}))
    }
}

pub fn test_chrome() -> (Meta, Chrome) {
    let meta = Meta {
        id: "doc-1".to_string(),
        title: "Test".to_string(),
        ..Meta::default()
    };
    let chrome = ChromeResolver::default().resolve(&meta);
    (meta, chrome)
}

/// Render a single block against default chrome.
pub fn render_with(renderer: &dyn BlockRenderer, block: &Block) -> Result<Fragment, BlockError> {
    let (meta, chrome) = test_chrome();
    let ctx = RenderContext {
        meta: &meta,
        chrome: &chrome,
    };
    renderer.render(block, &ctx)
}

pub fn create_test_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Write `content` at `rel` under `dir`, which must already have its parents.
pub fn create_test_file(dir: &TempDir, rel: &str, content: &str) -> PathBuf {
    let path = dir.path().join(rel);
    std::fs::write(&path, content).unwrap();
    path
}
