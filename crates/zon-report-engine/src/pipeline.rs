//! Validate → resolve chrome → navigation → block dispatch → page.

use crate::blocks::fallback;
use crate::chrome::{ChromeResolver, Layout, Theme};
use crate::document::Document;
use crate::nav::{NavEntry, build_navigation};
use crate::page::{self, PageParts, Section};
use crate::registry::{BlockError, BlockRegistry, RenderContext};
use crate::schema::{self, SchemaError, SupportedVersions};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// How to treat blocks whose registered renderer rejects the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Replace the block with a marked placeholder and record a warning
    #[default]
    BestEffort,
    /// Abort the render with [`RenderError::Block`]
    Strict,
}

/// What to do with a well-formed document whose version is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionPolicy {
    #[default]
    Reject,
    /// Render metadata only, with a warning
    Degrade,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub mode: RenderMode,
    pub version_policy: VersionPolicy,
    pub supported_versions: SupportedVersions,
    pub default_layout: Layout,
    pub default_theme: Theme,
    /// Optional stylesheet linked from `<head>`
    pub stylesheet: Option<String>,
    pub lang: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: RenderMode::default(),
            version_policy: VersionPolicy::default(),
            supported_versions: SupportedVersions::default(),
            default_layout: Layout::default(),
            default_theme: Theme::default(),
            stylesheet: None,
            lang: "zh-CN".to_string(),
        }
    }
}

/// Non-fatal findings recorded while rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    UnsupportedVersion {
        version: String,
    },
    UnknownBlockType {
        block_id: String,
        block_type: String,
    },
    BlockDegraded {
        block_id: String,
        block_type: String,
        reason: String,
    },
    LayoutFallback {
        requested: String,
        used: &'static str,
    },
    ThemeFallback {
        requested: String,
        used: &'static str,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnsupportedVersion { version } => {
                write!(f, "version `{version}` is not supported; rendering metadata only")
            }
            Warning::UnknownBlockType {
                block_id,
                block_type,
            } => write!(
                f,
                "block `{block_id}` has unknown type `{block_type}`; rendered as placeholder"
            ),
            Warning::BlockDegraded {
                block_id,
                block_type,
                reason,
            } => write!(
                f,
                "block `{block_id}` ({block_type}) could not be rendered: {reason}"
            ),
            Warning::LayoutFallback { requested, used } => {
                write!(f, "unknown layout `{requested}`; using `{used}`")
            }
            Warning::ThemeFallback { requested, used } => {
                write!(f, "unknown theme `{requested}`; using `{used}`")
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("unsupported document version `{version}` (supported: {})", .supported.join(", "))]
    UnknownVersion {
        version: String,
        supported: Vec<String>,
    },

    #[error("block `{block_id}` ({block_type}) failed to render: {source}")]
    Block {
        block_id: String,
        block_type: String,
        source: BlockError,
    },
}

/// Result of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub html: String,
    pub navigation: Vec<NavEntry>,
    pub warnings: Vec<Warning>,
    /// True when the version was unsupported and only metadata was rendered
    pub meta_only: bool,
}

/// Renders documents with a shared, read-only block registry.
///
/// A `Renderer` holds no per-render state, so one instance (or clones of it)
/// can render any number of documents concurrently.
#[derive(Debug, Clone)]
pub struct Renderer {
    registry: Arc<BlockRegistry>,
    options: RenderOptions,
}

impl Renderer {
    pub fn new(registry: Arc<BlockRegistry>, options: RenderOptions) -> Self {
        Self { registry, options }
    }

    /// Renderer over the built-in block types.
    pub fn with_builtins(options: RenderOptions) -> Self {
        Self::new(Arc::new(BlockRegistry::with_builtins()), options)
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Validate a raw document and render it.
    pub fn render(&self, raw: &Value) -> Result<RenderedPage, RenderError> {
        let document = schema::validate(raw)?;
        self.render_document(&document)
    }

    /// Render an already validated document.
    pub fn render_document(&self, document: &Document) -> Result<RenderedPage, RenderError> {
        let mut warnings = Vec::new();
        let meta = &document.meta;

        let meta_only = !self.options.supported_versions.supports(&document.version);
        if meta_only {
            match self.options.version_policy {
                VersionPolicy::Reject => {
                    return Err(RenderError::UnknownVersion {
                        version: document.version.clone(),
                        supported: self.options.supported_versions.tags(),
                    });
                }
                VersionPolicy::Degrade => {
                    log::warn!(
                        "document `{}` has unsupported version `{}`, rendering meta only",
                        meta.id,
                        document.version
                    );
                    warnings.push(Warning::UnsupportedVersion {
                        version: document.version.clone(),
                    });
                }
            }
        }

        let chrome = ChromeResolver::new(self.options.default_layout, self.options.default_theme)
            .resolve(meta);
        if let Some(requested) = &chrome.unknown_layout {
            warnings.push(Warning::LayoutFallback {
                requested: requested.clone(),
                used: chrome.layout.as_str(),
            });
        }
        if let Some(requested) = &chrome.unknown_theme {
            warnings.push(Warning::ThemeFallback {
                requested: requested.clone(),
                used: chrome.theme.as_str(),
            });
        }

        let (navigation, sections) = if meta_only {
            (Vec::new(), Vec::new())
        } else {
            let ctx = RenderContext {
                meta,
                chrome: &chrome,
            };
            let mut sections = Vec::with_capacity(document.blocks.len());
            for block in &document.blocks {
                let resolved = self.registry.resolve(&block.kind);
                if resolved.is_fallback() {
                    log::warn!(
                        "block `{}` has unknown type `{}`, using fallback",
                        block.id,
                        block.kind
                    );
                    warnings.push(Warning::UnknownBlockType {
                        block_id: block.id.clone(),
                        block_type: block.kind.clone(),
                    });
                } else {
                    log::debug!("rendering block `{}` as `{}`", block.id, block.kind);
                }

                let fragment = match resolved.renderer().render(block, &ctx) {
                    Ok(fragment) => fragment,
                    Err(source) => match self.options.mode {
                        RenderMode::Strict => {
                            return Err(RenderError::Block {
                                block_id: block.id.clone(),
                                block_type: block.kind.clone(),
                                source,
                            });
                        }
                        RenderMode::BestEffort => {
                            log::warn!("block `{}` degraded: {source}", block.id);
                            let placeholder = fallback::degraded(block, &source);
                            warnings.push(Warning::BlockDegraded {
                                block_id: block.id.clone(),
                                block_type: block.kind.clone(),
                                reason: source.to_string(),
                            });
                            placeholder
                        }
                    },
                };
                sections.push(Section {
                    id: &block.id,
                    kind: &block.kind,
                    fragment,
                });
            }
            (build_navigation(&document.blocks), sections)
        };

        let notice = meta_only.then(|| {
            format!(
                "This document uses schema version {} which this renderer does not support. Only its metadata is shown.",
                document.version
            )
        });

        let html = page::assemble(&PageParts {
            meta,
            chrome: &chrome,
            navigation: &navigation,
            sections: &sections,
            notice: notice.as_deref(),
            options: &self.options,
        });

        log::info!(
            "rendered document `{}` ({} sections, {} warnings)",
            meta.id,
            sections.len(),
            warnings.len()
        );

        Ok(RenderedPage {
            html,
            navigation,
            warnings,
            meta_only,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Block;
    use crate::registry::Fragment;
    use crate::tests::{minimal_document, scenario_document};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn renderer() -> Renderer {
        Renderer::with_builtins(RenderOptions::default())
    }

    fn section_ids(html: &str) -> Vec<String> {
        html.match_indices("<section ")
            .filter_map(|(start, _)| {
                let rest = &html[start..];
                let id_start = rest.find(" id=\"")? + 5;
                let id_end = rest[id_start..].find('"')? + id_start;
                Some(rest[id_start..id_end].to_string())
            })
            .collect()
    }

    #[test]
    fn scenario_renders_three_sections_in_order() {
        let page = renderer().render(&scenario_document()).unwrap();

        assert_eq!(section_ids(&page.html), vec!["tldr", "roadmap", "next"]);
        let anchors: Vec<_> = page.navigation.iter().map(|e| e.anchor.as_str()).collect();
        assert_eq!(anchors, vec!["tldr", "roadmap", "next"]);
        assert!(page.warnings.is_empty());
        assert!(page.html.contains("zr-layout-playbook zr-theme-light"));

        let positions: Vec<_> = ["Day 0–2", "Week 1", "Week 2", "Week 3–4"]
            .iter()
            .map(|label| page.html.find(&format!(">{label}<")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn rendering_is_deterministic() {
        let raw = scenario_document();
        let first = renderer().render(&raw).unwrap();
        let second = renderer().render(&raw).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn input_document_is_not_mutated() {
        let raw = scenario_document();
        let before = raw.clone();
        renderer().render(&raw).unwrap();
        assert_eq!(raw, before);
    }

    #[test]
    fn unknown_block_type_is_isolated() {
        let mut raw = scenario_document();
        raw["blocks"]
            .as_array_mut()
            .unwrap()
            .insert(
                1,
                json!({
                    "id": "chart",
                    "nav": "Chart",
                    "type": "unsupported-xyz",
                    "data": { "series": [] }
                }),
            );

        let page = renderer().render(&raw).unwrap();
        assert_eq!(
            section_ids(&page.html),
            vec!["tldr", "chart", "roadmap", "next"]
        );
        assert!(page.html.contains("Unsupported block type"));
        assert!(page.html.contains("<code>unsupported-xyz</code>"));
        assert_eq!(
            page.warnings,
            vec![Warning::UnknownBlockType {
                block_id: "chart".to_string(),
                block_type: "unsupported-xyz".to_string()
            }]
        );

        // The other blocks render exactly as they would without the unknown one
        let baseline = renderer().render(&scenario_document()).unwrap();
        let timeline_start = baseline.html.find("<div class=\"zr-timeline").unwrap();
        let timeline_end = baseline.html[timeline_start..].find("</ol></div>").unwrap();
        let timeline = &baseline.html[timeline_start..timeline_start + timeline_end];
        assert!(page.html.contains(timeline));
    }

    #[test]
    fn unsupported_version_is_rejected_by_default() {
        let mut raw = scenario_document();
        raw["version"] = json!("zon-report@v99");

        let err = renderer().render(&raw).unwrap_err();
        assert!(matches!(
            &err,
            RenderError::UnknownVersion { version, .. } if version == "zon-report@v99"
        ));
        assert_eq!(
            err.to_string(),
            "unsupported document version `zon-report@v99` (supported: zon-report@v1)"
        );
    }

    #[test]
    fn unsupported_version_degrades_to_meta_only() {
        let mut raw = scenario_document();
        raw["version"] = json!("zon-report@v99");
        let renderer = Renderer::with_builtins(RenderOptions {
            version_policy: VersionPolicy::Degrade,
            ..RenderOptions::default()
        });

        let page = renderer.render(&raw).unwrap();
        assert!(page.meta_only);
        assert!(page.navigation.is_empty());
        assert!(section_ids(&page.html).is_empty());
        assert!(page.html.contains("<h1>Podcast automation plan</h1>"));
        assert!(page.html.contains("zon-report@v99"));
        assert_eq!(
            page.warnings,
            vec![Warning::UnsupportedVersion {
                version: "zon-report@v99".to_string()
            }]
        );
    }

    #[test]
    fn malformed_payload_degrades_in_best_effort_mode() {
        let mut raw = scenario_document();
        raw["blocks"][1]["data"]["items"] = json!("soon");

        let page = renderer().render(&raw).unwrap();
        assert_eq!(section_ids(&page.html), vec!["tldr", "roadmap", "next"]);
        assert!(page.html.contains("Block could not be rendered"));
        assert!(matches!(
            page.warnings.as_slice(),
            [Warning::BlockDegraded { block_id, .. }] if block_id == "roadmap"
        ));
    }

    #[test]
    fn malformed_payload_fails_in_strict_mode() {
        let mut raw = scenario_document();
        raw["blocks"][1]["data"]["items"] = json!("soon");
        let renderer = Renderer::with_builtins(RenderOptions {
            mode: RenderMode::Strict,
            ..RenderOptions::default()
        });

        let err = renderer.render(&raw).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Block { ref block_id, .. } if block_id == "roadmap"
        ));
    }

    #[test]
    fn schema_failures_are_returned_as_data() {
        let mut raw = minimal_document();
        raw["blocks"][1]["id"] = raw["blocks"][0]["id"].clone();

        let err = renderer().render(&raw).unwrap_err();
        let RenderError::Schema(schema) = err else {
            panic!("expected schema error, got {err:?}");
        };
        assert_eq!(schema.duplicate_blocks(), vec![(0, 1)]);
    }

    #[test]
    fn layout_and_theme_typos_still_render() {
        let mut raw = scenario_document();
        raw["meta"]["layout"] = json!("playbok");
        raw["meta"]["theme"] = json!("drak");

        let page = renderer().render(&raw).unwrap();
        assert!(page.html.contains("zr-layout-article zr-theme-light"));
        assert_eq!(section_ids(&page.html), vec!["tldr", "roadmap", "next"]);
        assert_eq!(
            page.warnings,
            vec![
                Warning::LayoutFallback {
                    requested: "playbok".to_string(),
                    used: "article"
                },
                Warning::ThemeFallback {
                    requested: "drak".to_string(),
                    used: "light"
                },
            ]
        );
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn renderer_is_shareable_across_threads() {
        assert_send_sync::<Renderer>();
        assert_send_sync::<BlockRegistry>();
    }

    #[test]
    fn concurrent_renders_match_sequential_output() {
        let renderer = renderer();
        let raw = scenario_document();
        let expected = renderer.render(&raw).unwrap().html;

        let outputs: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..3)
                .map(|_| scope.spawn(|| renderer.render(&raw).unwrap().html))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(outputs.len(), 3);
        for html in outputs {
            assert_eq!(html, expected);
        }
    }

    #[test]
    fn custom_renderers_plug_in_without_pipeline_changes() {
        fn quote(block: &Block, _ctx: &RenderContext<'_>) -> Result<Fragment, BlockError> {
            let said = block.data.get("text").and_then(Value::as_str).unwrap_or_default();
            Ok(Fragment::new(format!("<blockquote>{said}</blockquote>")))
        }

        let mut registry = BlockRegistry::with_builtins();
        registry.register("quote", quote).unwrap();
        let renderer = Renderer::new(Arc::new(registry), RenderOptions::default());

        let mut raw = minimal_document();
        raw["blocks"][1] = json!({ "id": "q", "type": "quote", "data": { "text": "ship it" } });

        let page = renderer.render(&raw).unwrap();
        assert!(page.html.contains("<blockquote>ship it</blockquote>"));
        assert!(page.warnings.is_empty());
    }

    #[test]
    fn warnings_serialise_with_kind_tag() {
        let warning = Warning::UnknownBlockType {
            block_id: "x".to_string(),
            block_type: "chart".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&warning).unwrap(),
            json!({ "kind": "unknown_block_type", "block_id": "x", "block_type": "chart" })
        );
    }
}
