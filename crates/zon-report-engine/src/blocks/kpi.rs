use super::{decode, scalar_text, text};
use crate::document::Block;
use crate::registry::{BlockError, BlockRenderer, Fragment, RenderContext};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct KpiPayload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    items: Vec<KpiItem>,
}

#[derive(Debug, Deserialize)]
struct KpiItem {
    #[serde(default)]
    label: String,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    note: Option<String>,
}

/// Grid of headline figures (label, value, optional note).
#[derive(Debug, Clone, Copy, Default)]
pub struct KpiBlock;

impl BlockRenderer for KpiBlock {
    fn render(&self, block: &Block, _ctx: &RenderContext<'_>) -> Result<Fragment, BlockError> {
        let payload: KpiPayload = decode(block)?;

        let mut out = String::new();
        if let Some(title) = payload.title.as_deref().filter(|t| !t.trim().is_empty()) {
            out.push_str(&format!("<h2>{}</h2>", text(title)));
        }
        out.push_str("<div class=\"kpi-grid\">");
        for (i, item) in payload.items.iter().enumerate() {
            let value = scalar_text(&item.value).ok_or_else(|| {
                BlockError::InvalidPayload(format!("items[{i}].value must be a scalar"))
            })?;
            out.push_str(&format!(
                "<div class=\"kpi\"><div class=\"k\">{}</div><div class=\"v\">{}</div>",
                text(&item.label),
                text(&value)
            ));
            if let Some(note) = item.note.as_deref().filter(|n| !n.is_empty()) {
                out.push_str(&format!("<div class=\"muted\">{}</div>", text(note)));
            }
            out.push_str("</div>");
        }
        out.push_str("</div>");
        Ok(Fragment::from(out))
    }
}
