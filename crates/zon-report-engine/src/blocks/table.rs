use super::{decode, scalar_text, text};
use crate::document::Block;
use crate::registry::{BlockError, BlockRenderer, Fragment, RenderContext};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct TablePayload {
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

/// Plain data table. Short rows are padded to the header width; long rows
/// keep their extra cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableBlock;

impl BlockRenderer for TableBlock {
    fn render(&self, block: &Block, _ctx: &RenderContext<'_>) -> Result<Fragment, BlockError> {
        let payload: TablePayload = decode(block)?;

        let mut out = String::from("<table class=\"table\">");
        if let Some(caption) = payload.caption.as_deref().filter(|c| !c.trim().is_empty()) {
            out.push_str(&format!("<caption>{}</caption>", text(caption)));
        }
        if !payload.columns.is_empty() {
            out.push_str("<thead><tr>");
            for column in &payload.columns {
                out.push_str(&format!("<th>{}</th>", text(column)));
            }
            out.push_str("</tr></thead>");
        }
        out.push_str("<tbody>");
        for (r, row) in payload.rows.iter().enumerate() {
            out.push_str("<tr>");
            for (c, cell) in row.iter().enumerate() {
                let cell = scalar_text(cell).ok_or_else(|| {
                    BlockError::InvalidPayload(format!("rows[{r}][{c}] must be a scalar"))
                })?;
                out.push_str(&format!("<td>{}</td>", text(&cell)));
            }
            for _ in row.len()..payload.columns.len() {
                out.push_str("<td></td>");
            }
            out.push_str("</tr>");
        }
        out.push_str("</tbody></table>");
        Ok(Fragment::from(out))
    }
}
