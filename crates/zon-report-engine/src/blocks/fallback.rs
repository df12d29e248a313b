use super::text;
use crate::document::Block;
use crate::registry::{BlockError, BlockRenderer, Fragment, RenderContext};

/// Renderer used for any block type nothing is registered for.
///
/// Emits a visibly flagged placeholder naming the type and the payload keys
/// so unknown content is never dropped or shown as a blank section.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackRenderer;

impl BlockRenderer for FallbackRenderer {
    fn render(&self, block: &Block, _ctx: &RenderContext<'_>) -> Result<Fragment, BlockError> {
        let mut out =
            String::from("<div class=\"zr-placeholder zr-placeholder--unknown\" role=\"note\">");
        out.push_str(&format!(
            "<strong>Unsupported block type</strong> <code>{}</code>",
            text(&block.kind)
        ));
        push_payload_keys(&mut out, block);
        out.push_str("</div>");
        Ok(Fragment::from(out))
    }
}

/// Placeholder for a registered block whose payload could not be rendered.
pub(crate) fn degraded(block: &Block, error: &BlockError) -> Fragment {
    let mut out =
        String::from("<div class=\"zr-placeholder zr-placeholder--invalid\" role=\"note\">");
    out.push_str(&format!(
        "<strong>Block could not be rendered</strong> <code>{}</code><p>{}</p>",
        text(&block.kind),
        text(&error.to_string())
    ));
    out.push_str("</div>");
    Fragment::from(out)
}

fn push_payload_keys(out: &mut String, block: &Block) {
    if block.data.is_empty() {
        out.push_str("<p>Empty payload</p>");
        return;
    }
    let keys: Vec<_> = block.data.keys().map(|k| text(k).into_owned()).collect();
    out.push_str(&format!("<p>Payload fields: {}</p>", keys.join(", ")));
}
