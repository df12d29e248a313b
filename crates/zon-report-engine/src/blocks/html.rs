use crate::document::Block;
use crate::registry::{BlockError, BlockRenderer, Fragment, RenderContext};
use serde_json::Value;

/// Passthrough for pre-sanitised markup.
///
/// The `html` payload string is emitted verbatim inside a wrapper. Nothing is
/// parsed, rewritten or escaped; the producer owns the safety of this markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlBlock;

impl BlockRenderer for HtmlBlock {
    fn render(&self, block: &Block, _ctx: &RenderContext<'_>) -> Result<Fragment, BlockError> {
        match block.data.get("html") {
            Some(Value::String(markup)) => {
                Ok(Fragment::new(format!("<div class=\"zr-html\">{markup}</div>")))
            }
            Some(_) => Err(BlockError::InvalidPayload(
                "`html` must be a string".to_string(),
            )),
            None => Err(BlockError::MissingField("html")),
        }
    }
}
