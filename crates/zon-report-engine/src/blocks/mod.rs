//! Built-in block renderers.
//!
//! `html` is the only passthrough; every structured renderer escapes the text
//! it takes from its payload.

pub mod callout;
pub mod fallback;
pub mod html;
pub mod kpi;
pub mod markdown;
pub mod table;
pub mod timeline;

use crate::document::Block;
use crate::registry::{BlockError, BlockRegistry};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use callout::{CalloutBlock, CalloutVariant};
pub use fallback::FallbackRenderer;
pub use html::HtmlBlock;
pub use kpi::KpiBlock;
pub use markdown::MarkdownBlock;
pub use table::TableBlock;
pub use timeline::{Orientation, TimelineBlock};

pub(crate) fn register_builtins(registry: &mut BlockRegistry) {
    let results = [
        registry.register("html", HtmlBlock),
        registry.register("timeline", TimelineBlock),
        registry.register("callout", CalloutBlock),
        registry.register("markdown", MarkdownBlock),
        registry.register("kpi", KpiBlock),
        registry.register("table", TableBlock),
    ];
    for result in results {
        if let Err(e) = result {
            log::warn!("skipping built-in renderer: {e}");
        }
    }
}

/// Decode a block's payload into its typed form.
pub(crate) fn decode<T: DeserializeOwned>(block: &Block) -> Result<T, BlockError> {
    serde_json::from_value(Value::Object(block.data.clone()))
        .map_err(|e| BlockError::InvalidPayload(e.to_string()))
}

/// Escape text content.
pub(crate) fn text(s: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_text(s)
}

/// Escape a double-quoted attribute value.
pub(crate) fn attr(s: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(s)
}

/// Whether a URL may be placed in an `href`/`src`. Script-capable schemes are refused.
pub(crate) fn is_safe_url(url: &str) -> bool {
    let compact = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    !["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|scheme| compact.starts_with(scheme))
}

/// Render a JSON scalar as display text. Arrays and objects are rejected.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}
