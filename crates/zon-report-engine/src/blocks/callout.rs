use super::{decode, text};
use crate::document::Block;
use crate::registry::{BlockError, BlockRenderer, Fragment, RenderContext};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalloutVariant {
    #[default]
    Info,
    Warning,
    Success,
    Danger,
}

impl CalloutVariant {
    /// Unknown variants render as [`CalloutVariant::Info`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "warning" | "warn" => CalloutVariant::Warning,
            "success" | "ok" => CalloutVariant::Success,
            "danger" | "error" => CalloutVariant::Danger,
            _ => CalloutVariant::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CalloutVariant::Info => "info",
            CalloutVariant::Warning => "warning",
            CalloutVariant::Success => "success",
            CalloutVariant::Danger => "danger",
        }
    }
}

#[derive(Debug, Deserialize)]
struct CalloutPayload {
    #[serde(default)]
    variant: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    bullets: Vec<String>,
}

/// Highlighted note with a title and bullet list.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalloutBlock;

impl BlockRenderer for CalloutBlock {
    fn render(&self, block: &Block, _ctx: &RenderContext<'_>) -> Result<Fragment, BlockError> {
        let payload: CalloutPayload = decode(block)?;
        let variant = CalloutVariant::from_name(&payload.variant);

        let mut out = String::new();
        out.push_str(&format!("<div class=\"callout {}\">", variant.as_str()));
        if !payload.title.is_empty() {
            out.push_str(&format!("<div class=\"title\">{}</div>", text(&payload.title)));
        }
        if !payload.bullets.is_empty() {
            out.push_str("<ul>");
            for bullet in &payload.bullets {
                out.push_str(&format!("<li>{}</li>", text(bullet)));
            }
            out.push_str("</ul>");
        }
        out.push_str("</div>");
        Ok(Fragment::from(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{block, render_with};
    use serde_json::json;

    #[test]
    fn renders_title_and_bullets_in_order() {
        let data = json!({
            "variant": "info",
            "title": "One next action",
            "bullets": ["list sources", "add <limits>", "automate"]
        });
        let fragment = render_with(&CalloutBlock, &block("next", "callout", data)).unwrap();
        insta::assert_snapshot!(
            fragment.as_str(),
            @r#"<div class="callout info"><div class="title">One next action</div><ul><li>list sources</li><li>add &lt;limits&gt;</li><li>automate</li></ul></div>"#
        );
    }

    #[test]
    fn empty_bullets_render_without_list() {
        let data = json!({ "variant": "warning", "title": "Heads up", "bullets": [] });
        let fragment = render_with(&CalloutBlock, &block("w", "callout", data)).unwrap();
        assert_eq!(
            fragment.as_str(),
            "<div class=\"callout warning\"><div class=\"title\">Heads up</div></div>"
        );
    }

    #[test]
    fn unknown_variant_falls_back_to_info() {
        let data = json!({ "variant": "sparkly", "title": "t" });
        let fragment = render_with(&CalloutBlock, &block("w", "callout", data)).unwrap();
        assert!(fragment.as_str().starts_with("<div class=\"callout info\">"));
    }

    #[test]
    fn non_string_bullets_are_rejected() {
        let data = json!({ "bullets": [1, 2] });
        assert!(matches!(
            render_with(&CalloutBlock, &block("w", "callout", data)),
            Err(BlockError::InvalidPayload(_))
        ));
    }
}
