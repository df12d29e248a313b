use super::is_safe_url;
use crate::document::Block;
use crate::registry::{BlockError, BlockRenderer, Fragment, RenderContext};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};
use serde_json::Value;

/// CommonMark prose such as a generated digest.
///
/// Raw HTML inside the markdown is shown as text and links with script
/// schemes are neutralised, so this block never becomes a second markup
/// passthrough next to `html`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownBlock;

impl BlockRenderer for MarkdownBlock {
    fn render(&self, block: &Block, _ctx: &RenderContext<'_>) -> Result<Fragment, BlockError> {
        let source = match block.data.get("markdown") {
            Some(Value::String(source)) => source,
            Some(_) => {
                return Err(BlockError::InvalidPayload(
                    "`markdown` must be a string".to_string(),
                ));
            }
            None => return Err(BlockError::MissingField("markdown")),
        };

        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let events = Parser::new_ext(source, options).map(neutralise);

        let mut out = String::from("<div class=\"zr-markdown\">");
        html::push_html(&mut out, events);
        out.push_str("</div>");
        Ok(Fragment::from(out))
    }
}

fn neutralise(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) if !is_safe_url(&dest_url) => Event::Start(Tag::Link {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) if !is_safe_url(&dest_url) => Event::Start(Tag::Image {
            link_type,
            dest_url: CowStr::Borrowed(""),
            title,
            id,
        }),
        other => other,
    }
}
