use super::{decode, text};
use crate::document::Block;
use crate::registry::{BlockError, BlockRenderer, Fragment, RenderContext};
use serde::Deserialize;

/// How the timeline should be laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Auto,
    Vertical,
    Horizontal,
}

impl Orientation {
    /// Unknown names fall back to [`Orientation::Auto`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "vertical" => Orientation::Vertical,
            "horizontal" => Orientation::Horizontal,
            _ => Orientation::Auto,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Auto => "auto",
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        }
    }
}

#[derive(Debug, Deserialize)]
struct TimelinePayload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    orientation: Option<String>,
    #[serde(default)]
    items: Vec<TimelineItem>,
}

#[derive(Debug, Deserialize)]
struct TimelineItem {
    #[serde(default)]
    label: String,
    #[serde(default)]
    time: String,
    #[serde(default)]
    note: Option<String>,
}

/// Ordered chronological entries. Items render in payload order, never sorted.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineBlock;

impl BlockRenderer for TimelineBlock {
    fn render(&self, block: &Block, _ctx: &RenderContext<'_>) -> Result<Fragment, BlockError> {
        let payload: TimelinePayload = decode(block)?;
        let orientation = payload
            .orientation
            .as_deref()
            .map(Orientation::from_name)
            .unwrap_or_default();

        let mut out = String::new();
        out.push_str(&format!(
            "<div class=\"zr-timeline zr-timeline--{}\">",
            orientation.as_str()
        ));
        if let Some(title) = payload.title.as_deref().filter(|t| !t.trim().is_empty()) {
            out.push_str(&format!("<h2>{}</h2>", text(title)));
        }
        out.push_str("<ol class=\"zr-timeline__items\">");
        for item in &payload.items {
            out.push_str("<li class=\"zr-timeline__item\">");
            out.push_str(&format!(
                "<div class=\"zr-timeline__label\">{}</div>",
                text(&item.label)
            ));
            if !item.time.is_empty() {
                out.push_str(&format!("<time>{}</time>", text(&item.time)));
            }
            if let Some(note) = item.note.as_deref().filter(|n| !n.is_empty()) {
                out.push_str(&format!("<p class=\"zr-timeline__note\">{}</p>", text(note)));
            }
            out.push_str("</li>");
        }
        out.push_str("</ol></div>");
        Ok(Fragment::from(out))
    }
}
