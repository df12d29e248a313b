//! Final HTML assembly: document pages, diagnostic pages, corpus index and
//! the "latest" redirect entry.

use crate::blocks::{attr, is_safe_url, text};
use crate::chrome::{Chrome, NavPlacement, Theme};
use crate::document::Meta;
use crate::nav::NavEntry;
use crate::pipeline::{RenderError, RenderOptions};
use crate::registry::Fragment;

pub(crate) struct Section<'a> {
    pub id: &'a str,
    pub kind: &'a str,
    pub fragment: Fragment,
}

pub(crate) struct PageParts<'a> {
    pub meta: &'a Meta,
    pub chrome: &'a Chrome,
    pub navigation: &'a [NavEntry],
    pub sections: &'a [Section<'a>],
    pub notice: Option<&'a str>,
    pub options: &'a RenderOptions,
}

pub(crate) fn assemble(parts: &PageParts<'_>) -> String {
    let meta = parts.meta;
    let mut out = String::new();

    push_head(
        &mut out,
        &parts.options.lang,
        &meta.title,
        parts.options.stylesheet.as_deref(),
        parts.chrome.theme,
    );
    out.push_str(&format!(
        "<body class=\"{}\" data-document-id=\"{}\">\n",
        parts.chrome.body_class(),
        attr(&meta.id)
    ));

    push_header(&mut out, meta);

    let placement = parts.chrome.layout.nav_placement();
    if placement == NavPlacement::Top {
        push_nav(&mut out, parts.navigation);
    }
    out.push_str("<div class=\"zr-shell\">\n");
    if placement == NavPlacement::Sidebar && !parts.navigation.is_empty() {
        out.push_str("<aside class=\"zr-sidebar\">\n");
        push_nav(&mut out, parts.navigation);
        out.push_str("</aside>\n");
    }
    out.push_str("<main class=\"zr-main\">\n");
    if let Some(notice) = parts.notice {
        out.push_str(&format!(
            "<div class=\"zr-notice\" role=\"alert\">{}</div>\n",
            text(notice)
        ));
    }
    for section in parts.sections {
        out.push_str(&format!(
            "<section class=\"zr-block zr-block--{}\" id=\"{}\" data-block-type=\"{}\">\n{}\n</section>\n",
            class_token(section.kind),
            attr(section.id),
            attr(section.kind),
            section.fragment.as_str()
        ));
    }
    out.push_str("</main>\n</div>\n");

    push_footer(&mut out, meta);
    out.push_str("</body>\n</html>\n");
    out
}

fn push_head(out: &mut String, lang: &str, title: &str, stylesheet: Option<&str>, theme: Theme) {
    out.push_str(&format!(
        "<!doctype html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\" />\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n\
         <title>{}</title>\n",
        attr(lang),
        text(title)
    ));
    if let Some(href) = stylesheet.filter(|href| is_safe_url(href)) {
        out.push_str(&format!("<link rel=\"stylesheet\" href=\"{}\" />\n", attr(href)));
    }
    out.push_str(&format!("<style>:root{{{}}}</style>\n", theme.palette()));
    out.push_str("</head>\n");
}

fn push_header(out: &mut String, meta: &Meta) {
    out.push_str("<header class=\"zr-header\">\n");
    if !meta.label.is_empty() {
        out.push_str(&format!("<span class=\"zr-label\">{}</span>\n", text(&meta.label)));
    }
    out.push_str(&format!("<h1>{}</h1>\n", text(&meta.title)));
    if !meta.subtitle.is_empty() {
        out.push_str(&format!("<p class=\"zr-subtitle\">{}</p>\n", text(&meta.subtitle)));
    }
    if !meta.summary.is_empty() {
        out.push_str(&format!("<p class=\"zr-abstract\">{}</p>\n", text(&meta.summary)));
    }

    let facts = [
        ("Date", &meta.date),
        ("Audience", &meta.audience),
        ("Scope", &meta.scope),
    ];
    if facts.iter().any(|(_, value)| !value.is_empty()) {
        out.push_str("<dl class=\"zr-meta\">");
        for (name, value) in facts.iter().filter(|(_, value)| !value.is_empty()) {
            out.push_str(&format!("<dt>{name}</dt><dd>{}</dd>", text(value)));
        }
        out.push_str("</dl>\n");
    }

    if !meta.tags.is_empty() {
        out.push_str("<ul class=\"zr-tags\">");
        for tag in &meta.tags {
            out.push_str(&format!("<li>{}</li>", text(tag)));
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</header>\n");
}

fn push_nav(out: &mut String, navigation: &[NavEntry]) {
    if navigation.is_empty() {
        return;
    }
    out.push_str("<nav class=\"zr-nav\"><ol>");
    for entry in navigation {
        out.push_str(&format!(
            "<li><a href=\"#{}\">{}</a></li>",
            attr(&entry.anchor),
            text(&entry.label)
        ));
    }
    out.push_str("</ol></nav>\n");
}

fn push_footer(out: &mut String, meta: &Meta) {
    out.push_str("<footer class=\"zr-footer\">\n");
    if !meta.generated_at.is_empty() {
        out.push_str(&format!(
            "<p class=\"muted\">Generated {}</p>\n",
            text(&meta.generated_at)
        ));
    }
    if !meta.links.is_empty() {
        out.push_str("<ul class=\"zr-links\">");
        for (name, url) in &meta.links {
            if is_safe_url(url) {
                out.push_str(&format!(
                    "<li><a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">{}</a></li>",
                    attr(url),
                    text(name)
                ));
            } else {
                out.push_str(&format!("<li>{} <code>{}</code></li>", text(name), text(url)));
            }
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</footer>\n");
}

/// Reduce a block type to a CSS class token.
fn class_token(kind: &str) -> String {
    kind.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

/// A standalone page explaining why a document could not be rendered.
///
/// Lists every schema violation, so the output is never blank even when the
/// document is unusable.
pub fn render_diagnostic_page(error: &RenderError, lang: &str) -> String {
    let mut out = String::new();
    push_failure_intro(&mut out, lang, &error.to_string());
    if let RenderError::Schema(schema) = error {
        out.push_str("<ol class=\"zr-violations\">\n");
        for violation in &schema.violations {
            let path = if violation.path.is_empty() {
                "/"
            } else {
                violation.path.as_str()
            };
            out.push_str(&format!(
                "<li><code>{}</code> {}</li>\n",
                text(path),
                text(&violation.kind.to_string())
            ));
        }
        out.push_str("</ol>\n");
    }
    out.push_str("</main>\n</body>\n</html>\n");
    out
}

/// Diagnostic page for a document that rendered but could not be written out.
pub fn render_failure_page(reason: &str, lang: &str) -> String {
    let mut out = String::new();
    push_failure_intro(&mut out, lang, reason);
    out.push_str("</main>\n</body>\n</html>\n");
    out
}

fn push_failure_intro(out: &mut String, lang: &str, reason: &str) {
    push_head(out, lang, "Document could not be rendered", None, Theme::Light);
    out.push_str("<body class=\"zr-diagnostic\">\n<main class=\"zr-main\">\n");
    out.push_str("<h1>Document could not be rendered</h1>\n");
    out.push_str(&format!("<p>{}</p>\n", text(reason)));
}

/// One document listed on the corpus index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: String,
    pub title: String,
    pub label: String,
    pub date: String,
    pub generated_at: String,
    pub href: String,
}

impl IndexEntry {
    pub fn from_meta(meta: &Meta, href: impl Into<String>) -> Self {
        Self {
            id: meta.id.clone(),
            title: meta.title.clone(),
            label: meta.label.clone(),
            date: meta.date.clone(),
            generated_at: meta.generated_at.clone(),
            href: href.into(),
        }
    }
}

/// Sort newest first by `generated_at`, then by id.
pub fn sort_newest_first(entries: &mut [IndexEntry]) {
    entries.sort_by(|a, b| {
        b.generated_at
            .cmp(&a.generated_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Corpus index listing every rendered document, newest first.
pub fn render_index(title: &str, entries: &[IndexEntry], lang: &str) -> String {
    let mut entries = entries.to_vec();
    sort_newest_first(&mut entries);

    let mut out = String::new();
    push_head(&mut out, lang, title, None, Theme::Light);
    out.push_str("<body class=\"zr-index\">\n<main class=\"zr-main\">\n");
    out.push_str(&format!("<h1>{}</h1>\n", text(title)));
    if entries.is_empty() {
        out.push_str("<p class=\"muted\">No documents.</p>\n");
    } else {
        out.push_str("<table class=\"table\">\n");
        out.push_str("<thead><tr><th>Title</th><th>Kind</th><th>Date</th></tr></thead>\n<tbody>\n");
        for entry in &entries {
            out.push_str(&format!(
                "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td></tr>\n",
                attr(&entry.href),
                text(&entry.title),
                text(&entry.label),
                text(&entry.date)
            ));
        }
        out.push_str("</tbody>\n</table>\n");
    }
    out.push_str("</main>\n</body>\n</html>\n");
    out
}

/// Entry page that forwards to the newest document.
pub fn render_redirect(target: &str, lang: &str) -> String {
    let target = attr(target);
    format!(
        "<!doctype html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\" />\n\
         <meta http-equiv=\"refresh\" content=\"0; url={target}\" />\n\
         <title>Redirect</title>\n</head>\n<body>\n\
         <p><a href=\"{target}\">Open latest</a></p>\n</body>\n</html>\n",
        lang = attr(lang)
    )
}
