//! Page chrome: layout variant and colour theme chosen from document meta.

use crate::document::Meta;

/// Where the navigation menu sits for a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPlacement {
    Sidebar,
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Long-form narrative report with a sidebar menu
    Playbook,
    /// Checklist-style board
    Audit,
    #[default]
    Article,
    Dashboard,
}

impl Layout {
    pub const ALL: [Layout; 4] = [
        Layout::Playbook,
        Layout::Audit,
        Layout::Article,
        Layout::Dashboard,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|layout| layout.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Playbook => "playbook",
            Layout::Audit => "audit",
            Layout::Article => "article",
            Layout::Dashboard => "dashboard",
        }
    }

    pub fn nav_placement(&self) -> NavPlacement {
        match self {
            Layout::Playbook | Layout::Article => NavPlacement::Sidebar,
            Layout::Audit | Layout::Dashboard => NavPlacement::Top,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Paper,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Paper];

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Paper => "paper",
        }
    }

    /// CSS custom properties for the theme.
    pub fn palette(&self) -> &'static str {
        match self {
            Theme::Light => {
                "--zr-bg:#ffffff;--zr-fg:#1f2328;--zr-muted:#656d76;--zr-accent:#0969da;--zr-card:#f6f8fa;--zr-border:#d0d7de"
            }
            Theme::Dark => {
                "--zr-bg:#0d1117;--zr-fg:#e6edf3;--zr-muted:#8d96a0;--zr-accent:#4493f8;--zr-card:#161b22;--zr-border:#30363d"
            }
            Theme::Paper => {
                "--zr-bg:#fbf8f1;--zr-fg:#2b2620;--zr-muted:#7a6f62;--zr-accent:#9a3412;--zr-card:#f3ede1;--zr-border:#ddd3c2"
            }
        }
    }
}

/// Resolved page chrome plus the names that could not be honoured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chrome {
    pub layout: Layout,
    pub theme: Theme,
    /// Layout name from meta that was not recognised
    pub unknown_layout: Option<String>,
    /// Theme name from meta that was not recognised
    pub unknown_theme: Option<String>,
}

impl Chrome {
    pub fn body_class(&self) -> String {
        format!(
            "zr-layout-{} zr-theme-{}",
            self.layout.as_str(),
            self.theme.as_str()
        )
    }
}

/// Maps `meta.layout` / `meta.theme` to chrome, never failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChromeResolver {
    pub default_layout: Layout,
    pub default_theme: Theme,
}

impl ChromeResolver {
    pub fn new(default_layout: Layout, default_theme: Theme) -> Self {
        Self {
            default_layout,
            default_theme,
        }
    }

    /// Empty names use the defaults silently; unrecognised names use the
    /// defaults and are reported on the returned [`Chrome`].
    pub fn resolve(&self, meta: &Meta) -> Chrome {
        let (layout, unknown_layout) =
            pick(&meta.layout, Layout::from_name, self.default_layout);
        let (theme, unknown_theme) = pick(&meta.theme, Theme::from_name, self.default_theme);
        Chrome {
            layout,
            theme,
            unknown_layout,
            unknown_theme,
        }
    }
}

fn pick<T>(name: &str, parse: fn(&str) -> Option<T>, default: T) -> (T, Option<String>) {
    if name.trim().is_empty() {
        return (default, None);
    }
    match parse(name) {
        Some(value) => (value, None),
        None => (default, Some(name.to_string())),
    }
}
