pub mod blocks;
pub mod chrome;
pub mod document;
pub mod io;
pub mod nav;
pub mod page;
pub mod pipeline;
pub mod registry;
pub mod schema;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use chrome::{Chrome, ChromeResolver, Layout, NavPlacement, Theme};
pub use document::{Block, Document, Meta};
pub use nav::{NavEntry, build_navigation};
pub use page::{IndexEntry, render_diagnostic_page, render_index, render_redirect};
pub use pipeline::{
    RenderError, RenderMode, RenderOptions, RenderedPage, Renderer, VersionPolicy, Warning,
};
pub use registry::{
    BlockError, BlockRegistry, BlockRenderer, Fragment, RegistryError, RenderContext,
};
pub use schema::{
    CURRENT_VERSION, SchemaError, SupportedVersions, Violation, ViolationKind, validate,
};
