//! Block type → renderer dispatch.
//!
//! The registry is the only place that knows which `type` strings exist. The
//! pipeline never branches on type names; it asks the registry to resolve a
//! discriminant and gets back either a registered renderer or the fallback
//! placeholder renderer.

use crate::blocks::{self, fallback::FallbackRenderer};
use crate::chrome::Chrome;
use crate::document::{Block, Meta};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Rendered markup for one block, without the surrounding `<section>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment(String);

impl Fragment {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Fragment {
    fn from(markup: String) -> Self {
        Self(markup)
    }
}

/// Document-level context handed to every renderer.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub meta: &'a Meta,
    pub chrome: &'a Chrome,
}

/// A payload a registered renderer could not make sense of.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("block type `{0}` is already registered")]
    AlreadyRegistered(String),
    #[error("block type must not be empty")]
    EmptyType,
}

/// Turns one block into markup.
///
/// Implementations must escape every string they take from the payload
/// unless the block type is explicitly a raw-markup passthrough.
pub trait BlockRenderer: Send + Sync {
    fn render(&self, block: &Block, ctx: &RenderContext<'_>) -> Result<Fragment, BlockError>;
}

impl<F> BlockRenderer for F
where
    F: Fn(&Block, &RenderContext<'_>) -> Result<Fragment, BlockError> + Send + Sync,
{
    fn render(&self, block: &Block, ctx: &RenderContext<'_>) -> Result<Fragment, BlockError> {
        self(block, ctx)
    }
}

/// Outcome of [`BlockRegistry::resolve`].
pub enum Resolved<'r> {
    Registered(&'r dyn BlockRenderer),
    Fallback(&'r FallbackRenderer),
}

impl<'r> Resolved<'r> {
    pub fn renderer(&self) -> &'r dyn BlockRenderer {
        match self {
            Resolved::Registered(renderer) => *renderer,
            Resolved::Fallback(fallback) => *fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Resolved::Fallback(_))
    }
}

/// Mapping from block discriminant to renderer.
///
/// Populate once at startup, then share it read-only (e.g. behind an `Arc`)
/// across any number of concurrent renders.
pub struct BlockRegistry {
    renderers: BTreeMap<String, Arc<dyn BlockRenderer>>,
    fallback: FallbackRenderer,
}

impl BlockRegistry {
    /// An empty registry; every block resolves to the fallback.
    pub fn new() -> Self {
        Self {
            renderers: BTreeMap::new(),
            fallback: FallbackRenderer,
        }
    }

    /// A registry with every built-in block type registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        blocks::register_builtins(&mut registry);
        registry
    }

    /// Register a renderer for `kind`. Refuses to replace an existing one.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        renderer: impl BlockRenderer + 'static,
    ) -> Result<(), RegistryError> {
        let kind = kind.into();
        if kind.trim().is_empty() {
            return Err(RegistryError::EmptyType);
        }
        if self.renderers.contains_key(&kind) {
            return Err(RegistryError::AlreadyRegistered(kind));
        }
        log::debug!("registered block renderer for `{kind}`");
        self.renderers.insert(kind, Arc::new(renderer));
        Ok(())
    }

    pub fn resolve(&self, kind: &str) -> Resolved<'_> {
        match self.renderers.get(kind) {
            Some(renderer) => Resolved::Registered(renderer.as_ref()),
            None => Resolved::Fallback(&self.fallback),
        }
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.renderers.contains_key(kind)
    }

    /// Registered discriminants in sorted order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.renderers.keys().map(String::as_str)
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BlockRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockRegistry")
            .field("kinds", &self.kinds().collect::<Vec<_>>())
            .finish()
    }
}
