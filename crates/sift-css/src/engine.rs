//! The `Sift` engine: markup configuration plus a compiled-selector cache.

use std::rc::Rc;

use sift_dom::{Dom, MarkupConfig, NodeId};

use crate::cache::{CacheStats, SelectorCache};
use crate::matcher::Matcher;
use crate::query::NodeList;
use crate::selector::{Selector, SelectorError};

/// Entry point for parsing markup and running selectors over it.
///
/// Selector text is compiled once and cached, so passing the same string
/// repeatedly is cheap.
///
/// ```
/// use sift_css::Sift;
///
/// let mut sift = Sift::new();
/// let (dom, doc) = sift.parse("<ul><li>a</li><li>b</li></ul>");
/// let items = sift.find(&dom, doc, "li:last").unwrap();
/// assert_eq!(dom.text(items[0], sift.config()), "b");
/// ```
#[derive(Debug, Default)]
pub struct Sift {
    config: MarkupConfig,
    cache: SelectorCache,
}

impl Sift {
    /// An engine with the default HTML configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine using `config` for parsing, serialization and text.
    #[must_use]
    pub fn with_config(config: MarkupConfig) -> Self {
        Self {
            config,
            cache: SelectorCache::default(),
        }
    }

    /// An engine with a selector cache of the given capacity.
    #[must_use]
    pub fn with_cache_capacity(config: MarkupConfig, capacity: usize) -> Self {
        Self {
            config,
            cache: SelectorCache::new(capacity),
        }
    }

    /// The markup configuration.
    #[must_use]
    pub const fn config(&self) -> &MarkupConfig {
        &self.config
    }

    /// Mutable access to the markup configuration.
    pub const fn config_mut(&mut self) -> &mut MarkupConfig {
        &mut self.config
    }

    /// Compile `text`, reusing a cached result when possible.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] when the text is not a valid selector.
    pub fn compile(&mut self, text: &str) -> Result<Rc<Selector>, SelectorError> {
        self.cache.get_or_compile(text)
    }

    /// Selector cache counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Parse `input` into a fresh arena, returning it with its document.
    #[must_use]
    pub fn parse(&self, input: &str) -> (Dom, NodeId) {
        sift_html::parse(input, &self.config)
    }

    /// Parse `input` as a new document inside an existing arena.
    pub fn parse_into(&self, dom: &mut Dom, input: &str) -> NodeId {
        sift_html::parse_document(dom, input, &self.config)
    }

    /// A matcher bound to `dom` and this engine's configuration.
    #[must_use]
    pub const fn matcher<'a>(&'a self, dom: &'a Dom) -> Matcher<'a> {
        Matcher::new(dom, &self.config)
    }

    /// Every element below `context` matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] when the selector does not compile.
    pub fn find(
        &mut self,
        dom: &Dom,
        context: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, SelectorError> {
        let selector = self.compile(selector)?;
        Ok(self.matcher(dom).find(context, &selector))
    }

    /// The `n`-th (0-based) element below `context` matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] when the selector does not compile.
    pub fn find_nth(
        &mut self,
        dom: &Dom,
        context: NodeId,
        selector: &str,
        n: usize,
    ) -> Result<Option<NodeId>, SelectorError> {
        let selector = self.compile(selector)?;
        Ok(self.matcher(dom).find_nth(context, &selector, n))
    }

    /// Whether `node` is matched by `selector`. See [`Matcher::is`].
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] when the selector does not compile.
    pub fn is(&mut self, dom: &Dom, node: NodeId, selector: &str) -> Result<bool, SelectorError> {
        let selector = self.compile(selector)?;
        Ok(self.matcher(dom).is(node, &selector))
    }

    /// Whether some element child of `node` matches `selector`.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] when the selector does not compile.
    pub fn has(&mut self, dom: &Dom, node: NodeId, selector: &str) -> Result<bool, SelectorError> {
        let selector = self.compile(selector)?;
        Ok(self.matcher(dom).has(node, &selector))
    }

    /// The nearest of `node` and its ancestors matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] when the selector does not compile.
    pub fn closest(
        &mut self,
        dom: &Dom,
        node: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>, SelectorError> {
        let selector = self.compile(selector)?;
        Ok(self.matcher(dom).closest(node, &selector))
    }

    /// A query collection over `nodes`.
    pub fn query<'q>(&'q mut self, dom: &'q mut Dom, nodes: &[NodeId]) -> NodeList<'q> {
        NodeList::new(self, dom, nodes)
    }

    /// A query collection holding the matches of `selector` below
    /// `context`. [`NodeList::end`] goes back to `context` itself.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] when the selector does not compile.
    pub fn select<'q>(
        &'q mut self,
        dom: &'q mut Dom,
        context: NodeId,
        selector: &str,
    ) -> Result<NodeList<'q>, SelectorError> {
        let mut list = NodeList::new(self, dom, &[context]);
        let _ = list.find(selector)?;
        Ok(list)
    }
}
