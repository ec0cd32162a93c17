//! Chainable, jQuery-style query results.
//!
//! A [`NodeList`] is an ordered, duplicate-free set of nodes plus a stack of
//! earlier states. Traversal and filtering operations *narrow* the list:
//! they push the current contents onto the stack and start over empty, so
//! [`NodeList::end`] can step back and [`NodeList::and_self`] can merge the
//! previous step in.
//!
//! ```
//! use sift_css::Sift;
//!
//! let mut sift = Sift::new();
//! let (mut dom, doc) = sift.parse("<ul><li id=a></li><li id=b></li></ul>");
//! let mut list = sift.query(&mut dom, &[doc]);
//! let _ = list.find("li").unwrap().last();
//! assert_eq!(list.attr("id"), Some("b"));
//! let _ = list.end().set_attr("class", "item");
//! assert_eq!(
//!     list.outer_html_all(),
//!     r#"<li id="a" class="item"></li><li id="b" class="item"></li>"#
//! );
//! ```

use std::rc::Rc;

use sift_dom::{AttrValue, Dom, MarkupConfig, Node, NodeId};

use crate::engine::Sift;
use crate::matcher::Matcher;
use crate::selector::{Selector, SelectorError};
use crate::set::{NodeSet, slice_range};

/// Content for the manipulation methods.
#[derive(Debug, Clone, Copy)]
pub enum Content<'c> {
    /// Markup, parsed into new nodes.
    Markup(&'c str),
    /// One node. A Document contributes its children.
    Node(NodeId),
    /// Several nodes.
    Nodes(&'c [NodeId]),
}

impl<'c> From<&'c str> for Content<'c> {
    fn from(markup: &'c str) -> Self {
        Self::Markup(markup)
    }
}

impl From<NodeId> for Content<'_> {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl<'c> From<&'c [NodeId]> for Content<'c> {
    fn from(nodes: &'c [NodeId]) -> Self {
        Self::Nodes(nodes)
    }
}

impl<'c> From<&'c Vec<NodeId>> for Content<'c> {
    fn from(nodes: &'c Vec<NodeId>) -> Self {
        Self::Nodes(nodes)
    }
}

/// Targets for `append_to` and friends.
#[derive(Debug, Clone, Copy)]
pub enum Target<'t> {
    /// Selector, searched in the owner document of the first node.
    Selector(&'t str),
    /// One node.
    Node(NodeId),
    /// Several nodes.
    Nodes(&'t [NodeId]),
}

impl<'t> From<&'t str> for Target<'t> {
    fn from(selector: &'t str) -> Self {
        Self::Selector(selector)
    }
}

impl From<NodeId> for Target<'_> {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl<'t> From<&'t [NodeId]> for Target<'t> {
    fn from(nodes: &'t [NodeId]) -> Self {
        Self::Nodes(nodes)
    }
}

impl<'t> From<&'t Vec<NodeId>> for Target<'t> {
    fn from(nodes: &'t Vec<NodeId>) -> Self {
        Self::Nodes(nodes)
    }
}

type Insert = fn(&mut Dom, NodeId, &[NodeId]) -> Vec<NodeId>;
type Step = fn(&Dom, NodeId) -> Option<NodeId>;

/// Query results over a [`Dom`], borrowed together with the [`Sift`] engine
/// that compiles selectors for it.
pub struct NodeList<'q> {
    sift: &'q mut Sift,
    dom: &'q mut Dom,
    nodes: NodeSet,
    states: Vec<NodeSet>,
}

impl<'q> NodeList<'q> {
    /// A list holding `nodes`, duplicates dropped.
    pub fn new(sift: &'q mut Sift, dom: &'q mut Dom, nodes: &[NodeId]) -> Self {
        Self {
            sift,
            dom,
            nodes: nodes.iter().copied().collect(),
            states: Vec::new(),
        }
    }

    /// The tree.
    #[must_use]
    pub fn dom(&self) -> &Dom {
        self.dom
    }

    /// The tree, mutably.
    pub fn dom_mut(&mut self) -> &mut Dom {
        self.dom
    }

    /// The markup configuration used for text and serialization.
    #[must_use]
    pub fn config(&self) -> &MarkupConfig {
        self.sift.config()
    }

    // ========== Set ==========

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index)
    }

    /// The first node.
    #[must_use]
    pub fn first_node(&self) -> Option<NodeId> {
        self.nodes.get(0)
    }

    /// The last node.
    #[must_use]
    pub fn last_node(&self) -> Option<NodeId> {
        self.nodes.as_slice().last().copied()
    }

    /// The nodes in order.
    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        self.nodes.as_slice()
    }

    /// Iterate over the nodes.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter()
    }

    /// The nodes as a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<NodeId> {
        self.nodes.as_slice().to_vec()
    }

    /// Append nodes not already present.
    pub fn add(&mut self, nodes: &[NodeId]) -> &mut Self {
        self.nodes.extend(nodes.iter().copied());
        self
    }

    /// Remove the node at `index`.
    pub fn delete(&mut self, index: usize) -> &mut Self {
        if let Some(node) = self.nodes.get(index) {
            let _ = self.nodes.remove(node);
        }
        self
    }

    /// Remove `node` if present.
    pub fn delete_node(&mut self, node: NodeId) -> &mut Self {
        let _ = self.nodes.remove(node);
        self
    }

    /// Position of `node`, if present.
    #[must_use]
    pub fn index(&self, node: NodeId) -> Option<usize> {
        self.nodes.position(node)
    }

    // ========== State stack ==========

    /// Push the current contents and start empty. Returns the pushed nodes.
    fn save_state(&mut self) -> Vec<NodeId> {
        let saved = std::mem::take(&mut self.nodes);
        let list = saved.as_slice().to_vec();
        self.states.push(saved);
        list
    }

    /// Empty the list without pushing. Returns the dropped nodes.
    fn reset_state(&mut self) -> Vec<NodeId> {
        self.nodes.take()
    }

    /// Go back to the contents before the last narrowing step.
    pub fn end(&mut self) -> &mut Self {
        if let Some(previous) = self.states.pop() {
            self.nodes = previous;
        }
        self
    }

    /// Add the contents before the last narrowing step.
    pub fn and_self(&mut self) -> &mut Self {
        if let Some(previous) = self.states.last() {
            self.nodes.extend(previous.iter());
        }
        self
    }

    /// Number of saved states.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.states.len()
    }

    // ========== Slicing ==========

    /// Narrow to the node at `n`; a negative `n` counts from the end.
    pub fn eq(&mut self, n: i64) -> &mut Self {
        let list = self.save_state();
        let range = slice_range(list.len(), n, Some(1));
        self.nodes.extend(list[range].iter().copied());
        self
    }

    /// Narrow to the first node.
    pub fn first(&mut self) -> &mut Self {
        self.eq(0)
    }

    /// Narrow to the last node.
    pub fn last(&mut self) -> &mut Self {
        self.eq(-1)
    }

    /// Narrow to a range of nodes. A negative `offset` counts from the end;
    /// without `length` the range runs to the end, and a negative `length`
    /// stops that many nodes before it.
    pub fn slice(&mut self, offset: i64, length: Option<i64>) -> &mut Self {
        let list = self.save_state();
        let range = slice_range(list.len(), offset, length);
        self.nodes.extend(list[range].iter().copied());
        self
    }

    // ========== Text and markup ==========

    /// Text of the first node.
    #[must_use]
    pub fn text(&self) -> String {
        self.first_node()
            .map(|n| self.dom.text(n, self.sift.config()))
            .unwrap_or_default()
    }

    /// Inner markup of the first node.
    #[must_use]
    pub fn html(&self) -> String {
        self.first_node()
            .map(|n| self.dom.inner_html(n, self.sift.config()))
            .unwrap_or_default()
    }

    /// Outer markup of the first node.
    #[must_use]
    pub fn outer_html(&self) -> String {
        self.first_node()
            .map(|n| self.dom.outer_html(n, self.sift.config()))
            .unwrap_or_default()
    }

    /// Concatenated text of every node.
    #[must_use]
    pub fn text_all(&self) -> String {
        self.nodes
            .iter()
            .map(|n| self.dom.text(n, self.sift.config()))
            .collect()
    }

    /// Concatenated inner markup of every node.
    #[must_use]
    pub fn html_all(&self) -> String {
        self.nodes
            .iter()
            .map(|n| self.dom.inner_html(n, self.sift.config()))
            .collect()
    }

    /// Concatenated outer markup of every node.
    #[must_use]
    pub fn outer_html_all(&self) -> String {
        self.nodes
            .iter()
            .map(|n| self.dom.outer_html(n, self.sift.config()))
            .collect()
    }

    /// Replace the content of the first node with `text`.
    pub fn set_text(&mut self, text: &str) -> &mut Self {
        if let Some(node) = self.first_node() {
            self.dom.set_text(node, text);
        }
        self
    }

    /// Replace the children of the first node with parsed `markup`.
    pub fn set_html(&mut self, markup: &str) -> &mut Self {
        if let Some(node) = self.first_node() {
            sift_html::set_inner_html(self.dom, node, markup, self.sift.config());
        }
        self
    }

    // ========== Attributes ==========

    /// Attribute of the first node.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.first_node().and_then(|n| self.dom.attr(n, name))
    }

    /// Set an attribute on every node.
    pub fn set_attr(&mut self, name: &str, value: impl Into<AttrValue>) -> &mut Self {
        let value = value.into();
        for node in self.nodes.iter() {
            self.dom.set_attr(node, name, value.clone());
        }
        self
    }

    /// Remove an attribute from every node.
    pub fn remove_attr(&mut self, name: &str) -> &mut Self {
        for node in self.nodes.iter() {
            self.dom.remove_attr(node, name);
        }
        self
    }

    /// Whether the first node has the attribute.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.first_node().is_some_and(|n| self.dom.has_attr(n, name))
    }

    // ========== Manipulation ==========

    fn prepare_content(&mut self, content: Content<'_>) -> Vec<NodeId> {
        match content {
            Content::Markup(markup) => {
                sift_html::parse_fragment(self.dom, markup, self.sift.config())
            }
            Content::Node(node) if self.dom.get(node).is_some_and(Node::is_document) => {
                self.dom.detach_children(node)
            }
            Content::Node(node) => vec![node],
            Content::Nodes(nodes) => nodes.iter().copied().collect::<NodeSet>().into(),
        }
    }

    /// Insert content at every node: the first node receives the content
    /// itself, the others receive deep copies.
    fn distribute(&mut self, content: Content<'_>, insert: Insert) -> &mut Self {
        let content = self.prepare_content(content);
        if content.is_empty() {
            return self;
        }
        for (i, node) in self.nodes.iter().enumerate() {
            let batch = if i == 0 {
                content.clone()
            } else {
                content.iter().map(|&c| self.dom.deep_clone(c)).collect()
            };
            let _ = insert(self.dom, node, &batch);
        }
        self
    }

    /// Append content to every node.
    pub fn append<'c>(&mut self, content: impl Into<Content<'c>>) -> &mut Self {
        self.distribute(content.into(), Dom::append)
    }

    /// Prepend content to every node.
    pub fn prepend<'c>(&mut self, content: impl Into<Content<'c>>) -> &mut Self {
        self.distribute(content.into(), Dom::prepend)
    }

    /// Insert content after every node.
    pub fn after<'c>(&mut self, content: impl Into<Content<'c>>) -> &mut Self {
        self.distribute(content.into(), Dom::after)
    }

    /// Insert content before every node.
    pub fn before<'c>(&mut self, content: impl Into<Content<'c>>) -> &mut Self {
        self.distribute(content.into(), Dom::before)
    }

    /// Replace every node with content. The replaced nodes stay in the
    /// list, cleaned.
    pub fn replace_with<'c>(&mut self, content: impl Into<Content<'c>>) -> &mut Self {
        self.distribute(content.into(), Dom::replace_with)
    }

    /// Wrap every node in a copy of the first element of `content`.
    pub fn wrap<'c>(&mut self, content: impl Into<Content<'c>>) -> &mut Self {
        let content = self.prepare_content(content.into());
        for node in self.nodes.iter() {
            let _ = self.dom.wrap(node, &content);
        }
        self
    }

    /// Wrap the children of every node in a copy of the first element of
    /// `content`.
    pub fn wrap_inner<'c>(&mut self, content: impl Into<Content<'c>>) -> &mut Self {
        let content = self.prepare_content(content.into());
        for node in self.nodes.iter() {
            let _ = self.dom.wrap_inner(node, &content);
        }
        self
    }

    /// Wrap all nodes in one copy of the first element of `content`, placed
    /// where the first node was.
    pub fn wrap_all<'c>(&mut self, content: impl Into<Content<'c>>) -> &mut Self {
        if self.is_empty() {
            return self;
        }
        let content = self.prepare_content(content.into());
        let _ = self.dom.wrap_all(self.nodes.as_slice(), &content);
        self
    }

    /// Replace the parent of every node with the node.
    pub fn unwrap(&mut self) -> &mut Self {
        for node in self.nodes.iter() {
            self.dom.unwrap(node);
        }
        self
    }

    /// Detach every node from the tree. The list keeps them.
    pub fn detach(&mut self) -> &mut Self {
        for node in self.nodes.iter() {
            self.dom.detach(node);
        }
        self
    }

    /// Remove every node from the tree and empty the list, state stack
    /// included.
    pub fn remove(&mut self) -> &mut Self {
        for node in self.reset_state() {
            self.dom.remove(node);
        }
        self.states.clear();
        self
    }

    /// Remove the children of every node.
    pub fn empty(&mut self) -> &mut Self {
        for node in self.nodes.iter() {
            self.dom.clean_children(node);
        }
        self
    }

    /// Narrow to deep copies of the nodes.
    pub fn clone_nodes(&mut self) -> &mut Self {
        for node in self.save_state() {
            let copy = self.dom.deep_clone(node);
            let _ = self.nodes.insert(copy);
        }
        self
    }

    fn prepare_target(&mut self, target: Target<'_>) -> Result<Vec<NodeId>, SelectorError> {
        match target {
            Target::Selector(text) => {
                let selector = self.sift.compile(text)?;
                let Some(document) = self
                    .first_node()
                    .and_then(|n| self.dom.owner_document(n))
                else {
                    return Ok(Vec::new());
                };
                Ok(Matcher::new(self.dom, self.sift.config()).find(document, &selector))
            }
            Target::Node(node) => Ok(vec![node]),
            Target::Nodes(nodes) => Ok(nodes.to_vec()),
        }
    }

    /// Move every node to the targets and replace the list with everything
    /// inserted. Nothing happens when there are no targets.
    fn distribute_to(
        &mut self,
        target: Target<'_>,
        insert: Insert,
        reverse: bool,
    ) -> Result<&mut Self, SelectorError> {
        let targets = self.prepare_target(target)?;
        if targets.is_empty() {
            return Ok(self);
        }
        let mut list = self.reset_state();
        if reverse {
            list.reverse();
        }
        for node in list {
            let inserted = insert(self.dom, node, &targets);
            self.nodes.extend(inserted);
        }
        if reverse {
            self.nodes.reverse();
        }
        Ok(self)
    }

    /// Append every node to every target.
    ///
    /// # Errors
    ///
    /// Fails when a selector target does not compile.
    pub fn append_to<'t>(
        &mut self,
        target: impl Into<Target<'t>>,
    ) -> Result<&mut Self, SelectorError> {
        self.distribute_to(target.into(), Dom::append_to, false)
    }

    /// Prepend every node to every target, keeping their order.
    ///
    /// # Errors
    ///
    /// Fails when a selector target does not compile.
    pub fn prepend_to<'t>(
        &mut self,
        target: impl Into<Target<'t>>,
    ) -> Result<&mut Self, SelectorError> {
        self.distribute_to(target.into(), Dom::prepend_to, true)
    }

    /// Insert every node after every target, keeping their order.
    ///
    /// # Errors
    ///
    /// Fails when a selector target does not compile.
    pub fn insert_after<'t>(
        &mut self,
        target: impl Into<Target<'t>>,
    ) -> Result<&mut Self, SelectorError> {
        self.distribute_to(target.into(), Dom::insert_after, true)
    }

    /// Insert every node before every target.
    ///
    /// # Errors
    ///
    /// Fails when a selector target does not compile.
    pub fn insert_before<'t>(
        &mut self,
        target: impl Into<Target<'t>>,
    ) -> Result<&mut Self, SelectorError> {
        self.distribute_to(target.into(), Dom::insert_before, false)
    }

    /// Replace every target with the nodes, in order.
    ///
    /// # Errors
    ///
    /// Fails when a selector target does not compile.
    pub fn replace_all<'t>(
        &mut self,
        target: impl Into<Target<'t>>,
    ) -> Result<&mut Self, SelectorError> {
        let targets = self.prepare_target(target.into())?;
        if targets.is_empty() {
            return Ok(self);
        }
        let mut last = Vec::new();
        for (i, node) in self.reset_state().into_iter().enumerate() {
            last = if i == 0 {
                self.dom.replace_all(node, &targets)
            } else {
                self.dom.insert_after(node, &last)
            };
            self.nodes.extend(last.iter().copied());
        }
        Ok(self)
    }

    // ========== Filtering ==========

    fn compile(&mut self, selector: &str) -> Result<Rc<Selector>, SelectorError> {
        self.sift.compile(selector)
    }

    fn compile_optional(
        &mut self,
        selector: Option<&str>,
    ) -> Result<Option<Rc<Selector>>, SelectorError> {
        selector.map(|s| self.compile(s)).transpose()
    }

    fn search(&mut self, selector: &str, n: Option<usize>) -> Result<(), SelectorError> {
        let selector = self.compile(selector)?;
        let list = self.save_state();
        let matcher = Matcher::new(self.dom, self.sift.config());
        for node in list {
            let _ = matcher.find_into(node, &selector, n, &mut self.nodes);
            if n.is_some_and(|n| self.nodes.len() > n) {
                break;
            }
        }
        Ok(())
    }

    /// Narrow to the matching descendants of every node.
    ///
    /// # Errors
    ///
    /// Fails when `selector` does not compile.
    pub fn find(&mut self, selector: &str) -> Result<&mut Self, SelectorError> {
        self.search(selector, None)?;
        Ok(self)
    }

    /// The `n`-th (0-based) matching descendant, searching no further than
    /// needed. The list is narrowed to what was found.
    ///
    /// # Errors
    ///
    /// Fails when `selector` does not compile.
    pub fn find_nth(&mut self, selector: &str, n: usize) -> Result<Option<NodeId>, SelectorError> {
        self.search(selector, Some(n))?;
        Ok(self.nodes.get(n))
    }

    fn keep_matching(&mut self, list: Vec<NodeId>, selector: &Selector, keep: bool) {
        let matcher = Matcher::new(self.dom, self.sift.config());
        self.nodes
            .extend(list.into_iter().filter(|&n| matcher.matches(n, selector) == keep));
    }

    /// Narrow to the nodes matching `selector`.
    ///
    /// # Errors
    ///
    /// Fails when `selector` does not compile.
    pub fn filter(&mut self, selector: &str) -> Result<&mut Self, SelectorError> {
        let selector = self.compile(selector)?;
        let list = self.save_state();
        self.keep_matching(list, &selector, true);
        Ok(self)
    }

    /// Narrow to the nodes not matching `selector`.
    ///
    /// # Errors
    ///
    /// Fails when `selector` does not compile.
    pub fn not(&mut self, selector: &str) -> Result<&mut Self, SelectorError> {
        let selector = self.compile(selector)?;
        let list = self.save_state();
        self.keep_matching(list, &selector, false);
        Ok(self)
    }

    /// Whether any node matches `selector`.
    ///
    /// # Errors
    ///
    /// Fails when `selector` does not compile.
    pub fn is(&mut self, selector: &str) -> Result<bool, SelectorError> {
        let selector = self.compile(selector)?;
        let matcher = Matcher::new(self.dom, self.sift.config());
        Ok(self.nodes.iter().any(|n| matcher.matches(n, &selector)))
    }

    /// The nearest of the first node and its ancestors matching `selector`.
    ///
    /// # Errors
    ///
    /// Fails when `selector` does not compile.
    pub fn closest(&mut self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let selector = self.compile(selector)?;
        Ok(self
            .first_node()
            .and_then(|n| Matcher::new(self.dom, self.sift.config()).closest(n, &selector)))
    }

    // ========== Traversal ==========

    /// Narrow to the element children of every node, optionally filtered.
    ///
    /// # Errors
    ///
    /// Fails when `selector` does not compile.
    pub fn children(&mut self, selector: Option<&str>) -> Result<&mut Self, SelectorError> {
        let selector = self.compile_optional(selector)?;
        for node in self.save_state() {
            self.nodes.extend(self.dom.children(node).iter().copied());
        }
        if let Some(selector) = selector {
            let list = self.reset_state();
            self.keep_matching(list, &selector, true);
        }
        Ok(self)
    }

    /// Narrow to all child nodes of every node, text included.
    pub fn contents(&mut self) -> &mut Self {
        for node in self.save_state() {
            self.nodes.extend(self.dom.child_nodes(node).iter().copied());
        }
        self
    }

    /// Narrow to the node one `step` away from each node, when it matches.
    fn adjacent(&mut self, selector: Option<&str>, step: Step) -> Result<&mut Self, SelectorError> {
        let selector = self.compile_optional(selector)?;
        let list = self.save_state();
        let matcher = Matcher::new(self.dom, self.sift.config());
        let found = list
            .into_iter()
            .filter_map(|node| step(self.dom, node))
            .filter(|&other| selector.as_deref().is_none_or(|s| matcher.matches(other, s)));
        self.nodes.extend(found);
        Ok(self)
    }

    /// Add every element reached by repeating `step` from `node` that
    /// matches `selector`.
    fn walk_all(&mut self, node: NodeId, selector: Option<&Selector>, step: Step) {
        let matcher = Matcher::new(self.dom, self.sift.config());
        let mut current = step(self.dom, node);
        while let Some(n) = current {
            if self.dom.is_element(n) && selector.is_none_or(|s| matcher.matches(n, s)) {
                let _ = self.nodes.insert(n);
            }
            current = step(self.dom, n);
        }
    }

    /// Add the elements reached by repeating `step` from `node`, up to the
    /// first non-element or the first match of `selector`.
    fn walk_until(&mut self, node: NodeId, selector: &Selector, step: Step) {
        let matcher = Matcher::new(self.dom, self.sift.config());
        let mut current = step(self.dom, node);
        while let Some(n) = current {
            if !self.dom.is_element(n) || matcher.matches(n, selector) {
                break;
            }
            let _ = self.nodes.insert(n);
            current = step(self.dom, n);
        }
    }

    fn relative_all(
        &mut self,
        selector: Option<&str>,
        steps: &[Step],
    ) -> Result<&mut Self, SelectorError> {
        let selector = self.compile_optional(selector)?;
        for node in self.save_state() {
            for &step in steps {
                self.walk_all(node, selector.as_deref(), step);
            }
        }
        Ok(self)
    }

    fn relative_until(&mut self, selector: &str, step: Step) -> Result<&mut Self, SelectorError> {
        let selector = self.compile(selector)?;
        for node in self.save_state() {
            self.walk_until(node, &selector, step);
        }
        Ok(self)
    }

    /// Narrow to the next element sibling of every node.
    ///
    /// # Errors
    ///
    /// Fails when `selector` does not compile.
    pub fn next(&mut self, selector: Option<&str>) -> Result<&mut Self, SelectorError> {
        self.adjacent(selector, Dom::next_element)
    }

    /// Narrow to all following element siblings of every node.
    ///
    /// # Errors
    ///
    /// Fails when `selector` does not compile.
    pub fn next_all(&mut self, selector: Option<&str>) -> Result<&mut Self, SelectorError> {
        self.relative_all(selector, &[Dom::next_element])
    }

    /// Narrow to the following element siblings of every node, up to the
    /// first one matching `selector`.
    ///
    /// # Errors
    ///
    /// Fails when `selector` does not compile.
    pub fn next_until(&mut self, selector: &str) -> Result<&mut Self, SelectorError> {
        self.relative_until(selector, Dom::next_element)
    }

    /// Narrow to the previous element sibling of every node.
    ///
    /// # Errors
    ///
    /// Fails when `selector` does not compile.
    pub fn prev(&mut self, selector: Option<&str>) -> Result<&mut Self, SelectorError> {
        self.adjacent(selector, Dom::prev_element)
    }

    /// Narrow to all preceding element siblings of every node, nearest
    /// first.
    ///
    /// # Errors
    ///
    /// Fails when `selector` does not compile.
    pub fn prev_all(&mut self, selector: Option<&str>) -> Result<&mut Self, SelectorError> {
        self.relative_all(selector, &[Dom::prev_element])
    }

    /// Narrow to the preceding element siblings of every node, up to the
    /// first one matching `selector`.
    ///
    /// # Errors
    ///
    /// Fails when `selector` does not compile.
    pub fn prev_until(&mut self, selector: &str) -> Result<&mut Self, SelectorError> {
        self.relative_until(selector, Dom::prev_element)
    }

    /// Narrow to the parent of every node.
    ///
    /// # Errors
    ///
    /// Fails when `selector` does not compile.
    pub fn parent(&mut self, selector: Option<&str>) -> Result<&mut Self, SelectorError> {
        self.adjacent(selector, Dom::parent)
    }

    /// Narrow to the element ancestors of every node, nearest first.
    ///
    /// # Errors
    ///
    /// Fails when `selector` does not compile.
    pub fn parents(&mut self, selector: Option<&str>) -> Result<&mut Self, SelectorError> {
        self.relative_all(selector, &[Dom::parent])
    }

    /// Narrow to the element ancestors of every node, up to the first one
    /// matching `selector`.
    ///
    /// # Errors
    ///
    /// Fails when `selector` does not compile.
    pub fn parents_until(&mut self, selector: &str) -> Result<&mut Self, SelectorError> {
        self.relative_until(selector, Dom::parent)
    }

    /// Narrow to the element siblings of every node: the preceding ones
    /// nearest first, then the following ones.
    ///
    /// # Errors
    ///
    /// Fails when `selector` does not compile.
    pub fn siblings(&mut self, selector: Option<&str>) -> Result<&mut Self, SelectorError> {
        self.relative_all(selector, &[Dom::prev_element, Dom::next_element])
    }
}

impl<'a> IntoIterator for &'a NodeList<'_> {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl std::fmt::Debug for NodeList<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeList")
            .field("nodes", &self.nodes.as_slice())
            .field("depth", &self.states.len())
            .finish()
    }
}
