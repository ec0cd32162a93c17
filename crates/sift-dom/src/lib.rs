//! Markup tree for the sift toolkit.
//!
//! This crate provides an arena-based tree for HTML-like, XML-like or
//! bracket-delimited markup (BBCode and friends), together with the
//! mutation primitives, serializer and text extraction built on top of it.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships, providing O(1) access and traversal without borrow checker
//! issues. One [`Dom`] arena can hold any number of documents and detached
//! nodes, so moving a subtree from one document to another is just a
//! relinking of indices.
//!
//! Every node sits at a position in its parent's *full sequence* (all child
//! nodes) and, when it is an element, also in the parent's *element
//! sequence*. Elements additionally link to their previous and next element
//! siblings. All mutation goes through [`Dom::insert_at`] and
//! [`Dom::detach`], which keep these indices contiguous.

pub mod attributes;
pub mod config;
pub mod entities;
mod mutation;
mod serialize;
mod traverse;

use std::sync::atomic::{AtomicU64, Ordering};

pub use attributes::{AttrValue, Attribute, AttributeSet};
pub use config::MarkupConfig;
pub use traverse::{Ancestors, ElementDescendants, ElementSiblings};

/// Source of process-wide unique node identities.
static NEXT_UID: AtomicU64 = AtomicU64::new(1);

fn next_uid() -> u64 {
    NEXT_UID.fetch_add(1, Ordering::Relaxed)
}

/// A type-safe index into a [`Dom`] arena.
///
/// Ids are never reused within an arena, so an id stays valid (if possibly
/// cleaned) for the lifetime of the arena that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// The kind of a node, without its payload.
///
/// The string form is the fixed node name used for every non-element kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    /// Root of a parsed tree.
    Document,
    /// A tag with attributes and children.
    Element,
    /// Character data.
    Text,
    /// `<![CDATA[ ... ]]>` section.
    Cdata,
    /// `<!-- ... -->` comment.
    Comment,
    /// `<!DOCTYPE ...>` declaration.
    Doctype,
    /// `<?xml ... ?>` declaration.
    #[strum(serialize = "xml declaration")]
    XmlDeclaration,
}

/// Document-specific data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentData {
    /// Set by an XML declaration or an XHTML doctype. Changes how boolean
    /// attributes serialize.
    pub is_xml: bool,
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Lower-cased tag name, used for matching and serialization.
    pub name: String,
    /// Tag name exactly as written in the source.
    pub name_real: String,
    /// Namespace prefix (`xml` in `<xml:name>`), if any.
    pub namespace: Option<String>,
    /// Part of the lower-cased name after the namespace prefix.
    pub local_name: String,
    /// Whether the element is written as `<name />`.
    pub self_closed: bool,
    /// Attributes in source order.
    pub attrs: AttributeSet,
    /// Verbatim contents of tags such as `script` and `style`.
    pub raw: String,
}

impl ElementData {
    /// Build element data from a tag name as written in the source.
    #[must_use]
    pub fn new(name_real: &str, self_closed: bool) -> Self {
        let name = name_real.to_lowercase();
        let (namespace, local_name) = match name.split_once(':') {
            Some((ns, local)) => (Some(ns.to_string()), local.to_string()),
            None => (None, name.clone()),
        };
        Self {
            name,
            name_real: name_real.to_string(),
            namespace,
            local_name,
            self_closed,
            attrs: AttributeSet::default(),
            raw: String::new(),
        }
    }

    /// Rename the element, keeping namespace and local name in step.
    pub fn rename(&mut self, name_real: &str) {
        let renamed = Self::new(name_real, self.self_closed);
        self.name = renamed.name;
        self.name_real = renamed.name_real;
        self.namespace = renamed.namespace;
        self.local_name = renamed.local_name;
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(Attribute::value)
    }
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// See [`NodeKind::Document`].
    Document(DocumentData),
    /// See [`NodeKind::Element`].
    Element(ElementData),
    /// See [`NodeKind::Text`].
    Text(String),
    /// See [`NodeKind::Cdata`].
    Cdata(String),
    /// See [`NodeKind::Comment`].
    Comment(String),
    /// See [`NodeKind::Doctype`].
    Doctype(String),
    /// See [`NodeKind::XmlDeclaration`].
    XmlDeclaration(String),
}

impl NodeData {
    /// The kind of this payload.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Document(_) => NodeKind::Document,
            Self::Element(_) => NodeKind::Element,
            Self::Text(_) => NodeKind::Text,
            Self::Cdata(_) => NodeKind::Cdata,
            Self::Comment(_) => NodeKind::Comment,
            Self::Doctype(_) => NodeKind::Doctype,
            Self::XmlDeclaration(_) => NodeKind::XmlDeclaration,
        }
    }
}

/// A single node in the arena.
///
/// Structural fields are private to the crate; they only change through the
/// [`Dom`] mutation primitives so the indexing invariants always hold.
#[derive(Debug, Clone)]
pub struct Node {
    /// The node payload.
    pub data: NodeData,
    uid: u64,
    pub(crate) owner: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
    /// Full sequence: every child node, any kind.
    pub(crate) nodes: Vec<NodeId>,
    /// Element sequence: element children only.
    pub(crate) children: Vec<NodeId>,
    pub(crate) cnid: Option<usize>,
    pub(crate) chid: Option<usize>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) cleaned: bool,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            uid: next_uid(),
            owner: None,
            parent: None,
            nodes: Vec::new(),
            children: Vec::new(),
            cnid: None,
            chid: None,
            prev: None,
            next: None,
            cleaned: false,
        }
    }

    /// Process-wide identity, assigned at construction and never reused.
    #[must_use]
    pub const fn uid(&self) -> u64 {
        self.uid
    }

    /// The node kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// Lower-cased name: the tag name for elements, the kind name otherwise.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.data {
            NodeData::Element(e) => e.name.as_str(),
            other => other.kind().into(),
        }
    }

    /// Name as written in the source.
    #[must_use]
    pub fn name_real(&self) -> &str {
        match &self.data {
            NodeData::Element(e) => e.name_real.as_str(),
            NodeData::Doctype(_) => "DOCTYPE",
            other => other.kind().into(),
        }
    }

    /// The string value: character data for text-like nodes, the raw
    /// contents for elements, empty for documents.
    #[must_use]
    pub fn value(&self) -> &str {
        match &self.data {
            NodeData::Document(_) => "",
            NodeData::Element(e) => e.raw.as_str(),
            NodeData::Text(s)
            | NodeData::Cdata(s)
            | NodeData::Comment(s)
            | NodeData::Doctype(s)
            | NodeData::XmlDeclaration(s) => s.as_str(),
        }
    }

    /// Whether this is an element.
    #[must_use]
    pub const fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Whether this is a document.
    #[must_use]
    pub const fn is_document(&self) -> bool {
        matches!(self.data, NodeData::Document(_))
    }

    /// Whether this node can hold children (element or document).
    #[must_use]
    pub const fn is_container(&self) -> bool {
        self.is_element() || self.is_document()
    }

    /// Element data, if this is an element.
    #[must_use]
    pub const fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Owning document, if the node has been attached to one.
    #[must_use]
    pub const fn owner_document(&self) -> Option<NodeId> {
        self.owner
    }

    /// Parent node, if attached.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Position in the parent's full sequence, `None` when detached.
    #[must_use]
    pub const fn cnid(&self) -> Option<usize> {
        self.cnid
    }

    /// Position in the parent's element sequence, `None` for non-elements
    /// and detached nodes.
    #[must_use]
    pub const fn chid(&self) -> Option<usize> {
        self.chid
    }

    /// Previous element sibling.
    #[must_use]
    pub const fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    /// Next element sibling.
    #[must_use]
    pub const fn next(&self) -> Option<NodeId> {
        self.next
    }

    /// Every child node in document order.
    #[must_use]
    pub fn child_nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Element children in document order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// First element child.
    #[must_use]
    pub fn first_child(&self) -> Option<NodeId> {
        self.children.first().copied()
    }

    /// Last element child.
    #[must_use]
    pub fn last_child(&self) -> Option<NodeId> {
        self.children.last().copied()
    }

    /// Whether [`Dom::clean`] has been applied to this node.
    #[must_use]
    pub const fn is_cleaned(&self) -> bool {
        self.cleaned
    }
}

/// Arena holding every node of one or more documents.
#[derive(Debug, Clone, Default)]
pub struct Dom {
    nodes: Vec<Node>,
}

impl Dom {
    /// Create an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of nodes ever allocated in this arena (cleaned ones included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been allocated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a node by its ID, panicking on an id from another arena.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(data));
        id
    }

    /// Allocate a new, empty document. A document owns itself.
    pub fn create_document(&mut self) -> NodeId {
        let id = self.alloc(NodeData::Document(DocumentData::default()));
        self.node_mut(id).owner = Some(id);
        id
    }

    /// Allocate a detached element.
    pub fn create_element(&mut self, name: &str, self_closed: bool) -> NodeId {
        self.alloc(NodeData::Element(ElementData::new(name, self_closed)))
    }

    /// Allocate a detached element, consulting `config` for whether the
    /// tag is self-closing.
    pub fn create_element_with(&mut self, name: &str, config: &MarkupConfig) -> NodeId {
        let self_closed = config.is_self_closing(&name.to_lowercase());
        self.create_element(name, self_closed)
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text(value.into()))
    }

    /// Allocate a detached CDATA node.
    pub fn create_cdata(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Cdata(value.into()))
    }

    /// Allocate a detached comment.
    pub fn create_comment(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Comment(value.into()))
    }

    /// Allocate a detached doctype.
    pub fn create_doctype(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Doctype(value.into()))
    }

    /// Allocate a detached XML declaration.
    pub fn create_xml_declaration(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(NodeData::XmlDeclaration(value.into()))
    }

    /// The node kind.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind()
    }

    /// Lower-cased node name.
    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        self.node(id).name()
    }

    /// String value of the node.
    #[must_use]
    pub fn value(&self, id: NodeId) -> &str {
        self.node(id).value()
    }

    /// Replace the string value of a node. For elements this sets the raw
    /// contents; documents have no value.
    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) {
        match &mut self.node_mut(id).data {
            NodeData::Document(_) => {}
            NodeData::Element(e) => e.raw = value.into(),
            NodeData::Text(s)
            | NodeData::Cdata(s)
            | NodeData::Comment(s)
            | NodeData::Doctype(s)
            | NodeData::XmlDeclaration(s) => *s = value.into(),
        }
    }

    /// Element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.data) {
            Some(NodeData::Element(e)) => Some(e),
            _ => None,
        }
    }

    /// Whether the node is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Owning document of a node.
    #[must_use]
    pub fn owner_document(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.owner)
    }

    /// Whether the document owning `id` is marked as XML.
    #[must_use]
    pub fn is_xml(&self, id: NodeId) -> bool {
        self.owner_document(id)
            .and_then(|doc| match &self.node(doc).data {
                NodeData::Document(d) => Some(d.is_xml),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Mark a document as XML (or not). No-op for other kinds.
    pub fn set_xml(&mut self, document: NodeId, is_xml: bool) {
        if let NodeData::Document(d) = &mut self.node_mut(document).data {
            d.is_xml = is_xml;
        }
    }

    /// Every child node of `id` in document order.
    #[must_use]
    pub fn child_nodes(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.nodes.as_slice())
    }

    /// Element children of `id` in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// First element child.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::first_child)
    }

    /// Last element child.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::last_child)
    }

    /// Next element sibling.
    #[must_use]
    pub fn next_element(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next)
    }

    /// Previous element sibling.
    #[must_use]
    pub fn prev_element(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev)
    }

    /// Element child by position; negative positions count from the end.
    #[must_use]
    pub fn child(&self, id: NodeId, n: isize) -> Option<NodeId> {
        index_from_end(self.children(id), n)
    }

    /// Child node (any kind) by position; negative positions count from
    /// the end.
    #[must_use]
    pub fn node_at(&self, id: NodeId, n: isize) -> Option<NodeId> {
        index_from_end(self.child_nodes(id), n)
    }

    /// Attribute value by case-insensitive name. Boolean attributes read as
    /// their own name.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.as_element(id)
            .and_then(|e| e.attrs.get(name))
            .map(Attribute::value)
    }

    /// Set an attribute. String values are entity-decoded first.
    /// No-op on non-elements.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: AttrValue) {
        if let Some(e) = self.as_element_mut(id) {
            e.attrs.set(name, value);
        }
    }

    /// Remove an attribute by case-insensitive name.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(e) = self.as_element_mut(id) {
            let _ = e.attrs.remove(name);
        }
    }

    /// Whether the node has an attribute with this case-insensitive name.
    #[must_use]
    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.as_element(id).is_some_and(|e| e.attrs.contains(name))
    }
}

fn index_from_end(list: &[NodeId], n: isize) -> Option<NodeId> {
    let index = if n >= 0 {
        n.unsigned_abs()
    } else {
        list.len().checked_sub(n.unsigned_abs())?
    };
    list.get(index).copied()
}
