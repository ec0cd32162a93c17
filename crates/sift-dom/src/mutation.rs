//! Structural mutation.
//!
//! [`Dom::insert_at`] and [`Dom::detach`] are the only operations that link
//! or unlink nodes. Everything else in this module (append, wrap, replace
//! and friends) is a thin wrapper over those two, so the full/element
//! sequence indices stay contiguous after every call.

use crate::{AttributeSet, Dom, Node, NodeData, NodeId, NodeKind};

impl Dom {
    /// Insert `nodes` into `target`'s full sequence at `index` (`None`
    /// appends). With `replace`, the node currently at `index` is removed
    /// and cleaned.
    ///
    /// Already attached inputs are detached first. A Document among the
    /// inputs contributes its child nodes instead of itself. Inputs that are
    /// cleaned, repeated, equal to `target` or an ancestor of it are
    /// skipped. Returns the nodes actually inserted, in order.
    ///
    /// No-op when `target` is not an element or a document.
    pub fn insert_at(
        &mut self,
        target: NodeId,
        nodes: &[NodeId],
        index: Option<usize>,
        replace: bool,
    ) -> Vec<NodeId> {
        match self.get(target) {
            Some(t) if t.is_container() && !t.cleaned => {}
            _ => return Vec::new(),
        }
        let inputs = self.collect_inputs(target, nodes);
        if inputs.is_empty() {
            return inputs;
        }

        let existing = &self.node(target).nodes;
        let index = index.map_or(existing.len(), |i| i.min(existing.len()));
        let replaced = if replace {
            existing
                .get(index)
                .copied()
                .filter(|n| !inputs.contains(n))
        } else {
            None
        };
        // The inputs land right before the first surviving node at or after
        // `index`; its position is only known after the inputs are detached.
        let anchor = existing[index..]
            .iter()
            .copied()
            .find(|n| !inputs.contains(n) && Some(*n) != replaced);

        for &n in &inputs {
            self.detach(n);
        }
        if let Some(r) = replaced {
            self.clean(r);
        }

        let pos = anchor
            .and_then(|a| self.node(a).cnid)
            .unwrap_or_else(|| self.node(target).nodes.len());
        let owner = self.node(target).owner;
        for &n in &inputs {
            self.node_mut(n).parent = Some(target);
            self.set_owner(n, owner);
        }
        let parent = self.node_mut(target);
        for (offset, &n) in inputs.iter().enumerate() {
            parent.nodes.insert(pos + offset, n);
        }
        if let NodeData::Element(e) = &mut parent.data {
            e.self_closed = false;
        }
        self.reindex(target, pos);
        inputs
    }

    fn collect_inputs(&self, target: NodeId, nodes: &[NodeId]) -> Vec<NodeId> {
        let mut inputs: Vec<NodeId> = Vec::with_capacity(nodes.len());
        for &n in nodes {
            let Some(node) = self.get(n) else { continue };
            let expanded = if node.is_document() {
                node.nodes.clone()
            } else {
                vec![n]
            };
            for candidate in expanded {
                let accept = candidate != target
                    && !self.node(candidate).cleaned
                    && !self.node(candidate).is_document()
                    && !inputs.contains(&candidate)
                    && !self.is_descendant_of(target, candidate);
                if accept {
                    inputs.push(candidate);
                }
            }
        }
        inputs
    }

    fn set_owner(&mut self, id: NodeId, owner: Option<NodeId>) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let node = self.node_mut(n);
            node.owner = owner;
            stack.extend_from_slice(&node.nodes);
        }
    }

    /// Renumber the children of `parent` from full-sequence position `from`
    /// onwards, rebuilding the element sequence and element sibling links.
    pub(crate) fn reindex(&mut self, parent: NodeId, from: usize) {
        let len = self.node(parent).nodes.len();
        let from = from.min(len);
        let mut chid = self.node(parent).nodes[..from]
            .iter()
            .rev()
            .find_map(|&n| self.node(n).chid)
            .map_or(0, |c| c + 1);
        let mut prev = chid
            .checked_sub(1)
            .and_then(|c| self.node(parent).children.get(c).copied());
        self.node_mut(parent).children.truncate(chid);

        for i in from..len {
            let n = self.node(parent).nodes[i];
            let is_element = self.node(n).is_element();
            let node = self.node_mut(n);
            node.cnid = Some(i);
            if !is_element {
                node.chid = None;
                continue;
            }
            node.chid = Some(chid);
            node.prev = prev;
            node.next = None;
            if let Some(p) = prev {
                self.node_mut(p).next = Some(n);
            }
            self.node_mut(parent).children.push(n);
            prev = Some(n);
            chid += 1;
        }
        if let Some(last) = prev {
            self.node_mut(last).next = None;
        }
    }

    /// Remove `id` and its subtree from its parent.
    ///
    /// Later siblings shift down by one; the node keeps its identity, its
    /// owning document and its own subtree, so it can be inserted again.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let siblings = &self.node(parent).nodes;
        let cnid = match self.node(id).cnid {
            Some(c) if siblings.get(c) == Some(&id) => Some(c),
            _ => siblings.iter().position(|&n| n == id),
        };
        if let Some(cnid) = cnid {
            let _ = self.node_mut(parent).nodes.remove(cnid);
            self.reindex(parent, cnid);
        }
        let node = self.node_mut(id);
        node.parent = None;
        node.cnid = None;
        node.chid = None;
        node.prev = None;
        node.next = None;
    }

    /// Detach every child node of `id`, returning them in order.
    pub fn detach_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let children = self.child_nodes(id).to_vec();
        for &child in children.iter().rev() {
            self.detach(child);
        }
        children
    }

    /// Detach `id`, then sever every reference inside its subtree. A cleaned
    /// node is unusable: inserting it anywhere is a no-op.
    pub fn clean(&mut self, id: NodeId) {
        if self.get(id).is_none_or(|n| n.cleaned) {
            return;
        }
        self.detach(id);
        tracing::trace!(?id, "cleaning subtree");
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let node = self.node_mut(n);
            stack.append(&mut node.nodes);
            node.children.clear();
            node.owner = None;
            node.parent = None;
            node.cnid = None;
            node.chid = None;
            node.prev = None;
            node.next = None;
            node.cleaned = true;
            if let NodeData::Element(e) = &mut node.data {
                e.attrs = AttributeSet::default();
            }
        }
    }

    /// Clean every child node of `id` (jQuery's `empty`).
    pub fn clean_children(&mut self, id: NodeId) {
        for child in self.detach_children(id) {
            self.clean(child);
        }
    }

    /// Alias of [`Dom::clean`].
    pub fn remove(&mut self, id: NodeId) {
        self.clean(id);
    }

    /// Deep copy of the subtree rooted at `id`.
    ///
    /// Every copied node gets a fresh id and uid. The copy is detached and
    /// has no owning document, except that a cloned Document owns its whole
    /// copied subtree.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let copy = self.clone_subtree(id);
        if self.node(copy).is_document() {
            self.set_owner(copy, Some(copy));
        } else {
            self.set_owner(copy, None);
        }
        copy
    }

    fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let data = self.node(id).data.clone();
        let children = self.node(id).nodes.clone();
        let copy = self.alloc(data);
        for child in children {
            let child_copy = self.clone_subtree(child);
            self.node_mut(child_copy).parent = Some(copy);
            self.node_mut(copy).nodes.push(child_copy);
        }
        self.reindex(copy, 0);
        copy
    }

    /// Append `nodes` as the last children of `target`.
    pub fn append(&mut self, target: NodeId, nodes: &[NodeId]) -> Vec<NodeId> {
        self.insert_at(target, nodes, None, false)
    }

    /// Insert `nodes` as the first children of `target`.
    pub fn prepend(&mut self, target: NodeId, nodes: &[NodeId]) -> Vec<NodeId> {
        self.insert_at(target, nodes, Some(0), false)
    }

    /// Insert `nodes` right after `id`. No-op when `id` is detached.
    pub fn after(&mut self, id: NodeId, nodes: &[NodeId]) -> Vec<NodeId> {
        self.insert_beside(id, nodes, 1, false)
    }

    /// Insert `nodes` right before `id`. No-op when `id` is detached.
    pub fn before(&mut self, id: NodeId, nodes: &[NodeId]) -> Vec<NodeId> {
        self.insert_beside(id, nodes, 0, false)
    }

    /// Put `nodes` where `id` is and clean `id`. No-op when `id` is
    /// detached.
    pub fn replace_with(&mut self, id: NodeId, nodes: &[NodeId]) -> Vec<NodeId> {
        self.insert_beside(id, nodes, 0, true)
    }

    fn insert_beside(
        &mut self,
        id: NodeId,
        nodes: &[NodeId],
        offset: usize,
        replace: bool,
    ) -> Vec<NodeId> {
        let node = self.node(id);
        match (node.parent, node.cnid) {
            (Some(parent), Some(cnid)) => {
                self.insert_at(parent, nodes, Some(cnid + offset), replace)
            }
            _ => Vec::new(),
        }
    }

    /// Append `id` to every target. The first target receives `id` itself,
    /// the others receive deep clones. A Document contributes its children.
    pub fn append_to(&mut self, id: NodeId, targets: &[NodeId]) -> Vec<NodeId> {
        self.distribute(id, targets, Self::append)
    }

    /// Prepend `id` to every target, as [`Dom::append_to`] does.
    pub fn prepend_to(&mut self, id: NodeId, targets: &[NodeId]) -> Vec<NodeId> {
        self.distribute(id, targets, Self::prepend)
    }

    /// Insert `id` after every target, as [`Dom::append_to`] does.
    pub fn insert_after(&mut self, id: NodeId, targets: &[NodeId]) -> Vec<NodeId> {
        self.distribute(id, targets, Self::after)
    }

    /// Insert `id` before every target, as [`Dom::append_to`] does.
    pub fn insert_before(&mut self, id: NodeId, targets: &[NodeId]) -> Vec<NodeId> {
        self.distribute(id, targets, Self::before)
    }

    /// Replace every target with `id`, as [`Dom::append_to`] does.
    pub fn replace_all(&mut self, id: NodeId, targets: &[NodeId]) -> Vec<NodeId> {
        self.distribute(id, targets, Self::replace_with)
    }

    fn distribute(
        &mut self,
        id: NodeId,
        targets: &[NodeId],
        mut insert: impl FnMut(&mut Self, NodeId, &[NodeId]) -> Vec<NodeId>,
    ) -> Vec<NodeId> {
        let content = if self.node(id).is_document() {
            self.child_nodes(id).to_vec()
        } else {
            vec![id]
        };
        let mut inserted = Vec::new();
        for (i, &target) in targets.iter().enumerate() {
            let batch = if i == 0 {
                content.clone()
            } else {
                content.iter().map(|&n| self.deep_clone(n)).collect()
            };
            inserted.extend(insert(self, target, &batch));
        }
        inserted
    }

    /// Prepare an empty wrapper element from wrapper content: the first
    /// node, or the first element child of a Document.
    fn wrapper_from(&mut self, content: &[NodeId]) -> Option<NodeId> {
        let first = *content.first()?;
        let template = if self.node(first).is_document() {
            self.first_child(first)?
        } else {
            first
        };
        if !self.is_element(template) {
            return None;
        }
        let wrapper = self.deep_clone(template);
        self.clean_children(wrapper);
        Some(wrapper)
    }

    /// Wrap `id` in a copy of the first element of `content`. Returns the
    /// wrapper, or `None` when `id` is detached or `content` holds no
    /// element.
    pub fn wrap(&mut self, id: NodeId, content: &[NodeId]) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let cnid = self.node(id).cnid?;
        let wrapper = self.wrapper_from(content)?;
        self.detach(id);
        let _ = self.append(wrapper, &[id]);
        let _ = self.insert_at(parent, &[wrapper], Some(cnid), false);
        Some(wrapper)
    }

    /// Wrap the children of `id` in a copy of the first element of
    /// `content`.
    pub fn wrap_inner(&mut self, id: NodeId, content: &[NodeId]) -> Option<NodeId> {
        if !self.get(id).is_some_and(Node::is_container) {
            return None;
        }
        let wrapper = self.wrapper_from(content)?;
        let children = self.child_nodes(id).to_vec();
        let _ = self.append(wrapper, &children);
        let _ = self.append(id, &[wrapper]);
        Some(wrapper)
    }

    /// Wrap all of `nodes` in a single copy of the first element of
    /// `content`, placed where the first node was.
    pub fn wrap_all(&mut self, nodes: &[NodeId], content: &[NodeId]) -> Option<NodeId> {
        let first = *nodes.first()?;
        let parent = self.parent(first)?;
        let cnid = self.node(first).cnid?;
        let wrapper = self.wrapper_from(content)?;
        let _ = self.insert_at(parent, &[wrapper], Some(cnid), false);
        let _ = self.append(wrapper, nodes);
        Some(wrapper)
    }

    /// Replace the parent of `id` with `id` alone. The parent and its other
    /// children are cleaned. No-op unless the parent is itself attached.
    pub fn unwrap(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if self.parent(parent).is_some() {
            let _ = self.replace_with(parent, &[id]);
        }
    }

    /// Replace the content of `id` with `text`.
    ///
    /// Elements and documents lose their children and get a single text
    /// node; text, CDATA and comment nodes get a new value. Other kinds are
    /// left alone.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        match self.kind(id) {
            NodeKind::Element | NodeKind::Document => {
                self.clean_children(id);
                if !text.is_empty() {
                    let node = self.create_text(text);
                    let _ = self.append(id, &[node]);
                }
                if let Some(e) = self.as_element_mut(id) {
                    e.self_closed = false;
                }
            }
            NodeKind::Text | NodeKind::Cdata | NodeKind::Comment => {
                self.set_value(id, text);
            }
            NodeKind::Doctype | NodeKind::XmlDeclaration => {}
        }
    }
}
