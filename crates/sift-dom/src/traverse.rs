//! Read-only tree walks.

use crate::{Dom, NodeId};

/// Iterator over the ancestors of a node, from parent to root.
pub struct Ancestors<'a> {
    dom: &'a Dom,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.dom.parent(id);
        Some(id)
    }
}

/// Depth-first, pre-order iterator over the element descendants of a node.
/// The start node itself is not yielded.
pub struct ElementDescendants<'a> {
    dom: &'a Dom,
    stack: Vec<NodeId>,
}

impl Iterator for ElementDescendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.dom.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Iterator along element sibling links, nearest sibling first.
pub struct ElementSiblings<'a> {
    dom: &'a Dom,
    current: Option<NodeId>,
    forward: bool,
}

impl Iterator for ElementSiblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = if self.forward {
            self.dom.next_element(id)
        } else {
            self.dom.prev_element(id)
        };
        Some(id)
    }
}

impl Dom {
    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            dom: self,
            current: self.parent(id),
        }
    }

    /// Iterate over the element descendants of `id` in document order.
    #[must_use]
    pub fn element_descendants(&self, id: NodeId) -> ElementDescendants<'_> {
        ElementDescendants {
            dom: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// Iterate over the following element siblings of `id`.
    #[must_use]
    pub fn following_elements(&self, id: NodeId) -> ElementSiblings<'_> {
        ElementSiblings {
            dom: self,
            current: self.next_element(id),
            forward: true,
        }
    }

    /// Iterate over the preceding element siblings of `id`, nearest first.
    #[must_use]
    pub fn preceding_elements(&self, id: NodeId) -> ElementSiblings<'_> {
        ElementSiblings {
            dom: self,
            current: self.prev_element(id),
            forward: false,
        }
    }

    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// The topmost ancestor of `id`, or `id` itself when detached.
    #[must_use]
    pub fn root(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// First element below `root` whose `id` attribute equals `id`.
    #[must_use]
    pub fn element_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        self.element_descendants(root)
            .find(|&n| self.as_element(n).and_then(|e| e.id()) == Some(id))
    }

    /// First element below `root` with the given (case-insensitive) name.
    #[must_use]
    pub fn element_by_tag_name(&self, root: NodeId, name: &str) -> Option<NodeId> {
        let name = name.to_lowercase();
        self.element_descendants(root)
            .find(|&n| self.name(n) == name)
    }

    /// Every element below `root` with the given (case-insensitive) name,
    /// in document order.
    #[must_use]
    pub fn elements_by_tag_name(&self, root: NodeId, name: &str) -> Vec<NodeId> {
        let name = name.to_lowercase();
        self.element_descendants(root)
            .filter(|&n| self.name(n) == name)
            .collect()
    }
}

impl Dom {
    /// Verify the structural indices of the subtree under `root`: parent
    /// links, contiguous full and element positions, symmetric element
    /// sibling links and a single owning document throughout.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violation found.
    pub fn check_structure(&self, root: NodeId) -> Result<(), String> {
        let mut stack = vec![root];
        while let Some(parent) = stack.pop() {
            let node = self.node(parent);
            if node.as_element().is_some_and(|e| e.self_closed) && !node.nodes.is_empty() {
                return Err(format!("self-closed {parent:?} has child nodes"));
            }
            let mut elements = Vec::new();
            for (i, &child) in node.nodes.iter().enumerate() {
                let c = self.node(child);
                if c.cleaned {
                    return Err(format!("{child:?} is cleaned but attached to {parent:?}"));
                }
                if c.parent != Some(parent) {
                    return Err(format!("{child:?} does not point back to {parent:?}"));
                }
                if c.cnid != Some(i) {
                    return Err(format!("{child:?} has position {:?}, expected {i}", c.cnid));
                }
                if c.owner != node.owner {
                    return Err(format!("{child:?} has a different owner than {parent:?}"));
                }
                if c.is_element() {
                    if c.chid != Some(elements.len()) {
                        return Err(format!(
                            "{child:?} has element position {:?}, expected {}",
                            c.chid,
                            elements.len()
                        ));
                    }
                    elements.push(child);
                } else if c.chid.is_some() {
                    return Err(format!("non-element {child:?} has an element position"));
                }
                stack.push(child);
            }
            if node.children != elements {
                return Err(format!("element sequence of {parent:?} is stale"));
            }
            for (i, &el) in elements.iter().enumerate() {
                let prev = i.checked_sub(1).map(|p| elements[p]);
                let next = elements.get(i + 1).copied();
                if self.node(el).prev != prev || self.node(el).next != next {
                    return Err(format!("sibling links of {el:?} are inconsistent"));
                }
            }
        }
        Ok(())
    }
}
