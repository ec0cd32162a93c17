//! Insertion-ordered, duplicate-free node sets.

use std::collections::HashSet;
use std::ops::Range;

use sift_dom::NodeId;

/// Nodes in first-insertion order, each at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSet {
    list: Vec<NodeId>,
    seen: HashSet<NodeId>,
}

impl NodeSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Whether `id` is in the set.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.seen.contains(&id)
    }

    /// Append `id` unless already present. Returns whether it was added.
    pub fn insert(&mut self, id: NodeId) -> bool {
        let added = self.seen.insert(id);
        if added {
            self.list.push(id);
        }
        added
    }

    /// Remove `id`, keeping the order of the rest. Returns whether it was
    /// present.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let removed = self.seen.remove(&id);
        if removed {
            self.list.retain(|&n| n != id);
        }
        removed
    }

    /// The nodes in order.
    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.list
    }

    /// Node at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.list.get(index).copied()
    }

    /// Position of `id`, if present.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        self.list.iter().position(|&n| n == id)
    }

    /// Iterate in order.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, NodeId>> {
        self.list.iter().copied()
    }

    /// Remove every node.
    pub fn clear(&mut self) {
        self.list.clear();
        self.seen.clear();
    }

    /// Keep only the nodes `keep` accepts, given their position and id.
    pub fn retain_indexed(&mut self, mut keep: impl FnMut(usize, NodeId) -> bool) {
        let list = std::mem::take(&mut self.list);
        self.seen.clear();
        for (i, id) in list.into_iter().enumerate() {
            if keep(i, id) {
                let _ = self.insert(id);
            }
        }
    }

    /// Keep only the nodes within `range` of positions.
    pub fn keep_range(&mut self, range: Range<usize>) {
        self.retain_indexed(|i, _| range.contains(&i));
    }

    /// Reverse the order.
    pub fn reverse(&mut self) {
        self.list.reverse();
    }

    /// Take the nodes out, leaving the set empty.
    pub fn take(&mut self) -> Vec<NodeId> {
        self.seen.clear();
        std::mem::take(&mut self.list)
    }
}

impl Extend<NodeId> for NodeSet {
    fn extend<T: IntoIterator<Item = NodeId>>(&mut self, iter: T) {
        for id in iter {
            let _ = self.insert(id);
        }
    }
}

impl FromIterator<NodeId> for NodeSet {
    fn from_iter<T: IntoIterator<Item = NodeId>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a NodeSet {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<NodeSet> for Vec<NodeId> {
    fn from(mut set: NodeSet) -> Self {
        set.take()
    }
}

/// Resolve a slice request against a list of `len` items.
///
/// A negative `offset` counts from the end. A missing `length` runs to the
/// end; a negative one stops that many items before the end.
#[must_use]
pub fn slice_range(len: usize, offset: i64, length: Option<i64>) -> Range<usize> {
    let from_end =
        |n: i64| len.saturating_sub(usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX));
    let clamp = |n: i64| usize::try_from(n).unwrap_or(usize::MAX).min(len);

    let start = if offset < 0 { from_end(offset) } else { clamp(offset) };
    let end = match length {
        None => len,
        Some(l) if l < 0 => from_end(l),
        Some(l) => start.saturating_add(clamp(l)).min(len),
    };
    start..end.max(start)
}
