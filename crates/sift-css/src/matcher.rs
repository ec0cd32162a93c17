//! Selector matching against a markup tree.
//!
//! Two algorithms share the per-compound test:
//!
//! - *collection search* ([`Matcher::find`]) walks the element descendants
//!   of a context node to seed candidates for the head compound, then moves
//!   the candidate set through each combinator step, left to right;
//! - *single-node test* ([`Matcher::matches`]) checks the subject compound
//!   against one node and walks the chain right to left through ancestors
//!   and preceding siblings.
//!
//! Matched-set filters only take part in the collection search.

use sift_dom::{Attribute, Dom, MarkupConfig, NodeId};

use crate::selector::{
    AttributeSelector, Combinator, ComplexSelector, CompoundSelector, Nth, PseudoClass, Selector,
    SetFilter,
};
use crate::set::{NodeSet, slice_range};

/// Evaluates compiled selectors over one [`Dom`].
///
/// The configuration is used by `:contains`, which searches node text.
#[derive(Clone, Copy)]
pub struct Matcher<'a> {
    dom: &'a Dom,
    config: &'a MarkupConfig,
}

/// Per-chain search state for the seed walk.
struct Seed<'s> {
    chain: &'s ComplexSelector,
    /// Collect head matches only, no hierarchy to resolve per seed.
    collect_only: bool,
    /// Stop the walk once more nodes than this were collected.
    limit: Option<usize>,
    /// Give up the whole search once more nodes than this were collected.
    nth: Option<usize>,
}

impl<'a> Matcher<'a> {
    /// Create a matcher over `dom`.
    #[must_use]
    pub const fn new(dom: &'a Dom, config: &'a MarkupConfig) -> Self {
        Self { dom, config }
    }

    /// Every element below `context` matching `selector`, in chain order:
    /// the results of the first chain come first, then any new nodes from
    /// the following chains.
    #[must_use]
    pub fn find(&self, context: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut result = NodeSet::new();
        let _ = self.find_into(context, selector, None, &mut result);
        result.into()
    }

    /// The `n`-th (0-based) node [`Matcher::find`] would return, searching
    /// no further than needed.
    #[must_use]
    pub fn find_nth(&self, context: NodeId, selector: &Selector, n: usize) -> Option<NodeId> {
        let mut result = NodeSet::new();
        let _ = self.find_into(context, selector, Some(n), &mut result);
        result.get(n)
    }

    /// Add the matches below `context` to `result`.
    ///
    /// With `nth`, a chain stops searching as soon as it holds more than
    /// `nth` nodes, and the remaining chains are skipped. Returns `false`
    /// when that happened.
    pub fn find_into(
        &self,
        context: NodeId,
        selector: &Selector,
        nth: Option<usize>,
        result: &mut NodeSet,
    ) -> bool {
        if self.dom.children(context).is_empty() {
            return true;
        }
        for chain in &selector.chains {
            let seed = Seed {
                chain,
                collect_only: chain.is_simple() || !chain.head.filters.is_empty(),
                limit: chain.head.limit,
                nth,
            };
            let mut found = NodeSet::new();
            let complete = self.seed(context, &seed, &mut found);
            result.extend(found.iter());
            if !complete {
                tracing::trace!(selector = %selector, "search stopped early");
                return false;
            }
        }
        true
    }

    /// Depth-first walk over the element descendants of `context`, testing
    /// each against the head compound. A failed `:contains` prunes the walk
    /// below the node.
    fn seed(&self, context: NodeId, seed: &Seed<'_>, found: &mut NodeSet) -> bool {
        let head = &seed.chain.head;
        let has_filters = !head.filters.is_empty();
        let mut stack: Vec<NodeId> = self.dom.children(context).iter().rev().copied().collect();

        while let Some(node) = stack.pop() {
            let mut descend = true;
            if self.compound_matches(node, head, &mut descend) {
                if seed.collect_only {
                    let _ = found.insert(node);
                    if seed.limit.is_some_and(|limit| found.len() > limit) {
                        break;
                    }
                    if !has_filters && seed.nth.is_some_and(|n| found.len() > n) {
                        return false;
                    }
                } else {
                    let mut nodes = NodeSet::new();
                    let _ = nodes.insert(node);
                    self.follow_steps(&mut nodes, &seed.chain.steps);
                    found.extend(nodes.iter());
                    if seed.nth.is_some_and(|n| found.len() > n) {
                        return false;
                    }
                }
            }
            if descend {
                stack.extend(self.dom.children(node).iter().rev().copied());
            }
        }

        if has_filters && !found.is_empty() {
            apply_filters(found, &head.filters);
            if !seed.chain.is_simple() {
                self.follow_steps(found, &seed.chain.steps);
            }
        }
        true
    }

    /// Move a candidate set through combinator steps. Each step replaces the
    /// set with the nodes related to it that match the step's compound,
    /// then applies the compound's matched-set filters.
    fn follow_steps(&self, nodes: &mut NodeSet, steps: &[(Combinator, CompoundSelector)]) {
        for (combinator, compound) in steps {
            let mut next = NodeSet::new();
            for node in nodes.iter() {
                match combinator {
                    Combinator::Descendant => next.extend(
                        self.dom
                            .element_descendants(node)
                            .filter(|&d| self.compound_test(d, compound)),
                    ),
                    Combinator::Child => next.extend(
                        self.dom
                            .children(node)
                            .iter()
                            .copied()
                            .filter(|&c| self.compound_test(c, compound)),
                    ),
                    Combinator::NextSibling => next.extend(
                        self.dom
                            .next_element(node)
                            .filter(|&s| self.compound_test(s, compound)),
                    ),
                    Combinator::SubsequentSibling => next.extend(
                        self.dom
                            .following_elements(node)
                            .filter(|&s| self.compound_test(s, compound)),
                    ),
                }
            }
            *nodes = next;
            if nodes.is_empty() {
                return;
            }
            if !compound.filters.is_empty() {
                apply_filters(nodes, &compound.filters);
            }
        }
    }

    /// Whether `node` matches any chain of `selector`. Matched-set filters
    /// are ignored.
    #[must_use]
    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        selector
            .chains
            .iter()
            .any(|chain| self.chain_matches(node, chain))
    }

    fn chain_matches(&self, node: NodeId, chain: &ComplexSelector) -> bool {
        if !self.compound_test(node, chain.subject()) {
            return false;
        }
        let mut nodes = vec![node];
        for index in (0..chain.steps.len()).rev() {
            let combinator = chain.steps[index].0;
            let Some(compound) = chain.compound(index) else {
                return false;
            };
            let mut next = NodeSet::new();
            for &current in &nodes {
                self.related_matching(current, combinator, compound, &mut next);
            }
            if next.is_empty() {
                return false;
            }
            nodes = next.into();
        }
        true
    }

    /// Collect the nodes standing on the left side of `combinator` relative
    /// to `node` that match `compound`.
    fn related_matching(
        &self,
        node: NodeId,
        combinator: Combinator,
        compound: &CompoundSelector,
        out: &mut NodeSet,
    ) {
        match combinator {
            Combinator::Descendant => out.extend(
                self.dom
                    .ancestors(node)
                    .take_while(|&a| self.dom.is_element(a))
                    .filter(|&a| self.compound_test(a, compound)),
            ),
            Combinator::Child => out.extend(
                self.dom
                    .parent(node)
                    .filter(|&p| self.dom.is_element(p) && self.compound_test(p, compound)),
            ),
            Combinator::NextSibling => out.extend(
                self.dom
                    .prev_element(node)
                    .filter(|&p| self.compound_test(p, compound)),
            ),
            Combinator::SubsequentSibling => out.extend(
                self.dom
                    .preceding_elements(node)
                    .filter(|&p| self.compound_test(p, compound)),
            ),
        }
    }

    /// Whether `node` is matched by `selector`, treating a Document as its
    /// single element child: a Document matches only when it has exactly
    /// one element child and that child matches.
    #[must_use]
    pub fn is(&self, node: NodeId, selector: &Selector) -> bool {
        let target = match self.dom.get(node) {
            Some(n) if n.is_document() => match n.children() {
                [only] => *only,
                _ => return false,
            },
            Some(_) => node,
            None => return false,
        };
        self.matches(target, selector)
    }

    /// Whether some element child of `node` matches `selector`.
    #[must_use]
    pub fn has(&self, node: NodeId, selector: &Selector) -> bool {
        self.dom
            .children(node)
            .iter()
            .any(|&child| self.matches(child, selector))
    }

    /// The nearest node, starting with `node` itself and walking up through
    /// its ancestors, that matches `selector`.
    #[must_use]
    pub fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        std::iter::once(node)
            .chain(self.dom.ancestors(node))
            .find(|&n| self.matches(n, selector))
    }

    fn compound_test(&self, node: NodeId, compound: &CompoundSelector) -> bool {
        let mut descend = true;
        self.compound_matches(node, compound, &mut descend)
    }

    /// [§ 3.1 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    ///
    /// Element name, then every attribute predicate, then every
    /// pseudo-class. `descend` is cleared when `:contains` fails, since no
    /// descendant can contain the text either.
    fn compound_matches(
        &self,
        node: NodeId,
        compound: &CompoundSelector,
        descend: &mut bool,
    ) -> bool {
        let Some(n) = self.dom.get(node) else {
            return false;
        };
        if compound
            .element
            .as_deref()
            .is_some_and(|name| n.name() != name)
        {
            return false;
        }
        compound
            .attributes
            .iter()
            .all(|attribute| self.attribute_matches(node, attribute))
            && compound
                .pseudo_classes
                .iter()
                .all(|pseudo| self.pseudo_class_matches(node, pseudo, descend))
    }

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    fn attribute_matches(&self, node: NodeId, selector: &AttributeSelector) -> bool {
        let attribute = self
            .dom
            .as_element(node)
            .and_then(|e| e.attrs.get(selector.name()));
        let value = attribute.map_or("", Attribute::value);

        match selector {
            AttributeSelector::Exists(_) => attribute.is_some(),
            AttributeSelector::NotEquals(_, search) => value != search,
            // An empty value never matches a non-empty search.
            AttributeSelector::Equals(_, search)
            | AttributeSelector::Includes(_, search)
            | AttributeSelector::DashMatch(_, search)
            | AttributeSelector::PrefixMatch(_, search)
            | AttributeSelector::SuffixMatch(_, search)
            | AttributeSelector::SubstringMatch(_, search)
                if value.is_empty() && !search.is_empty() =>
            {
                false
            }
            AttributeSelector::Equals(_, search) => value == search,
            AttributeSelector::Includes(_, search) => {
                value.split(char::is_whitespace).any(|word| word == search)
            }
            AttributeSelector::DashMatch(_, search) => {
                value == search
                    || value
                        .strip_prefix(search.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            AttributeSelector::PrefixMatch(_, search) => value.starts_with(search.as_str()),
            AttributeSelector::SuffixMatch(_, search) => value.ends_with(search.as_str()),
            AttributeSelector::SubstringMatch(_, search) => value.contains(search.as_str()),
        }
    }

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    fn pseudo_class_matches(&self, node: NodeId, pseudo: &PseudoClass, descend: &mut bool) -> bool {
        match pseudo {
            PseudoClass::Empty => self.dom.child_nodes(node).is_empty(),
            PseudoClass::Parent => !self.dom.child_nodes(node).is_empty(),
            PseudoClass::Header => matches!(
                self.dom.name(node),
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
            ),
            PseudoClass::Contains(text) => {
                if text.is_empty() || self.dom.text(node, self.config).contains(text.as_str()) {
                    true
                } else {
                    *descend = false;
                    false
                }
            }
            PseudoClass::Not(selector) => !self.matches(node, selector),
            PseudoClass::Has(selector) => {
                let children = self.dom.children(node);
                !children.is_empty()
                    && (selector.is_universal()
                        || children.iter().any(|&c| self.matches(c, selector)))
            }
            PseudoClass::Unknown(_) => self.in_structural_context(node),
            structural => self.structural_matches(node, structural),
        }
    }

    /// Whether `node` has an element parent, or shares its parent with at
    /// least one other element. Structural and unknown pseudo-classes fail
    /// outside this context.
    fn in_structural_context(&self, node: NodeId) -> bool {
        self.dom.parent(node).is_some_and(|parent| {
            self.dom.is_element(parent) || self.dom.children(parent).len() >= 2
        })
    }

    /// [§ 14 Tree-Structural pseudo-classes](https://www.w3.org/TR/selectors-4/#structural-pseudos)
    ///
    /// Positions are 1-based and count element siblings only. A node whose
    /// parent is not an element and has fewer than two element children
    /// never matches.
    fn structural_matches(&self, node: NodeId, pseudo: &PseudoClass) -> bool {
        if !self.in_structural_context(node) {
            return false;
        }
        let Some(parent) = self.dom.parent(node) else {
            return false;
        };
        let siblings = self.dom.children(parent);
        let Some(chid) = self.dom.node(node).chid() else {
            return false;
        };
        let name = self.dom.name(node);
        let of_type = || siblings.iter().copied().filter(move |&s| self.dom.name(s) == name);

        match pseudo {
            PseudoClass::FirstChild => self.dom.prev_element(node).is_none(),
            PseudoClass::LastChild => self.dom.next_element(node).is_none(),
            PseudoClass::OnlyChild => {
                self.dom.prev_element(node).is_none() && self.dom.next_element(node).is_none()
            }
            PseudoClass::NthChild(nth) => nth.matches(to_i64(chid + 1)),
            PseudoClass::NthLastChild(nth) => nth.matches(to_i64(siblings.len() - chid)),
            PseudoClass::OnlyOfType => of_type().nth(1).is_none(),
            PseudoClass::FirstOfType => Nth::new(0, 1).matches(position_of(of_type(), node)),
            PseudoClass::LastOfType => Nth::new(0, 1).matches(position_of(of_type().rev(), node)),
            PseudoClass::NthOfType(nth) => nth.matches(position_of(of_type(), node)),
            PseudoClass::NthLastOfType(nth) => nth.matches(position_of(of_type().rev(), node)),
            _ => true,
        }
    }
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// 1-based position of `node` in `iter`, 0 when absent.
fn position_of(mut iter: impl Iterator<Item = NodeId>, node: NodeId) -> i64 {
    iter.position(|n| n == node).map_or(0, |i| to_i64(i + 1))
}

/// Apply matched-set filters in order. Stops early once the set is empty.
fn apply_filters(nodes: &mut NodeSet, filters: &[SetFilter]) {
    for filter in filters {
        let len = nodes.len();
        match *filter {
            SetFilter::First => nodes.keep_range(0..1),
            SetFilter::Last => nodes.keep_range(len.saturating_sub(1)..len),
            SetFilter::Eq(n) => nodes.keep_range(slice_range(len, n, Some(1))),
            SetFilter::Lt(n) => nodes.keep_range(slice_range(len, 0, Some(n))),
            SetFilter::Gt(n) => nodes.keep_range(slice_range(len, n.saturating_add(1), None)),
            SetFilter::Odd => nodes.retain_indexed(|i, _| i % 2 == 1),
            SetFilter::Even => nodes.retain_indexed(|i, _| i % 2 == 0),
        }
        if nodes.is_empty() {
            return;
        }
    }
}
