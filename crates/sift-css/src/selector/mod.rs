//! Selector syntax tree.
//!
//! [§ 3 Selector Syntax and Structure](https://www.w3.org/TR/selectors-4/#syntax)
//!
//! A [`Selector`] is a comma-separated list of [`ComplexSelector`] chains.
//! Each chain is a head [`CompoundSelector`] followed by
//! `(Combinator, CompoundSelector)` steps in source order.
//!
//! Besides the CSS subset, compound selectors carry jQuery-style
//! *matched-set filters* (`:first`, `:eq(n)`, ...) that act on the set of
//! nodes a compound selector produced rather than on a single node.

mod nth;
mod parser;

pub use nth::Nth;
pub use parser::{SelectorError, parse_selector};

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// "Selectors allow the representation of an element's attributes."
///
/// The first field is the lower-cased attribute name, the second the
/// value to compare against. Class (`.name`) and id (`#name`) selectors
/// compile to `Includes("class", name)` and `Equals("id", name)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// `[attr]`: the attribute is present, whatever its value.
    Exists(String),
    /// `[attr=value]`: exact match.
    Equals(String, String),
    /// `[attr!=value]`: the value differs; a missing attribute reads as "".
    NotEquals(String, String),
    /// `[attr~=value]`: one of the whitespace-separated words is `value`.
    Includes(String, String),
    /// `[attr|=value]`: exactly `value`, or `value` followed by `-`.
    DashMatch(String, String),
    /// `[attr^=value]`: starts with `value`.
    PrefixMatch(String, String),
    /// `[attr$=value]`: ends with `value`.
    SuffixMatch(String, String),
    /// `[attr*=value]`: contains `value`.
    SubstringMatch(String, String),
}

impl AttributeSelector {
    /// The lower-cased attribute name tested.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Exists(name)
            | Self::Equals(name, _)
            | Self::NotEquals(name, _)
            | Self::Includes(name, _)
            | Self::DashMatch(name, _)
            | Self::PrefixMatch(name, _)
            | Self::SuffixMatch(name, _)
            | Self::SubstringMatch(name, _) => name,
        }
    }
}

/// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
///
/// Per-node predicates. Structural variants (`*-child`, `*-of-type`) only
/// consider element siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    /// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    /// No child nodes of any kind, text included.
    Empty,
    /// `:parent`, the opposite of `:empty`.
    Parent,
    /// `:header`, one of `h1` to `h6`.
    Header,
    /// `:contains(text)`, case-sensitive search in the node text.
    Contains(String),
    /// [§ 4.3 :not()](https://www.w3.org/TR/selectors-4/#negation)
    /// "The negation pseudo-class, :not(), is a functional pseudo-class
    /// taking a selector list as an argument."
    Not(Box<Selector>),
    /// [§ 4.5 :has()](https://www.w3.org/TR/selectors-4/#relational)
    /// Restricted to element children: some child matches the argument.
    Has(Box<Selector>),
    /// [§ 14.4.1 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    FirstChild,
    /// [§ 14.4.2 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    LastChild,
    /// [§ 14.4.3 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    OnlyChild,
    /// [§ 14.4.4 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
    NthChild(Nth),
    /// [§ 14.4.5 :nth-last-child()](https://www.w3.org/TR/selectors-4/#the-nth-last-child-pseudo)
    NthLastChild(Nth),
    /// [§ 14.5.3 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
    FirstOfType,
    /// [§ 14.5.4 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
    LastOfType,
    /// [§ 14.5.5 :only-of-type](https://www.w3.org/TR/selectors-4/#the-only-of-type-pseudo)
    OnlyOfType,
    /// [§ 14.5.1 :nth-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-of-type-pseudo)
    NthOfType(Nth),
    /// [§ 14.5.2 :nth-last-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-last-of-type-pseudo)
    NthLastOfType(Nth),
    /// A pseudo-class this engine does not know. It never rejects a node.
    Unknown(String),
}

impl PseudoClass {
    /// Whether this predicate depends on the node's position among its
    /// element siblings.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::FirstChild
                | Self::LastChild
                | Self::OnlyChild
                | Self::NthChild(_)
                | Self::NthLastChild(_)
                | Self::FirstOfType
                | Self::LastOfType
                | Self::OnlyOfType
                | Self::NthOfType(_)
                | Self::NthLastOfType(_)
        )
    }
}

/// A jQuery matched-set filter. Applied, in source order, to the whole set
/// of nodes produced by the compound selector it is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SetFilter {
    /// Keep the first node.
    First,
    /// Keep the last node.
    Last,
    /// Keep the node at this position; negative counts from the end.
    Eq(i64),
    /// Keep the nodes before this position.
    Lt(i64),
    /// Keep the nodes after this position.
    Gt(i64),
    /// Keep the nodes at odd zero-based positions.
    Odd,
    /// Keep the nodes at even zero-based positions.
    Even,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    #[strum(serialize = " ")]
    Descendant,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is a
    /// direct child of element A."
    #[strum(serialize = ">")]
    Child,

    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A selector of the form 'A + B' represents an element B that
    /// immediately follows element A, where A and B share the same parent."
    #[strum(serialize = "+")]
    NextSibling,

    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A selector of the form 'A ~ B' represents an element B that follows
    /// element A (not necessarily immediately), where A and B share the
    /// same parent."
    #[strum(serialize = "~")]
    SubsequentSibling,
}

/// [§ 3.1 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    /// Lower-cased element name; `None` is the universal selector.
    pub element: Option<String>,
    /// Attribute predicates, without duplicates.
    pub attributes: Vec<AttributeSelector>,
    /// Pseudo-class predicates, without duplicates.
    pub pseudo_classes: Vec<PseudoClass>,
    /// Matched-set filters in source order.
    pub filters: Vec<SetFilter>,
    /// When the first filter bounds the result (`:first`, `:eq(n)`,
    /// `:lt(n)`), the seed search may stop once more than this many nodes
    /// were collected.
    pub limit: Option<usize>,
}

impl CompoundSelector {
    /// Whether this compound accepts any element: no name, no predicates,
    /// no filters.
    #[must_use]
    pub const fn is_universal(&self) -> bool {
        self.element.is_none()
            && self.attributes.is_empty()
            && self.pseudo_classes.is_empty()
            && self.filters.is_empty()
    }
}

/// [§ 3.1 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a sequence of one or more compound selectors
/// separated by combinators."
///
/// Example: `div.nav > ul li` parses as:
/// ```text
/// head: [div.nav]  steps: [(Child, [ul]), (Descendant, [li])]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The leftmost compound selector.
    pub head: CompoundSelector,
    /// Each following compound with the combinator that joins it to the
    /// one before it, left to right.
    pub steps: Vec<(Combinator, CompoundSelector)>,
}

impl ComplexSelector {
    /// Check if this is a single compound selector (no combinators).
    #[must_use]
    pub const fn is_simple(&self) -> bool {
        self.steps.is_empty()
    }

    /// The rightmost compound selector, the one whose nodes are returned.
    #[must_use]
    pub fn subject(&self) -> &CompoundSelector {
        self.steps.last().map_or(&self.head, |(_, compound)| compound)
    }

    /// The compound selector at `index`, counting the head as 0.
    #[must_use]
    pub fn compound(&self, index: usize) -> Option<&CompoundSelector> {
        match index {
            0 => Some(&self.head),
            i => self.steps.get(i - 1).map(|(_, compound)| compound),
        }
    }
}

/// [§ 3.2 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// A compiled selector: one or more independent chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    /// The comma-separated chains, in source order.
    pub chains: Vec<ComplexSelector>,
}

impl Selector {
    /// Compile selector text. Equivalent to [`parse_selector`].
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] at the first syntax violation.
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        parse_selector(text)
    }

    /// The trimmed source text this selector was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether this is the bare universal selector `*`.
    #[must_use]
    pub fn is_universal(&self) -> bool {
        matches!(self.chains.as_slice(), [chain] if chain.is_simple() && chain.head.is_universal())
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
