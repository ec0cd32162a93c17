//! Selector compiler, matcher and query collection for sift.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, universal, class, id and attribute selectors
//!   - Combinators: descendant, child, next-sibling, subsequent-sibling
//!   - Selector lists
//!   - Structural pseudo-classes (`:nth-child()` and friends)
//!   - `:not()`, `:has()`, `:empty`, plus the jQuery extensions `:parent`,
//!     `:header` and `:contains()`
//!   - jQuery matched-set filters (`:first`, `:last`, `:eq()`, `:lt()`,
//!     `:gt()`, `:odd`, `:even`)
//!
//! - **Selector cache**: compiled selectors are kept in a bounded LRU map
//!   keyed by their text.
//!
//! - **Query collection**: [`NodeList`], a chainable result set with
//!   jQuery-style traversal, manipulation and a state stack.
//!
//! # Not Yet Implemented
//!
//! - Pseudo-elements and namespace prefixes in selectors
//! - Specificity (selectors here only search, they never cascade)
//!
//! ```
//! use sift_css::Sift;
//!
//! let mut sift = Sift::new();
//! let (dom, doc) = sift.parse("<div><img src=a><span><img src=b></span></div>");
//! let images = sift.find(&dom, doc, "div > img").unwrap();
//! assert_eq!(images.len(), 1);
//! assert_eq!(dom.attr(images[0], "src"), Some("a"));
//! ```

pub mod cache;
pub mod engine;
pub mod matcher;
pub mod query;
pub mod selector;
pub mod set;

pub use cache::{CacheStats, SelectorCache};
pub use engine::Sift;
pub use matcher::Matcher;
pub use query::{Content, NodeList, Target};
pub use selector::{Selector, SelectorError, parse_selector};
pub use set::NodeSet;
