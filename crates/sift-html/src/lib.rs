//! Lenient markup parsing for sift.
//!
//! Parsing is total: any string produces a tree. Malformed constructs
//! degrade to text instead of failing.
//!
//! ```
//! use sift_dom::MarkupConfig;
//!
//! let config = MarkupConfig::default();
//! let (dom, doc) = sift_html::parse("<p>one<p>two", &config);
//! assert_eq!(dom.outer_html(doc, &config), "<p>one</p><p>two</p>");
//! ```

mod parser;
pub mod scanner;

use sift_dom::{Dom, MarkupConfig, NodeId};

pub use parser::MarkupParser;
pub use scanner::{ReadUntil, Scanner};

/// Prepare raw input for parsing: trim surrounding whitespace, normalize
/// line endings to `\n`, and strip ASCII control characters other than
/// newline and tab, including their percent-encoded forms.
#[must_use]
pub fn clean_input(input: &str) -> String {
    let trimmed = input.trim_matches([' ', '\t', '\n', '\r', '\0', '\x0B']);
    let normalized = trimmed.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(normalized.len());
    let mut chars = normalized.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_ascii_control() && c != '\n' && c != '\t' {
            continue;
        }
        if c == '%' {
            let mut ahead = chars.clone();
            if let (Some(hi), Some(lo)) = (ahead.next(), ahead.next()) {
                if is_encoded_control(hi, lo) {
                    let _ = chars.next();
                    let _ = chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// `%00`-`%08`, `%0b`, `%0c`, `%0e`, `%0f` and `%10`-`%1f`.
const fn is_encoded_control(hi: char, lo: char) -> bool {
    match hi {
        '0' => matches!(lo, '0'..='8' | 'b' | 'c' | 'e' | 'f'),
        '1' => matches!(lo, '0'..='9' | 'a'..='f'),
        _ => false,
    }
}

/// Parse `input` into a new document inside `dom`.
pub fn parse_document(dom: &mut Dom, input: &str, config: &MarkupConfig) -> NodeId {
    let doc = dom.create_document();
    let input = clean_input(input);
    tracing::debug!(len = input.len(), "parsing markup");
    if !input.is_empty() {
        MarkupParser::new(dom, doc, &input, config).run();
    }
    tracing::debug!(nodes = dom.len(), "parsed markup");
    doc
}

/// Parse `input` into a fresh arena.
#[must_use]
pub fn parse(input: &str, config: &MarkupConfig) -> (Dom, NodeId) {
    let mut dom = Dom::new();
    let doc = parse_document(&mut dom, input, config);
    (dom, doc)
}

/// Parse `markup` and return its top-level nodes, detached and ready to be
/// inserted anywhere in `dom`.
pub fn parse_fragment(dom: &mut Dom, markup: &str, config: &MarkupConfig) -> Vec<NodeId> {
    let doc = parse_document(dom, markup, config);
    dom.detach_children(doc)
}

/// Replace the children of `id` with the parsed `markup`. No-op on nodes
/// that cannot hold children.
pub fn set_inner_html(dom: &mut Dom, id: NodeId, markup: &str, config: &MarkupConfig) {
    if !dom.get(id).is_some_and(sift_dom::Node::is_container) {
        return;
    }
    dom.clean_children(id);
    let nodes = parse_fragment(dom, markup, config);
    let _ = dom.append(id, &nodes);
}
