//! The lenient markup parser.
//!
//! Parsing alternates between a text step (everything up to the next opening
//! bracket) and a markup step dispatched on the character after the
//! bracket. A construct that fails to parse is never an error: the span
//! from its bracket to wherever the cursor stopped becomes literal text and
//! scanning resumes from there.

use sift_dom::{AttrValue, AttributeSet, Dom, MarkupConfig, NodeData, NodeId};

use crate::scanner::{SPACE, Scanner};

/// Parser state for one input buffer.
pub struct MarkupParser<'a, 'd> {
    scanner: Scanner<'a>,
    config: &'a MarkupConfig,
    dom: &'d mut Dom,
    /// The document being built.
    root: NodeId,
    /// Where new nodes are linked.
    parent: NodeId,
    /// Most recently linked node, used to merge adjacent text.
    last: Option<NodeId>,
}

impl<'a, 'd> MarkupParser<'a, 'd> {
    /// Create a parser that links nodes under `root`. `input` should already
    /// have gone through [`crate::clean_input`].
    pub fn new(dom: &'d mut Dom, root: NodeId, input: &'a str, config: &'a MarkupConfig) -> Self {
        Self {
            scanner: Scanner::new(input),
            config,
            dom,
            root,
            parent: root,
            last: None,
        }
    }

    /// Consume the whole input.
    pub fn run(mut self) {
        let bo = self.config.bracket_open;
        let bo_literal = bo.to_string();
        let mut prefix: &'a str = "";

        loop {
            let text = if self.scanner.current().is_some_and(|c| c != bo) {
                let read = self.scanner.read_until_literal(&bo_literal, false).text;
                format!("{prefix}{read}")
            } else {
                prefix.to_string()
            };
            if !text.is_empty() {
                self.push_text(text);
                prefix = "";
            }

            if self.scanner.is_at_end() {
                break;
            }

            let start = self.scanner.position();
            let parsed = match self.scanner.advance() {
                Some('/') => self.parse_closing_tag(),
                Some('!') => match self.scanner.advance() {
                    Some('-') => self.parse_comment(),
                    Some('[') => self.parse_cdata(),
                    Some('D' | 'd') => self.parse_doctype(),
                    _ => false,
                },
                Some('?') => self.parse_xml_declaration(),
                _ => self.parse_tag(),
            };
            if !parsed {
                prefix = self.scanner.slice(start, self.scanner.position());
                tracing::trace!(offset = start, len = prefix.len(), "markup fell back to text");
            }
        }
    }

    fn link(&mut self, node: NodeId) {
        let _ = self.dom.append(self.parent, &[node]);
        self.last = Some(node);
    }

    fn push_text(&mut self, text: String) {
        let text = if self.config.skip_whitespace && text.trim().is_empty() {
            " ".to_string()
        } else {
            text
        };
        if let Some(last) = self.last {
            let node = self.dom.node(last);
            if node.parent() == Some(self.parent) {
                if let NodeData::Text(existing) = &node.data {
                    let merged = format!("{existing}{text}");
                    self.dom.set_value(last, merged);
                    return;
                }
            }
        }
        let node = self.dom.create_text(text);
        self.link(node);
    }

    fn parse_tag(&mut self) -> bool {
        let bc = self.config.bracket_close;
        self.scanner.skip(SPACE);
        let name = self.scanner.read_until(&[bc, ' ', '/', '\n', '\t']);
        if name.is_empty() {
            tracing::trace!("tag name not found");
            return false;
        }

        let attrs = self.parse_attributes();

        let mut self_closed = false;
        if self.scanner.current() == Some('/') {
            self_closed = true;
            let _ = self.scanner.advance();
            self.scanner.skip(SPACE);
        }
        if self.scanner.current() != Some(bc) {
            tracing::trace!(name, "tag ended incorrectly");
            return false;
        }

        let node = self.dom.create_element(name, self_closed);
        let lower = self.dom.name(node).to_string();
        let self_closed = self_closed || self.config.is_self_closing(&lower);
        if let Some(e) = self.dom.as_element_mut(node) {
            e.self_closed = self_closed;
            e.attrs = attrs;
        }

        // Optional-closing first, then block-closes-inline; the order
        // changes recovery for ambiguous markup.
        if self.config.is_optional_closing(&lower) {
            while self
                .config
                .closes_optionally(&lower, self.dom.name(self.parent))
            {
                let Some(up) = self.dom.parent(self.parent) else {
                    break;
                };
                self.parent = up;
            }
        }
        if self.config.is_block(&lower) {
            while self.config.is_inline(self.dom.name(self.parent)) {
                let Some(up) = self.dom.parent(self.parent) else {
                    break;
                };
                self.parent = up;
            }
        }

        self.link(node);
        if !self_closed {
            self.parent = node;
        }
        let _ = self.scanner.advance();

        if !self_closed && self.config.is_contents_as_text(&lower) {
            let end = format!("{}/{lower}", self.config.bracket_open);
            let raw = self.scanner.read_until_literal(&end, false).text;
            self.dom.set_value(node, raw);
        }
        true
    }

    fn parse_attributes(&mut self) -> AttributeSet {
        let bc = self.config.bracket_close;
        let end = ['/', ' ', '\n', '\t', bc];
        let name_end = ['=', '/', ' ', '\n', '\t', bc];
        let mut attrs = AttributeSet::default();

        self.scanner.skip(SPACE);
        while !self.scanner.is_at_end() {
            let name = self.scanner.read_until(&name_end).trim_end();
            if name.is_empty() {
                break;
            }
            self.scanner.skip(SPACE);
            if self.scanner.current() != Some('=') {
                attrs.set(name, AttrValue::Present);
                if matches!(self.scanner.current(), Some(c) if c == bc || c == '/') {
                    break;
                }
                continue;
            }

            let _ = self.scanner.advance();
            self.scanner.skip(SPACE);
            let value = match self.scanner.current() {
                Some(quote @ ('"' | '\'')) => {
                    let _ = self.scanner.advance();
                    self.scanner.read_until_unescaped(quote).text
                }
                _ => self.scanner.read_until(&end).to_string(),
            };
            attrs.set(name, AttrValue::Text(value));
            self.scanner.skip(SPACE);
        }
        attrs
    }

    fn parse_closing_tag(&mut self) -> bool {
        let bo = self.config.bracket_open;
        let _ = self.scanner.advance();
        self.scanner.skip(SPACE);

        let read = self
            .scanner
            .read_until_literal(&self.config.bracket_close.to_string(), false);
        if !read.found || read.text.is_empty() {
            tracing::trace!("closing tag not terminated");
            return false;
        }
        if let Some(at) = read.text.find(bo) {
            // Back off to the stray bracket so it starts the next construct.
            let back = read.text.len() - at;
            self.scanner.set_position(self.scanner.position() - back);
            tracing::trace!("malformed closing tag");
            return false;
        }

        let tag = read
            .text
            .split(SPACE)
            .next()
            .unwrap_or_default()
            .to_lowercase();
        let parent_name = self.dom.name(self.parent).to_string();
        let mut stray = false;

        if parent_name != tag {
            let is_block = self.config.is_block(&tag);
            let grandparent = self.dom.parent(self.parent);
            if self.config.is_optional_closing(&parent_name) && is_block {
                if let Some(open) = self.find_open(&tag) {
                    self.parent = open;
                } else {
                    if let Some(up) = grandparent {
                        self.parent = up;
                    }
                    stray = true;
                }
            } else if grandparent.is_some() && is_block {
                match self.find_open(&tag) {
                    Some(open) => self.parent = open,
                    None => stray = true,
                }
            } else if let Some(up) = grandparent.filter(|&g| self.dom.name(g) == tag) {
                self.parent = up;
            } else {
                stray = true;
            }
        }

        if stray {
            tracing::trace!(tag, "stray closing tag ignored");
        } else if let Some(up) = self.dom.parent(self.parent) {
            self.parent = up;
        }
        let _ = self.scanner.advance();
        true
    }

    /// Nearest open node (the current parent included) named `tag`.
    fn find_open(&self, tag: &str) -> Option<NodeId> {
        let mut current = self.parent;
        while self.dom.name(current) != tag {
            current = self.dom.parent(current)?;
        }
        Some(current)
    }

    fn parse_comment(&mut self) -> bool {
        if self.scanner.advance() != Some('-') || self.scanner.advance().is_none() {
            tracing::trace!("incorrect comment start");
            return false;
        }
        let end = format!("--{}", self.config.bracket_close);
        let read = self.scanner.read_until_literal(&end, false);
        if !read.found {
            tracing::trace!("comment not terminated");
            return false;
        }
        let _ = self.scanner.advance_by(3);
        if !self.config.skip_comments {
            let node = self.dom.create_comment(read.text);
            self.link(node);
        }
        true
    }

    fn parse_cdata(&mut self) -> bool {
        if !self.scanner.lookahead_is(1, "CDATA[", false) {
            return false;
        }
        let _ = self.scanner.advance_by(7);
        let end = format!("]]{}", self.config.bracket_close);
        let read = self.scanner.read_until_literal(&end, true);
        if !read.found {
            tracing::trace!("CDATA section not terminated");
            return false;
        }
        let node = self.dom.create_cdata(read.text);
        self.link(node);
        let _ = self.scanner.advance_by(3);
        true
    }

    fn parse_doctype(&mut self) -> bool {
        if !self.scanner.lookahead_is(1, "OCTYPE", true) {
            return false;
        }
        let _ = self.scanner.advance_by(7);
        let read = self
            .scanner
            .read_until_literal(&self.config.bracket_close.to_string(), true);
        if !read.found {
            tracing::trace!("DOCTYPE not terminated");
            return false;
        }
        if read.text.to_lowercase().contains("xhtml") {
            self.dom.set_xml(self.root, true);
        }
        let node = self.dom.create_doctype(read.text.trim());
        self.link(node);
        let _ = self.scanner.advance();
        true
    }

    fn parse_xml_declaration(&mut self) -> bool {
        if !self.scanner.lookahead_is(1, "xml", true) {
            return false;
        }
        let _ = self.scanner.advance_by(4);
        let end = format!("?{}", self.config.bracket_close);
        let read = self.scanner.read_until_literal(&end, true);
        if !read.found {
            tracing::trace!("XML declaration not terminated");
            return false;
        }
        self.dom.set_xml(self.root, true);
        let node = self.dom.create_xml_declaration(read.text);
        self.link(node);
        let _ = self.scanner.advance_by(2);
        true
    }
}
