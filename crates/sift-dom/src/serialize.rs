//! Markup and text output.
//!
//! Serialization uses the configured bracket pair for every construct, so
//! a tree parsed with BBCode brackets serializes back to BBCode.

use crate::{Dom, MarkupConfig, NodeData, NodeId};

impl Dom {
    /// Markup of `id` including the node itself. A Document serializes as
    /// its children.
    #[must_use]
    pub fn outer_html(&self, id: NodeId, config: &MarkupConfig) -> String {
        let mut out = String::new();
        self.write_outer(id, config, &mut out);
        out
    }

    /// Markup of the children of `id`. An element without child nodes
    /// yields its raw captured contents.
    #[must_use]
    pub fn inner_html(&self, id: NodeId, config: &MarkupConfig) -> String {
        let mut out = String::new();
        self.write_inner(id, config, &mut out);
        out
    }

    fn write_inner(&self, id: NodeId, config: &MarkupConfig, out: &mut String) {
        let node = self.node(id);
        if node.nodes.is_empty() {
            if let NodeData::Element(e) = &node.data {
                out.push_str(&e.raw);
            }
            return;
        }
        for &child in &node.nodes {
            self.write_outer(child, config, out);
        }
    }

    fn write_outer(&self, id: NodeId, config: &MarkupConfig, out: &mut String) {
        let (bo, bc) = (config.bracket_open, config.bracket_close);
        match &self.node(id).data {
            NodeData::Document(_) => self.write_inner(id, config, out),
            NodeData::Element(e) => {
                out.push(bo);
                out.push_str(&e.name);
                e.attrs.write_html(self.is_xml(id), out);
                if e.self_closed {
                    out.push_str(" /");
                    out.push(bc);
                    return;
                }
                out.push(bc);
                self.write_inner(id, config, out);
                out.push(bo);
                out.push('/');
                out.push_str(&e.name);
                out.push(bc);
            }
            NodeData::Text(s) => out.push_str(s),
            NodeData::Cdata(s) => {
                out.push(bo);
                out.push_str("![CDATA[");
                out.push_str(s);
                out.push_str("]]");
                out.push(bc);
            }
            NodeData::Comment(s) => {
                out.push(bo);
                out.push_str("!--");
                out.push_str(s);
                out.push_str("--");
                out.push(bc);
            }
            NodeData::Doctype(s) => {
                out.push(bo);
                out.push_str("!DOCTYPE ");
                out.push_str(s);
                out.push(bc);
            }
            NodeData::XmlDeclaration(s) => {
                out.push(bo);
                out.push_str("?xml");
                out.push_str(s);
                out.push('?');
                out.push(bc);
            }
        }
    }

    /// Text content of `id`.
    ///
    /// A self-closed `br` reads as a newline and every block element is
    /// followed by one. With `skip_whitespace` the result is trimmed, each
    /// line loses surrounding spaces and tabs, and runs of three or more
    /// newlines collapse to two.
    #[must_use]
    pub fn text(&self, id: NodeId, config: &MarkupConfig) -> String {
        let mut out = String::new();
        match &self.node(id).data {
            NodeData::Text(s) | NodeData::Cdata(s) => out.push_str(s),
            NodeData::Element(_) | NodeData::Document(_) => self.write_text(id, config, &mut out),
            NodeData::Comment(_) | NodeData::Doctype(_) | NodeData::XmlDeclaration(_) => {}
        }
        if config.skip_whitespace {
            tidy_text(&out)
        } else {
            out
        }
    }

    fn write_text(&self, id: NodeId, config: &MarkupConfig, out: &mut String) {
        for &child in &self.node(id).nodes {
            match &self.node(child).data {
                NodeData::Text(s) | NodeData::Cdata(s) => out.push_str(s),
                NodeData::Element(e) => {
                    if e.name == "br" && e.self_closed {
                        out.push('\n');
                    } else {
                        self.write_text(child, config, out);
                    }
                    if config.is_block(&e.name) {
                        out.push('\n');
                    }
                }
                _ => {}
            }
        }
    }
}

fn tidy_text(text: &str) -> String {
    let lines: Vec<&str> = text
        .trim()
        .split('\n')
        .map(|line| line.trim_matches([' ', '\t']))
        .collect();
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tidy_text_collapses_blank_lines() {
        assert_eq!(tidy_text("  a \n\n\n\n\t b\t\n"), "a\n\nb");
        assert_eq!(tidy_text("a\n\nb"), "a\n\nb");
        assert_eq!(tidy_text(""), "");
    }

    #[test]
    fn test_bracket_pair_used_for_every_construct() {
        let mut dom = Dom::new();
        let config = MarkupConfig::bbcode();
        let doc = dom.create_document();
        let quote = dom.create_element("quote", false);
        let comment = dom.create_comment(" c ");
        let cdata = dom.create_cdata("x");
        let _ = dom.append(doc, &[quote, comment, cdata]);
        assert_eq!(
            dom.outer_html(doc, &config),
            "[quote][/quote][!-- c --][![CDATA[x]]]"
        );
    }

    #[test]
    fn test_raw_contents_serialized_without_children() {
        let mut dom = Dom::new();
        let config = MarkupConfig::default();
        let script = dom.create_element("script", false);
        dom.set_value(script, "if (a < b) {}");
        assert_eq!(
            dom.outer_html(script, &config),
            "<script>if (a < b) {}</script>"
        );
    }
}
