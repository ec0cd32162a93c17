//! Markup configuration.
//!
//! A [`MarkupConfig`] is passed explicitly to the parser, the serializer and
//! text extraction. Two parses with different configurations never
//! interfere.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

const SELF_CLOSING: &[&str] = &[
    "area", "base", "basefont", "br", "embed", "hr", "image", "img", "input", "link", "meta",
    "param",
];

const INLINE: &[&str] = &[
    "a", "abbr", "acronym", "b", "basefont", "bdo", "big", "br", "cite", "code", "dfn", "em",
    "font", "i", "input", "kbd", "label", "q", "s", "samp", "select", "small", "span", "strike",
    "strong", "sub", "sup", "textarea", "tt", "u", "var", "del", "ins",
];

const BLOCK: &[&str] = &[
    "document",
    "address",
    "blockquote",
    "center",
    "div",
    "fieldset",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "menu",
    "p",
    "pre",
    "table",
    "ol",
    "ul",
    "li",
    "applet",
    "button",
    "iframe",
    "object",
];

const HEADERS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

const CONTENTS_AS_TEXT: &[&str] = &["script", "style"];

fn name_set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|&n| n.to_string()).collect()
}

fn default_optional_closing() -> BTreeMap<String, BTreeSet<String>> {
    let mut map = BTreeMap::from([
        ("tr".to_string(), name_set(&["tr", "td", "th"])),
        ("th".to_string(), name_set(&["th"])),
        ("td".to_string(), name_set(&["td"])),
        ("li".to_string(), name_set(&["li"])),
        ("dt".to_string(), name_set(&["dt", "dd"])),
        ("dd".to_string(), name_set(&["dd", "dt"])),
        ("dl".to_string(), name_set(&["dd", "dt"])),
        ("p".to_string(), name_set(&["p"])),
        ("nobr".to_string(), name_set(&["nobr"])),
    ]);
    // A header implicitly closes any other open header.
    for &h in HEADERS {
        let others = HEADERS.iter().copied().filter(|&o| o != h).collect::<Vec<_>>();
        let _ = map.insert(h.to_string(), name_set(&others));
    }
    map
}

/// Bracket characters, tag classification tables and parse toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Character that opens a tag.
    pub bracket_open: char,
    /// Character that closes a tag.
    pub bracket_close: char,
    /// Tags that never have children (`<br>`).
    pub self_closing: BTreeSet<String>,
    /// Tags that a block tag implicitly closes.
    pub inline: BTreeSet<String>,
    /// Tags that close open inline tags and end a text line.
    pub block: BTreeSet<String>,
    /// Trigger tag mapped to the set of open tags it implicitly closes
    /// (`li` closes an open `li`).
    pub optional_closing: BTreeMap<String, BTreeSet<String>>,
    /// Tags whose contents are captured verbatim as the element value.
    pub contents_as_text: BTreeSet<String>,
    /// Collapse whitespace-only text runs to a single space and tidy
    /// extracted text.
    pub skip_whitespace: bool,
    /// Drop comments while parsing.
    pub skip_comments: bool,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            bracket_open: '<',
            bracket_close: '>',
            self_closing: name_set(SELF_CLOSING),
            inline: name_set(INLINE),
            block: name_set(BLOCK),
            optional_closing: default_optional_closing(),
            contents_as_text: name_set(CONTENTS_AS_TEXT),
            skip_whitespace: true,
            skip_comments: false,
        }
    }
}

impl MarkupConfig {
    /// A preset for simple BBCode: square brackets, `quote` as the only
    /// block tag, `b`/`i`/`u` inline and nothing self-closing.
    #[must_use]
    pub fn bbcode() -> Self {
        Self {
            bracket_open: '[',
            bracket_close: ']',
            self_closing: BTreeSet::new(),
            inline: name_set(&["b", "i", "u"]),
            block: name_set(&["quote"]),
            ..Self::default()
        }
    }

    /// Whether `name` (lower-cased) is self-closing.
    #[must_use]
    pub fn is_self_closing(&self, name: &str) -> bool {
        self.self_closing.contains(name)
    }

    /// Whether `name` (lower-cased) is an inline tag.
    #[must_use]
    pub fn is_inline(&self, name: &str) -> bool {
        self.inline.contains(name)
    }

    /// Whether `name` (lower-cased) is a block tag.
    #[must_use]
    pub fn is_block(&self, name: &str) -> bool {
        self.block.contains(name)
    }

    /// Whether opening `trigger` implicitly closes an open `open` tag.
    #[must_use]
    pub fn closes_optionally(&self, trigger: &str, open: &str) -> bool {
        self.optional_closing
            .get(trigger)
            .is_some_and(|set| set.contains(open))
    }

    /// Whether `name` is a trigger in the optional-closing table.
    #[must_use]
    pub fn is_optional_closing(&self, name: &str) -> bool {
        self.optional_closing.contains_key(name)
    }

    /// Whether the contents of `name` are captured verbatim.
    #[must_use]
    pub fn is_contents_as_text(&self, name: &str) -> bool {
        self.contents_as_text.contains(name)
    }
}
