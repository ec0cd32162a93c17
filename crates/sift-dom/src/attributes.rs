//! Element attributes.
//!
//! An [`AttributeSet`] is an insertion-ordered mapping from lower-cased
//! attribute name to [`Attribute`]. Order matters: it is the order the
//! attributes serialize in.

use crate::entities::{decode_entities, escape_attribute};

/// The value of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Boolean attribute written without a value (`<input disabled>`).
    Present,
    /// Attribute with a (decoded) string value.
    Text(String),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A single attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lower-cased name.
    pub name: String,
    /// Name as written in the source.
    pub name_real: String,
    /// The value.
    pub value: AttrValue,
}

impl Attribute {
    /// The value as a string; a boolean attribute reads as its own name.
    #[must_use]
    pub fn value(&self) -> &str {
        match &self.value {
            AttrValue::Present => &self.name,
            AttrValue::Text(s) => s,
        }
    }

    /// The string value, `None` for boolean attributes.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            AttrValue::Present => None,
            AttrValue::Text(s) => Some(s),
        }
    }

    /// Render as markup. Boolean attributes are bare names unless the
    /// owning document is XML.
    pub fn write_html(&self, is_xml: bool, out: &mut String) {
        out.push_str(&self.name);
        match &self.value {
            AttrValue::Present if !is_xml => {}
            AttrValue::Present => {
                out.push_str("=\"");
                out.push_str(&self.name);
                out.push('"');
            }
            AttrValue::Text(s) => {
                out.push_str("=\"");
                out.push_str(&escape_attribute(s));
                out.push('"');
            }
        }
    }
}

/// Ordered attribute list keyed by lower-cased name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    list: Vec<Attribute>,
}

impl AttributeSet {
    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.list.iter()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let lower = name.to_lowercase();
        self.list.iter().position(|a| a.name == lower)
    }

    /// Look up by case-insensitive name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.position(name).map(|i| &self.list[i])
    }

    /// Whether an attribute with this case-insensitive name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Insert or replace an attribute. Text values have character
    /// references decoded. A replaced attribute keeps its position but
    /// takes the new source spelling of the name.
    pub fn set(&mut self, name: &str, value: AttrValue) {
        let value = match value {
            AttrValue::Text(s) => AttrValue::Text(decode_entities(&s)),
            AttrValue::Present => AttrValue::Present,
        };
        match self.position(name) {
            Some(i) => {
                let attr = &mut self.list[i];
                attr.value = value;
                attr.name_real = name.to_string();
            }
            None => self.list.push(Attribute {
                name: name.to_lowercase(),
                name_real: name.to_string(),
                value,
            }),
        }
    }

    /// Remove by case-insensitive name, returning the removed attribute.
    pub fn remove(&mut self, name: &str) -> Option<Attribute> {
        self.position(name).map(|i| self.list.remove(i))
    }

    /// Render every attribute, each preceded by a space.
    pub fn write_html(&self, is_xml: bool, out: &mut String) {
        for attr in &self.list {
            out.push(' ');
            attr.write_html(is_xml, out);
        }
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}
