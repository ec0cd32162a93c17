//! Selector compiler.
//!
//! [§ 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar)
//!
//! Selector text is compiled with the same [`Scanner`] the markup parser
//! uses. Compilation is strict: the first violation is reported with its
//! character position in the trimmed selector.

use sift_html::scanner::{SPACE, Scanner};

use super::{
    AttributeSelector, Combinator, ComplexSelector, CompoundSelector, Nth, PseudoClass, Selector,
    SetFilter,
};

/// Characters that end an element, class or id name.
const NAME_END: &[char] = &['.', '#', '[', ':', ',', ' ', '\n', '\t', '~', '+', '>'];

/// [`NAME_END`] plus the opening parenthesis of a functional pseudo-class.
const PSEUDO_NAME_END: &[char] = &['.', '#', '[', ':', ',', ' ', '\n', '\t', '~', '+', '>', '('];

/// Characters that end an attribute name inside `[...]`.
const ATTRIBUTE_NAME_END: &[char] = &['=', ']', '*', '~', '$', '!', '^', '|'];

/// A syntax error in selector text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selector is empty or only whitespace.
    #[error("expected a valid selector expression")]
    Empty,
    /// `.` not followed by a class name.
    #[error("expected a class name at position {position}")]
    ClassName {
        /// Character offset of the violation.
        position: usize,
    },
    /// `#` not followed by an id.
    #[error("expected an id at position {position}")]
    Id {
        /// Character offset of the violation.
        position: usize,
    },
    /// `[` not followed by an attribute name.
    #[error("expected an attribute name at position {position}")]
    AttributeName {
        /// Character offset of the violation.
        position: usize,
    },
    /// An attribute operator missing its `=`.
    #[error("expected '=' at position {position}")]
    Equals {
        /// Character offset of the violation.
        position: usize,
    },
    /// A quoted attribute value without its closing quote.
    #[error("expected a closing quote at position {position}")]
    ClosingQuote {
        /// Character offset of the violation.
        position: usize,
    },
    /// An attribute selector without its closing `]`.
    #[error("expected ']' at position {position}")]
    ClosingBracket {
        /// Character offset of the violation.
        position: usize,
    },
    /// `:` not followed by a pseudo-class name.
    #[error("expected a pseudo-class name at position {position}")]
    PseudoClassName {
        /// Character offset of the violation.
        position: usize,
    },
    /// A functional pseudo-class argument without its closing `)`.
    #[error("expected ')' at position {position}")]
    ClosingParenthesis {
        /// Character offset of the violation.
        position: usize,
    },
}

/// Compile selector text into a [`Selector`].
///
/// # Errors
///
/// Returns a [`SelectorError`] for empty input and for truncated class, id,
/// attribute or pseudo-class syntax.
pub fn parse_selector(text: &str) -> Result<Selector, SelectorError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SelectorError::Empty);
    }
    let chains = SelectorParser {
        scanner: Scanner::new(text),
    }
    .parse_list()?;
    Ok(Selector {
        source: text.to_string(),
        chains,
    })
}

struct SelectorParser<'a> {
    scanner: Scanner<'a>,
}

impl SelectorParser<'_> {
    /// Character offset of the cursor.
    fn position(&self) -> usize {
        self.scanner
            .slice(0, self.scanner.position())
            .chars()
            .count()
    }

    fn parse_list(&mut self) -> Result<Vec<ComplexSelector>, SelectorError> {
        let mut chains = Vec::new();
        loop {
            chains.push(self.parse_chain()?);
            if self.scanner.is_at_end() {
                return Ok(chains);
            }
        }
    }

    /// Parse compound selectors joined by combinators, up to a `,` or the
    /// end of input. A trailing `,` is consumed.
    fn parse_chain(&mut self) -> Result<ComplexSelector, SelectorError> {
        let head = self.parse_compound()?;
        let mut chain = ComplexSelector {
            head,
            steps: Vec::new(),
        };
        loop {
            if self.scanner.is_at_end() {
                return Ok(chain);
            }
            self.scanner.skip(SPACE);
            let combinator = match self.scanner.current() {
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(',') => {
                    let _ = self.scanner.advance();
                    self.scanner.skip(SPACE);
                    return Ok(chain);
                }
                _ => Combinator::Descendant,
            };
            if combinator != Combinator::Descendant {
                let _ = self.scanner.advance();
                self.scanner.skip(SPACE);
            }
            let compound = self.parse_compound()?;
            chain.steps.push((combinator, compound));
        }
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut compound = CompoundSelector::default();
        let mut pseudo_keys: Vec<String> = Vec::new();

        let name = self.scanner.read_until(NAME_END);
        if !name.is_empty() && name != "*" {
            compound.element = Some(name.to_lowercase());
        }

        loop {
            match self.scanner.current() {
                // [§ 6.6 Class selectors](https://www.w3.org/TR/selectors-4/#class-html)
                // Equivalent of [class~=value].
                Some('.') => {
                    let _ = self.scanner.advance();
                    let class = self.scanner.read_until(NAME_END);
                    if class.is_empty() {
                        return Err(SelectorError::ClassName {
                            position: self.position(),
                        });
                    }
                    push_unique(
                        &mut compound.attributes,
                        AttributeSelector::Includes("class".to_string(), class.to_string()),
                    );
                }

                // [§ 6.7 ID selectors](https://www.w3.org/TR/selectors-4/#id-selectors)
                // Equivalent of [id=value].
                Some('#') => {
                    let _ = self.scanner.advance();
                    let id = self.scanner.read_until(NAME_END);
                    if id.is_empty() {
                        return Err(SelectorError::Id {
                            position: self.position(),
                        });
                    }
                    push_unique(
                        &mut compound.attributes,
                        AttributeSelector::Equals("id".to_string(), id.to_string()),
                    );
                }

                Some('[') => {
                    let attribute = self.parse_attribute()?;
                    push_unique(&mut compound.attributes, attribute);
                }

                Some(':') => self.parse_pseudo(&mut compound, &mut pseudo_keys)?,

                _ => return Ok(compound),
            }
        }
    }

    /// [§ 6.1 Attribute presence and value selectors](https://www.w3.org/TR/selectors-4/#attribute-representation)
    ///
    /// Parses `[name]` or `[name op value]` with the cursor on `[`.
    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        let _ = self.scanner.advance();
        let name = self.scanner.read_until(ATTRIBUTE_NAME_END);
        if name.is_empty() {
            return Err(SelectorError::AttributeName {
                position: self.position(),
            });
        }
        let name = name.to_lowercase();

        let mut operator = None;
        let mut value = String::new();
        if self.scanner.current() != Some(']') {
            let prefix = match self.scanner.current() {
                Some('=') => None,
                other => {
                    if self.scanner.advance() != Some('=') {
                        return Err(SelectorError::Equals {
                            position: self.position(),
                        });
                    }
                    other
                }
            };
            operator = Some(prefix);
            let _ = self.scanner.advance();

            match self.scanner.current() {
                Some(quote @ ('"' | '\'')) => {
                    let _ = self.scanner.advance();
                    let read = self.scanner.read_until_unescaped(quote);
                    if !read.found {
                        return Err(SelectorError::ClosingQuote {
                            position: self.position(),
                        });
                    }
                    if self.scanner.current() != Some(']') {
                        return Err(SelectorError::ClosingBracket {
                            position: self.position(),
                        });
                    }
                    value = read.text;
                }
                _ => {
                    let read = self.scanner.read_until_literal("]", true);
                    if !read.found {
                        return Err(SelectorError::ClosingBracket {
                            position: self.position(),
                        });
                    }
                    value = read.text.to_string();
                }
            }
        }
        let _ = self.scanner.advance();

        Ok(match operator {
            None => AttributeSelector::Exists(name),
            Some(None) => AttributeSelector::Equals(name, value),
            Some(Some('!')) => AttributeSelector::NotEquals(name, value),
            Some(Some('~')) => AttributeSelector::Includes(name, value),
            Some(Some('|')) => AttributeSelector::DashMatch(name, value),
            Some(Some('^')) => AttributeSelector::PrefixMatch(name, value),
            Some(Some('$')) => AttributeSelector::SuffixMatch(name, value),
            Some(_) => AttributeSelector::SubstringMatch(name, value),
        })
    }

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    ///
    /// Parses `:name` or `:name(argument)` with the cursor on `:`. Matched-set
    /// filters go to `compound.filters`; everything else is a per-node
    /// predicate, deduplicated by name and argument.
    fn parse_pseudo(
        &mut self,
        compound: &mut CompoundSelector,
        keys: &mut Vec<String>,
    ) -> Result<(), SelectorError> {
        let _ = self.scanner.advance();
        let name = self.scanner.read_until(PSEUDO_NAME_END);
        if name.is_empty() {
            return Err(SelectorError::PseudoClassName {
                position: self.position(),
            });
        }
        let name = name.to_lowercase();

        let argument = if self.scanner.current() == Some('(') {
            let _ = self.scanner.advance();
            let read = self.scanner.read_until_unescaped(')');
            if !read.found {
                return Err(SelectorError::ClosingParenthesis {
                    position: self.position(),
                });
            }
            read.text
        } else {
            String::new()
        };

        if let Some(filter) = set_filter(&name, &argument) {
            if compound.filters.is_empty() {
                compound.limit = match filter {
                    SetFilter::First => Some(0),
                    SetFilter::Eq(n) | SetFilter::Lt(n) => usize::try_from(n).ok(),
                    _ => None,
                };
            }
            compound.filters.push(filter);
            return Ok(());
        }

        let key = format!("{name}={argument}");
        if keys.contains(&key) {
            return Ok(());
        }
        keys.push(key);

        let nested = |argument: &str| -> Result<Box<Selector>, SelectorError> {
            let argument = if argument.trim().is_empty() { "*" } else { argument };
            parse_selector(argument).map(Box::new)
        };

        let pseudo = match name.as_str() {
            "empty" => PseudoClass::Empty,
            "parent" => PseudoClass::Parent,
            "header" => PseudoClass::Header,
            "contains" => PseudoClass::Contains(argument),
            "not" => PseudoClass::Not(nested(&argument)?),
            "has" => PseudoClass::Has(nested(&argument)?),
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "only-child" => PseudoClass::OnlyChild,
            "nth-child" => PseudoClass::NthChild(Nth::parse(&argument)),
            "nth-last-child" => PseudoClass::NthLastChild(Nth::parse(&argument)),
            "first-of-type" => PseudoClass::FirstOfType,
            "last-of-type" => PseudoClass::LastOfType,
            "only-of-type" => PseudoClass::OnlyOfType,
            "nth-of-type" => PseudoClass::NthOfType(Nth::parse(&argument)),
            "nth-last-of-type" => PseudoClass::NthLastOfType(Nth::parse(&argument)),
            _ => {
                sift_common::warn_once(
                    "selector",
                    &format!("unsupported pseudo-class ':{name}' matches every node"),
                );
                PseudoClass::Unknown(name)
            }
        };
        compound.pseudo_classes.push(pseudo);
        Ok(())
    }
}

fn push_unique(attributes: &mut Vec<AttributeSelector>, attribute: AttributeSelector) {
    if !attributes.contains(&attribute) {
        attributes.push(attribute);
    }
}

/// Map a pseudo-class name to a matched-set filter. Arguments that are not
/// integers read as 0.
fn set_filter(name: &str, argument: &str) -> Option<SetFilter> {
    Some(match name {
        "first" => SetFilter::First,
        "last" => SetFilter::Last,
        "eq" => SetFilter::Eq(leading_integer(argument)),
        "lt" => SetFilter::Lt(leading_integer(argument)),
        "gt" => SetFilter::Gt(leading_integer(argument)),
        "odd" => SetFilter::Odd,
        "even" => SetFilter::Even,
        _ => return None,
    })
}

/// The integer at the start of `s` after leading whitespace, or 0.
/// Out-of-range values saturate at the `i64` bounds.
fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0_i64, |acc, digit| {
            let digit = i64::from(digit - b'0');
            let acc = acc.saturating_mul(10);
            if negative {
                acc.saturating_sub(digit)
            } else {
                acc.saturating_add(digit)
            }
        })
}
