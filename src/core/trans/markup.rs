//! A lenient JSX-like markup parser.
//!
//! Only what is needed to flatten translation components is modelled:
//! elements, fragments, text, expression containers and attributes. Anything
//! the parser does not understand is reported as a [`MarkupError`] so the
//! caller can skip the region.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::core::scan;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Text with entities decoded but whitespace untouched.
    Text(String),
    /// Source of an expression container, without the braces.
    Expression(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// `<Trans count>`
    Flag,
    Text(String),
    /// Source inside `{...}`.
    Expression(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Empty for fragments (`<>...</>`).
    pub name: String,
    pub attributes: Vec<(String, AttrValue)>,
    pub children: Vec<Node>,
    pub self_closing: bool,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|(attribute, _)| attribute == name)
            .map(|(_, value)| value)
    }

    pub fn is_fragment(&self) -> bool {
        self.name.is_empty()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkupError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("expected '{expected}' at offset {offset}")]
    Expected { expected: char, offset: usize },
    #[error("malformed attribute at offset {0}")]
    MalformedAttribute(usize),
    #[error("unbalanced expression container at offset {0}")]
    UnbalancedExpression(usize),
    #[error("closing tag </{found}> does not match <{expected}>")]
    MismatchedClose { expected: String, found: String },
}

/// Parse the element starting at `start`, which must point at `<`.
///
/// Returns the element and the offset just past it.
pub fn parse_element(text: &str, start: usize) -> Result<(Element, usize), MarkupError> {
    let mut cursor = Cursor { text, pos: start };
    let element = cursor.element()?;
    Ok((element, cursor.pos))
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn expect(&mut self, expected: char) -> Result<(), MarkupError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(_) => Err(MarkupError::Expected {
                expected,
                offset: self.pos,
            }),
            None => Err(MarkupError::UnexpectedEof),
        }
    }

    fn name(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '$' | '.' | '-' | ':')))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// Body of `{...}` at the cursor; the cursor moves past the closing brace.
    fn expression(&mut self) -> Result<&'a str, MarkupError> {
        let open = self.pos;
        let close = scan::find_closing(self.text, open).ok_or(MarkupError::UnbalancedExpression(open))?;
        self.pos = close + 1;
        Ok(&self.text[open + 1..close])
    }

    fn element(&mut self) -> Result<Element, MarkupError> {
        self.expect('<')?;
        let name = self.name().to_string();
        let mut attributes = Vec::new();

        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok(Element {
                    name,
                    attributes,
                    children: Vec::new(),
                    self_closing: true,
                });
            }
            match self.peek() {
                None => return Err(MarkupError::UnexpectedEof),
                Some('>') => {
                    self.pos += 1;
                    break;
                }
                // `{...props}` spreads carry nothing readable.
                Some('{') => {
                    self.expression()?;
                }
                Some(_) => attributes.push(self.attribute()?),
            }
        }

        let children = self.children(&name)?;
        Ok(Element {
            name,
            attributes,
            children,
            self_closing: false,
        })
    }

    fn attribute(&mut self) -> Result<(String, AttrValue), MarkupError> {
        let start = self.pos;
        let name = self.name().to_string();
        if name.is_empty() {
            return Err(MarkupError::MalformedAttribute(start));
        }

        self.skip_whitespace();
        if self.peek() != Some('=') {
            return Ok((name, AttrValue::Flag));
        }
        self.pos += 1;
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let body = &self.rest()[1..];
                let end = body.find(quote).ok_or(MarkupError::UnexpectedEof)?;
                self.pos += end + 2;
                AttrValue::Text(decode_entities(&body[..end]))
            }
            Some('{') => AttrValue::Expression(self.expression()?.to_string()),
            Some(_) => return Err(MarkupError::MalformedAttribute(start)),
            None => return Err(MarkupError::UnexpectedEof),
        };
        Ok((name, value))
    }

    fn children(&mut self, parent: &str) -> Result<Vec<Node>, MarkupError> {
        let mut children = Vec::new();

        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Err(MarkupError::UnexpectedEof);
            }

            if rest.starts_with("</") {
                self.pos += 2;
                self.skip_whitespace();
                let found = self.name().to_string();
                self.skip_whitespace();
                self.expect('>')?;
                if found != parent {
                    return Err(MarkupError::MismatchedClose {
                        expected: parent.to_string(),
                        found,
                    });
                }
                return Ok(children);
            }

            match self.peek() {
                Some('<') => children.push(Node::Element(self.element()?)),
                Some('{') => children.push(Node::Expression(self.expression()?.to_string())),
                _ => {
                    let len = rest.find(['<', '{']).unwrap_or(rest.len());
                    self.pos += len;
                    children.push(Node::Text(decode_entities(&rest[..len])));
                }
            }
        }
    }
}

static ENTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([a-zA-Z][a-zA-Z0-9]{1,7}));").unwrap());

/// Decode numeric and common named HTML entities. Unknown entities are kept.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITY_REGEX
        .replace_all(text, |caps: &Captures| {
            let decoded = if let Some(decimal) = caps.get(1) {
                decimal.as_str().parse().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else {
                caps.get(3).and_then(|name| named_entity(name.as_str()))
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "hellip" => '…',
        "mdash" => '—',
        "ndash" => '–',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "laquo" => '«',
        "raquo" => '»',
        "bull" => '•',
        "middot" => '·',
        "times" => '×',
        "euro" => '€',
        _ => return None,
    };
    Some(decoded)
}
