// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small selector engine.
//!
//! Supported grammar:
//!
//! - selector lists: `a, b`
//! - descendant combinators: `ul li.active`
//! - compound parts: `tag`, `*`, `.class`, `#id`, `[attr]`, `[attr=value]`
//!   (values may be bare or quoted with `"` or `'`)
//!
//! Child, sibling, and pseudo-class selectors are not supported and fail to parse.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use smallvec::SmallVec;

use crate::document::Document;
use crate::types::{Element, ElementId};

/// Error returned when a selector fails to parse.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The input was blank.
    #[error("selector is empty")]
    Empty,
    /// A character that cannot appear at this point.
    #[error("unexpected `{ch}` at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Byte offset into the input.
        offset: usize,
    },
    /// The input ended where more was required.
    #[error("selector ends unexpectedly")]
    UnexpectedEnd,
    /// An attribute selector or quoted value was never closed.
    #[error("attribute selector opened at offset {offset} is not closed")]
    UnterminatedAttribute {
        /// Byte offset of the opening `[`.
        offset: usize,
    },
}

/// A parsed selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    alternatives: SmallVec<[Complex; 2]>,
    source: String,
}

/// Compounds joined by descendant combinators, outermost first.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: SmallVec<[String; 2]>,
    attributes: SmallVec<[AttrMatch; 1]>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum AttrMatch {
    Present(String),
    Equals(String, String),
}

impl Selector {
    /// Parse a selector list.
    ///
    /// ```
    /// use understory_element_tree::Selector;
    ///
    /// let sel = Selector::parse("ul li.active, input[name=q]").unwrap();
    /// assert_eq!(sel.as_str(), "ul li.active, input[name=q]");
    /// assert!(Selector::parse("li > a").is_err());
    /// ```
    pub fn parse(src: &str) -> Result<Self, SelectorError> {
        if src.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut parser = Parser { src, pos: 0 };
        let alternatives = parser.list()?;
        Ok(Self {
            alternatives,
            source: src.trim().to_string(),
        })
    }

    /// Build a selector matching elements that carry any of the given classes.
    ///
    /// An empty input yields a selector that matches nothing.
    pub fn any_class<'a>(classes: impl IntoIterator<Item = &'a str>) -> Self {
        let mut alternatives = SmallVec::new();
        let mut source = String::new();
        for class in classes {
            if !source.is_empty() {
                source.push_str(", ");
            }
            source.push('.');
            source.push_str(class);
            let mut compound = Compound::default();
            compound.classes.push(class.to_string());
            alternatives.push(Complex {
                compounds: alloc::vec![compound],
            });
        }
        Self {
            alternatives,
            source,
        }
    }

    /// The selector text, trimmed.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if the live element `id` matches any alternative.
    pub fn matches(&self, doc: &Document, id: ElementId) -> bool {
        self.alternatives.iter().any(|c| c.matches(doc, id))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Complex {
    fn matches(&self, doc: &Document, id: ElementId) -> bool {
        let Some((subject, ancestors)) = self.compounds.split_last() else {
            return false;
        };
        if !doc.element(id).is_some_and(|el| subject.matches(el)) {
            return false;
        }
        // Descendant-only chains can be matched greedily against the nearest ancestor.
        let mut cursor = doc.parent_of(id);
        for compound in ancestors.iter().rev() {
            loop {
                let Some(candidate) = cursor else {
                    return false;
                };
                cursor = doc.parent_of(candidate);
                if doc.element(candidate).is_some_and(|el| compound.matches(el)) {
                    break;
                }
            }
        }
        true
    }
}

impl Compound {
    fn matches(&self, el: &Element) -> bool {
        if let Some(tag) = &self.tag
            && !tag.eq_ignore_ascii_case(&el.tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && el.attributes.get("id") != Some(id)
        {
            return false;
        }
        self.classes.iter().all(|c| el.has_class(c))
            && self.attributes.iter().all(|a| match a {
                AttrMatch::Present(name) => el.attributes.contains_key(name.as_str()),
                AttrMatch::Equals(name, value) => el.attributes.get(name.as_str()) == Some(value),
            })
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(ch) => SelectorError::UnexpectedChar {
                ch,
                offset: self.pos,
            },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn attr_error(&self, open: usize) -> SelectorError {
        match self.peek() {
            Some(ch) => SelectorError::UnexpectedChar {
                ch,
                offset: self.pos,
            },
            None => SelectorError::UnterminatedAttribute { offset: open },
        }
    }

    fn ident(&mut self) -> Option<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        (self.pos > start).then(|| self.src[start..self.pos].to_string())
    }

    fn list(&mut self) -> Result<SmallVec<[Complex; 2]>, SelectorError> {
        let mut out = SmallVec::new();
        loop {
            self.skip_ws();
            out.push(self.complex()?);
            // `complex` only returns at a comma or at the end.
            if self.bump().is_none() {
                return Ok(out);
            }
        }
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        let mut compounds = Vec::new();
        loop {
            compounds.push(self.compound()?);
            let spaced = self.skip_ws();
            match self.peek() {
                None | Some(',') => return Ok(Complex { compounds }),
                Some(_) if spaced => {}
                Some(_) => return Err(self.unexpected()),
            }
        }
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let start = self.pos;
        let mut compound = Compound::default();
        if self.peek() == Some('*') {
            self.bump();
        } else if let Some(tag) = self.ident() {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        loop {
            match self.peek() {
                Some('.') => {
                    self.bump();
                    let class = self.ident().ok_or_else(|| self.unexpected())?;
                    compound.classes.push(class);
                }
                Some('#') => {
                    self.bump();
                    compound.id = Some(self.ident().ok_or_else(|| self.unexpected())?);
                }
                Some('[') => {
                    let attr = self.attribute()?;
                    compound.attributes.push(attr);
                }
                _ => break,
            }
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<AttrMatch, SelectorError> {
        let open = self.pos;
        self.bump();
        self.skip_ws();
        let name = self.ident().ok_or_else(|| self.attr_error(open))?;
        self.skip_ws();
        let matcher = match self.peek() {
            Some(']') => AttrMatch::Present(name),
            Some('=') => {
                self.bump();
                self.skip_ws();
                let value = self.attribute_value(open)?;
                self.skip_ws();
                AttrMatch::Equals(name, value)
            }
            _ => return Err(self.attr_error(open)),
        };
        if self.peek() != Some(']') {
            return Err(self.attr_error(open));
        }
        self.bump();
        Ok(matcher)
    }

    fn attribute_value(&mut self, open: usize) -> Result<String, SelectorError> {
        if let Some(quote @ ('"' | '\'')) = self.peek() {
            self.bump();
            let start = self.pos;
            while let Some(ch) = self.peek() {
                if ch == quote {
                    let value = self.src[start..self.pos].to_string();
                    self.bump();
                    return Ok(value);
                }
                self.bump();
            }
            return Err(SelectorError::UnterminatedAttribute { offset: open });
        }
        let start = self.pos;
        while self.peek().is_some_and(|ch| ch != ']' && !ch.is_whitespace()) {
            self.bump();
        }
        if self.pos == start {
            return Err(self.attr_error(open));
        }
        Ok(self.src[start..self.pos].to_string())
    }
}
