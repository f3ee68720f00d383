//! Single-element markup templates for the generated label and input.
//!
//! A template is one opening tag such as `<input type="search" class="q">`,
//! optionally self-closed (`<input/>`) or followed by its closing tag
//! (`<label></label>`). Content between tags is not supported.

use crate::model::error::TemplateError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Parsed element template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct ElementTemplate {
    tag: String,
    attributes: Vec<(String, String)>,
}

impl ElementTemplate {
    /// Template for a bare element with no attributes.
    pub fn bare(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
        }
    }

    /// Tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes in source order, `class` included.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Builder-style attribute addition.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Value of the first attribute named `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for ElementTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attributes {
            write!(f, " {}=\"{}\"", name, value)?;
        }
        write!(f, ">")
    }
}

impl TryFrom<String> for ElementTemplate {
    type Error = TemplateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for ElementTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason: &str| TemplateError {
            template: s.to_string(),
            reason: reason.to_string(),
        };

        let mut cursor = Cursor::new(s.trim());
        if !cursor.eat('<') {
            return Err(fail("template must start with '<'"));
        }

        let tag = cursor.take_while(|c| c.is_ascii_alphanumeric() || c == '-');
        if tag.is_empty() {
            return Err(fail("missing tag name"));
        }
        let tag = tag.to_ascii_lowercase();

        let mut attributes: Vec<(String, String)> = Vec::new();
        loop {
            cursor.skip_whitespace();
            if cursor.eat_str("/>") || cursor.eat('>') {
                break;
            }
            if cursor.is_at_end() {
                return Err(fail("unterminated tag"));
            }

            let name = cursor.take_while(|c| {
                !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'' | '<')
            });
            if name.is_empty() {
                return Err(fail("unexpected character in tag"));
            }
            let name = name.to_ascii_lowercase();

            cursor.skip_whitespace();
            let value = if cursor.eat('=') {
                cursor.skip_whitespace();
                match cursor.peek() {
                    Some(quote @ ('"' | '\'')) => {
                        cursor.bump();
                        let value = cursor.take_while(|c| c != quote).to_string();
                        if !cursor.eat(quote) {
                            return Err(fail("unterminated attribute value"));
                        }
                        value
                    }
                    _ => cursor
                        .take_while(|c| !c.is_whitespace() && c != '>')
                        .to_string(),
                }
            } else {
                String::new()
            };

            match attributes.iter_mut().find(|entry| entry.0 == name) {
                Some((_, existing)) => *existing = value,
                None => attributes.push((name, value)),
            }
        }

        let rest = cursor.rest().trim();
        if !rest.is_empty() && !rest.eq_ignore_ascii_case(&format!("</{}>", tag)) {
            return Err(fail("template must contain a single empty element"));
        }

        Ok(Self { tag, attributes })
    }
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, expected: &str) -> bool {
        if self.rest().starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn take_while(&mut self, mut pred: impl FnMut(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
        &self.src[start..self.pos]
    }
}
