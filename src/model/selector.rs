//! Item-inclusion predicates.
//!
//! Selectors cover the subset needed to pick items out of a container:
//! `*`, `tag`, `.class`, `:visible`, `:hidden`, `:not(...)`, compounds such as
//! `li.fruit:visible`, and comma-separated alternatives.

use crate::model::error::SelectorError;
use crate::model::{Document, ElementId};
use cssparser::{ParseError as CssParseError, ParseErrorKind, Parser, ParserInput, Token};
use serde::Deserialize;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Predicate deciding which captured children take part in a search.
#[derive(Clone, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum ItemFilter {
    /// Every child.
    #[default]
    All,
    /// Neither the element nor an ancestor is hidden.
    Visible,
    /// The element or an ancestor is hidden.
    Hidden,
    /// Tag name equals.
    Tag(String),
    /// Class list contains.
    Class(String),
    /// Every part matches.
    And(Vec<ItemFilter>),
    /// Any alternative matches.
    Any(Vec<ItemFilter>),
    /// Inner filter does not match.
    Not(Box<ItemFilter>),
    /// Caller-supplied predicate.
    Custom(Rc<dyn Fn(&Document, ElementId) -> bool>),
}

impl ItemFilter {
    /// Wrap a closure as a filter.
    pub fn custom(predicate: impl Fn(&Document, ElementId) -> bool + 'static) -> Self {
        Self::Custom(Rc::new(predicate))
    }

    /// True if `id` passes. Unknown ids never match except through `Custom`.
    pub fn matches(&self, doc: &Document, id: ElementId) -> bool {
        match self {
            ItemFilter::All => doc.contains(id),
            ItemFilter::Visible => doc.is_visible(id),
            ItemFilter::Hidden => doc.contains(id) && !doc.is_visible(id),
            ItemFilter::Tag(tag) => doc.get(id).is_some_and(|e| e.tag() == tag),
            ItemFilter::Class(class) => doc.has_class(id, class),
            ItemFilter::And(parts) => parts.iter().all(|p| p.matches(doc, id)),
            ItemFilter::Any(alternatives) => alternatives.iter().any(|p| p.matches(doc, id)),
            ItemFilter::Not(inner) => doc.contains(id) && !inner.matches(doc, id),
            ItemFilter::Custom(predicate) => predicate(doc, id),
        }
    }

    /// Keep the ids that satisfy the filter, preserving order.
    pub fn apply(&self, doc: &Document, ids: &[ElementId]) -> Vec<ElementId> {
        ids.iter()
            .copied()
            .filter(|id| self.matches(doc, *id))
            .collect()
    }
}

impl fmt::Debug for ItemFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemFilter::All => write!(f, "All"),
            ItemFilter::Visible => write!(f, "Visible"),
            ItemFilter::Hidden => write!(f, "Hidden"),
            ItemFilter::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
            ItemFilter::Class(class) => f.debug_tuple("Class").field(class).finish(),
            ItemFilter::And(parts) => f.debug_tuple("And").field(parts).finish(),
            ItemFilter::Any(parts) => f.debug_tuple("Any").field(parts).finish(),
            ItemFilter::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            ItemFilter::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl TryFrom<String> for ItemFilter {
    type Error = SelectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for ItemFilter {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut input = ParserInput::new(s);
        let mut parser = Parser::new(&mut input);
        parser
            .parse_entirely(parse_list)
            .map_err(|err| SelectorError {
                selector: s.to_string(),
                reason: describe(err),
            })
    }
}

fn describe(err: CssParseError<'_, String>) -> String {
    match err.kind {
        ParseErrorKind::Custom(reason) => reason,
        ParseErrorKind::Basic(_) => format!(
            "unexpected input at line {}, column {}",
            err.location.line + 1,
            err.location.column
        ),
    }
}

/// Comma-separated alternatives.
fn parse_list<'i>(parser: &mut Parser<'i, '_>) -> Result<ItemFilter, CssParseError<'i, String>> {
    let mut alternatives = parser.parse_comma_separated(|p| parse_compound(p))?;

    if alternatives.len() == 1 {
        Ok(alternatives.remove(0))
    } else {
        Ok(ItemFilter::Any(alternatives))
    }
}

/// One compound selector. Whitespace is only allowed around it, so
/// descendant combinators are rejected.
fn parse_compound<'i>(
    parser: &mut Parser<'i, '_>,
) -> Result<ItemFilter, CssParseError<'i, String>> {
    let mut filters = Vec::new();

    parser.skip_whitespace();

    loop {
        let location = parser.current_source_location();
        let token = match parser.next_including_whitespace() {
            Ok(t) => t.clone(),
            Err(_) => break,
        };

        match token {
            Token::WhiteSpace(_) => {
                if parser.is_exhausted() {
                    break;
                }
                return Err(location.new_custom_error("combinators are not supported".to_string()));
            }

            Token::Delim('*') => filters.push(ItemFilter::All),

            Token::Ident(name) => {
                if !filters.is_empty() {
                    return Err(location
                        .new_custom_error(format!("tag name {:?} must come first", name.as_ref())));
                }
                filters.push(ItemFilter::Tag(name.to_ascii_lowercase()));
            }

            Token::Delim('.') => match parser.next_including_whitespace() {
                Ok(Token::Ident(class)) => filters.push(ItemFilter::Class(class.to_string())),
                _ => {
                    return Err(location.new_custom_error("expected class name after '.'".to_string()))
                }
            },

            Token::Colon => filters.push(parse_pseudo_class(parser)?),

            _ => {
                return Err(location.new_custom_error(format!(
                    "unexpected input at column {}",
                    location.column
                )))
            }
        }
    }

    match filters.len() {
        0 => Err(parser.new_custom_error("empty selector".to_string())),
        1 => Ok(filters.remove(0)),
        _ => Ok(ItemFilter::And(filters)),
    }
}

/// The part after a `:`.
fn parse_pseudo_class<'i>(
    parser: &mut Parser<'i, '_>,
) -> Result<ItemFilter, CssParseError<'i, String>> {
    let location = parser.current_source_location();
    let start = parser.position();
    let token = match parser.next_including_whitespace() {
        Ok(t) => t.clone(),
        Err(_) => {
            return Err(location.new_custom_error("expected pseudo-class name after ':'".to_string()))
        }
    };

    match token {
        Token::Ident(name) if name.eq_ignore_ascii_case("visible") => Ok(ItemFilter::Visible),
        Token::Ident(name) if name.eq_ignore_ascii_case("hidden") => Ok(ItemFilter::Hidden),
        Token::Function(name) if name.eq_ignore_ascii_case("not") => {
            let inner = parser.parse_nested_block(|p| parse_list(p))?;
            // the tokenizer closes blocks at end of input
            if !parser.slice_from(start).ends_with(')') {
                return Err(location.new_custom_error("unclosed ':not('".to_string()));
            }
            Ok(ItemFilter::Not(Box::new(inner)))
        }
        Token::Ident(name) | Token::Function(name) => Err(location
            .new_custom_error(format!("unsupported pseudo-class ':{}'", name.as_ref()))),
        _ => Err(location.new_custom_error("expected pseudo-class name after ':'".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Document, Vec<ElementId>) {
        let mut doc = Document::new();
        let list = doc.create_element("ul");
        doc.append_child(doc.root(), list).unwrap();

        let apple = doc.create_text_element("li", "Apple");
        doc.add_class(apple, "fruit").unwrap();
        let hidden = doc.create_text_element("li", "Banana");
        doc.add_class(hidden, "fruit").unwrap();
        doc.set_hidden(hidden, true).unwrap();
        let header = doc.create_text_element("h3", "Vegetables");

        for id in [apple, hidden, header] {
            doc.append_child(list, id).unwrap();
        }
        (doc, vec![apple, hidden, header])
    }

    fn selected(selector: &str) -> Vec<usize> {
        let (doc, ids) = fixture();
        let filter: ItemFilter = selector.parse().unwrap();
        ids.iter()
            .enumerate()
            .filter(|(_, id)| filter.matches(&doc, **id))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn star_selects_everything() {
        assert_eq!(selected("*"), vec![0, 1, 2]);
    }

    #[test]
    fn visible_and_hidden_partition() {
        assert_eq!(selected(":visible"), vec![0, 2]);
        assert_eq!(selected(":hidden"), vec![1]);
    }

    #[test]
    fn tag_and_class_selectors() {
        assert_eq!(selected("li"), vec![0, 1]);
        assert_eq!(selected(".fruit"), vec![0, 1]);
        assert_eq!(selected("h3"), vec![2]);
    }

    #[test]
    fn compound_selector_requires_all_parts() {
        assert_eq!(selected("li.fruit:visible"), vec![0]);
    }

    #[test]
    fn not_and_alternatives() {
        assert_eq!(selected(":not(.fruit)"), vec![2]);
        assert_eq!(selected("h3, :hidden"), vec![1, 2]);
        assert_eq!(selected(":not(h3, :hidden)"), vec![0]);
    }

    #[test]
    fn custom_predicate_sees_document() {
        let (doc, ids) = fixture();
        let filter = ItemFilter::custom(|doc, id| doc.text_content(id).starts_with('B'));
        assert_eq!(filter.apply(&doc, &ids), vec![ids[1]]);
    }

    #[test]
    fn apply_preserves_order() {
        let (doc, ids) = fixture();
        let reversed: Vec<_> = ids.iter().rev().copied().collect();
        assert_eq!(
            ItemFilter::Visible.apply(&doc, &reversed),
            vec![ids[2], ids[0]]
        );
    }

    #[test]
    fn whitespace_around_parts_and_case_are_tolerated() {
        assert_eq!(selected("  li.fruit , H3  "), vec![0, 1, 2]);
        assert_eq!(selected(":NOT( .fruit )"), vec![2]);
        assert_eq!(selected("LI:visible"), vec![0]);
    }

    #[test]
    fn parse_error_keeps_selector_and_reason() {
        let err = ":focus".parse::<ItemFilter>().unwrap_err();
        assert_eq!(err.selector, ":focus");
        assert_eq!(err.reason, "unsupported pseudo-class ':focus'");

        let err = "li h3".parse::<ItemFilter>().unwrap_err();
        assert_eq!(err.reason, "combinators are not supported");

        let err = ":not(li".parse::<ItemFilter>().unwrap_err();
        assert_eq!(err.reason, "unclosed ':not('");
    }

    #[test]
    fn invalid_selectors_are_rejected() {
        for bad in ["", "  ", ".", ". fruit", ":focus", "li h3", "a,,b", ":not(li", "li)", ".fruit li", "#id"] {
            assert!(bad.parse::<ItemFilter>().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn debug_hides_closure() {
        let filter = ItemFilter::custom(|_, _| true);
        assert_eq!(format!("{:?}", filter), "Custom(..)");
    }
}
