//! Query compilation.
//!
//! A non-empty query is compiled as an unanchored, case-insensitive regular
//! expression without escaping, so `^ap` or `a.c` behave as patterns. The
//! empty query short-circuits to "everything matches".

use crate::config::InvalidPattern;
use crate::model::PatternError;
use regex::{Regex, RegexBuilder};

/// Compiled form of a query.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Empty query: every item matches.
    All,
    /// Case-insensitive pattern tested against each item's text.
    Pattern(Regex),
}

impl Matcher {
    /// Compile a query.
    ///
    /// # Errors
    ///
    /// Returns `PatternError` when the query is not a valid pattern and
    /// `on_invalid` is [`InvalidPattern::Fail`]. With [`InvalidPattern::Literal`]
    /// an invalid query is matched as a literal substring instead.
    pub fn compile(query: &str, on_invalid: InvalidPattern) -> Result<Self, PatternError> {
        if query.is_empty() {
            return Ok(Matcher::All);
        }

        match build(query) {
            Ok(regex) => Ok(Matcher::Pattern(regex)),
            Err(source) => match on_invalid {
                InvalidPattern::Fail => Err(PatternError {
                    pattern: query.to_string(),
                    source,
                }),
                InvalidPattern::Literal => build(&regex::escape(query))
                    .map(Matcher::Pattern)
                    .map_err(|source| PatternError {
                        pattern: query.to_string(),
                        source,
                    }),
            },
        }
    }

    /// Test one item text.
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::All => true,
            Matcher::Pattern(regex) => regex.is_match(text),
        }
    }

    /// True for the empty query.
    pub fn matches_everything(&self) -> bool {
        matches!(self, Matcher::All)
    }
}

fn build(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fail(query: &str) -> Matcher {
        Matcher::compile(query, InvalidPattern::Fail).unwrap()
    }

    #[test]
    fn empty_query_matches_everything_without_pattern() {
        let matcher = fail("");
        assert!(matcher.matches_everything());
        assert!(matcher.is_match(""));
        assert!(matcher.is_match("anything"));
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        let matcher = fail("ap");
        assert!(matcher.is_match("Apple"));
        assert!(matcher.is_match("apricot"));
        assert!(matcher.is_match("GRAPE"));
        assert!(!matcher.is_match("Banana"));
    }

    #[test]
    fn metacharacters_act_as_pattern() {
        let matcher = fail("^ap");
        assert!(matcher.is_match("Apple"));
        assert!(!matcher.is_match("Grape"));

        assert!(fail("b.n").is_match("Banana"));
    }

    #[test]
    fn malformed_pattern_fails_by_default() {
        let err = Matcher::compile("(ap", InvalidPattern::Fail).unwrap_err();
        assert_eq!(err.pattern, "(ap");
    }

    #[test]
    fn malformed_pattern_falls_back_to_literal() {
        let matcher = Matcher::compile("(ap", InvalidPattern::Literal).unwrap();
        assert!(matcher.is_match("x (APple)"));
        assert!(!matcher.is_match("apple"));
    }

    #[test]
    fn valid_pattern_is_not_escaped_under_literal() {
        let matcher = Matcher::compile("a.c", InvalidPattern::Literal).unwrap();
        assert!(matcher.is_match("abc"));
    }
}
