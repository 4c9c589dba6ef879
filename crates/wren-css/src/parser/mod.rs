//! Best-effort CSS parser.
//!
//! Grammar:
//!
//! ```text
//! stylesheet   := rule*
//! rule         := selector "{" declarations "}"
//! selector     := word (whitespace word)*
//! declarations := (property ":" value ";")*
//! word         := [A-Za-z0-9#.%-]+
//! ```
//!
//! Nothing the parser meets can abort the whole sheet. A bad declaration is
//! skipped up to the next `;` (or the rule's `}`), and a bad selector skips
//! the whole rule up to its `}`. If no delimiter follows, parsing stops and
//! the rules gathered so far are returned.

use std::collections::HashMap;

use thiserror::Error;
use wren_common::warning::warn_once;

use crate::selector::Selector;

/// Declarations of one rule or `style` attribute: lowercased property name
/// to value. A later declaration of the same property replaces the earlier.
pub type PropertyMap = HashMap<String, String>;

/// One `selector { declarations }` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Which elements the rule applies to.
    pub selector: Selector,
    /// The rule's declarations.
    pub declarations: PropertyMap,
}

/// An ordered list of rules. Order is cascade order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Rules in source order.
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    /// Parse a stylesheet. Never fails; see the module docs for recovery.
    #[must_use]
    pub fn parse(css: &str) -> Self {
        CSSParser::new(css).parse_stylesheet()
    }

    /// Append another sheet's rules after this one's, so they win ties.
    pub fn append(&mut self, other: Self) {
        self.rules.extend(other.rules);
    }
}

/// Internal failure that drives error recovery. Never escapes the parser.
#[derive(Debug, Error, PartialEq, Eq)]
enum ParseError {
    #[error("expected a word at offset {0}")]
    ExpectedWord(usize),
    #[error("expected '{expected}' at offset {offset}")]
    ExpectedLiteral { expected: char, offset: usize },
}

/// Recursive-descent parser over the characters of a stylesheet.
pub struct CSSParser {
    input: Vec<char>,
    position: usize,
}

impl CSSParser {
    /// Create a parser over `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Parse the input as a full stylesheet.
    #[must_use]
    pub fn parse_stylesheet(mut self) -> Stylesheet {
        let mut rules = Vec::new();

        loop {
            self.whitespace();
            if self.at_end() {
                break;
            }

            match self.rule() {
                Ok(rule) => rules.push(rule),
                Err(err) => {
                    let _ = warn_once("CSS", &format!("skipped rule: {err}"));
                    if self.ignore_until(&['}']) == Some('}') {
                        self.position += 1;
                    } else {
                        break;
                    }
                }
            }
        }

        log::debug!("parsed {} CSS rules", rules.len());
        Stylesheet { rules }
    }

    /// Parse the input as the contents of a `style` attribute:
    /// `prop: val; prop: val`.
    #[must_use]
    pub fn parse_declaration_block(mut self) -> PropertyMap {
        self.declarations(false)
    }

    fn rule(&mut self) -> Result<Rule, ParseError> {
        let selector = self.selector()?;
        self.literal('{')?;
        self.whitespace();
        let declarations = self.declarations(true);
        self.literal('}')?;
        Ok(Rule {
            selector,
            declarations,
        })
    }

    /// Each further word narrows the selector to descendants of what came
    /// before: `div p span` is `((div p) span)`.
    fn selector(&mut self) -> Result<Selector, ParseError> {
        let mut selector = Selector::Tag(self.word()?.to_ascii_lowercase());
        self.whitespace();
        while self.peek().is_some_and(|c| c != '{') {
            let tag = self.word()?.to_ascii_lowercase();
            selector = Selector::descendant(selector, Selector::Tag(tag));
            self.whitespace();
        }
        Ok(selector)
    }

    /// Declarations up to the end of input or, inside a rule, the closing
    /// `}` (left unconsumed).
    fn declarations(&mut self, in_rule: bool) -> PropertyMap {
        let mut pairs = PropertyMap::new();

        self.whitespace();
        while let Some(c) = self.peek() {
            if in_rule && c == '}' {
                break;
            }

            let terminated = match self.pair() {
                Ok((property, value)) => {
                    let _ = pairs.insert(property, value);
                    self.whitespace();
                    match self.peek() {
                        // The last declaration may omit its ';'.
                        None | Some('}') => Ok(()),
                        Some(_) => self.literal(';'),
                    }
                }
                Err(err) => Err(err),
            };

            match terminated {
                Ok(()) => self.whitespace(),
                Err(err) => {
                    let _ = warn_once("CSS", &format!("skipped declaration: {err}"));
                    let stops: &[char] = if in_rule { &[';', '}'] } else { &[';'] };
                    if self.ignore_until(stops) == Some(';') {
                        self.position += 1;
                        self.whitespace();
                    } else {
                        break;
                    }
                }
            }
        }
        pairs
    }

    fn pair(&mut self) -> Result<(String, String), ParseError> {
        let property = self.word()?;
        self.whitespace();
        self.literal(':')?;
        self.whitespace();
        let value = self.word()?;
        Ok((property.to_ascii_lowercase(), value))
    }

    /// Skip whitespace and `/* ... */` comments.
    fn whitespace(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.position += 1;
            }
            if self.peek() == Some('/') && self.input.get(self.position + 1) == Some(&'*') {
                self.position += 2;
                while !self.at_end() && !self.starts_with("*/") {
                    self.position += 1;
                }
                self.position = (self.position + 2).min(self.input.len());
            } else {
                break;
            }
        }
    }

    fn word(&mut self) -> Result<String, ParseError> {
        let start = self.position;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '#' | '-' | '.' | '%'))
        {
            self.position += 1;
        }
        if self.position == start {
            return Err(ParseError::ExpectedWord(start));
        }
        Ok(self.input[start..self.position].iter().collect())
    }

    fn literal(&mut self, expected: char) -> Result<(), ParseError> {
        if self.peek() != Some(expected) {
            return Err(ParseError::ExpectedLiteral {
                expected,
                offset: self.position,
            });
        }
        self.position += 1;
        Ok(())
    }

    /// Advance to the first of `chars`, leaving it unconsumed. Returns the
    /// character found, or `None` (at end of input) if there was none.
    fn ignore_until(&mut self, chars: &[char]) -> Option<char> {
        while let Some(c) = self.peek() {
            if chars.contains(&c) {
                return Some(c);
            }
            self.position += 1;
        }
        None
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    const fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.input.get(self.position + i) == Some(&c))
    }
}

/// Parse the contents of a `style="..."` attribute.
#[must_use]
pub fn parse_declaration_block(text: &str) -> PropertyMap {
    CSSParser::new(text).parse_declaration_block()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_stops_at_punctuation() {
        let mut parser = CSSParser::new("test-prop-0: x");
        assert_eq!(parser.word().unwrap(), "test-prop-0");
        assert_eq!(parser.position, 11);
    }

    #[test]
    fn test_word_requires_a_character() {
        let mut parser = CSSParser::new(" testWord");
        assert_eq!(parser.word(), Err(ParseError::ExpectedWord(0)));
    }

    #[test]
    fn test_word_accepts_hash_dot_percent() {
        let mut parser = CSSParser::new("#ff0000 1.5em 50%");
        assert_eq!(parser.word().unwrap(), "#ff0000");
        parser.whitespace();
        assert_eq!(parser.word().unwrap(), "1.5em");
        parser.whitespace();
        assert_eq!(parser.word().unwrap(), "50%");
    }

    #[test]
    fn test_literal() {
        let mut parser = CSSParser::new("{testWord");
        assert!(parser.literal('{').is_ok());
        assert_eq!(parser.position, 1);
        assert!(parser.literal('{').is_err());
    }

    #[test]
    fn test_whitespace_and_comments() {
        let mut parser = CSSParser::new("     ");
        parser.whitespace();
        assert_eq!(parser.position, 5);

        let mut parser = CSSParser::new(" /* a */ /* b */x");
        parser.whitespace();
        assert_eq!(parser.peek(), Some('x'));

        let mut parser = CSSParser::new("/* unterminated");
        parser.whitespace();
        assert!(parser.at_end());
    }

    #[test]
    fn test_pair() {
        let mut parser = CSSParser::new("Test-Prop-0 : test-value-0");
        assert_eq!(
            parser.pair().unwrap(),
            ("test-prop-0".to_string(), "test-value-0".to_string())
        );
    }

    #[test]
    fn test_ignore_until() {
        let mut parser = CSSParser::new("abc;def}");
        assert_eq!(parser.ignore_until(&['}']), Some('}'));
        assert_eq!(parser.position, 7);

        let mut parser = CSSParser::new("abc");
        assert_eq!(parser.ignore_until(&['}']), None);
        assert!(parser.at_end());
    }
}
