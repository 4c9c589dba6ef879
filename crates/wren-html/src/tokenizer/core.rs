//! Character-by-character markup scanner.

use crate::parser::ParseIssue;

use super::token::{Attribute, Token, is_self_closing_name};

/// Splits markup into text runs and tags.
///
/// The scanner is a two-state machine: outside a tag it accumulates text,
/// inside a tag (after `<`) it accumulates the tag's source until `>`.
pub struct HTMLTokenizer {
    input: Vec<char>,
    position: usize,
    in_tag: bool,
    buffer: String,
    tokens: Vec<Token>,
    issues: Vec<ParseIssue>,
}

impl HTMLTokenizer {
    /// Create a tokenizer over `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            in_tag: false,
            buffer: String::new(),
            tokens: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Scan the whole input.
    pub fn run(&mut self) {
        while let Some(&c) = self.input.get(self.position) {
            self.position += 1;
            match c {
                '<' => {
                    if self.in_tag {
                        // "<a <b>": the first tag never closed.
                        self.record_unterminated_tag();
                    } else {
                        self.flush_text();
                    }
                    self.in_tag = true;
                }
                '>' if self.in_tag => {
                    let tag = std::mem::take(&mut self.buffer);
                    self.emit_tag(&tag);
                    self.in_tag = false;
                }
                _ => self.buffer.push(c),
            }
        }

        if self.in_tag {
            self.record_unterminated_tag();
        } else {
            self.flush_text();
        }
    }

    /// The tokens produced so far.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Consume the tokenizer, returning its tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Consume the tokenizer, returning its tokens and the issues it
    /// recovered from.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Token>, Vec<ParseIssue>) {
        (self.tokens, self.issues)
    }

    /// Emit accumulated text: newlines are removed, then surrounding
    /// whitespace trimmed. Whitespace-only runs produce nothing.
    fn flush_text(&mut self) {
        let raw = std::mem::take(&mut self.buffer);
        let text: String = raw.chars().filter(|&c| c != '\n').collect();
        let text = text.trim();
        if !text.is_empty() {
            self.tokens.push(Token::Text(text.to_string()));
        }
    }

    fn record_unterminated_tag(&mut self) {
        let partial = std::mem::take(&mut self.buffer);
        self.issues.push(ParseIssue {
            message: format!("dropped unterminated tag '<{partial}'"),
            token_index: self.tokens.len(),
        });
    }

    /// Classify the text between `<` and `>`.
    fn emit_tag(&mut self, tag: &str) {
        if tag.starts_with('!') {
            self.tokens.push(Token::Declaration(tag.to_string()));
            return;
        }

        let mut parts = split_tag(tag).into_iter();
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();

        if let Some(end_name) = name.strip_prefix('/') {
            self.tokens.push(Token::EndTag {
                name: end_name.to_string(),
            });
            return;
        }

        let attributes = parts.map(|part| parse_attribute(&part)).collect();
        let self_closing = is_self_closing_name(&name) || tag.trim_end().ends_with('/');
        self.tokens.push(Token::StartTag {
            name,
            self_closing,
            attributes,
        });
    }
}

/// Split tag source on whitespace, except inside quoted attribute values.
fn split_tag(tag: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in tag.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
                current.push(c);
            }
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            None => {
                if c == '"' || c == '\'' {
                    quote = Some(c);
                }
                current.push(c);
            }
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// `key=value`, `key="value"` or a bare `key`.
fn parse_attribute(part: &str) -> Attribute {
    match part.split_once('=') {
        Some((key, value)) => Attribute::new(key.to_ascii_lowercase(), strip_quotes(value).to_string()),
        None => Attribute::new(part.to_ascii_lowercase(), String::new()),
    }
}

/// Remove one layer of matching `'` or `"` quotes.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        let mut tokenizer = HTMLTokenizer::new(input);
        tokenizer.run();
        tokenizer.into_tokens()
    }

    fn start(name: &str, self_closing: bool, attributes: &[(&str, &str)]) -> Token {
        Token::StartTag {
            name: name.to_string(),
            self_closing,
            attributes: attributes
                .iter()
                .map(|(k, v)| Attribute::new((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_text_and_tags() {
        assert_eq!(
            tokenize("<p>Hello</p>"),
            vec![
                start("p", false, &[]),
                Token::Text("Hello".to_string()),
                Token::EndTag {
                    name: "p".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_text_newlines_removed_and_trimmed() {
        assert_eq!(
            tokenize("  Hello\n world \n<br>"),
            vec![Token::Text("Hello world".to_string()), start("br", true, &[])]
        );
    }

    #[test]
    fn test_whitespace_only_text_dropped() {
        assert_eq!(
            tokenize("<b>x</b> \n <i>y</i>"),
            vec![
                start("b", false, &[]),
                Token::Text("x".to_string()),
                Token::EndTag {
                    name: "b".to_string()
                },
                start("i", false, &[]),
                Token::Text("y".to_string()),
                Token::EndTag {
                    name: "i".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_attributes() {
        assert_eq!(
            tokenize(r#"<meta name="viewport" content='width=device-width' /"#),
            Vec::<Token>::new(),
            "unterminated tags are dropped"
        );
        assert_eq!(
            tokenize(r#"<meta NAME="viewport" content='width=device-width' />"#),
            vec![start(
                "meta",
                true,
                &[("name", "viewport"), ("content", "width=device-width"), ("/", "")]
            )]
        );
    }

    #[test]
    fn test_quoted_value_keeps_spaces() {
        assert_eq!(
            tokenize(r#"<div style="color: red; background-color: blue">"#),
            vec![start(
                "div",
                false,
                &[("style", "color: red; background-color: blue")]
            )]
        );
    }

    #[test]
    fn test_bare_attribute_and_case() {
        assert_eq!(
            tokenize("<INPUT Disabled>"),
            vec![start("input", true, &[("disabled", "")])]
        );
    }

    #[test]
    fn test_self_closing_variants() {
        assert_eq!(tokenize("<br/>"), vec![start("br/", true, &[])]);
        assert_eq!(tokenize("<br />"), vec![start("br", true, &[("/", "")])]);
        assert_eq!(tokenize("<custom/>"), vec![start("custom/", true, &[])]);
    }

    #[test]
    fn test_declarations() {
        assert_eq!(
            tokenize("<!DOCTYPE html><!-- note -->"),
            vec![
                Token::Declaration("!DOCTYPE html".to_string()),
                Token::Declaration("!-- note --".to_string()),
            ]
        );
    }

    #[test]
    fn test_unterminated_tag_reported() {
        let mut tokenizer = HTMLTokenizer::new("<p>text<b");
        tokenizer.run();
        let (tokens, issues) = tokenizer.into_parts();
        assert_eq!(tokens.len(), 2);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("<b"));
    }

    #[test]
    fn test_greater_than_in_text() {
        assert_eq!(tokenize("a > b"), vec![Token::Text("a > b".to_string())]);
    }
}
