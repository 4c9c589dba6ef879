//! HTML tokenizer and parser for the wren renderer.
//!
//! # Scope
//!
//! This crate implements a deliberately forgiving parser:
//! - **Tokenizer** - a single character scan that toggles between text and
//!   tag content on `<` and `>`, splitting tags into name and attributes
//! - **Tree Builder** - a stack of open elements; void elements never open,
//!   end tags pop the innermost element whatever their name, and everything
//!   hangs off a single `html` root
//!
//! Malformed markup never produces an error. Dropped or recovered input is
//! reported as [`ParseIssue`]s for diagnostics.
//!
//! # Not Supported
//!
//! - Character references (`&amp;` is kept verbatim)
//! - Raw text elements (`<script>` content is tokenized like any other text)
//! - Implied end tags and the adoption agency algorithm

/// Tree construction.
pub mod parser;
/// Markup tokenizer.
pub mod tokenizer;

pub use parser::{HTMLParser, ParseIssue, print_tree};
pub use tokenizer::{Attribute, HTMLTokenizer, Token};

use wren_dom::DomTree;

/// Parse markup into a DOM tree rooted at an `html` element.
#[must_use]
pub fn parse(markup: &str) -> DomTree {
    parse_with_issues(markup).0
}

/// Parse markup, also returning the issues the tokenizer and tree builder
/// recovered from.
#[must_use]
pub fn parse_with_issues(markup: &str) -> (DomTree, Vec<ParseIssue>) {
    let mut tokenizer = HTMLTokenizer::new(markup);
    tokenizer.run();
    let (tokens, mut issues) = tokenizer.into_parts();

    let (tree, parser_issues) = HTMLParser::new(tokens).run_with_issues();
    issues.extend(parser_issues);
    (tree, issues)
}
