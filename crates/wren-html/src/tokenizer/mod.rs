//! Markup tokenizer.

/// Tokenizer state machine.
pub mod core;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::HTMLTokenizer;
pub use token::{Attribute, SELF_CLOSING_TAGS, Token};
