//! Token types emitted by [`HTMLTokenizer`](super::HTMLTokenizer).

/// Tags that never contain children.
///
/// A tag whose name is listed here, with or without a trailing `/`, is
/// inserted without being opened.
pub const SELF_CLOSING_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// An attribute on a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Value with one layer of matching quotes removed, empty if absent.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// A unit of markup handed to the tree builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of text between tags, with newlines removed and surrounding
    /// whitespace trimmed. Never empty.
    Text(String),

    /// An opening tag such as `<p class=x>`.
    StartTag {
        /// Lowercased first word of the tag, kept verbatim otherwise
        /// (`<br/>` has the name `br/`).
        name: String,
        /// True for void elements and tags written with a trailing `/`.
        self_closing: bool,
        /// Attributes in source order.
        attributes: Vec<Attribute>,
    },

    /// A closing tag such as `</p>`.
    EndTag {
        /// Lowercased name without the leading `/`.
        name: String,
    },

    /// `<!DOCTYPE ...>` or `<!-- ... -->`; ignored by the tree builder.
    Declaration(String),
}

/// True if `name` is a void element, allowing a trailing `/` (`br/`).
#[must_use]
pub fn is_self_closing_name(name: &str) -> bool {
    let bare = name.strip_suffix('/').unwrap_or(name);
    SELF_CLOSING_TAGS.contains(&bare)
}
