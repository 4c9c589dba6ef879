//! Selectors and matching.
//!
//! Two kinds exist: a bare tag name, and a descendant combinator built by
//! chaining tag names with whitespace. There is no specificity: rules apply
//! in source order.

use std::fmt;

use wren_dom::{DomTree, NodeId};

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Matches elements with exactly this (lowercase) tag name.
    Tag(String),
    /// Matches nodes matched by `descendant` that have a strict ancestor
    /// matched by `ancestor`.
    Descendant {
        /// Selector an ancestor must match.
        ancestor: Box<Selector>,
        /// Selector the node itself must match.
        descendant: Box<Selector>,
    },
}

impl Selector {
    /// Convenience constructor for a tag selector.
    #[must_use]
    pub fn tag(name: &str) -> Self {
        Self::Tag(name.to_ascii_lowercase())
    }

    /// Convenience constructor for a descendant selector.
    #[must_use]
    pub fn descendant(ancestor: Self, descendant: Self) -> Self {
        Self::Descendant {
            ancestor: Box::new(ancestor),
            descendant: Box::new(descendant),
        }
    }

    /// Does `node` match this selector?
    ///
    /// Text nodes never match.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        match self {
            Self::Tag(tag) => tree.tag_name(node) == Some(tag.as_str()),
            Self::Descendant {
                ancestor,
                descendant,
            } => {
                descendant.matches(tree, node)
                    && tree.ancestors(node).any(|a| ancestor.matches(tree, a))
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => f.write_str(tag),
            Self::Descendant {
                ancestor,
                descendant,
            } => write!(f, "{ancestor} {descendant}"),
        }
    }
}
