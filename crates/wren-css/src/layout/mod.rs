//! Layout engine.
//!
//! Turns a DOM tree into a [`LayoutTree`] of positioned boxes.
//!
//! - [`layout_box`] - box arena, block mode, box generation
//! - [`inline`] - inline text flow and line breaking
//! - [`font`] - text measurement seam and font metrics cache
//!
//! Single column flow: every box is as wide as its parent and starts at its
//! parent's left edge. Block-mode boxes stack children vertically with no
//! margins, and inline-mode boxes break text into lines.

pub mod font;
pub mod inline;
pub mod layout_box;

pub use font::{
    ApproximateTextMeasurer, FontCache, FontKey, FontStyle, FontWeight, LineMetrics, TextMeasurer,
};
pub use inline::{FlowOutput, InlineFlow, PlacedWord, TextStyle};
pub use layout_box::{BoxContent, BoxId, LayoutBox, LayoutMode, LayoutTree, PreOrder};

use wren_dom::{DomTree, NodeId};

/// Elements that force their parent into block mode and get a box of their
/// own.
pub const BLOCK_ELEMENTS: &[&str] = &[
    "html",
    "body",
    "article",
    "section",
    "nav",
    "aside",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "hgroup",
    "header",
    "footer",
    "address",
    "p",
    "hr",
    "pre",
    "blockquote",
    "ol",
    "ul",
    "menu",
    "li",
    "dl",
    "dt",
    "dd",
    "figure",
    "figcaption",
    "main",
    "div",
    "table",
    "form",
    "fieldset",
    "legend",
    "details",
    "summary",
];

/// Elements whose subtree produces neither boxes nor text.
pub const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style"];

/// Line height as a multiple of a font's ascent and descent.
pub const LINE_HEIGHT_FACTOR: f32 = 1.25;

/// Is `tag` one of [`BLOCK_ELEMENTS`]?
#[must_use]
pub fn is_block_element(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
}

/// Viewport and font settings for one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Viewport width in pixels.
    pub width: f32,
    /// Horizontal inset of the document box.
    pub hstep: f32,
    /// Vertical inset of the document box.
    pub vstep: f32,
    /// Font family, `None` for the measurer's default.
    pub font_family: Option<String>,
    /// Base font size in pixels.
    pub font_size: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            hstep: 13.0,
            vstep: 16.0,
            font_family: None,
            font_size: 16,
        }
    }
}

/// Lay out `tree`. Shorthand for [`LayoutTree::build`].
pub fn layout_document(tree: &DomTree, config: &LayoutConfig, fonts: &mut FontCache) -> LayoutTree {
    LayoutTree::build(tree, config, fonts)
}

/// Marker for list item `li`: its 1-based position among `li` siblings
/// inside an `ol`, a bullet anywhere else.
#[must_use]
pub fn list_marker(tree: &DomTree, li: NodeId) -> String {
    let ordered = tree
        .parent(li)
        .and_then(|parent| tree.tag_name(parent))
        == Some("ol");
    if !ordered {
        return "\u{2022}".to_string();
    }

    let position = tree
        .preceding_siblings(li)
        .filter(|&sibling| tree.tag_name(sibling) == Some("li"))
        .count()
        + 1;
    position.to_string()
}
