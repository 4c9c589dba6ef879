//! CSS parsing, cascade, layout and painting for the wren renderer.
//!
//! # Scope
//!
//! - **CSS parser**: tag and descendant selectors, `property: value`
//!   declarations, skip-to-delimiter error recovery, `style` attributes
//! - **Cascade**: rule order, last write wins, inline style last
//! - **Layout**: block stacking, anonymous boxes for inline runs, inline text
//!   flow with line breaking and baseline alignment
//! - **Paint**: background rectangles and text runs in a [`DisplayList`]
//!
//! # Not Implemented
//!
//! - Specificity, inheritance, classes, ids, attribute selectors
//! - Margins, borders, padding
//! - Flexbox, grid, floats, positioning

/// Style cascade.
pub mod cascade;
/// Built-in stylesheet.
pub mod default_stylesheet;
/// Block and inline layout.
pub mod layout;
/// Draw commands and the painter.
pub mod paint;
/// CSS parser.
pub mod parser;
/// Selectors and matching.
pub mod selector;

pub use cascade::{StyleMap, apply_styles};
pub use default_stylesheet::{DEFAULT_CSS, default_stylesheet};
pub use layout::{
    ApproximateTextMeasurer, BoxContent, BoxId, FontCache, FontKey, FontStyle, FontWeight,
    LayoutBox, LayoutConfig, LayoutMode, LayoutTree, LineMetrics, PlacedWord, TextMeasurer,
    layout_document,
};
pub use paint::{DisplayList, DrawCommand, Painter, paint};
pub use parser::{CSSParser, PropertyMap, Rule, Stylesheet, parse_declaration_block};
pub use selector::Selector;

use wren_dom::{DomTree, ElementData, NodeType};

/// Where a document stylesheet comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesheetSource {
    /// `<link rel="stylesheet" href="...">`, still to be fetched.
    External {
        /// The `href` exactly as written.
        href: String,
    },
    /// Text of a `<style>` element.
    Inline(String),
}

/// Find every stylesheet a document references, in document order.
///
/// Rules from later sheets override earlier ones, so the order here is the
/// cascade order after the default stylesheet.
#[must_use]
pub fn collect_stylesheet_sources(tree: &DomTree) -> Vec<StylesheetSource> {
    let mut sources = Vec::new();

    for id in tree.iter_all() {
        let Some(node) = tree.get(id) else { continue };
        let NodeType::Element(data) = &node.node_type else {
            continue;
        };

        if data.is("link") && is_stylesheet_link(data) {
            if let Some(href) = data.attribute("href") {
                if !href.trim().is_empty() {
                    sources.push(StylesheetSource::External {
                        href: href.trim().to_string(),
                    });
                }
            }
        } else if data.is("style") {
            sources.push(StylesheetSource::Inline(tree.text_content(id)));
        }
    }

    sources
}

/// Does this element's `rel` list contain the `stylesheet` token?
#[must_use]
pub fn is_stylesheet_link(data: &ElementData) -> bool {
    data.attribute("rel").is_some_and(|rel| {
        rel.split_ascii_whitespace()
            .any(|token| token.eq_ignore_ascii_case("stylesheet"))
    })
}
