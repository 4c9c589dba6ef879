//! Painting.
//!
//! - [`display_list`] - draw commands and viewport culling
//! - [`painter`] - walks the layout tree to build a display list

pub mod display_list;
pub mod painter;

pub use display_list::{DisplayList, DrawCommand};
pub use painter::{PRE_BACKGROUND, Painter};

use wren_dom::DomTree;

use crate::cascade::StyleMap;
use crate::layout::LayoutTree;

/// Paint `layout` into a display list.
#[must_use]
pub fn paint(tree: &DomTree, styles: &StyleMap, layout: &LayoutTree) -> DisplayList {
    Painter::new(tree, styles).paint(layout)
}
