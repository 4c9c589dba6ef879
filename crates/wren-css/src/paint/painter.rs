//! Painter: layout tree to display list.

use wren_dom::DomTree;

use crate::cascade::StyleMap;
use crate::layout::{LayoutBox, LayoutMode, LayoutTree};

use super::{DisplayList, DrawCommand};

/// Background every `pre` box gets, whatever the cascade says.
pub const PRE_BACKGROUND: &str = "gray";

/// Walks a layout tree and emits draw commands.
pub struct Painter<'a> {
    tree: &'a DomTree,
    styles: &'a StyleMap,
}

impl<'a> Painter<'a> {
    /// A painter reading tag names from `tree` and backgrounds from `styles`.
    #[must_use]
    pub const fn new(tree: &'a DomTree, styles: &'a StyleMap) -> Self {
        Self { tree, styles }
    }

    /// Paint every box, parents before children, siblings in document order.
    #[must_use]
    pub fn paint(&self, layout: &LayoutTree) -> DisplayList {
        let mut list = DisplayList::new();
        for (_, layout_box) in layout.iter() {
            self.paint_box(layout_box, &mut list);
        }
        log::debug!("painted {} draw commands", list.len());
        list
    }

    fn paint_box(&self, layout_box: &LayoutBox, list: &mut DisplayList) {
        if let Some(color) = self.background(layout_box) {
            list.push(DrawCommand::DrawRect {
                left: layout_box.x,
                top: layout_box.y,
                right: layout_box.x + layout_box.width,
                bottom: layout_box.bottom(),
                color,
            });
        }

        if layout_box.mode == LayoutMode::Inline {
            for word in &layout_box.words {
                list.push(DrawCommand::DrawText {
                    left: word.x,
                    top: word.y,
                    bottom: word.bottom,
                    text: word.text.clone(),
                    font: word.font.clone(),
                });
            }
        }
    }

    fn background(&self, layout_box: &LayoutBox) -> Option<String> {
        let node = layout_box.node()?;
        if self.tree.tag_name(node) == Some("pre") {
            return Some(PRE_BACKGROUND.to_string());
        }
        self.styles
            .get(&node)
            .and_then(|properties| properties.get("background-color"))
            .cloned()
    }
}
