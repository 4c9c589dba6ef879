//! Layout boxes and the block layout pass.
//!
//! Boxes live in one arena owned by [`LayoutTree`] and refer to each other by
//! [`BoxId`]. A box is either in block mode, stacking its child boxes
//! vertically, or in inline mode, flowing text with [`InlineFlow`].
//!
//! Paragraph spacing requested by `<p>` or a heading at the very start or
//! end of an inline flow has nothing in that flow to separate. The flow
//! reports it as a leading or trailing gap, and block layout places it
//! between the box and its neighbouring sibling instead.

use std::fmt::Write as _;

use wren_dom::{DomTree, NodeId};

use super::font::FontCache;
use super::inline::{InlineFlow, PlacedWord, TextStyle};
use super::{HIDDEN_ELEMENTS, LayoutConfig, is_block_element, list_marker};

/// Index of a box in its [`LayoutTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId(pub usize);

/// What a box was generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoxContent {
    /// The single top-level box covering the viewport's content area.
    Document,
    /// A DOM node.
    Node(NodeId),
    /// A run of consecutive non-block siblings laid out in one inline pass.
    Anonymous(Vec<NodeId>),
}

/// Layout strategy of a box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutMode {
    /// Children stack vertically.
    #[default]
    Block,
    /// Text flows into lines.
    Inline,
}

/// A positioned box.
#[derive(Debug, Clone)]
pub struct LayoutBox {
    /// What this box was generated for.
    pub content: BoxContent,
    /// Enclosing box, `None` for the document box.
    pub parent: Option<BoxId>,
    /// Preceding sibling box.
    pub previous: Option<BoxId>,
    /// Child boxes, in document order. Always empty in inline mode.
    pub children: Vec<BoxId>,
    /// Strategy chosen for this box.
    pub mode: LayoutMode,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height, set once the box's layout finished.
    pub height: Option<f32>,
    /// List marker handed down from an enclosing `li`, emitted before the
    /// first word of an inline box.
    pub marker: Option<String>,
    /// Words placed by inline layout.
    pub words: Vec<PlacedWord>,
    /// Paragraph gap requested before this box's first word.
    pub leading_gap: Option<u32>,
    /// Paragraph gap requested after this box's last word.
    pub trailing_gap: Option<u32>,
}

impl LayoutBox {
    fn new(content: BoxContent, parent: Option<BoxId>, previous: Option<BoxId>) -> Self {
        Self {
            content,
            parent,
            previous,
            children: Vec::new(),
            mode: LayoutMode::Block,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: None,
            marker: None,
            words: Vec::new(),
            leading_gap: None,
            trailing_gap: None,
        }
    }

    /// The DOM node this box was generated for, if any.
    #[must_use]
    pub const fn node(&self) -> Option<NodeId> {
        match self.content {
            BoxContent::Node(id) => Some(id),
            BoxContent::Document | BoxContent::Anonymous(_) => None,
        }
    }

    /// Height, or zero if layout has not reached this box.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.height.unwrap_or(0.0)
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height()
    }
}

/// A laid-out document: an arena of boxes rooted at the document box.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    boxes: Vec<LayoutBox>,
}

impl LayoutTree {
    /// Lay out `tree` for the viewport and fonts in `config`.
    pub fn build(tree: &DomTree, config: &LayoutConfig, fonts: &mut FontCache) -> Self {
        let mut engine = LayoutEngine {
            tree,
            config,
            fonts,
            boxes: Vec::new(),
        };
        let document = engine.push(BoxContent::Document, None, None);
        engine.run(document);

        let layout = Self {
            boxes: engine.boxes,
        };
        log::debug!(
            "laid out {} boxes, document height {}",
            layout.len(),
            layout.document_height()
        );
        layout
    }

    /// The document box.
    #[must_use]
    pub const fn root(&self) -> BoxId {
        BoxId(0)
    }

    /// Look up a box.
    #[must_use]
    pub fn get(&self, id: BoxId) -> Option<&LayoutBox> {
        self.boxes.get(id.0)
    }

    /// Number of boxes, the document box included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// True when the tree holds no boxes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Height of the whole document.
    #[must_use]
    pub fn document_height(&self) -> f32 {
        self.get(self.root()).map_or(0.0, LayoutBox::height)
    }

    /// Boxes in pre-order, starting at the document box.
    #[must_use]
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            layout: self,
            stack: if self.boxes.is_empty() {
                Vec::new()
            } else {
                vec![self.root()]
            },
        }
    }

    /// Every word placed anywhere in the document, in paint order.
    pub fn words(&self) -> impl Iterator<Item = &PlacedWord> {
        self.iter().flat_map(|(_, layout_box)| layout_box.words.iter())
    }

    /// Human-readable outline of the box tree, one box per line.
    #[must_use]
    pub fn outline(&self, dom: &DomTree) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root(), 0_usize)];
        while let Some((id, depth)) = stack.pop() {
            let Some(b) = self.get(id) else {
                continue;
            };
            let label = match &b.content {
                BoxContent::Document => "document".to_string(),
                BoxContent::Node(node) => match dom.tag_name(*node) {
                    Some(tag) => format!("<{tag}>"),
                    None => "#text".to_string(),
                },
                BoxContent::Anonymous(nodes) => format!("anonymous({})", nodes.len()),
            };
            let _ = writeln!(
                out,
                "{:indent$}{label} {:?} x={} y={} w={} h={} words={}",
                "",
                b.mode,
                b.x,
                b.y,
                b.width,
                b.height(),
                b.words.len(),
                indent = depth * 2
            );
            stack.extend(b.children.iter().rev().map(|&child| (child, depth + 1)));
        }
        out
    }
}

/// Pre-order iterator over a [`LayoutTree`].
pub struct PreOrder<'a> {
    layout: &'a LayoutTree,
    stack: Vec<BoxId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (BoxId, &'a LayoutBox);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let layout_box = self.layout.get(id)?;
        self.stack.extend(layout_box.children.iter().rev());
        Some((id, layout_box))
    }
}

/// Working state of one layout pass.
struct LayoutEngine<'a> {
    tree: &'a DomTree,
    config: &'a LayoutConfig,
    fonts: &'a mut FontCache,
    boxes: Vec<LayoutBox>,
}

/// A block box whose children are still being laid out.
struct BlockFrame {
    id: BoxId,
    contents: std::vec::IntoIter<BoxContent>,
    marker: Option<String>,
    previous: Option<BoxId>,
    height: f32,
}

impl LayoutEngine<'_> {
    fn push(&mut self, content: BoxContent, parent: Option<BoxId>, previous: Option<BoxId>) -> BoxId {
        let id = BoxId(self.boxes.len());
        self.boxes.push(LayoutBox::new(content, parent, previous));
        id
    }

    /// Lay out `root` and everything under it. Block boxes waiting on their
    /// children sit on an explicit stack, so nesting depth never grows the
    /// call stack.
    fn run(&mut self, root: BoxId) {
        let mut stack: Vec<BlockFrame> = Vec::new();
        if let Some(frame) = self.enter(root) {
            stack.push(frame);
        }

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            if let Some(content) = frame.contents.next() {
                let parent = frame.id;
                let child = self.push(content, Some(parent), frame.previous);
                self.boxes[parent.0].children.push(child);
                self.boxes[child.0].marker = frame.marker.take();
                match self.enter(child) {
                    Some(child_frame) => stack.push(child_frame),
                    None => self.adopt(frame, child),
                }
            } else {
                let Some(done) = stack.pop() else {
                    break;
                };
                self.boxes[done.id.0].height = Some(done.height);
                if let Some(parent) = stack.last_mut() {
                    self.adopt(parent, done.id);
                }
            }
        }
    }

    /// Place a box and pick its mode. An inline box is laid out on the spot;
    /// a block box comes back as a frame whose children are still pending.
    fn enter(&mut self, id: BoxId) -> Option<BlockFrame> {
        self.place(id);
        self.indent_list_item(id);

        let mode = self.mode_of(id);
        self.boxes[id.0].mode = mode;

        #[cfg(feature = "layout-trace")]
        {
            let b = &self.boxes[id.0];
            let depth = std::iter::successors(b.parent, |p| self.boxes[p.0].parent).count();
            log::trace!(
                "{:indent$}{:?} {:?} x={} y={} w={}",
                "",
                b.content,
                mode,
                b.x,
                b.y,
                b.width,
                indent = depth * 2
            );
        }

        match mode {
            LayoutMode::Block => Some(self.open_block(id)),
            LayoutMode::Inline => {
                self.layout_inline(id);
                None
            }
        }
    }

    /// Position a box from its parent and previous sibling.
    fn place(&mut self, id: BoxId) {
        let (parent, previous) = {
            let b = &self.boxes[id.0];
            (b.parent, b.previous)
        };

        let (x, y, width) = match parent {
            None => (
                self.config.hstep,
                self.config.vstep,
                2.0_f32.mul_add(-self.config.hstep, self.config.width),
            ),
            Some(parent) => {
                let p = &self.boxes[parent.0];
                let y = previous.map_or(p.y, |prev| self.boxes[prev.0].bottom());
                (p.x, y, p.width)
            }
        };

        let b = &mut self.boxes[id.0];
        b.x = x;
        b.y = y;
        b.width = width;
    }

    /// The first `li` box directly inside a `ul` or `ol` box shifts both
    /// itself and the list box right by twice the font size.
    fn indent_list_item(&mut self, id: BoxId) {
        let b = &self.boxes[id.0];
        if b.previous.is_some() || !self.is_tag(b.node(), "li") {
            return;
        }
        let Some(parent) = b.parent else {
            return;
        };
        let parent_node = self.boxes[parent.0].node();
        if !(self.is_tag(parent_node, "ul") || self.is_tag(parent_node, "ol")) {
            return;
        }

        let shift = 2.0 * self.config.font_size as f32;
        self.boxes[id.0].x += shift;
        self.boxes[parent.0].x += shift;
    }

    fn mode_of(&self, id: BoxId) -> LayoutMode {
        match &self.boxes[id.0].content {
            BoxContent::Document => LayoutMode::Block,
            BoxContent::Anonymous(_) => LayoutMode::Inline,
            BoxContent::Node(node) => {
                let has_block_child = self.tree.as_element(*node).is_some()
                    && self.tree.children(*node).iter().any(|&child| {
                        self.tree
                            .tag_name(child)
                            .is_some_and(is_block_element)
                    });
                if has_block_child {
                    LayoutMode::Block
                } else {
                    LayoutMode::Inline
                }
            }
        }
    }

    /// Generate the child contents of a block box. A block-mode `li` hands
    /// its marker to its first child.
    fn open_block(&mut self, id: BoxId) -> BlockFrame {
        let contents = self.child_contents(id);

        let mut marker = self.boxes[id.0].marker.take();
        if let Some(node) = self.boxes[id.0].node()
            && self.tree.tag_name(node) == Some("li")
        {
            marker = Some(list_marker(self.tree, node));
        }

        BlockFrame {
            id,
            contents: contents.into_iter(),
            marker,
            previous: None,
            height: 0.0,
        }
    }

    /// Stack a finished child under its previous sibling. A pending paragraph
    /// gap between the two (the child's leading gap, else the sibling's
    /// trailing gap) pushes the child down. The first child's leading gap and
    /// the last child's trailing gap become the parent's own.
    fn adopt(&mut self, frame: &mut BlockFrame, child: BoxId) {
        let leading = self.boxes[child.0].leading_gap;
        match frame.previous {
            None => self.boxes[frame.id.0].leading_gap = leading,
            Some(previous) => {
                if let Some(gap) = leading.or(self.boxes[previous.0].trailing_gap) {
                    self.shift(child, gap as f32);
                    frame.height += gap as f32;
                }
            }
        }

        frame.height += self.boxes[child.0].height();
        self.boxes[frame.id.0].trailing_gap = self.boxes[child.0].trailing_gap;
        frame.previous = Some(child);
    }

    /// Move a laid-out box, its descendants and their words down by `dy`.
    fn shift(&mut self, id: BoxId, dy: f32) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let b = &mut self.boxes[id.0];
            b.y += dy;
            for word in &mut b.words {
                word.y += dy;
                word.bottom += dy;
            }
            pending.extend(b.children.iter().copied());
        }
    }

    /// Block-level children get a box each; runs of anything else are
    /// grouped into one anonymous box. Hidden elements get nothing.
    fn child_contents(&self, id: BoxId) -> Vec<BoxContent> {
        let node = match &self.boxes[id.0].content {
            BoxContent::Document => return vec![BoxContent::Node(self.tree.root())],
            BoxContent::Anonymous(_) => return Vec::new(),
            BoxContent::Node(node) => *node,
        };

        let mut contents = Vec::new();
        let mut run = Vec::new();
        for &child in self.tree.children(node) {
            match self.tree.tag_name(child) {
                Some(tag) if HIDDEN_ELEMENTS.contains(&tag) => {}
                Some(tag) if is_block_element(tag) => {
                    if !run.is_empty() {
                        contents.push(BoxContent::Anonymous(std::mem::take(&mut run)));
                    }
                    contents.push(BoxContent::Node(child));
                }
                _ => run.push(child),
            }
        }
        if !run.is_empty() {
            contents.push(BoxContent::Anonymous(run));
        }
        contents
    }

    /// Flow this box's text and record the height it used.
    fn layout_inline(&mut self, id: BoxId) {
        let (x, y, width) = {
            let b = &self.boxes[id.0];
            (b.x, b.y, b.width)
        };
        let nodes = match &self.boxes[id.0].content {
            BoxContent::Node(node) => vec![*node],
            BoxContent::Anonymous(nodes) => nodes.clone(),
            BoxContent::Document => Vec::new(),
        };
        let marker = self.boxes[id.0].marker.take();

        let style = TextStyle::new(self.config.font_family.clone(), self.config.font_size);
        let mut flow = InlineFlow::new(self.tree, self.fonts, (x, y, width), style);
        if let Some(marker) = &marker {
            flow.word(marker);
        }
        for node in nodes {
            flow.walk(node);
        }
        let output = flow.finish();

        let b = &mut self.boxes[id.0];
        b.marker = marker;
        b.words = output.words;
        b.height = Some(output.bottom - y);
        b.leading_gap = output.leading_gap;
        b.trailing_gap = output.trailing_gap;
    }

    fn is_tag(&self, node: Option<NodeId>, tag: &str) -> bool {
        node.and_then(|n| self.tree.tag_name(n)) == Some(tag)
    }
}
