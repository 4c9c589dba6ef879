//! Inline text flow.
//!
//! An inline-mode box walks its DOM content in document order and turns every
//! whitespace-separated word into a [`PlacedWord`]. Words collect in a line
//! buffer. When a line ends, the whole buffer is aligned on a common baseline:
//!
//! ```text
//! baseline = y + 1.25 * max(ascent)
//! word.y   = baseline - 1.25 * word.ascent
//! next y   = baseline + 1.25 * max(descent)
//! ```
//!
//! A line ends when the next word would overflow the box (and the box is at
//! least as wide as that word), after a `<br>`, or when paragraph spacing was
//! requested by `<p>` or a heading.
//!
//! Text styling is keyed off tag names. Entering an element pushes a snapshot
//! of the current style, and leaving it pops the snapshot back, so unusual
//! nesting can never leak a style into a sibling. The walk itself runs off an
//! explicit stack of enter/exit steps, so nesting depth is bounded by memory
//! rather than by the call stack.

use serde::Serialize;
use wren_dom::{DomTree, NodeId, NodeType};

use super::font::{FontCache, FontKey, FontStyle, FontWeight, LineMetrics};
use super::{HIDDEN_ELEMENTS, LINE_HEIGHT_FACTOR, list_marker};

/// Scale factors applied to the font size by heading elements.
const HEADING_SCALE: &[(&str, f64)] = &[
    ("h1", 3.0),
    ("h2", 2.0),
    ("h3", 1.5),
    ("h4", 1.1),
    ("h5", 0.8),
    ("h6", 0.5),
];

/// A word positioned by inline layout, ready to paint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedWord {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Bottom edge, `y` plus one line height of the word's font. Used for
    /// culling.
    pub bottom: f32,
    /// The word itself.
    pub text: String,
    /// Font the word is set in.
    pub font: FontKey,
}

/// The mutable text style of a flow. Snapshots of it form the style stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    /// Font family, `None` for the default face.
    pub family: Option<String>,
    /// Font size in pixels.
    pub size: u32,
    /// Weight.
    pub weight: FontWeight,
    /// Slant.
    pub style: FontStyle,
}

impl TextStyle {
    /// Normal upright text in `family` at `size`.
    #[must_use]
    pub const fn new(family: Option<String>, size: u32) -> Self {
        Self {
            family,
            size,
            weight: FontWeight::Normal,
            style: FontStyle::Roman,
        }
    }

    fn font_key(&self) -> FontKey {
        FontKey {
            family: self.family.clone(),
            size: self.size,
            weight: self.weight,
            style: self.style,
        }
    }
}

/// What an inline flow produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowOutput {
    /// Every word, positioned.
    pub words: Vec<PlacedWord>,
    /// Cursor y once the last line ended.
    pub bottom: f32,
    /// Paragraph gap marked before the first word.
    pub leading_gap: Option<u32>,
    /// Paragraph gap marked after the last word.
    pub trailing_gap: Option<u32>,
}

/// One step of the document-order walk.
enum Step {
    Enter(NodeId),
    Exit(NodeId),
}

/// A buffered word waiting for its line to end.
struct LineItem {
    x: f32,
    text: String,
    font: FontKey,
    metrics: LineMetrics,
}

/// Text flow state for one inline-mode box. Lives only for that box's layout.
pub struct InlineFlow<'a> {
    tree: &'a DomTree,
    fonts: &'a mut FontCache,
    left: f32,
    width: f32,
    cursor_x: f32,
    cursor_y: f32,
    style: TextStyle,
    style_stack: Vec<TextStyle>,
    /// Size saved by the most recent h1/h2/h3/h5/h6. `h4` scales this value
    /// rather than the current size, and it is not restored when elements
    /// close.
    heading_saved_size: u32,
    line: Vec<LineItem>,
    pending_break: bool,
    /// Gap, in pixels, to add once the current line ends.
    pending_paragraph: Option<u32>,
    leading_gap: Option<u32>,
    words: Vec<PlacedWord>,
}

impl<'a> InlineFlow<'a> {
    /// Start a flow at the top-left corner `(x, y)` of a box `width` wide.
    pub fn new(
        tree: &'a DomTree,
        fonts: &'a mut FontCache,
        (x, y, width): (f32, f32, f32),
        style: TextStyle,
    ) -> Self {
        Self {
            tree,
            fonts,
            left: x,
            width,
            cursor_x: x,
            cursor_y: y,
            heading_saved_size: style.size,
            style,
            style_stack: Vec::new(),
            line: Vec::new(),
            pending_break: false,
            pending_paragraph: None,
            leading_gap: None,
            words: Vec::new(),
        }
    }

    /// Lay out `node` and everything under it.
    pub fn walk(&mut self, node: NodeId) {
        let tree = self.tree;
        let mut steps = vec![Step::Enter(node)];

        while let Some(step) = steps.pop() {
            match step {
                Step::Enter(id) => {
                    let Some(dom_node) = tree.get(id) else {
                        continue;
                    };
                    match &dom_node.node_type {
                        NodeType::Text(text) => {
                            for word in text.split_whitespace() {
                                self.word(word);
                            }
                        }
                        NodeType::Element(data) => {
                            let tag = data.tag_name.as_str();
                            if HIDDEN_ELEMENTS.contains(&tag) {
                                continue;
                            }
                            self.open_tag(id, tag);
                            steps.push(Step::Exit(id));
                            steps.extend(tree.children(id).iter().rev().map(|&c| Step::Enter(c)));
                        }
                    }
                }
                Step::Exit(id) => {
                    if let Some(tag) = tree.tag_name(id) {
                        self.close_tag(tag);
                    }
                }
            }
        }
    }

    /// Lay out a single word in the current style.
    pub fn word(&mut self, text: &str) {
        let font = self.style.font_key();
        let width = self.fonts.measure(&font, text);

        let overflows = self.width > width && (self.cursor_x - self.left) + width > self.width;
        let forced = std::mem::take(&mut self.pending_break);
        let gap = self.pending_paragraph.take();
        if self.words.is_empty() && self.line.is_empty() && gap.is_some() {
            // Nothing above this word in the flow to separate it from.
            self.leading_gap = gap;
        }
        if overflows || forced || gap.is_some() {
            self.flush_line(gap);
        }

        let metrics = self.fonts.metrics(&font);
        let space = self.fonts.measure(&font, " ");
        self.line.push(LineItem {
            x: self.cursor_x,
            text: text.to_string(),
            font,
            metrics,
        });
        self.cursor_x += width + space;
    }

    /// End the last line.
    #[must_use]
    pub fn finish(mut self) -> FlowOutput {
        let trailing_gap = self.pending_paragraph.take();
        self.flush_line(None);
        FlowOutput {
            words: self.words,
            bottom: self.cursor_y,
            leading_gap: self.leading_gap,
            trailing_gap,
        }
    }

    fn open_tag(&mut self, node: NodeId, tag: &str) {
        self.style_stack.push(self.style.clone());

        match tag {
            "b" => self.style.weight = FontWeight::Bold,
            "i" => self.style.style = FontStyle::Italic,
            "small" => self.style.size = self.style.size.saturating_sub(2),
            "big" => self.style.size += 4,
            "br" | "br/" => self.pending_break = true,
            "p" => self.mark_paragraph(),
            "h4" => {
                self.style.size = scale(self.heading_saved_size, heading_scale("h4"));
                self.style.weight = FontWeight::Bold;
                self.mark_paragraph();
            }
            "h1" | "h2" | "h3" | "h5" | "h6" => {
                self.heading_saved_size = self.style.size;
                self.style.size = scale(self.style.size, heading_scale(tag));
                self.style.weight = FontWeight::Bold;
                self.mark_paragraph();
            }
            "li" => {
                let marker = list_marker(self.tree, node);
                self.word(&marker);
            }
            _ => {}
        }
    }

    fn close_tag(&mut self, tag: &str) {
        if let Some(saved) = self.style_stack.pop() {
            self.style = saved;
        }

        if tag == "p" || is_heading(tag) {
            self.mark_paragraph();
        }
    }

    fn mark_paragraph(&mut self) {
        self.pending_paragraph = Some(self.style.size);
    }

    /// Align the buffered words on one baseline and move the cursor to the
    /// start of the next line. An empty buffer only resets x.
    fn flush_line(&mut self, gap: Option<u32>) {
        self.cursor_x = self.left;
        if self.line.is_empty() {
            return;
        }

        let max_ascent = self
            .line
            .iter()
            .map(|item| item.metrics.ascent)
            .fold(0.0_f32, f32::max);
        let max_descent = self
            .line
            .iter()
            .map(|item| item.metrics.descent)
            .fold(0.0_f32, f32::max);
        let baseline = LINE_HEIGHT_FACTOR.mul_add(max_ascent, self.cursor_y);

        for item in self.line.drain(..) {
            let y = LINE_HEIGHT_FACTOR.mul_add(-item.metrics.ascent, baseline);
            self.words.push(PlacedWord {
                x: item.x,
                y,
                bottom: LINE_HEIGHT_FACTOR.mul_add(item.metrics.ascent + item.metrics.descent, y),
                text: item.text,
                font: item.font,
            });
        }

        self.cursor_y = LINE_HEIGHT_FACTOR.mul_add(max_descent, baseline);
        if let Some(gap) = gap {
            self.cursor_y += gap as f32;
        }
    }
}

fn heading_scale(tag: &str) -> f64 {
    HEADING_SCALE
        .iter()
        .find(|(name, _)| *name == tag)
        .map_or(1.0, |&(_, factor)| factor)
}

fn is_heading(tag: &str) -> bool {
    HEADING_SCALE.iter().any(|(name, _)| *name == tag)
}

/// Scale a pixel size, truncating toward zero.
fn scale(size: u32, factor: f64) -> u32 {
    (f64::from(size) * factor) as u32
}
