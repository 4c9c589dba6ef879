//! Draw commands and the display list.
//!
//! The display list is the only thing a renderer needs: commands in paint
//! order, back to front, each carrying enough vertical extent for the
//! renderer to skip commands outside the visible window.

use serde::Serialize;

use crate::layout::FontKey;

/// One drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum DrawCommand {
    /// Draw a word with its top-left corner at (`left`, `top`).
    DrawText {
        /// Left edge.
        left: f32,
        /// Top edge.
        top: f32,
        /// Bottom edge, `top` plus one line height.
        bottom: f32,
        /// Text to draw.
        text: String,
        /// Font to draw it in.
        font: FontKey,
    },
    /// Fill a rectangle.
    DrawRect {
        /// Left edge.
        left: f32,
        /// Top edge.
        top: f32,
        /// Right edge.
        right: f32,
        /// Bottom edge.
        bottom: f32,
        /// Fill colour exactly as the stylesheet spelled it.
        color: String,
    },
}

impl DrawCommand {
    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        match self {
            Self::DrawText { top, .. } | Self::DrawRect { top, .. } => *top,
        }
    }

    /// Bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> f32 {
        match self {
            Self::DrawText { bottom, .. } | Self::DrawRect { bottom, .. } => *bottom,
        }
    }

    /// Does any part of this command fall inside the window of `height`
    /// pixels starting at `scroll`?
    #[must_use]
    pub fn is_visible(&self, scroll: f32, height: f32) -> bool {
        self.top() <= scroll + height && self.bottom() >= scroll
    }
}

/// Draw commands in paint order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Append a command.
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// All commands, in paint order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True when there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands that intersect the window of `height` pixels starting at
    /// `scroll`, in paint order.
    pub fn visible(&self, scroll: f32, height: f32) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(move |command| command.is_visible(scroll, height))
    }
}

impl IntoIterator for DisplayList {
    type Item = DrawCommand;
    type IntoIter = std::vec::IntoIter<DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}
