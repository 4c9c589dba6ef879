//! Software renderer for headless screenshots.
//!
//! Executes a [`DisplayList`] into an RGBA buffer, using fontdue to
//! rasterise glyphs.
//!
//! ```text
//! Layout -> Paint -> Render
//!             |        |
//!       DisplayList -> Pixels
//! ```
//!
//! The renderer knows nothing about the DOM, CSS or layout. It only draws
//! the commands that intersect the scrolled window, shifted up by the scroll
//! offset.

use std::path::Path;
use std::rc::Rc;

use anyhow::{Context as _, Result};
use image::{ImageBuffer, Rgba, RgbaImage};
use wren_common::warning::warn_once;
use wren_css::{DisplayList, DrawCommand, FontKey};

use crate::color::Color;
use crate::font_metrics::FontSet;

/// Text colour. Draw commands carry none.
const TEXT_COLOR: Color = Color::BLACK;

/// Executes draw commands into a pixel buffer.
pub struct Renderer {
    buffer: RgbaImage,
    width: u32,
    height: u32,
    fonts: Rc<FontSet>,
}

impl Renderer {
    /// A white canvas of the given size, drawing text with `fonts`.
    #[must_use]
    pub fn new(width: u32, height: u32, fonts: Rc<FontSet>) -> Self {
        Self {
            buffer: ImageBuffer::from_pixel(width, height, Color::WHITE.into()),
            width,
            height,
            fonts,
        }
    }

    /// Draw every command visible with the window scrolled to `scroll`.
    pub fn render(&mut self, display_list: &DisplayList, scroll: f32) {
        let mut drawn = 0_usize;
        for command in display_list.visible(scroll, self.height as f32) {
            self.execute(command, scroll);
            drawn += 1;
        }
        log::debug!(
            "drew {drawn} of {} commands at scroll {scroll}",
            display_list.len()
        );
    }

    /// The rendered pixels.
    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.buffer
    }

    fn execute(&mut self, command: &DrawCommand, scroll: f32) {
        match command {
            DrawCommand::DrawRect {
                left,
                top,
                right,
                bottom,
                color,
            } => {
                let Some(color) = Color::parse(color) else {
                    let _ = warn_once("Renderer", &format!("unknown colour '{color}'"));
                    return;
                };
                self.fill_rect(*left, top - scroll, *right, bottom - scroll, color);
            }
            DrawCommand::DrawText {
                left,
                top,
                text,
                font,
                ..
            } => self.draw_text(text, *left, top - scroll, font),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn fill_rect(&mut self, left: f32, top: f32, right: f32, bottom: f32, color: Color) {
        let x0 = left.max(0.0) as u32;
        let y0 = top.max(0.0) as u32;
        let x1 = (right.max(0.0) as u32).min(self.width);
        let y1 = (bottom.max(0.0) as u32).min(self.height);

        let rgba: Rgba<u8> = color.into();
        for y in y0..y1 {
            for x in x0..x1 {
                if color.a == 255 {
                    self.buffer.put_pixel(x, y, rgba);
                } else {
                    let bg = *self.buffer.get_pixel(x, y);
                    self.buffer.put_pixel(x, y, alpha_blend(rgba, bg, color.a));
                }
            }
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap
    )]
    fn draw_text(&mut self, text: &str, x: f32, y: f32, key: &FontKey) {
        let fonts = Rc::clone(&self.fonts);
        let Some(font) = fonts.select(key.weight, key.style) else {
            return;
        };

        let size = key.size_px();
        let ascent = font
            .horizontal_line_metrics(size)
            .map_or(size, |line| line.ascent);
        // `y` is the top of the line slot; glyph bitmaps hang off the
        // baseline 1.25 * ascent below it.
        let baseline = 1.25_f32.mul_add(ascent, y);
        let rgba: Rgba<u8> = TEXT_COLOR.into();
        let mut cursor_x = x;

        for ch in text.chars().filter(|ch| !ch.is_control()) {
            let (metrics, bitmap) = font.rasterize(ch, size);
            let glyph_x = cursor_x as i32 + metrics.xmin;
            let glyph_y = baseline as i32 - metrics.ymin - metrics.height as i32;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let alpha = bitmap[gy * metrics.width + gx];
                    if alpha == 0 {
                        continue;
                    }
                    let px = glyph_x + gx as i32;
                    let py = glyph_y + gy as i32;
                    if px >= 0 && py >= 0 && (px as u32) < self.width && (py as u32) < self.height
                    {
                        let bg = *self.buffer.get_pixel(px as u32, py as u32);
                        self.buffer
                            .put_pixel(px as u32, py as u32, alpha_blend(rgba, bg, alpha));
                    }
                }
            }

            cursor_x += metrics.advance_width;
        }
    }

    /// Write the buffer as an image; the format follows the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be written to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.buffer
            .save(path)
            .with_context(|| format!("failed to save screenshot to '{}'", path.display()))
    }
}

/// Blend `fg` over `bg` with coverage `alpha`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha_blend(fg: Rgba<u8>, bg: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = f32::from(alpha) / 255.0;
    let inv_a = 1.0 - a;

    Rgba([
        f32::from(fg[0]).mul_add(a, f32::from(bg[0]) * inv_a) as u8,
        f32::from(fg[1]).mul_add(a, f32::from(bg[1]) * inv_a) as u8,
        f32::from(fg[2]).mul_add(a, f32::from(bg[2]) * inv_a) as u8,
        255,
    ])
}
