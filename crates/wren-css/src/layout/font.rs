//! Text measurement seam and the font metrics cache.
//!
//! Layout never talks to a font library directly. It asks a
//! [`TextMeasurer`] for advance widths and line metrics, through a
//! [`FontCache`] that remembers answers per [`FontKey`].

use std::collections::HashMap;

use serde::Serialize;
use strum_macros::Display;

/// Font weight used by inline layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// Font slant used by inline layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright.
    #[default]
    Roman,
    /// Italic.
    Italic,
}

/// Everything that identifies a font for measurement and drawing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FontKey {
    /// Family name, `None` for the measurer's default face.
    pub family: Option<String>,
    /// Size in whole pixels.
    pub size: u32,
    /// Weight.
    pub weight: FontWeight,
    /// Slant.
    pub style: FontStyle,
}

impl FontKey {
    /// Size as `f32`, for arithmetic.
    #[must_use]
    pub fn size_px(&self) -> f32 {
        self.size as f32
    }
}

/// Vertical metrics of a font.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LineMetrics {
    /// Distance from the baseline to the top of the tallest glyphs.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the lowest glyphs,
    /// as a positive number.
    pub descent: f32,
    /// Recommended distance between baselines.
    pub linespace: f32,
}

/// Text measurement service provided by whoever draws the text.
pub trait TextMeasurer {
    /// Advance width of `text` set in `font`.
    fn measure(&self, font: &FontKey, text: &str) -> f32;

    /// Vertical metrics of `font`.
    fn metrics(&self, font: &FontKey) -> LineMetrics;
}

/// Fixed-ratio metrics for tests and for running without font files.
///
/// Every glyph advances half the font size; ascent is three quarters of the
/// size and descent one quarter. Both ratios are exact in binary, so layout
/// arithmetic on them is exact too.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateTextMeasurer;

impl ApproximateTextMeasurer {
    /// Advance of one glyph as a fraction of the font size.
    pub const ADVANCE_RATIO: f32 = 0.5;
    /// Ascent as a fraction of the font size.
    pub const ASCENT_RATIO: f32 = 0.75;
    /// Descent as a fraction of the font size.
    pub const DESCENT_RATIO: f32 = 0.25;
}

impl TextMeasurer for ApproximateTextMeasurer {
    fn measure(&self, font: &FontKey, text: &str) -> f32 {
        text.chars().count() as f32 * font.size_px() * Self::ADVANCE_RATIO
    }

    fn metrics(&self, font: &FontKey) -> LineMetrics {
        let ascent = font.size_px() * Self::ASCENT_RATIO;
        let descent = font.size_px() * Self::DESCENT_RATIO;
        LineMetrics {
            ascent,
            descent,
            linespace: ascent + descent,
        }
    }
}

#[derive(Debug, Default)]
struct CachedFont {
    metrics: Option<LineMetrics>,
    widths: HashMap<String, f32>,
}

/// Memoizes a [`TextMeasurer`] per [`FontKey`].
///
/// Unbounded by default. With a capacity, at most that many measurements
/// (line metrics and word widths, across all fonts) are kept; the whole cache
/// is dropped when one more would exceed it.
pub struct FontCache {
    measurer: Box<dyn TextMeasurer>,
    fonts: HashMap<FontKey, CachedFont>,
    entries: usize,
    capacity: Option<usize>,
}

impl FontCache {
    /// An unbounded cache over `measurer`.
    #[must_use]
    pub fn new(measurer: Box<dyn TextMeasurer>) -> Self {
        Self {
            measurer,
            fonts: HashMap::new(),
            entries: 0,
            capacity: None,
        }
    }

    /// A cache holding at most `capacity` measurements. `None` means
    /// unbounded.
    #[must_use]
    pub fn with_capacity(measurer: Box<dyn TextMeasurer>, capacity: Option<usize>) -> Self {
        Self {
            capacity,
            ..Self::new(measurer)
        }
    }

    /// Number of distinct fonts currently cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Number of measurements currently cached.
    #[must_use]
    pub const fn entries(&self) -> usize {
        self.entries
    }

    /// True when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Drop every cached measurement.
    pub fn clear(&mut self) {
        self.fonts.clear();
        self.entries = 0;
    }

    /// Cached advance width of `text` in `font`.
    pub fn measure(&mut self, font: &FontKey, text: &str) -> f32 {
        if let Some(&width) = self.fonts.get(font).and_then(|f| f.widths.get(text)) {
            return width;
        }
        let width = self.measurer.measure(font, text);
        let _ = self.slot(font).widths.insert(text.to_string(), width);
        width
    }

    /// Cached vertical metrics of `font`.
    pub fn metrics(&mut self, font: &FontKey) -> LineMetrics {
        if let Some(metrics) = self.fonts.get(font).and_then(|f| f.metrics) {
            return metrics;
        }
        let metrics = self.measurer.metrics(font);
        self.slot(font).metrics = Some(metrics);
        metrics
    }

    /// The entry for `font`, after making room for one more measurement.
    fn slot(&mut self, font: &FontKey) -> &mut CachedFont {
        if let Some(capacity) = self.capacity
            && self.entries >= capacity
        {
            log::debug!("font cache full ({capacity} measurements), clearing");
            self.clear();
        }
        self.entries += 1;
        self.fonts.entry(font.clone()).or_default()
    }
}
