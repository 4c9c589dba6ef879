//! System fonts and fontdue-backed text measurement.
//!
//! The same [`FontSet`] feeds layout (through [`FontdueTextMeasurer`]) and
//! the [`Renderer`](crate::renderer::Renderer), so words are measured with
//! the faces they are drawn in.

use std::rc::Rc;

use fontdue::{Font, FontSettings};
use wren_css::{
    ApproximateTextMeasurer, FontKey, FontStyle, FontWeight, LineMetrics, TextMeasurer,
};

/// Common system font paths for the regular face.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
];

const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

const FONT_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/Library/Fonts/Arial Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansOblique.ttf",
    "C:\\Windows\\Fonts\\ariali.ttf",
];

const FONT_BOLD_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/Library/Fonts/Arial Bold Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBoldOblique.ttf",
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

/// Regular, bold, italic and bold-italic faces. Any of them may be missing.
#[derive(Default)]
pub struct FontSet {
    regular: Option<Font>,
    bold: Option<Font>,
    italic: Option<Font>,
    bold_italic: Option<Font>,
}

impl FontSet {
    /// Load faces from the usual system locations.
    ///
    /// If `family` names a font file, that file is used for every variant
    /// instead.
    #[must_use]
    pub fn load(family: Option<&str>) -> Self {
        if let Some(font) = family.and_then(|path| load_font(&[path], "family")) {
            return Self {
                regular: Some(font),
                ..Self::default()
            };
        }

        let set = Self {
            regular: load_font(FONT_SEARCH_PATHS, "regular"),
            bold: load_font(FONT_BOLD_SEARCH_PATHS, "bold"),
            italic: load_font(FONT_ITALIC_SEARCH_PATHS, "italic"),
            bold_italic: load_font(FONT_BOLD_ITALIC_SEARCH_PATHS, "bold-italic"),
        };
        if set.regular.is_none() {
            log::warn!(
                "no system font found in {} locations; text will be measured approximately and not drawn",
                FONT_SEARCH_PATHS.len()
            );
        }
        set
    }

    /// An empty set, for running without any font files.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when at least the regular face loaded.
    #[must_use]
    pub const fn has_fonts(&self) -> bool {
        self.regular.is_some()
    }

    /// Best face for a weight and style, falling back towards regular.
    #[must_use]
    pub fn select(&self, weight: FontWeight, style: FontStyle) -> Option<&Font> {
        let bold = weight == FontWeight::Bold;
        let italic = style == FontStyle::Italic;
        match (bold, italic) {
            (true, true) => self
                .bold_italic
                .as_ref()
                .or(self.bold.as_ref())
                .or(self.italic.as_ref())
                .or(self.regular.as_ref()),
            (true, false) => self.bold.as_ref().or(self.regular.as_ref()),
            (false, true) => self.italic.as_ref().or(self.regular.as_ref()),
            (false, false) => self.regular.as_ref(),
        }
    }
}

fn load_font(paths: &[&str], label: &str) -> Option<Font> {
    for path in paths {
        if let Ok(data) = std::fs::read(path)
            && let Ok(font) = Font::from_bytes(data, FontSettings::default())
        {
            log::debug!("loaded {label} font: {path}");
            return Some(font);
        }
    }
    None
}

/// [`TextMeasurer`] that asks fontdue for advance widths and line metrics.
///
/// Falls back to [`ApproximateTextMeasurer`] when no face is available.
pub struct FontdueTextMeasurer {
    fonts: Rc<FontSet>,
}

impl FontdueTextMeasurer {
    /// Measure with the faces in `fonts`.
    #[must_use]
    pub const fn new(fonts: Rc<FontSet>) -> Self {
        Self { fonts }
    }
}

impl TextMeasurer for FontdueTextMeasurer {
    fn measure(&self, font: &FontKey, text: &str) -> f32 {
        let Some(face) = self.fonts.select(font.weight, font.style) else {
            return ApproximateTextMeasurer.measure(font, text);
        };
        // Uses metrics() rather than rasterize(): no bitmaps needed here.
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| face.metrics(ch, font.size_px()).advance_width)
            .sum()
    }

    fn metrics(&self, font: &FontKey) -> LineMetrics {
        let line = self
            .fonts
            .select(font.weight, font.style)
            .and_then(|face| face.horizontal_line_metrics(font.size_px()));
        match line {
            Some(line) => LineMetrics {
                ascent: line.ascent,
                descent: -line.descent,
                linespace: line.new_line_size,
            },
            None => ApproximateTextMeasurer.metrics(font),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_falls_back_to_approximation() {
        let measurer = FontdueTextMeasurer::new(Rc::new(FontSet::empty()));
        let key = FontKey {
            size: 16,
            ..FontKey::default()
        };
        assert_eq!(measurer.measure(&key, "abcd"), 32.0);
        assert_eq!(measurer.metrics(&key).ascent, 12.0);
    }

    #[test]
    fn test_select_on_empty_set() {
        let set = FontSet::empty();
        assert!(!set.has_fonts());
        assert!(set.select(FontWeight::Bold, FontStyle::Italic).is_none());
    }
}
