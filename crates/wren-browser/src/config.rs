//! Renderer configuration.

use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;
use wren_css::{DEFAULT_CSS, LayoutConfig};

/// Everything the pipeline needs that does not come from the document.
///
/// Deserializes from JSON; any missing field takes its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Font family (a font file path for the fontdue measurer), `None` for
    /// the system default.
    pub font_family: Option<String>,
    /// Base font size in pixels.
    pub font_size: u32,
    /// Smallest size zooming out can reach.
    pub min_font_size: u32,
    /// Largest size zooming in can reach.
    pub max_font_size: u32,
    /// Pixels added or removed per zoom step.
    pub zoom_step: u32,
    /// Pixels scrolled per scroll step.
    pub scroll_step: f32,
    /// Horizontal page inset.
    pub hstep: f32,
    /// Vertical page inset.
    pub vstep: f32,
    /// Maximum number of cached text measurements (line metrics and word
    /// widths), `None` for no bound.
    pub font_cache_capacity: Option<usize>,
    /// Stylesheet applied before any of the document's own.
    pub default_stylesheet: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            font_family: None,
            font_size: 16,
            min_font_size: 4,
            max_font_size: 32,
            zoom_step: 4,
            scroll_step: 18.0,
            hstep: 13.0,
            vstep: 16.0,
            font_cache_capacity: None,
            default_stylesheet: DEFAULT_CSS.to_string(),
        }
    }
}

impl RenderConfig {
    /// Read a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON for
    /// this structure.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid config '{}'", path.display()))
    }

    /// Parse a JSON configuration string.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The layout subset of this configuration at `font_size`.
    #[must_use]
    pub fn layout_config(&self, font_size: u32) -> LayoutConfig {
        LayoutConfig {
            width: self.width as f32,
            hstep: self.hstep,
            vstep: self.vstep,
            font_family: self.font_family.clone(),
            font_size,
        }
    }
}
