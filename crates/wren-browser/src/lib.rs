//! Document pipeline for the wren renderer.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - fetch a page and its linked stylesheets
//! - **Pipeline** - parse, cascade, layout and paint into a draw list
//! - **Zoom** - font size steps with a full relayout
//! - **Scrolling** - a vertical window over the draw list with culling
//! - **Software Rendering** - headless PNG screenshots
//!
//! # Not Yet Implemented
//!
//! - Images and other subresources
//! - Scripts
//! - Caching of fetched resources

pub mod color;
pub mod config;
pub mod font_metrics;
pub mod renderer;

pub use wren_css as css;
pub use wren_dom as dom;
pub use wren_html as html;

pub use config::RenderConfig;
pub use font_metrics::{FontSet, FontdueTextMeasurer};
pub use renderer::Renderer;

use std::path::Path;
use std::rc::Rc;

use thiserror::Error;
use wren_common::warning::{clear_warnings, warn_once};
use wren_common::{FetchError, Fetcher, NetFetcher, resolve_url};
use wren_css::{
    DisplayList, DrawCommand, FontCache, LayoutTree, StyleMap, Stylesheet, StylesheetSource,
    TextMeasurer, apply_styles, collect_stylesheet_sources, layout_document, paint,
};
use wren_dom::DomTree;
use wren_html::ParseIssue;

/// Failure to load a document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The primary document could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// A parsed, styled, laid-out and painted document.
pub struct Document {
    /// URL the document was loaded from, if any. Relative stylesheet links
    /// resolve against it.
    pub url: Option<String>,
    /// Markup as fetched.
    pub source: String,
    /// Parsed DOM.
    pub dom: DomTree,
    /// What the HTML parser recovered from.
    pub issues: Vec<ParseIssue>,
    /// Default sheet followed by the document's sheets, in cascade order.
    pub stylesheet: Stylesheet,
    /// Resolved properties per node.
    pub styles: StyleMap,
    /// Box tree for the current font size.
    pub layout: LayoutTree,
    /// Draw commands for the current font size.
    pub display_list: DisplayList,
}

/// Owns the configuration, fetcher and font cache, and at most one loaded
/// document with its zoom and scroll state.
pub struct Browser {
    config: RenderConfig,
    fetcher: Box<dyn Fetcher>,
    fonts: FontCache,
    font_set: Rc<FontSet>,
    font_size: u32,
    scroll: f32,
    document: Option<Document>,
}

impl Browser {
    /// A browser fetching over the network and measuring with system fonts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: RenderConfig) -> Result<Self, LoadError> {
        let font_set = Rc::new(FontSet::load(config.font_family.as_deref()));
        let measurer = FontdueTextMeasurer::new(Rc::clone(&font_set));
        let mut browser = Self::with_parts(config, Box::new(NetFetcher::new()?), Box::new(measurer));
        browser.font_set = font_set;
        Ok(browser)
    }

    /// A browser over any fetcher and text measurer. Nothing is drawn with
    /// fonts unless a [`FontSet`] is attached later.
    #[must_use]
    pub fn with_parts(
        config: RenderConfig,
        fetcher: Box<dyn Fetcher>,
        measurer: Box<dyn TextMeasurer>,
    ) -> Self {
        let fonts = FontCache::with_capacity(measurer, config.font_cache_capacity);
        Self {
            font_size: config.font_size,
            config,
            fetcher,
            fonts,
            font_set: Rc::new(FontSet::empty()),
            scroll: 0.0,
            document: None,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The loaded document, if any.
    #[must_use]
    pub const fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Current base font size.
    #[must_use]
    pub const fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Current scroll offset in pixels.
    #[must_use]
    pub const fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Fetch and render `url`. Local paths are accepted too.
    ///
    /// A failure to fetch the document itself leaves any previously loaded
    /// document in place. Linked stylesheets that fail to load are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Fetch`] if the document cannot be fetched.
    pub fn load(&mut self, url: &str) -> Result<(), LoadError> {
        clear_warnings();
        let url = normalize_location(url);
        log::info!("loading {url}");

        let response = self.fetcher.fetch(&url)?;
        self.load_html(&response.body, Some(&url));
        Ok(())
    }

    /// Render markup that is already in memory. Relative stylesheet links
    /// resolve against `base`.
    pub fn load_html(&mut self, html: &str, base: Option<&str>) {
        let (dom, issues) = wren_html::parse_with_issues(html);
        log::debug!("parsed {} nodes with {} issues", dom.len(), issues.len());

        let stylesheet = self.stylesheet_for(&dom, base);
        let styles = apply_styles(&dom, &stylesheet.rules);
        let (layout, display_list) = self.layout_and_paint(&dom, &styles);

        self.scroll = 0.0;
        self.document = Some(Document {
            url: base.map(str::to_string),
            source: html.to_string(),
            dom,
            issues,
            stylesheet,
            styles,
            layout,
            display_list,
        });
    }

    /// Grow the font by one zoom step, up to the maximum, and relayout.
    pub fn zoom_in(&mut self) {
        let size = self
            .font_size
            .saturating_add(self.config.zoom_step)
            .min(self.config.max_font_size);
        self.set_font_size(size);
    }

    /// Shrink the font by one zoom step, down to the minimum, and relayout.
    pub fn zoom_out(&mut self) {
        let size = self
            .font_size
            .saturating_sub(self.config.zoom_step)
            .max(self.config.min_font_size);
        self.set_font_size(size);
    }

    /// Scroll one step towards the end of the document.
    pub fn scroll_down(&mut self) {
        self.scroll += self.config.scroll_step;
    }

    /// Scroll one step back, never above the top.
    pub fn scroll_up(&mut self) {
        self.scroll = (self.scroll - self.config.scroll_step).max(0.0);
    }

    /// The full draw list, empty before the first load.
    #[must_use]
    pub fn display_list(&self) -> &[DrawCommand] {
        self.document
            .as_ref()
            .map(|doc| doc.display_list.commands())
            .unwrap_or_default()
    }

    /// Commands intersecting the current viewport, in paint order.
    #[must_use]
    pub fn visible_commands(&self) -> Vec<&DrawCommand> {
        let height = self.config.height as f32;
        self.document.as_ref().map_or_else(Vec::new, |doc| {
            doc.display_list.visible(self.scroll, height).collect()
        })
    }

    /// Rasterise the visible part of the document.
    #[must_use]
    pub fn render(&self) -> Renderer {
        let mut renderer = Renderer::new(
            self.config.width,
            self.config.height,
            Rc::clone(&self.font_set),
        );
        if let Some(doc) = &self.document {
            renderer.render(&doc.display_list, self.scroll);
        }
        renderer
    }

    /// Render and write a PNG screenshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be written.
    pub fn screenshot(&self, path: &Path) -> anyhow::Result<()> {
        self.render().save(path)
    }

    fn set_font_size(&mut self, size: u32) {
        if size == self.font_size {
            return;
        }
        log::debug!("font size {} -> {size}", self.font_size);
        self.font_size = size;
        self.relayout();
    }

    /// Rerun layout and paint from the already parsed and styled DOM.
    fn relayout(&mut self) {
        let Some(mut doc) = self.document.take() else {
            return;
        };
        let (layout, display_list) = self.layout_and_paint(&doc.dom, &doc.styles);
        doc.layout = layout;
        doc.display_list = display_list;
        self.document = Some(doc);
    }

    fn layout_and_paint(&mut self, dom: &DomTree, styles: &StyleMap) -> (LayoutTree, DisplayList) {
        let config = self.config.layout_config(self.font_size);
        let layout = layout_document(dom, &config, &mut self.fonts);
        let display_list = paint(dom, styles, &layout);
        (layout, display_list)
    }

    /// The default sheet, then each linked or inline sheet in document order.
    fn stylesheet_for(&self, dom: &DomTree, base: Option<&str>) -> Stylesheet {
        let mut stylesheet = Stylesheet::parse(&self.config.default_stylesheet);

        for source in collect_stylesheet_sources(dom) {
            match source {
                StylesheetSource::Inline(css) => stylesheet.append(Stylesheet::parse(&css)),
                StylesheetSource::External { href } => {
                    let url = resolve_url(&href, base);
                    match self.fetcher.fetch(&url) {
                        Ok(response) => stylesheet.append(Stylesheet::parse(&response.body)),
                        Err(err) => {
                            let _ = warn_once("Stylesheet", &format!("skipping {url}: {err}"));
                        }
                    }
                }
            }
        }

        log::debug!("cascading {} rules", stylesheet.rules.len());
        stylesheet
    }
}

/// Turn a local path into a `file://` URL so relative links resolve against
/// its directory. URLs pass through unchanged.
fn normalize_location(location: &str) -> String {
    if location.contains("://") {
        return location.to_string();
    }
    match std::fs::canonicalize(location) {
        Ok(path) => format!("file://{}", path.display()),
        Err(_) => location.to_string(),
    }
}
