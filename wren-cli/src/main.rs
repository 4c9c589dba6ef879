//! wren - headless HTML/CSS renderer
//!
//! Loads a page, runs it through parse, cascade, layout and paint, and prints
//! what came out or saves a screenshot.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use owo_colors::OwoColorize;
use wren_browser::{Browser, RenderConfig};
use wren_css::DrawCommand;
use wren_html::print_tree;

/// Render HTML and CSS without a window.
#[derive(Parser, Debug)]
#[command(name = "wren")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the draw list of a local file
    wren ./index.html

    # Inline markup, DOM and layout tree
    wren --html '<h1>Hello</h1><p>world</p>' --dom --layout

    # Zoom twice, scroll down five steps and take a screenshot
    wren --zoom-in 2 --scroll 5 -o shot.png http://localhost:8000/index.html
"#)]
struct Cli {
    /// Path to an HTML file or a URL
    #[arg(value_name = "FILE|URL", required_unless_present = "html")]
    path: Option<String>,

    /// Render this markup instead of loading a file or URL
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// JSON configuration file; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Viewport width
    #[arg(long)]
    width: Option<u32>,

    /// Viewport height
    #[arg(long)]
    height: Option<u32>,

    /// Base font size in pixels
    #[arg(long)]
    font_size: Option<u32>,

    /// Zoom in this many steps before output
    #[arg(long, value_name = "N", default_value_t = 0)]
    zoom_in: u32,

    /// Zoom out this many steps before output
    #[arg(long, value_name = "N", default_value_t = 0)]
    zoom_out: u32,

    /// Scroll down this many steps before output
    #[arg(long, value_name = "N", default_value_t = 0)]
    scroll: u32,

    /// Print the DOM tree and parse issues
    #[arg(long)]
    dom: bool,

    /// Print the layout box tree
    #[arg(long)]
    layout: bool,

    /// Print the whole draw list as JSON
    #[arg(long)]
    json: bool,

    /// Save a PNG screenshot of the visible window
    #[arg(short = 'o', long, value_name = "FILE")]
    screenshot: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = build_config(&cli)?;
    let mut browser = Browser::new(config)?;

    if let Some(html) = &cli.html {
        browser.load_html(html, None);
    } else if let Some(path) = &cli.path {
        browser
            .load(path)
            .with_context(|| format!("failed to load {path}"))?;
    }

    for _ in 0..cli.zoom_in {
        browser.zoom_in();
    }
    for _ in 0..cli.zoom_out {
        browser.zoom_out();
    }
    for _ in 0..cli.scroll {
        browser.scroll_down();
    }

    if cli.dom {
        print_dom(&browser);
    }
    if cli.layout {
        print_layout(&browser);
    }

    if cli.json {
        println!("{}", draw_list_json(&browser)?);
    } else if !cli.dom && !cli.layout && cli.screenshot.is_none() {
        print_draw_list(&browser);
    }

    if let Some(path) = &cli.screenshot {
        browser.screenshot(path)?;
        println!("Screenshot saved to: {}", path.display());
    }

    Ok(())
}

/// Config file first, then flags on top.
fn build_config(cli: &Cli) -> anyhow::Result<RenderConfig> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(size) = cli.font_size {
        config.font_size = size;
    }
    Ok(config)
}

/// Every draw command of the document, visible or not.
fn draw_list_json(browser: &Browser) -> serde_json::Result<String> {
    serde_json::to_string_pretty(browser.display_list())
}

fn header(title: &str) {
    println!("{}", format!("=== {title} ===").bold().cyan());
}

fn print_dom(browser: &Browser) {
    let Some(doc) = browser.document() else { return };
    header("DOM Tree");
    print_tree(&doc.dom, doc.dom.root(), 0);

    if !doc.issues.is_empty() {
        println!();
        header("Parse Issues");
        for issue in &doc.issues {
            println!("{} {} (token {})", "warning:".yellow(), issue.message, issue.token_index);
        }
    }
    println!();
}

fn print_layout(browser: &Browser) {
    let Some(doc) = browser.document() else { return };
    header(&format!(
        "Layout ({}px font, {} high)",
        browser.font_size(),
        doc.layout.document_height()
    ));
    print!("{}", doc.layout.outline(&doc.dom));
    println!();
}

fn print_draw_list(browser: &Browser) {
    let visible = browser.visible_commands();
    header(&format!(
        "Draw List ({} of {} visible at scroll {})",
        visible.len(),
        browser.display_list().len(),
        browser.scroll()
    ));
    for command in visible {
        match command {
            DrawCommand::DrawText {
                left,
                top,
                text,
                font,
                ..
            } => println!(
                "{} ({left}, {top}) {} {}px {} {}",
                "text".green(),
                text,
                font.size,
                font.weight,
                font.style
            ),
            DrawCommand::DrawRect {
                left,
                top,
                right,
                bottom,
                color,
            } => println!(
                "{} ({left}, {top}) - ({right}, {bottom}) {}",
                "rect".magenta(),
                color
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_holds_commands_below_the_viewport() {
        let config = RenderConfig {
            height: 20,
            ..RenderConfig::default()
        };
        let mut browser = Browser::new(config).unwrap();
        browser.load_html("<p>top</p><p>below</p>", None);
        assert_eq!(browser.visible_commands().len(), 1);

        let json: serde_json::Value = serde_json::from_str(&draw_list_json(&browser).unwrap()).unwrap();
        let commands = json.as_array().unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1]["text"], "below");
    }
}
