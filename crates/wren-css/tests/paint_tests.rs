//! Integration tests for painting layout trees into display lists.

use wren_css::{
    ApproximateTextMeasurer, DisplayList, DrawCommand, FontCache, FontStyle, FontWeight,
    LayoutConfig, Stylesheet, apply_styles, default_stylesheet, layout_document, paint,
};

fn render(markup: &str, css: &Stylesheet, width: f32) -> DisplayList {
    let tree = wren_html::parse(markup);
    let styles = apply_styles(&tree, &css.rules);
    let config = LayoutConfig {
        width,
        ..LayoutConfig::default()
    };
    let mut fonts = FontCache::new(Box::new(ApproximateTextMeasurer));
    let layout = layout_document(&tree, &config, &mut fonts);
    paint(&tree, &styles, &layout)
}

fn texts(list: &DisplayList) -> Vec<&str> {
    list.commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::DrawText { text, .. } => Some(text.as_str()),
            DrawCommand::DrawRect { .. } => None,
        })
        .collect()
}

fn rects(list: &DisplayList) -> Vec<(f32, f32, f32, f32, &str)> {
    list.commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::DrawRect {
                left,
                top,
                right,
                bottom,
                color,
            } => Some((*left, *top, *right, *bottom, color.as_str())),
            DrawCommand::DrawText { .. } => None,
        })
        .collect()
}

#[test]
fn test_bold_italic_draw_list() {
    let list = render(
        "<body><b>Bold</b> <i>Italic</i></body>",
        &Stylesheet::default(),
        400.0,
    );
    assert_eq!(list.len(), 2);

    let DrawCommand::DrawText {
        left: bold_x,
        top: bold_y,
        font: bold_font,
        ..
    } = &list.commands()[0]
    else {
        panic!("expected text, got {:?}", list.commands()[0]);
    };
    let DrawCommand::DrawText {
        left: italic_x,
        top: italic_y,
        text,
        font: italic_font,
        ..
    } = &list.commands()[1]
    else {
        panic!("expected text, got {:?}", list.commands()[1]);
    };

    assert_eq!(text, "Italic");
    assert_eq!(bold_font.weight, FontWeight::Bold);
    assert_eq!(bold_font.style, FontStyle::Roman);
    assert_eq!(italic_font.weight, FontWeight::Normal);
    assert_eq!(italic_font.style, FontStyle::Italic);
    assert_eq!(bold_y, italic_y);
    assert!(*italic_x >= bold_x + 32.0 + 8.0);
}

#[test]
fn test_no_styles_no_rects() {
    let list = render("<p>plain text</p>", &Stylesheet::default(), 800.0);
    assert!(rects(&list).is_empty());
    assert_eq!(texts(&list), vec!["plain", "text"]);
}

#[test]
fn test_background_rect_spans_box_before_text() {
    let list = render(
        r#"<div style="background-color: red">x</div>"#,
        &Stylesheet::default(),
        800.0,
    );
    assert_eq!(rects(&list), vec![(13.0, 16.0, 787.0, 36.0, "red")]);
    assert!(matches!(list.commands()[0], DrawCommand::DrawRect { .. }));
    assert!(matches!(list.commands()[1], DrawCommand::DrawText { .. }));
}

#[test]
fn test_pre_is_gray_whatever_the_cascade() {
    let css = Stylesheet::parse("pre { background-color: blue }");
    let list = render("<pre>code</pre>", &css, 800.0);
    assert_eq!(rects(&list), vec![(13.0, 16.0, 787.0, 36.0, "gray")]);
}

#[test]
fn test_default_stylesheet_backgrounds() {
    let list = render(
        "<body><blockquote>quote</blockquote><p><mark>hi</mark></p></body>",
        &default_stylesheet(),
        800.0,
    );
    let colors: Vec<&str> = rects(&list).into_iter().map(|r| r.4).collect();
    // <mark> is inline: it gets no box of its own, so no rectangle.
    assert_eq!(colors, vec!["#eeeeee"]);
}

#[test]
fn test_parent_rect_painted_before_children() {
    let css = Stylesheet::parse("body { background-color: white } p { background-color: red }");
    let list = render("<body><p>one</p><p>two</p></body>", &css, 800.0);
    let kinds: Vec<String> = list
        .commands()
        .iter()
        .map(|c| match c {
            DrawCommand::DrawRect { color, .. } => format!("rect:{color}"),
            DrawCommand::DrawText { text, .. } => format!("text:{text}"),
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["rect:white", "rect:red", "text:one", "rect:red", "text:two"]
    );
}

#[test]
fn test_text_extent_for_culling() {
    let list = render("<p>word</p>", &Stylesheet::default(), 800.0);
    let command = &list.commands()[0];
    assert_eq!(command.top(), 16.0);
    assert_eq!(command.bottom(), 36.0);
    assert_eq!(list.visible(0.0, 600.0).count(), 1);
    assert_eq!(list.visible(100.0, 600.0).count(), 0);
}

#[test]
fn test_draw_list_serializes() {
    let list = render("<p>hi</p>", &Stylesheet::default(), 800.0);
    let json = serde_json::to_value(&list).unwrap_or_default();
    assert_eq!(json["commands"][0]["kind"], "DrawText");
    assert_eq!(json["commands"][0]["text"], "hi");
    assert_eq!(json["commands"][0]["font"]["weight"], "normal");
}
