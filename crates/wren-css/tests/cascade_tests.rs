//! Integration tests for the style cascade and stylesheet discovery.

use wren_css::{StyleMap, Stylesheet, StylesheetSource, apply_styles, collect_stylesheet_sources};
use wren_dom::{DomTree, NodeId};

fn elements(tree: &DomTree, tag: &str) -> Vec<NodeId> {
    tree.iter_all()
        .filter(|&id| tree.tag_name(id) == Some(tag))
        .collect()
}

fn property<'a>(styles: &'a StyleMap, id: NodeId, name: &str) -> Option<&'a str> {
    styles.get(&id)?.get(name).map(String::as_str)
}

fn cascade(markup: &str, css: &str) -> (DomTree, StyleMap) {
    let tree = wren_html::parse(markup);
    let sheet = Stylesheet::parse(css);
    let styles = apply_styles(&tree, &sheet.rules);
    (tree, styles)
}

#[test]
fn test_every_node_gets_an_entry() {
    let (tree, styles) = cascade("<body><p>one <b>two</b></p></body>", "");
    assert_eq!(styles.len(), tree.iter_all().count());
    assert!(styles.values().all(|props| props.is_empty()));
}

#[test]
fn test_later_rule_wins() {
    let (tree, styles) = cascade("<p>x</p>", "p { color: red } p { color: blue }");
    let p = elements(&tree, "p")[0];
    assert_eq!(property(&styles, p, "color"), Some("blue"));
}

#[test]
fn test_rules_merge_across_properties() {
    let (tree, styles) = cascade(
        "<p>x</p>",
        "p { color: red } p { background-color: yellow }",
    );
    let p = elements(&tree, "p")[0];
    assert_eq!(property(&styles, p, "color"), Some("red"));
    assert_eq!(property(&styles, p, "background-color"), Some("yellow"));
}

#[test]
fn test_no_specificity_source_order_only() {
    let (tree, styles) = cascade(
        "<div><p>x</p></div>",
        "div p { color: red } p { color: blue }",
    );
    let p = elements(&tree, "p")[0];
    assert_eq!(property(&styles, p, "color"), Some("blue"));
}

#[test]
fn test_inline_style_wins() {
    let (tree, styles) = cascade(
        r#"<p style="color: green; font-size: 20px">x</p>"#,
        "p { color: red }",
    );
    let p = elements(&tree, "p")[0];
    assert_eq!(property(&styles, p, "color"), Some("green"));
    assert_eq!(property(&styles, p, "font-size"), Some("20px"));
}

#[test]
fn test_descendant_rule_applies_only_inside() {
    let (tree, styles) = cascade(
        "<div><p>in</p></div><p>out</p>",
        "div p { color: red }",
    );
    let ps = elements(&tree, "p");
    assert_eq!(property(&styles, ps[0], "color"), Some("red"));
    assert_eq!(property(&styles, ps[1], "color"), None);
}

#[test]
fn test_no_inheritance_and_text_nodes_empty() {
    let (tree, styles) = cascade("<div>hello</div>", "div { color: red }");
    let div = elements(&tree, "div")[0];
    let text = tree.children(div)[0];
    assert_eq!(property(&styles, div, "color"), Some("red"));
    assert!(styles.get(&text).is_some_and(|props| props.is_empty()));
}

#[test]
fn test_cascade_is_idempotent() {
    let tree = wren_html::parse(r#"<div><p style="color: green">a</p><p>b</p></div>"#);
    let sheet = Stylesheet::parse("p { color: red } div p { background-color: gray }");
    let first = apply_styles(&tree, &sheet.rules);
    let second = apply_styles(&tree, &sheet.rules);
    assert_eq!(first, second);
}

#[test]
fn test_collect_stylesheet_sources_in_document_order() {
    let tree = wren_html::parse(
        r#"<html><head>
        <link rel="stylesheet" href="a.css">
        <style>p { color: red }</style>
        <link rel="icon" href="favicon.ico">
        <link rel="Alternate StyleSheet" href="b.css">
        <link rel="stylesheet">
        </head><body></body></html>"#,
    );
    let sources = collect_stylesheet_sources(&tree);
    assert_eq!(
        sources,
        vec![
            StylesheetSource::External {
                href: "a.css".to_string()
            },
            StylesheetSource::Inline("p { color: red }".to_string()),
            StylesheetSource::External {
                href: "b.css".to_string()
            },
        ]
    );
}

#[test]
fn test_deeply_nested_elements_are_styled() {
    let markup = format!("{}x", "<b>".repeat(20_000));
    let (tree, styles) = cascade(&markup, "b { color: red }");
    assert_eq!(styles.len(), tree.iter_all().count());
    let bolds = elements(&tree, "b");
    assert_eq!(bolds.len(), 20_000);
    assert!(bolds.iter().all(|&b| property(&styles, b, "color") == Some("red")));
}
