//! Integration tests for the HTML parser.

use wren_dom::{DomTree, NodeId, NodeType};
use wren_html::{parse, parse_with_issues};

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    tree.descendants(from)
        .find(|&id| tree.tag_name(id) == Some(tag))
}

/// Tag names (or `#text`) of a node's children.
fn child_names(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .map(|&child| match &tree.get(child).unwrap().node_type {
            NodeType::Element(data) => data.tag_name.clone(),
            NodeType::Text(_) => "#text".to_string(),
        })
        .collect()
}

/// Every non-root node has exactly one parent, which lists it exactly once.
fn assert_tree_invariant(tree: &DomTree) {
    assert_eq!(tree.tag_name(tree.root()), Some("html"));
    assert_eq!(tree.parent(tree.root()), None);
    for id in tree.iter_all().skip(1) {
        let parent = tree.parent(id).expect("non-root node without parent");
        let count = tree.children(parent).iter().filter(|&&c| c == id).count();
        assert_eq!(count, 1, "node {id:?} listed {count} times under its parent");
    }
}

#[test]
fn test_document_structure() {
    let tree = parse("<!DOCTYPE html><html><head></head><body><p>Hi</p></body></html>");
    assert_tree_invariant(&tree);
    assert_eq!(child_names(&tree, tree.root()), vec!["head", "body"]);

    let p = find_element(&tree, tree.root(), "p").unwrap();
    assert_eq!(tree.text_content(p), "Hi");
}

#[test]
fn test_html_attributes_move_to_root() {
    let tree = parse(r#"<html lang="en"><body></body></html>"#);
    let root = tree.as_element(tree.root()).unwrap();
    assert_eq!(root.attribute("lang"), Some("en"));
    assert_eq!(child_names(&tree, tree.root()), vec!["body"]);
}

#[test]
fn test_missing_html_is_synthesized() {
    let tree = parse("<h1>Heading 1</h1>");
    assert_tree_invariant(&tree);
    assert_eq!(child_names(&tree, tree.root()), vec!["h1"]);
}

#[test]
fn test_text_only_document() {
    let tree = parse("just words");
    assert_tree_invariant(&tree);
    assert_eq!(tree.text_content(tree.root()), "just words");
}

#[test]
fn test_empty_document() {
    let tree = parse("");
    assert_tree_invariant(&tree);
    assert!(tree.children(tree.root()).is_empty());

    let tree = parse("   \n  ");
    assert!(tree.children(tree.root()).is_empty());
}

#[test]
fn test_self_closing_img_does_not_swallow_content() {
    let tree = parse(r#"<body><img src="a.png"><p>after</p></body>"#);
    assert_tree_invariant(&tree);
    let body = find_element(&tree, tree.root(), "body").unwrap();
    assert_eq!(child_names(&tree, body), vec!["img", "p"]);

    let img = find_element(&tree, tree.root(), "img").unwrap();
    assert!(tree.children(img).is_empty());
    assert_eq!(tree.as_element(img).unwrap().attribute("src"), Some("a.png"));
}

#[test]
fn test_br_variants_are_leaves() {
    let tree = parse("<p>a<br>b<br/>c<br />d</p>");
    let p = find_element(&tree, tree.root(), "p").unwrap();
    assert_eq!(
        child_names(&tree, p),
        vec!["#text", "br", "#text", "br/", "#text", "br", "#text"]
    );
}

#[test]
fn test_trailing_slash_makes_any_tag_self_closing() {
    let tree = parse("<div><widget/>text</div>");
    let div = find_element(&tree, tree.root(), "div").unwrap();
    assert_eq!(child_names(&tree, div), vec!["widget/", "#text"]);
}

#[test]
fn test_stray_end_tags_are_ignored() {
    let (tree, issues) = parse_with_issues("</p></div>text");
    assert_tree_invariant(&tree);
    assert_eq!(tree.text_content(tree.root()), "text");
    assert_eq!(issues.len(), 2);
}

#[test]
fn test_end_tag_closes_innermost_element() {
    // "</i>" closes <b>, the innermost element, so "after" lands in <p>.
    let tree = parse("<p><b>bold</i>after</p>");
    let p = find_element(&tree, tree.root(), "p").unwrap();
    assert_eq!(child_names(&tree, p), vec!["b", "#text"]);
}

#[test]
fn test_unclosed_elements_stay_attached() {
    let tree = parse("<body><div><p>deep");
    assert_tree_invariant(&tree);
    let p = find_element(&tree, tree.root(), "p").unwrap();
    assert_eq!(tree.text_content(p), "deep");
    let ancestors: Vec<_> = tree
        .ancestors(p)
        .filter_map(|id| tree.tag_name(id))
        .collect();
    assert_eq!(ancestors, vec!["div", "body", "html"]);
}

#[test]
fn test_get_attribute() {
    let tree = parse(r#"<meta name="viewport" content="width=device-width,initial-scale=1.0" />"#);
    let meta = find_element(&tree, tree.root(), "meta").unwrap();
    let data = tree.as_element(meta).unwrap();
    assert_eq!(data.attribute("name"), Some("viewport"));
    assert_eq!(
        data.attribute("content"),
        Some("width=device-width,initial-scale=1.0")
    );
    assert_eq!(data.attribute("/"), Some(""));
}

#[test]
fn test_comments_and_doctype_ignored() {
    let tree = parse("<!DOCTYPE html><!-- hidden --><p>shown</p>");
    assert_eq!(child_names(&tree, tree.root()), vec!["p"]);
}

#[test]
fn test_text_whitespace_handling() {
    let tree = parse("<p>\n  Hello\n  world  </p>");
    let p = find_element(&tree, tree.root(), "p").unwrap();
    assert_eq!(tree.text_content(p), "Hello  world");
}
