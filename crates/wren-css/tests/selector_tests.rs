//! Integration tests for selector matching.

use wren_css::Selector;
use wren_dom::{DomTree, ElementData, NodeId, NodeType};

fn element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.alloc(NodeType::Element(ElementData::new(tag)));
    tree.append_child(parent, id);
    id
}

fn text(tree: &mut DomTree, parent: NodeId, data: &str) -> NodeId {
    let id = tree.alloc(NodeType::Text(data.to_string()));
    tree.append_child(parent, id);
    id
}

fn div_p() -> Selector {
    Selector::descendant(Selector::tag("div"), Selector::tag("p"))
}

#[test]
fn test_tag_selector() {
    let mut tree = DomTree::new();
    let body = element(&mut tree, NodeId::ROOT, "body");
    let p = element(&mut tree, body, "p");
    let words = text(&mut tree, p, "words");

    assert!(Selector::tag("p").matches(&tree, p));
    assert!(Selector::tag("P").matches(&tree, p));
    assert!(!Selector::tag("p").matches(&tree, body));
    assert!(!Selector::tag("p").matches(&tree, words));
    assert!(Selector::tag("html").matches(&tree, NodeId::ROOT));
}

#[test]
fn test_descendant_requires_ancestor() {
    let mut tree = DomTree::new();
    let body = element(&mut tree, NodeId::ROOT, "body");
    let div = element(&mut tree, body, "div");
    let inside = element(&mut tree, div, "p");
    let outside = element(&mut tree, body, "p");

    assert!(div_p().matches(&tree, inside));
    assert!(!div_p().matches(&tree, outside));
    assert!(!div_p().matches(&tree, div));
}

#[test]
fn test_descendant_matches_any_depth() {
    let mut tree = DomTree::new();
    let div = element(&mut tree, NodeId::ROOT, "div");
    let section = element(&mut tree, div, "section");
    let span = element(&mut tree, section, "span");
    let p = element(&mut tree, span, "p");

    assert!(div_p().matches(&tree, p));
}

#[test]
fn test_descendant_ancestor_is_strict() {
    let mut tree = DomTree::new();
    let p = element(&mut tree, NodeId::ROOT, "p");
    let nested = element(&mut tree, p, "p");
    let p_p = Selector::descendant(Selector::tag("p"), Selector::tag("p"));

    assert!(!p_p.matches(&tree, p));
    assert!(p_p.matches(&tree, nested));
}

#[test]
fn test_text_never_matches() {
    let mut tree = DomTree::new();
    let div = element(&mut tree, NodeId::ROOT, "div");
    let words = text(&mut tree, div, "p");

    assert!(!div_p().matches(&tree, words));
}

#[test]
fn test_display() {
    assert_eq!(div_p().to_string(), "div p");
    assert_eq!(
        Selector::descendant(div_p(), Selector::tag("b")).to_string(),
        "div p b"
    );
}
