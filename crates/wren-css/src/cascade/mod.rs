//! Style cascade.
//!
//! Every node gets a property map built from:
//! 1. each matching rule, in rule order, later declarations overwriting
//!    earlier ones for the same property
//! 2. the element's `style` attribute, applied last so it always wins
//!
//! No inheritance, no specificity. The result is a pure function of the tree
//! and the rules, so running it twice gives identical maps.

use std::collections::HashMap;

use wren_dom::{DomTree, NodeId};

use crate::parser::{PropertyMap, Rule, parse_declaration_block};

/// Resolved properties for every node in a tree.
pub type StyleMap = HashMap<NodeId, PropertyMap>;

/// Resolve styles for every node reachable from the root.
#[must_use]
pub fn apply_styles(tree: &DomTree, rules: &[Rule]) -> StyleMap {
    let styles: StyleMap = tree
        .descendants(tree.root())
        .map(|id| (id, node_styles(tree, id, rules)))
        .collect();
    log::debug!("resolved styles for {} nodes", styles.len());
    styles
}

/// Resolve the style of one node.
fn node_styles(tree: &DomTree, id: NodeId, rules: &[Rule]) -> PropertyMap {
    let mut properties = PropertyMap::new();

    for rule in rules.iter().filter(|rule| rule.selector.matches(tree, id)) {
        properties.extend(
            rule.declarations
                .iter()
                .map(|(property, value)| (property.clone(), value.clone())),
        );
    }

    if let Some(inline) = tree.as_element(id).and_then(|e| e.attribute("style")) {
        properties.extend(parse_declaration_block(inline));
    }

    properties
}
