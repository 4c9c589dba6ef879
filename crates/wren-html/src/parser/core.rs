//! Tree builder: turns tokens into a [`DomTree`].

use wren_dom::{DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::Token;

/// A piece of input the parser recovered from instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Human-readable description.
    pub message: String,
    /// Index into the token stream where the issue was noticed.
    pub token_index: usize,
}

/// Builds a DOM tree from a token stream using a stack of open elements.
///
/// The stack starts empty. The first piece of content opens the tree's `html`
/// root: an explicit `<html>` tag lends the root its attributes, anything
/// else opens it implicitly. From then on:
/// - text is appended to the innermost open element
/// - self-closing tags are appended without being opened
/// - other start tags are appended and opened
/// - an end tag closes the innermost open element, whatever its name, unless
///   only the root is open, in which case it is ignored
///
/// Elements still open at the end of input stay where they were attached.
pub struct HTMLParser {
    tokens: Vec<Token>,
    tree: DomTree,
    stack_of_open_elements: Vec<NodeId>,
    issues: Vec<ParseIssue>,
}

impl HTMLParser {
    /// Create a parser over `tokens`.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            tree: DomTree::new(),
            stack_of_open_elements: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Run the parser and return the tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return both the tree and any recovered issues.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        let tokens = std::mem::take(&mut self.tokens);
        for (index, token) in tokens.into_iter().enumerate() {
            self.process_token(index, token);
        }
        (self.tree, self.issues)
    }

    fn process_token(&mut self, index: usize, token: Token) {
        match token {
            Token::Text(text) => {
                let parent = self.current_node();
                let id = self.tree.alloc(NodeType::Text(text));
                self.tree.append_child(parent, id);
            }
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                if name.is_empty() {
                    self.issue(index, "ignored empty tag '<>'".to_string());
                    return;
                }

                let mut element = ElementData::new(&name);
                for attribute in &attributes {
                    element.set_attribute(&attribute.name, &attribute.value);
                }

                if name == "html" && self.stack_of_open_elements.is_empty() {
                    if let Some(root) = self.tree.as_element_mut(NodeId::ROOT) {
                        root.attrs.extend(element.attrs);
                    }
                    self.stack_of_open_elements.push(NodeId::ROOT);
                    return;
                }

                let parent = self.current_node();
                let id = self.tree.alloc(NodeType::Element(element));
                self.tree.append_child(parent, id);
                if !self_closing {
                    self.stack_of_open_elements.push(id);
                }
            }
            Token::EndTag { name } => {
                if self.stack_of_open_elements.len() <= 1 {
                    self.issue(index, format!("ignored stray end tag '</{name}>'"));
                    return;
                }
                let _ = self.stack_of_open_elements.pop();
            }
            Token::Declaration(_) => {}
        }
    }

    /// The innermost open element, opening the root if nothing is open yet.
    fn current_node(&mut self) -> NodeId {
        if let Some(&id) = self.stack_of_open_elements.last() {
            return id;
        }
        self.stack_of_open_elements.push(NodeId::ROOT);
        NodeId::ROOT
    }

    fn issue(&mut self, token_index: usize, message: String) {
        self.issues.push(ParseIssue {
            message,
            token_index,
        });
    }
}

/// Print a DOM subtree for debugging, one node per line.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let mut stack = vec![(id, indent)];
    while let Some((id, indent)) = stack.pop() {
        let Some(node) = tree.get(id) else { continue };
        let prefix = "  ".repeat(indent);

        match &node.node_type {
            NodeType::Element(data) => {
                if data.attrs.is_empty() {
                    println!("{prefix}<{}>", data.tag_name);
                } else {
                    let mut attrs: Vec<String> = data
                        .attrs
                        .iter()
                        .map(|(k, v)| {
                            if v.is_empty() {
                                k.clone()
                            } else {
                                format!("{k}=\"{v}\"")
                            }
                        })
                        .collect();
                    attrs.sort();
                    println!("{prefix}<{} {}>", data.tag_name, attrs.join(" "));
                }
            }
            NodeType::Text(data) => {
                println!("{prefix}\"{data}\"");
            }
        }

        stack.extend(tree.children(id).iter().rev().map(|&child| (child, indent + 1)));
    }
}
