//! Integration tests for the CSS parser and its error recovery.

use wren_css::{Selector, Stylesheet, parse_declaration_block};

fn selectors(sheet: &Stylesheet) -> Vec<String> {
    sheet.rules.iter().map(|r| r.selector.to_string()).collect()
}

fn value<'a>(sheet: &'a Stylesheet, index: usize, property: &str) -> Option<&'a str> {
    sheet.rules[index]
        .declarations
        .get(property)
        .map(String::as_str)
}

#[test]
fn test_parse_simple_rules() {
    let sheet = Stylesheet::parse("p { color: red; } div { background-color: #eeeeee }");
    assert_eq!(selectors(&sheet), vec!["p", "div"]);
    assert_eq!(value(&sheet, 0, "color"), Some("red"));
    assert_eq!(value(&sheet, 1, "background-color"), Some("#eeeeee"));
}

#[test]
fn test_descendant_selector_nests_left() {
    let sheet = Stylesheet::parse("div section p { color: red }");
    assert_eq!(
        sheet.rules[0].selector,
        Selector::descendant(
            Selector::descendant(Selector::tag("div"), Selector::tag("section")),
            Selector::tag("p"),
        )
    );
}

#[test]
fn test_property_and_selector_lowercased_value_verbatim() {
    let sheet = Stylesheet::parse("P { Color: RED }");
    assert_eq!(selectors(&sheet), vec!["p"]);
    assert_eq!(value(&sheet, 0, "color"), Some("RED"));
}

#[test]
fn test_later_declaration_wins_within_rule() {
    let sheet = Stylesheet::parse("p { color: red; color: blue }");
    assert_eq!(sheet.rules[0].declarations.len(), 1);
    assert_eq!(value(&sheet, 0, "color"), Some("blue"));
}

#[test]
fn test_bad_declaration_skipped_rest_of_rule_kept() {
    let sheet = Stylesheet::parse("a{color:red} p{color:blue; div{color:green;} span{color:black}");
    assert_eq!(selectors(&sheet), vec!["a", "p", "span"]);
    assert_eq!(value(&sheet, 1, "color"), Some("blue"));
    assert_eq!(sheet.rules[1].declarations.len(), 1);
    assert_eq!(value(&sheet, 2, "color"), Some("black"));
}

#[test]
fn test_bad_selector_skips_whole_rule() {
    let sheet = Stylesheet::parse("a { color: red } { color: blue } b { color: green }");
    assert_eq!(selectors(&sheet), vec!["a", "b"]);
}

#[test]
fn test_unterminated_rule_stops_parsing() {
    let sheet = Stylesheet::parse("a { color: red } p { color: blue");
    assert_eq!(selectors(&sheet), vec!["a"]);
}

#[test]
fn test_comments_are_whitespace() {
    let sheet = Stylesheet::parse("/* head */ p /* mid */ { /* in */ color: red; /* tail */ }");
    assert_eq!(selectors(&sheet), vec!["p"]);
    assert_eq!(value(&sheet, 0, "color"), Some("red"));
}

#[test]
fn test_empty_input() {
    assert!(Stylesheet::parse("").rules.is_empty());
    assert!(Stylesheet::parse("   \n ").rules.is_empty());
}

#[test]
fn test_append_keeps_order() {
    let mut sheet = Stylesheet::parse("a { color: red }");
    sheet.append(Stylesheet::parse("b { color: blue }"));
    assert_eq!(selectors(&sheet), vec!["a", "b"]);
}

#[test]
fn test_declaration_block() {
    let props = parse_declaration_block("color: red; background-color: blue");
    assert_eq!(props.get("color").map(String::as_str), Some("red"));
    assert_eq!(props.get("background-color").map(String::as_str), Some("blue"));
}

#[test]
fn test_declaration_block_skips_to_semicolon() {
    let props = parse_declaration_block("color red; font-size: 12px");
    assert_eq!(props.len(), 1);
    assert_eq!(props.get("font-size").map(String::as_str), Some("12px"));
}

#[test]
fn test_declaration_block_without_semicolon_after_error() {
    let props = parse_declaration_block("color: red; : broken");
    assert_eq!(props.len(), 1);
    assert_eq!(props.get("color").map(String::as_str), Some("red"));
}
