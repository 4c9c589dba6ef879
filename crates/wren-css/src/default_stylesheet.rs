//! Built-in stylesheet.
//!
//! Applied before any document stylesheet, so author rules override it. The
//! browser carries this text in its configuration; nothing here is global
//! state.
//!
//! Text styling for `b`, `i`, headings and the rest is driven by tag name
//! during layout, so the sheet only needs to supply what layout reads from
//! the cascade: background colours.

use crate::parser::Stylesheet;

/// Source of the built-in stylesheet.
pub const DEFAULT_CSS: &str = r"
/* <pre> is painted gray during paint whatever the cascade says. */
pre { background-color: gray; }

mark { background-color: yellow; }
blockquote { background-color: #eeeeee; }
";

/// Parse [`DEFAULT_CSS`].
#[must_use]
pub fn default_stylesheet() -> Stylesheet {
    Stylesheet::parse(DEFAULT_CSS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stylesheet_parses_cleanly() {
        let sheet = default_stylesheet();
        assert_eq!(sheet.rules.len(), 3);
        assert_eq!(
            sheet.rules[0].declarations.get("background-color").map(String::as_str),
            Some("gray")
        );
    }
}
