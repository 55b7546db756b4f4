//! CSS parser module.
//!
//! [`CssParser`] turns a token stream into a [`Stylesheet`], recovering from
//! malformed input. The free functions wrap tokenizing and parsing for the
//! common cases.

/// CSS parser implementation per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod css_parser;
mod selector_parser;

pub use css_parser::CssParser;

use crate::error::{CssError, Result};
use crate::selector::{Selector, SelectorGroup};
use crate::stylesheet::Stylesheet;
use crate::tokenizer::{Token, TokenKind, tokenize};

/// Tokenize and parse a whole stylesheet.
///
/// Returns the stylesheet together with every problem recovered from.
#[must_use]
pub fn parse_stylesheet(css: &str) -> (Stylesheet, Vec<CssError>) {
    let mut parser = CssParser::new(tokenize(css));
    let stylesheet = parser.parse_stylesheet();
    (stylesheet, parser.take_errors())
}

/// Parse a comma-separated selector list.
///
/// Unlike stylesheet parsing this is strict: any alternative that does not
/// parse fails the whole group.
///
/// # Errors
///
/// Returns the first problem found, in source order.
pub fn parse_selector_group(css: &str) -> Result<SelectorGroup> {
    let tokens = tokenize(css);
    let selectors = selector_parser::split_selector_list(&tokens)
        .into_iter()
        .map(|alternative| {
            selector_parser::parse_complex_selector(selector_parser::trim_whitespace(alternative))
        })
        .collect::<Result<Vec<_>>>()?;
    SelectorGroup::new(selectors)
}

/// Parse a single complex selector (no commas).
///
/// # Errors
///
/// Returns an error if `css` is not a selector, or is a selector list.
pub fn parse_selector(css: &str) -> Result<Selector> {
    let tokens = tokenize(css);
    match selector_parser::split_selector_list(&tokens).as_slice() {
        [single] => {
            selector_parser::parse_complex_selector(selector_parser::trim_whitespace(single))
        }
        _ => {
            let comma = tokens.iter().find(|t| *t.kind() == TokenKind::Comma);
            Err(CssError::UnexpectedToken {
                expected: "a single selector".to_string(),
                found: ",".to_string(),
                span: comma.map(Token::span).unwrap_or_default(),
            })
        }
    }
}
