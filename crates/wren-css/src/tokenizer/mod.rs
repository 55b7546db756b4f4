//! CSS tokenizer module.

/// Token serialization back to CSS text.
pub mod serialize;
/// CSS token types per [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod token;
/// CSS tokenizer implementation.
#[allow(clippy::module_inception)]
pub mod tokenizer;

pub use serialize::{serialize_identifier, serialize_string, serialize_token};
pub use token::{HashType, Number, SourceSpan, Token, TokenKind};
pub use tokenizer::CssTokenizer;

/// Tokenize `input` in one step. The returned list always ends with EOF.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = CssTokenizer::new(input);
    tokenizer.run();
    tokenizer.into_tokens()
}
