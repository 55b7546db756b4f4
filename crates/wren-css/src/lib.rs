//! CSS selector matching, specificity and token serialization for the Wren style engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type (with namespaces), universal, class, ID, attribute and pseudo-class selectors
//!   - Compound selectors and the descendant, child, next-sibling and
//!     subsequent-sibling combinators
//!   - Selector groups and specificity
//!   - Matching over any tree through the [`SelectorModel`] trait
//!
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types: ident, function, at-keyword, hash, string, url, number, dimension, etc.
//!   - Token serialization back to CSS text
//!     ([§ 9 Serialization](https://www.w3.org/TR/css-syntax-3/#serialization))
//!
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Stylesheet parsing with error recovery
//!   - Rule parsing (style rules and opaque at-rules)
//!   - Declaration parsing with `!important`
//!
//! - **CSS Cascade ordering** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Matching rules sorted by specificity
//!   - Declarations in application order
//!
//! - **Reference model**: [`SelectorModel`] for the `wren_dom` tree.
//!
//! # Not Yet Implemented
//!
//! - Style value computation
//! - `:not()`, `:is()`, `:nth-child()` argument evaluation (left to the model)
//! - Attribute case-sensitivity flags
//! - Media queries

/// Rule ordering per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// [`SelectorModel`] for the `wren_dom` tree.
pub mod dom;
/// Construction and parse errors.
pub mod error;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// CSS selector matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Stylesheet structure.
pub mod stylesheet;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;

// Re-exports for convenience
pub use cascade::{MatchedRule, cascaded_declarations, matching_rules};
pub use error::{CssError, Result};
pub use parser::{CssParser, parse_selector, parse_selector_group, parse_stylesheet};
pub use selector::{
    AttributeOperator, AttributeSelector, Combinator, CombinatorKind, DEFAULT_WALK_LIMIT,
    Selector, SelectorGroup, SelectorModel, SimpleSelector, Specificity,
};
pub use stylesheet::{AtRule, Declaration, Rule, StyleRule, Stylesheet};
pub use tokenizer::{
    CssTokenizer, HashType, Number, SourceSpan, Token, TokenKind, serialize_token, tokenize,
};
