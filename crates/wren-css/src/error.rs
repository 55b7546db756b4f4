//! Errors that can be returned while building or parsing selectors.

use thiserror::Error;

use crate::tokenizer::SourceSpan;

/// A recoverable construction or parse failure.
///
/// Failing to match is never an error; these only describe input that could
/// not be turned into an AST.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CssError {
    /// A selector group must contain at least one selector.
    #[error("selector group must contain at least one selector")]
    EmptySelectorGroup,

    /// A token appeared where something else was required.
    #[error("expected {expected}, found {found} at line {}", span.line)]
    UnexpectedToken {
        /// What the parser was looking for.
        expected: String,
        /// The CSS text of the offending token.
        found: String,
        /// Where the offending token is.
        span: SourceSpan,
    },

    /// The input ended while something was still required.
    #[error("expected {expected}, found end of input")]
    UnexpectedEof {
        /// What the parser was looking for.
        expected: String,
    },

    /// The selector is well-formed but cannot be represented.
    #[error("unsupported selector {what} at line {}", span.line)]
    UnsupportedSelector {
        /// The unsupported construct, as written.
        what: String,
        /// Where it is.
        span: SourceSpan,
    },
}

/// Result alias used by the selector builders and parsers.
pub type Result<T> = std::result::Result<T, CssError>;
