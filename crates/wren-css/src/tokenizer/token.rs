//! CSS Token types per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! "The output of the tokenization step is a stream of zero or more of the
//! following tokens: `<ident-token>`, `<function-token>`, `<at-keyword-token>`,
//! `<hash-token>`, `<string-token>`, `<bad-string-token>`, `<url-token>`,
//! `<bad-url-token>`, `<delim-token>`, `<number-token>`, `<percentage-token>`,
//! `<dimension-token>`, `<whitespace-token>`, `<CDO-token>`, `<CDC-token>`,
//! `<colon-token>`, `<semicolon-token>`, `<comma-token>`, `<[-token>`,
//! `<]-token>`, `<(-token>`, `<)-token>`, `<{-token>`, and `<}-token>`."
//!
//! The attribute-match tokens (`~=`, `|=`, `^=`, `$=`, `*=`) and the column
//! token (`||`) of [CSS Syntax Level 3, 2014](https://www.w3.org/TR/2014/CR-css-syntax-3-20140220/#tokenization)
//! are kept as tokens of their own so that selector parsing never has to
//! re-assemble them from delimiters.

use core::fmt;

use serde::Serialize;
use strum_macros::IntoStaticStr;

use super::serialize::serialize_token;

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// "A `<hash-token>` with the type flag set to 'id'... or 'unrestricted'."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HashType {
    /// "id" - the hash token's value is a valid identifier
    Id,
    /// "unrestricted" - the hash token's value is not a valid identifier
    Unrestricted,
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// "A `<number-token>` has a numeric value, and a type flag set to either
/// 'integer' or 'number'." The type flag is folded into the variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Number {
    /// "integer" - written without a decimal point or exponent
    Integer(i64),
    /// "number" - written with a decimal point or exponent
    Float(f64),
}

impl Number {
    /// The numeric value, regardless of the type flag.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn value(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    /// Returns true if the type flag is "integer".
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Integer(_))
    }
}

/// The location of a token (or of a larger construct) in the source text.
///
/// `start` and `end` are character offsets, `end` exclusive; `line` is the
/// 1-based line on which `start` lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SourceSpan {
    /// Offset of the first character.
    pub start: usize,
    /// Offset one past the last character.
    pub end: usize,
    /// Line of the first character, starting at 1.
    pub line: usize,
}

impl SourceSpan {
    /// Create a span.
    #[must_use]
    pub const fn new(start: usize, end: usize, line: usize) -> Self {
        Self { start, end, line }
    }

    /// The smallest span covering `self` and `other`, keeping `self`'s line.
    #[must_use]
    pub const fn to(self, other: Self) -> Self {
        Self {
            start: if self.start < other.start {
                self.start
            } else {
                other.start
            },
            end: if self.end > other.end {
                self.end
            } else {
                other.end
            },
            line: self.line,
        }
    }
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// The kind of a token together with its payload. Each variant corresponds to
/// a token type in the railroad diagrams, and determines which serialization
/// rule applies.
#[derive(Debug, Clone, PartialEq, Serialize, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum TokenKind {
    /// An identifier, e.g. `color`.
    Ident(String),
    /// A name followed by `(`; the name excludes the parenthesis.
    Function(String),
    /// `@` followed by a name; the name excludes the `@`.
    AtKeyword(String),
    /// `#` followed by a name.
    Hash {
        /// The name, without the `#`.
        value: String,
        /// Whether the name would also be a valid identifier.
        hash_type: HashType,
    },
    /// A quoted string with escapes resolved.
    String(String),
    /// A string cut short by an unescaped newline.
    BadString,
    /// The contents of an unquoted `url(...)`.
    Url(String),
    /// An unquoted `url(...)` containing a character it may not.
    BadUrl,
    /// Any single code point that starts no other token.
    Delim(char),
    /// A bare number.
    Number(Number),
    /// A number followed by `%`.
    Percentage(Number),
    /// A number followed by a unit.
    Dimension {
        /// The numeric part.
        value: Number,
        /// The unit, e.g. `px` or `n` in `2n`.
        unit: String,
    },
    /// `~=`
    IncludeMatch,
    /// `|=`
    DashMatch,
    /// `^=`
    PrefixMatch,
    /// `$=`
    SuffixMatch,
    /// `*=`
    SubstringMatch,
    /// `||`
    Column,
    /// A run of whitespace, folded into one token.
    Whitespace,
    /// `<!--`
    Cdo,
    /// `-->`
    Cdc,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// End of input. Has no textual form.
    Eof,
}

impl TokenKind {
    /// The kebab-case name of the kind, e.g. `"at-keyword"`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// An immutable lexical unit: a kind with its payload, the quote character
/// the source used (for strings), and where the token came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    kind: TokenKind,
    quote: Option<char>,
    span: SourceSpan,
}

impl Token {
    /// Create a token of the given kind at the given location.
    #[must_use]
    pub const fn new(kind: TokenKind, span: SourceSpan) -> Self {
        Self {
            kind,
            quote: None,
            span,
        }
    }

    /// Create a token with no source location.
    #[must_use]
    pub fn of(kind: TokenKind) -> Self {
        Self::new(kind, SourceSpan::default())
    }

    /// Record the quote character a string token should be written with.
    ///
    /// Only `"` and `'` are honored by serialization.
    #[must_use]
    pub const fn with_quote(mut self, quote: char) -> Self {
        self.quote = Some(quote);
        self
    }

    /// Create a new ident token.
    #[must_use]
    pub fn ident(value: impl Into<String>) -> Self {
        Self::of(TokenKind::Ident(value.into()))
    }

    /// Create a new function token.
    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self::of(TokenKind::Function(name.into()))
    }

    /// Create a new at-keyword token.
    #[must_use]
    pub fn at_keyword(value: impl Into<String>) -> Self {
        Self::of(TokenKind::AtKeyword(value.into()))
    }

    /// Create a new hash token with id type.
    #[must_use]
    pub fn hash_id(value: impl Into<String>) -> Self {
        Self::of(TokenKind::Hash {
            value: value.into(),
            hash_type: HashType::Id,
        })
    }

    /// Create a new string token.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::of(TokenKind::String(value.into()))
    }

    /// Create a new URL token.
    #[must_use]
    pub fn url(value: impl Into<String>) -> Self {
        Self::of(TokenKind::Url(value.into()))
    }

    /// Create a new number token (integer).
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::of(TokenKind::Number(Number::Integer(value)))
    }

    /// Create a new number token (float).
    #[must_use]
    pub fn float(value: f64) -> Self {
        Self::of(TokenKind::Number(Number::Float(value)))
    }

    /// Create a new percentage token.
    #[must_use]
    pub fn percentage(value: Number) -> Self {
        Self::of(TokenKind::Percentage(value))
    }

    /// Create a new dimension token.
    #[must_use]
    pub fn dimension(value: Number, unit: impl Into<String>) -> Self {
        Self::of(TokenKind::Dimension {
            value,
            unit: unit.into(),
        })
    }

    /// Create a new delim token.
    #[must_use]
    pub fn delim(c: char) -> Self {
        Self::of(TokenKind::Delim(c))
    }

    /// The token's kind and payload.
    #[must_use]
    pub const fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Where the token came from.
    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        self.span
    }

    /// The quote character the token prefers to be written with.
    #[must_use]
    pub const fn quote_preference(&self) -> Option<char> {
        self.quote
    }

    /// The string payload: the name of an ident, function, at-keyword or hash,
    /// the value of a string or url, or the unit of a dimension.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(s)
            | TokenKind::Function(s)
            | TokenKind::AtKeyword(s)
            | TokenKind::String(s)
            | TokenKind::Url(s)
            | TokenKind::Hash { value: s, .. }
            | TokenKind::Dimension { unit: s, .. } => Some(s),
            _ => None,
        }
    }

    /// The numeric payload of a number, percentage or dimension.
    #[must_use]
    pub const fn number(&self) -> Option<Number> {
        match &self.kind {
            TokenKind::Number(n) | TokenKind::Percentage(n) | TokenKind::Dimension { value: n, .. } => {
                Some(*n)
            }
            _ => None,
        }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true if this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace)
    }

    /// Returns true if this is the given delimiter.
    #[must_use]
    pub fn is_delim(&self, c: char) -> bool {
        self.kind == TokenKind::Delim(c)
    }

    /// Serialize the token back to CSS text.
    ///
    /// # Panics
    ///
    /// Panics for token kinds that have no textual form (see
    /// [`serialize_token`]).
    #[must_use]
    pub fn to_css(&self) -> String {
        serialize_token(self)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}
