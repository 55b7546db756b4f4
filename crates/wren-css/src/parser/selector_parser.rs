//! Selector grammar per [Selectors Level 4 § 18](https://www.w3.org/TR/selectors-4/#grammar).
//!
//! Works on an already tokenized selector list. Simple selectors are collected
//! left to right together with the combinator that joins each one to its right
//! neighbour (`And` inside a compound selector), then folded from the right into
//! a right-leaning chain.

use wren_common::warning::warn_once;

use crate::error::{CssError, Result};
use crate::selector::{
    AttributeOperator, AttributeSelector, Combinator, CombinatorKind, Selector, SimpleSelector,
};
use crate::tokenizer::{Token, TokenKind};

/// Pseudo-elements that CSS 2 allowed with a single colon.
const LEGACY_PSEUDO_ELEMENTS: [&str; 4] = ["before", "after", "first-line", "first-letter"];

/// [§ 4.1 Selector Lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// Split a selector list on top-level commas. Always returns at least one
/// (possibly empty) alternative.
pub(crate) fn split_selector_list(tokens: &[Token]) -> Vec<&[Token]> {
    let mut alternatives = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind() {
            TokenKind::Function(_) | TokenKind::LeftParen | TokenKind::LeftBracket => depth += 1,
            TokenKind::RightParen | TokenKind::RightBracket => depth = depth.saturating_sub(1),
            TokenKind::Comma if depth == 0 => {
                alternatives.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    alternatives.push(&tokens[start..]);
    alternatives
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// Parse one complex selector (no top-level commas).
///
/// # Errors
///
/// Returns an error if the tokens are not a selector this engine can
/// represent.
pub(crate) fn parse_complex_selector(tokens: &[Token]) -> Result<Selector> {
    let mut parser = SelectorParser { tokens, position: 0 };
    parser.parse()
}

struct SelectorParser<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl SelectorParser<'_> {
    fn parse(&mut self) -> Result<Selector> {
        // (simple selector, kind joining it to the next one)
        let mut chain: Vec<(SimpleSelector, Option<CombinatorKind>)> = Vec::new();

        let _ = self.skip_whitespace();
        loop {
            let compound = self.parse_compound()?;
            let last = compound.len() - 1;
            for (i, simple) in compound.into_iter().enumerate() {
                chain.push((simple, (i < last).then_some(CombinatorKind::And)));
            }

            let saw_whitespace = self.skip_whitespace();
            let kind = match self.peek().map(Token::kind) {
                None => break,
                Some(TokenKind::Delim('>')) => Some(CombinatorKind::Child),
                Some(TokenKind::Delim('+')) => Some(CombinatorKind::AdjacentSibling),
                Some(TokenKind::Delim('~')) => Some(CombinatorKind::GeneralSibling),
                Some(TokenKind::Column) => {
                    return Err(self.unsupported("column combinator '||'"));
                }
                Some(_) if saw_whitespace => None,
                Some(_) => return Err(self.unexpected("a combinator")),
            };
            let kind = match kind {
                Some(kind) => {
                    self.position += 1;
                    let _ = self.skip_whitespace();
                    kind
                }
                None => CombinatorKind::Descendant,
            };

            if let Some(last) = chain.last_mut() {
                last.1 = Some(kind);
            }
        }

        // Fold from the right: the last simple selector is the innermost
        // `second`, and each earlier one wraps it as `first`.
        let mut chain = chain.into_iter().rev();
        let Some((subject, _)) = chain.next() else {
            return Err(self.unexpected("a selector"));
        };
        Ok(chain.fold(Selector::Simple(subject), |second, (first, kind)| {
            Selector::Combinator(Combinator::new(
                kind.unwrap_or(CombinatorKind::And),
                first,
                second,
            ))
        }))
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    ///
    /// "A compound selector is a sequence of simple selectors that are not
    /// separated by a combinator." Returns at least one simple selector.
    fn parse_compound(&mut self) -> Result<Vec<SimpleSelector>> {
        let mut compound = Vec::new();

        if let Some(leading) = self.parse_type_or_universal()? {
            compound.push(leading);
        }

        while let Some(token) = self.peek() {
            let simple = match token.kind() {
                // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
                TokenKind::Hash { value, .. } => {
                    let id = value.clone();
                    self.position += 1;
                    SimpleSelector::Id(id)
                }

                // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
                TokenKind::Delim('.') => {
                    self.position += 1;
                    SimpleSelector::Class(self.expect_ident("a class name after '.'")?)
                }

                // [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
                TokenKind::LeftBracket => {
                    self.position += 1;
                    SimpleSelector::Attribute(self.parse_attribute()?)
                }

                // [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
                // [§ 3.6 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
                TokenKind::Colon => {
                    self.position += 1;
                    self.parse_pseudo()?
                }

                _ => break,
            };
            compound.push(simple);
        }

        if compound.is_empty() {
            return Err(self.unexpected("a selector"));
        }
        Ok(compound)
    }

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// [§ 5.3 Namespaces in elemental selectors](https://www.w3.org/TR/selectors-4/#type-nmsp)
    ///
    /// `name`, `ns|name`, `*|name`, `|name`, `*`, `*|*`.
    /// `ns|*` and `|*` are unsupported: a universal selector carries no
    /// namespace test.
    fn parse_type_or_universal(&mut self) -> Result<Option<SimpleSelector>> {
        let Some(token) = self.peek() else {
            return Ok(None);
        };

        // namespace: None = no prefix or `*|`, Some("") = `|`, Some(ns) = `ns|`
        let (namespace, has_prefix) = match token.kind() {
            TokenKind::Ident(ns) if self.peek_at(1).is_some_and(|t| t.is_delim('|')) => {
                (Some(ns.clone()), true)
            }
            TokenKind::Delim('*') if self.peek_at(1).is_some_and(|t| t.is_delim('|')) => {
                (None, true)
            }
            TokenKind::Delim('|') => {
                self.position += 1;
                (Some(String::new()), false)
            }
            TokenKind::Ident(_) | TokenKind::Delim('*') => (None, false),
            _ => return Ok(None),
        };
        if has_prefix {
            self.position += 2;
        }

        let Some(token) = self.peek() else {
            return Err(self.unexpected("an element name"));
        };
        let selector = match token.kind() {
            TokenKind::Ident(name) => SimpleSelector::Type {
                namespace,
                name: name.clone(),
            },
            TokenKind::Delim('*') => match namespace {
                None => SimpleSelector::Universal,
                Some(ns) => return Err(self.unsupported(&format!("{ns}|*"))),
            },
            _ => return Err(self.unexpected("an element name")),
        };
        self.position += 1;
        Ok(Some(selector))
    }

    /// [§ 6.1](https://www.w3.org/TR/selectors-4/#attribute-representation)
    ///
    /// Everything after `[` up to and including `]`.
    fn parse_attribute(&mut self) -> Result<AttributeSelector> {
        let _ = self.skip_whitespace();

        // [§ 6.2 Attribute selectors and namespaces](https://www.w3.org/TR/selectors-4/#attrnmsp)
        let namespace = match (self.peek().map(Token::kind), self.peek_at(1)) {
            (Some(TokenKind::Ident(ns)), Some(next)) if next.is_delim('|') => {
                let ns = ns.clone();
                self.position += 2;
                Some(ns)
            }
            (Some(TokenKind::Delim('*')), Some(next)) if next.is_delim('|') => {
                self.position += 2;
                None
            }
            (Some(TokenKind::Delim('|')), _) => {
                self.position += 1;
                Some(String::new())
            }
            _ => None,
        };

        let name = self.expect_ident("an attribute name")?;
        let _ = self.skip_whitespace();

        let Some(token) = self.peek() else {
            return Err(self.unexpected("']'"));
        };
        let operator: fn(String) -> AttributeOperator = match token.kind() {
            TokenKind::RightBracket => {
                self.position += 1;
                let selector = AttributeSelector::exists(name);
                return Ok(match namespace {
                    Some(ns) => selector.with_namespace(ns),
                    None => selector,
                });
            }
            TokenKind::Delim('=') => AttributeOperator::Equals,
            TokenKind::IncludeMatch => AttributeOperator::IncludesWord,
            TokenKind::DashMatch => AttributeOperator::DashMatch,
            TokenKind::PrefixMatch => AttributeOperator::PrefixMatch,
            TokenKind::SuffixMatch => AttributeOperator::SuffixMatch,
            TokenKind::SubstringMatch => AttributeOperator::SubstringMatch,
            _ => return Err(self.unexpected("an attribute operator or ']'")),
        };
        self.position += 1;
        let _ = self.skip_whitespace();

        let value = match self.peek().map(Token::kind) {
            Some(TokenKind::Ident(v) | TokenKind::String(v)) => v.clone(),
            _ => return Err(self.unexpected("an attribute value")),
        };
        self.position += 1;
        let _ = self.skip_whitespace();

        match self.peek().map(Token::kind) {
            Some(TokenKind::RightBracket) => self.position += 1,
            // [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
            Some(TokenKind::Ident(flag))
                if flag.eq_ignore_ascii_case("i") || flag.eq_ignore_ascii_case("s") =>
            {
                return Err(self.unsupported("attribute case-sensitivity flag"));
            }
            _ => return Err(self.unexpected("']'")),
        }

        let selector = AttributeSelector::new(name, operator(value));
        Ok(match namespace {
            Some(ns) => selector.with_namespace(ns),
            None => selector,
        })
    }

    /// Everything after a `:`.
    ///
    /// Pseudo-elements never match a single element, so they become
    /// [`SimpleSelector::SelectNothing`] and are reported once.
    fn parse_pseudo(&mut self) -> Result<SimpleSelector> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected("a pseudo-class name"));
        };

        match token.kind() {
            // [§ 3.6 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
            // "a pseudo-element is represented by two colons (::) followed by
            // the name of the pseudo-element"
            TokenKind::Colon => {
                self.position += 1;
                let written = match self.peek().map(Token::kind) {
                    Some(TokenKind::Ident(name)) => {
                        let name = name.clone();
                        self.position += 1;
                        name
                    }
                    Some(TokenKind::Function(name)) => {
                        let name = name.clone();
                        self.position += 1;
                        let _ = self.consume_arguments()?;
                        name
                    }
                    _ => return Err(self.unexpected("a pseudo-element name")),
                };
                Ok(Self::pseudo_element(&written))
            }

            TokenKind::Ident(name) => {
                let name = name.to_ascii_lowercase();
                self.position += 1;
                if LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str()) {
                    return Ok(Self::pseudo_element(&name));
                }
                Ok(SimpleSelector::PseudoClass(name))
            }

            TokenKind::Function(name) => {
                let name = name.to_ascii_lowercase();
                self.position += 1;
                let arguments = self.consume_arguments()?;
                // the written form of `SelectNothing`
                let not_universal = matches!(arguments.as_slice(), [only] if only.is_delim('*'));
                if name == "not" && not_universal {
                    return Ok(SimpleSelector::SelectNothing);
                }
                Ok(SimpleSelector::FunctionPseudoClass { name, arguments })
            }

            _ => Err(self.unexpected("a pseudo-class name")),
        }
    }

    fn pseudo_element(name: &str) -> SimpleSelector {
        warn_once(
            "CSS",
            &format!("pseudo-element '::{name}' never matches an element"),
        );
        SimpleSelector::SelectNothing
    }

    /// Tokens up to the `)` closing an already consumed function token,
    /// trimmed of surrounding whitespace. The `)` is consumed.
    fn consume_arguments(&mut self) -> Result<Vec<Token>> {
        let start = self.position;
        let mut depth = 0usize;

        while let Some(token) = self.peek() {
            match token.kind() {
                TokenKind::Function(_) | TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen if depth == 0 => {
                    let arguments = trim_whitespace(&self.tokens[start..self.position]).to_vec();
                    self.position += 1;
                    return Ok(arguments);
                }
                TokenKind::RightParen => depth -= 1,
                _ => {}
            }
            self.position += 1;
        }

        Err(CssError::UnexpectedEof {
            expected: "')'".to_string(),
        })
    }

    fn expect_ident(&mut self, expected: &str) -> Result<String> {
        match self.peek().map(Token::kind) {
            Some(TokenKind::Ident(name)) => {
                let name = name.clone();
                self.position += 1;
                Ok(name)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// Skip whitespace tokens; returns true if any were skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.position;
        while self.peek().is_some_and(Token::is_whitespace) {
            self.position += 1;
        }
        self.position > start
    }

    fn unexpected(&self, expected: &str) -> CssError {
        match self.peek() {
            Some(token) if !token.is_eof() => CssError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.to_css(),
                span: token.span(),
            },
            _ => CssError::UnexpectedEof {
                expected: expected.to_string(),
            },
        }
    }

    fn unsupported(&self, what: &str) -> CssError {
        CssError::UnsupportedSelector {
            what: what.to_string(),
            span: self.peek().map(Token::span).unwrap_or_default(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens
            .get(self.position + offset)
            .filter(|token| !token.is_eof())
    }
}

/// Strip leading and trailing whitespace tokens.
pub(crate) fn trim_whitespace(tokens: &[Token]) -> &[Token] {
    let start = tokens
        .iter()
        .position(|t| !t.is_whitespace())
        .unwrap_or(tokens.len());
    let end = tokens
        .iter()
        .rposition(|t| !t.is_whitespace())
        .map_or(start, |i| i + 1);
    &tokens[start..end]
}
