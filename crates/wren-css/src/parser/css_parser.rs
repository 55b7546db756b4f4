//! CSS Parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! "The input to the parsing stage is a stream of tokens from the tokenization stage."
//! Style rules get a structured selector group and declarations; at-rules are
//! kept as opaque tokens.

use wren_common::warning::warn_once;

use super::selector_parser::{parse_complex_selector, split_selector_list, trim_whitespace};
use crate::error::CssError;
use crate::selector::{Selector, SelectorGroup, SimpleSelector};
use crate::stylesheet::{AtRule, Declaration, Rule, StyleRule, Stylesheet};
use crate::tokenizer::{Token, TokenKind};

/// CSS parser
///
/// Never fails as a whole: malformed pieces are dropped or replaced and the
/// problems are collected in [`CssParser::errors`].
pub struct CssParser {
    tokens: Vec<Token>,
    position: usize,
    errors: Vec<CssError>,
}

impl CssParser {
    /// Create a new parser from a list of tokens.
    #[must_use]
    pub const fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            errors: Vec::new(),
        }
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// "To parse a stylesheet from input..."
    pub fn parse_stylesheet(&mut self) -> Stylesheet {
        // "Consume a list of rules from input, with the top-level flag set."
        Stylesheet::new(self.consume_list_of_rules())
    }

    /// [§ 5.3.6 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    ///
    /// Parse declarations from a style attribute or similar.
    pub fn parse_declaration_list(&mut self) -> Vec<Declaration> {
        self.consume_list_of_declarations()
    }

    /// Problems recovered from so far, in source order.
    #[must_use]
    pub fn errors(&self) -> &[CssError] {
        &self.errors
    }

    /// Take the recorded problems, leaving none behind.
    pub fn take_errors(&mut self) -> Vec<CssError> {
        std::mem::take(&mut self.errors)
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    fn consume_list_of_rules(&mut self) -> Vec<Rule> {
        // "Create an initially empty list of rules."
        let mut rules = Vec::new();

        loop {
            match self.peek().map(Token::kind) {
                // "<whitespace-token>" "Do nothing."
                // "<CDO-token>" or "<CDC-token>" "If the top-level flag is set, do nothing."
                Some(TokenKind::Whitespace | TokenKind::Cdo | TokenKind::Cdc) => {
                    let _ = self.consume();
                }

                // "<EOF-token>" "Return the list of rules."
                None => return rules,

                // "<at-keyword-token>"
                // "Reconsume the current input token. Consume an at-rule, and append
                // the returned value to the list of rules."
                Some(TokenKind::AtKeyword(_)) => {
                    if let Some(at_rule) = self.consume_at_rule() {
                        rules.push(Rule::At(at_rule));
                    }
                }

                // "anything else"
                // "Reconsume the current input token. Consume a qualified rule. If
                // anything is returned, append it to the list of rules."
                Some(_) => {
                    if let Some(rule) = self.consume_qualified_rule() {
                        rules.push(Rule::Style(rule));
                    }
                }
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn consume_at_rule(&mut self) -> Option<AtRule> {
        // "Consume the next input token."
        let keyword = match self.consume().map(Token::kind) {
            Some(TokenKind::AtKeyword(keyword)) => keyword.clone(),
            _ => return None,
        };

        let mut header = Vec::new();
        let mut depth = 0usize;

        loop {
            match self.peek().map(Token::kind) {
                // "<semicolon-token>" "Return the at-rule."
                Some(TokenKind::Semicolon) if depth == 0 => {
                    let _ = self.consume();
                    return Some(AtRule::new(keyword, trimmed(&header), None));
                }

                // "<EOF-token>" "This is a parse error. Return the at-rule."
                None => {
                    self.record(CssError::UnexpectedEof {
                        expected: format!("';' or '{{' after @{keyword}"),
                    });
                    return Some(AtRule::new(keyword, trimmed(&header), None));
                }

                // "<{-token>"
                // "Consume a simple block and assign it to the at-rule's block.
                // Return the at-rule."
                Some(TokenKind::LeftBrace) if depth == 0 => {
                    let body = self.consume_block_tokens();
                    return Some(AtRule::new(keyword, trimmed(&header), Some(body)));
                }

                // "anything else"
                // "Reconsume the current input token. Consume a component value.
                // Append the returned value to the at-rule's prelude."
                Some(kind) => {
                    depth = nesting_after(kind, depth);
                    if let Some(token) = self.consume().cloned() {
                        header.push(token);
                    }
                }
            }
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self) -> Option<StyleRule> {
        // "Create a new qualified rule with its prelude initially set to an empty list,
        // and its value initially set to nothing."
        let mut prelude = Vec::new();

        loop {
            match self.peek().map(Token::kind) {
                // "<EOF-token>" "This is a parse error. Return nothing."
                None => {
                    self.record(CssError::UnexpectedEof {
                        expected: "'{' to open a style rule".to_string(),
                    });
                    return None;
                }

                // "<{-token>"
                // "Consume a simple block and assign it to the qualified rule's block.
                // Return the qualified rule."
                Some(TokenKind::LeftBrace) => {
                    let _ = self.consume(); // {
                    let selectors = self.selector_group(&prelude)?;
                    let declarations = self.consume_list_of_declarations();

                    if self.peek().is_some_and(|t| *t.kind() == TokenKind::RightBrace) {
                        let _ = self.consume();
                    }

                    return Some(StyleRule::new(selectors, declarations));
                }

                // "anything else"
                // "Reconsume the current input token. Consume a component value.
                // Append the returned value to the qualified rule's prelude."
                Some(_) => {
                    if let Some(token) = self.consume().cloned() {
                        prelude.push(token);
                    }
                }
            }
        }
    }

    /// [§ 4.1 Selector Lists](https://www.w3.org/TR/selectors-4/#grouping)
    ///
    /// An alternative that does not parse becomes [`SimpleSelector::SelectNothing`]
    /// so the rest of the rule survives.
    fn selector_group(&mut self, prelude: &[Token]) -> Option<SelectorGroup> {
        let mut selectors = Vec::new();

        for alternative in split_selector_list(prelude) {
            let alternative = trim_whitespace(alternative);
            match parse_complex_selector(alternative) {
                Ok(selector) => selectors.push(selector),
                Err(error) => {
                    let text: String = alternative.iter().map(Token::to_css).collect();
                    warn_once(
                        "CSS",
                        &format!("selector '{text}' will never match: {error}"),
                    );
                    self.errors.push(error);
                    selectors.push(Selector::Simple(SimpleSelector::SelectNothing));
                }
            }
        }

        match SelectorGroup::new(selectors) {
            Ok(group) => Some(group),
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }

    /// [§ 5.4.7 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    ///
    /// The tokens between a `{` and its matching `}`, both consumed.
    fn consume_block_tokens(&mut self) -> Vec<Token> {
        let _ = self.consume(); // {
        let mut body = Vec::new();
        let mut depth = 0usize;

        while let Some(token) = self.consume() {
            match token.kind() {
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace if depth == 0 => return body,
                TokenKind::RightBrace => depth -= 1,
                _ => {}
            }
            body.push(token.clone());
        }

        self.record(CssError::UnexpectedEof {
            expected: "'}'".to_string(),
        });
        body
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    fn consume_list_of_declarations(&mut self) -> Vec<Declaration> {
        let mut declarations = Vec::new();

        loop {
            match self.peek().map(Token::kind) {
                // "<whitespace-token>" or "<semicolon-token>" "Do nothing."
                Some(TokenKind::Whitespace | TokenKind::Semicolon) => {
                    let _ = self.consume();
                }

                // "<EOF-token>" or "<}-token>" "Return the list of declarations."
                None | Some(TokenKind::RightBrace) => return declarations,

                // "<at-keyword-token>"
                // "Reconsume the current input token. Consume an at-rule."
                // Nested at-rules are not kept.
                Some(TokenKind::AtKeyword(_)) => {
                    let _ = self.consume_at_rule();
                }

                // "<ident-token>"
                // "Consume a declaration. If anything was returned, append it to
                // the list of declarations."
                Some(TokenKind::Ident(_)) => {
                    if let Some(declaration) = self.consume_declaration() {
                        declarations.push(declaration);
                    }
                }

                // "anything else"
                // "This is a parse error. Reconsume the current input token. As long as
                // the next input token is anything other than a <semicolon-token> or
                // <EOF-token>, consume a component value and throw away the returned value."
                Some(_) => {
                    let error = self.unexpected("a property name");
                    self.skip_malformed_declaration(error);
                }
            }
        }
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    fn consume_declaration(&mut self) -> Option<Declaration> {
        // "Consume the next input token."
        let (property, start) = match self.consume() {
            Some(token) => match token.kind() {
                TokenKind::Ident(name) => (name.clone(), token.span()),
                _ => return None,
            },
            None => return None,
        };

        // "While the next input token is a <whitespace-token>, consume the next input token."
        self.skip_whitespace();

        // "If the next input token is anything other than a <colon-token>, this is a parse error.
        // Return nothing."
        if !self.peek().is_some_and(|t| *t.kind() == TokenKind::Colon) {
            let error = self.unexpected(&format!("':' after '{property}'"));
            self.skip_malformed_declaration(error);
            return None;
        }
        let _ = self.consume(); // :

        // "As long as the next input token is anything other than an <EOF-token>, consume a
        // component value and append it to the declaration's value."
        let mut value = Vec::new();
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            let kind = token.kind();
            if depth == 0 && matches!(kind, TokenKind::Semicolon | TokenKind::RightBrace) {
                break;
            }
            depth = nesting_after(kind, depth);
            if let Some(token) = self.consume().cloned() {
                value.push(token);
            }
        }

        let important = check_important(&value);
        let terms = trimmed(&trim_important(value));
        let span = terms.last().map_or(start, |last| start.to(last.span()));

        Some(Declaration::new(property, terms, important).with_span(span))
    }

    /// Record `error` and skip to just past the next top-level `;`, or up to
    /// the `}` closing the block.
    fn skip_malformed_declaration(&mut self, error: CssError) {
        warn_once("CSS", &format!("skipped malformed declaration: {error}"));
        self.errors.push(error);

        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            let kind = token.kind();
            if depth == 0 {
                match kind {
                    TokenKind::Semicolon => {
                        let _ = self.consume();
                        return;
                    }
                    TokenKind::RightBrace => return,
                    _ => {}
                }
            }
            depth = nesting_after(kind, depth);
            let _ = self.consume();
        }
    }

    fn record(&mut self, error: CssError) {
        warn_once("CSS", &error.to_string());
        self.errors.push(error);
    }

    fn unexpected(&self, expected: &str) -> CssError {
        match self.peek() {
            Some(token) => CssError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.to_css(),
                span: token.span(),
            },
            None => CssError::UnexpectedEof {
                expected: expected.to_string(),
            },
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(Token::is_whitespace) {
            let _ = self.consume();
        }
    }

    fn consume(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position).filter(|t| !t.is_eof())?;
        self.position += 1;
        Some(token)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).filter(|t| !t.is_eof())
    }
}

/// Track `(`, `[`, `{` and function nesting across one token.
const fn nesting_after(kind: &TokenKind, depth: usize) -> usize {
    match kind {
        TokenKind::Function(_)
        | TokenKind::LeftParen
        | TokenKind::LeftBracket
        | TokenKind::LeftBrace => depth + 1,
        TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
            depth.saturating_sub(1)
        }
        _ => depth,
    }
}

fn trimmed(tokens: &[Token]) -> Vec<Token> {
    trim_whitespace(tokens).to_vec()
}

/// Check if the value ends with !important.
///
/// [§ 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
///
/// "A declaration is important if it has a !important annotation, i.e.
/// if the last two (non-whitespace, non-comment) tokens in its value are
/// a <delim-token> with the value "!" followed by an <ident-token> with
/// a value that is an ASCII case-insensitive match for "important"."
fn check_important(value: &[Token]) -> bool {
    let mut iter = value.iter().rev().filter(|t| !t.is_whitespace());

    let is_important = iter.next().is_some_and(|t| {
        matches!(t.kind(), TokenKind::Ident(s) if s.eq_ignore_ascii_case("important"))
    });
    is_important && iter.next().is_some_and(|t| t.is_delim('!'))
}

/// Remove trailing whitespace and `!important` from a declaration value.
///
/// A value without the annotation only loses its trailing whitespace.
fn trim_important(mut value: Vec<Token>) -> Vec<Token> {
    let pop_whitespace = |value: &mut Vec<Token>| {
        while value.last().is_some_and(Token::is_whitespace) {
            let _ = value.pop();
        }
    };

    if !check_important(&value) {
        pop_whitespace(&mut value);
        return value;
    }

    // STEP 1: trailing whitespace
    pop_whitespace(&mut value);
    // STEP 2: "important"
    let _ = value.pop();
    // STEP 3: whitespace between ! and important
    pop_whitespace(&mut value);
    // STEP 4: "!"
    let _ = value.pop();
    // STEP 5: whitespace before !
    pop_whitespace(&mut value);

    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind().clone()).collect()
    }

    #[test]
    fn test_check_important_allows_space_after_bang() {
        let value = vec![
            Token::ident("red"),
            Token::of(TokenKind::Whitespace),
            Token::delim('!'),
            Token::of(TokenKind::Whitespace),
            Token::ident("IMPORTANT"),
            Token::of(TokenKind::Whitespace),
        ];
        assert!(check_important(&value));
        assert_eq!(values(&trim_important(value)), vec![TokenKind::Ident("red".into())]);
    }

    #[test]
    fn test_trim_important_leaves_other_values_alone() {
        let value = vec![Token::ident("important"), Token::of(TokenKind::Whitespace)];
        assert!(!check_important(&value));
        assert_eq!(
            values(&trim_important(value)),
            vec![TokenKind::Ident("important".into())]
        );
    }

    #[test]
    fn test_nesting_tracks_functions_and_blocks() {
        let depth = nesting_after(&TokenKind::Function("rgb".into()), 0);
        assert_eq!(depth, 1);
        assert_eq!(nesting_after(&TokenKind::LeftBrace, depth), 2);
        assert_eq!(nesting_after(&TokenKind::RightParen, 0), 0);
    }
}
