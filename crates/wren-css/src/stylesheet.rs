//! Stylesheet structure: rules, declarations and at-rules.
//!
//! Every node is built once and read through accessors afterwards.

use core::fmt;

use serde::Serialize;

use crate::selector::SelectorGroup;
use crate::tokenizer::{SourceSpan, Token, serialize_identifier};

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// A CSS declaration (e.g., `color: red`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    property: String,
    terms: Vec<Token>,
    important: bool,
    span: SourceSpan,
}

impl Declaration {
    /// Create a declaration. `terms` should not include the `!important`
    /// annotation; pass `important` instead.
    #[must_use]
    pub fn new(property: impl Into<String>, terms: Vec<Token>, important: bool) -> Self {
        Self {
            property: property.into(),
            terms,
            important,
            span: SourceSpan::default(),
        }
    }

    /// Record where the declaration came from.
    #[must_use]
    pub const fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = span;
        self
    }

    /// The property name.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The value tokens, trimmed of surrounding whitespace.
    ///
    /// Empty terms mark a declaration the cascade ignores.
    #[must_use]
    pub fn terms(&self) -> &[Token] {
        &self.terms
    }

    /// [§ 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
    /// Whether the declaration carried `!important`.
    #[must_use]
    pub const fn important(&self) -> bool {
        self.important
    }

    /// From the property name to the last term.
    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        self.span
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        serialize_identifier(&mut out, &self.property);
        out.push_str(": ");
        for term in &self.terms {
            out.push_str(&term.to_css());
        }
        if self.important {
            out.push_str(" !important");
        }
        f.write_str(&out)
    }
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
///
/// A CSS style rule (selector group + declarations).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRule {
    selectors: SelectorGroup,
    declarations: Vec<Declaration>,
}

impl StyleRule {
    /// Create a style rule.
    #[must_use]
    pub const fn new(selectors: SelectorGroup, declarations: Vec<Declaration>) -> Self {
        Self {
            selectors,
            declarations,
        }
    }

    /// The selectors the rule applies to.
    #[must_use]
    pub const fn selectors(&self) -> &SelectorGroup {
        &self.selectors
    }

    /// The declarations in source order.
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.selectors)?;
        for declaration in &self.declarations {
            write!(f, " {declaration};")?;
        }
        f.write_str(" }")
    }
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
///
/// A CSS at-rule, kept as opaque tokens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtRule {
    keyword: String,
    header: Vec<Token>,
    body: Option<Vec<Token>>,
}

impl AtRule {
    /// Create an at-rule. A `None` body is a statement terminated by `;`.
    #[must_use]
    pub fn new(keyword: impl Into<String>, header: Vec<Token>, body: Option<Vec<Token>>) -> Self {
        Self {
            keyword: keyword.into(),
            header,
            body,
        }
    }

    /// The at-keyword name (without the `@`).
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The tokens between the keyword and the block or `;`.
    #[must_use]
    pub fn header(&self) -> &[Token] {
        &self.header
    }

    /// The tokens inside the block, if the rule has one.
    #[must_use]
    pub fn body(&self) -> Option<&[Token]> {
        self.body.as_deref()
    }
}

impl fmt::Display for AtRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::from("@");
        serialize_identifier(&mut out, &self.keyword);
        if !self.header.is_empty() {
            out.push(' ');
        }
        for token in &self.header {
            out.push_str(&token.to_css());
        }
        match &self.body {
            Some(body) => {
                out.push_str(" {");
                for token in body {
                    out.push_str(&token.to_css());
                }
                out.push('}');
            }
            None => out.push(';'),
        }
        f.write_str(&out)
    }
}

/// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
///
/// A CSS rule (either a style rule or an at-rule).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Rule {
    /// A style rule (qualified rule).
    Style(StyleRule),
    /// An at-rule.
    At(AtRule),
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Style(rule) => rule.fmt(f),
            Self::At(rule) => rule.fmt(f),
        }
    }
}

/// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
///
/// A parsed CSS stylesheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Stylesheet {
    rules: Vec<Rule>,
}

impl Stylesheet {
    /// Create a stylesheet from rules in source order.
    #[must_use]
    pub const fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// All rules in source order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Only the style rules, in source order.
    pub fn style_rules(&self) -> impl Iterator<Item = &StyleRule> + '_ {
        self.rules.iter().filter_map(|rule| match rule {
            Rule::Style(style) => Some(style),
            Rule::At(_) => None,
        })
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}
