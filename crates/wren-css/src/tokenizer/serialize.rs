//! Token serialization per [CSSOM § 2.1 Common Serializing Idioms](https://drafts.csswg.org/cssom/#common-serializing-idioms).
//!
//! Writes a token back to CSS text such that tokenizing the output yields a
//! token of the same kind with the same payload. Characters that cannot stand
//! literally in their position are written as hexadecimal escapes.

use core::fmt::Write;

use super::token::{Number, Token, TokenKind};
use super::tokenizer::is_whitespace;

/// Serialize a single token to CSS text.
///
/// # Panics
///
/// Panics with "unsupported token kind" for [`TokenKind::Eof`] and for
/// numbers that are not finite, neither of which has a textual form.
#[must_use]
pub fn serialize_token(token: &Token) -> String {
    let mut out = String::new();
    write_token(&mut out, token);
    out
}

/// Append the CSS text of `token` to `out`.
///
/// # Panics
///
/// See [`serialize_token`].
pub fn write_token(out: &mut String, token: &Token) {
    match token.kind() {
        TokenKind::Ident(name) => serialize_identifier(out, name),
        // `url(` only reads back as a function token when its quoted
        // argument follows; on its own it starts an unquoted url.
        TokenKind::Function(name) => {
            serialize_identifier(out, name);
            out.push('(');
        }
        TokenKind::AtKeyword(name) => {
            out.push('@');
            serialize_identifier(out, name);
        }
        TokenKind::Hash { value, .. } => {
            out.push('#');
            serialize_name(out, value);
        }
        TokenKind::String(value) => serialize_string(out, value, token.quote_preference()),
        // A quote directly followed by a newline re-tokenizes as a bad string.
        TokenKind::BadString => out.push_str("\"\n"),
        TokenKind::Url(value) => serialize_url(out, value),
        // An unquoted url containing "(" re-tokenizes as a bad url.
        TokenKind::BadUrl => out.push_str("url(()"),
        // A backslash is only a delimiter when a newline follows it.
        TokenKind::Delim('\\') => out.push_str("\\\n"),
        TokenKind::Delim(c) => out.push(*c),
        TokenKind::Number(n) => write_number(out, *n),
        TokenKind::Percentage(n) => {
            write_number(out, *n);
            out.push('%');
        }
        TokenKind::Dimension { value, unit } => {
            write_number(out, *value);
            serialize_unit(out, unit);
        }
        TokenKind::IncludeMatch => out.push_str("~="),
        TokenKind::DashMatch => out.push_str("|="),
        TokenKind::PrefixMatch => out.push_str("^="),
        TokenKind::SuffixMatch => out.push_str("$="),
        TokenKind::SubstringMatch => out.push_str("*="),
        TokenKind::Column => out.push_str("||"),
        TokenKind::Whitespace => out.push(' '),
        TokenKind::Cdo => out.push_str("<!--"),
        TokenKind::Cdc => out.push_str("-->"),
        TokenKind::Colon => out.push(':'),
        TokenKind::Semicolon => out.push(';'),
        TokenKind::Comma => out.push(','),
        TokenKind::LeftBracket => out.push('['),
        TokenKind::RightBracket => out.push(']'),
        TokenKind::LeftParen => out.push('('),
        TokenKind::RightParen => out.push(')'),
        TokenKind::LeftBrace => out.push('{'),
        TokenKind::RightBrace => out.push('}'),
        TokenKind::Eof => panic!("unsupported token kind: {}", token.kind().name()),
    }
}

/// [CSSOM § 2.1 serialize an identifier](https://drafts.csswg.org/cssom/#serialize-an-identifier)
///
/// Letters, digits, `-` and `_` are written literally; everything else,
/// including non-ASCII code points, is hex-escaped. A digit in first
/// position, or in second position after a leading `-`, is escaped so it
/// cannot start a number, and a lone `-` is escaped so it cannot become a
/// delimiter.
pub fn serialize_identifier(out: &mut String, ident: &str) {
    if ident == "-" {
        out.push_str("\\-");
        return;
    }

    let chars: Vec<char> = ident.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        let next = chars.get(i + 1).copied();
        let leading_digit =
            c.is_ascii_digit() && (i == 0 || (i == 1 && chars.first() == Some(&'-')));
        if leading_digit || !is_plain_name_char(c) {
            push_hex_escape(out, c, next);
        } else {
            out.push(c);
        }
    }
}

/// Serialize the value of a hash token. Unlike identifiers, a leading digit
/// stays literal because `#` already forces name parsing.
pub fn serialize_name(out: &mut String, name: &str) {
    let chars: Vec<char> = name.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if is_plain_name_char(c) {
            out.push(c);
        } else {
            push_hex_escape(out, c, chars.get(i + 1).copied());
        }
    }
}

/// [CSSOM § 2.1 serialize a string](https://drafts.csswg.org/cssom/#serialize-a-string)
///
/// Uses `preferred` when it is `"` or `'`. Otherwise picks `'` when the value
/// contains `"` but not `'`, and `"` in every other case. The chosen quote,
/// backslashes, and whitespace or control characters other than space are
/// hex-escaped.
pub fn serialize_string(out: &mut String, value: &str, preferred: Option<char>) {
    let quote = preferred
        .filter(|q| matches!(q, '"' | '\''))
        .unwrap_or_else(|| {
            if value.contains('"') && !value.contains('\'') {
                '\''
            } else {
                '"'
            }
        });

    out.push(quote);
    let chars: Vec<char> = value.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c == quote || c == '\\' || (c != ' ' && (c.is_whitespace() || c.is_control())) {
            push_hex_escape(out, c, chars.get(i + 1).copied());
        } else {
            out.push(c);
        }
    }
    out.push(quote);
}

/// [CSSOM § 2.1 serialize a URL](https://drafts.csswg.org/cssom/#serialize-a-url)
///
/// Written in unquoted `url(...)` form; characters that would end or
/// invalidate an unquoted url are hex-escaped.
pub fn serialize_url(out: &mut String, url: &str) {
    out.push_str("url(");
    let chars: Vec<char> = url.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '"' | '\'' | '(' | ')' | '\\') || c.is_whitespace() || c.is_control() {
            push_hex_escape(out, c, chars.get(i + 1).copied());
        } else {
            out.push(c);
        }
    }
    out.push(')');
}

/// Write a dimension unit. A unit starting with `e` or `E` followed by a
/// digit, or by a sign and a digit, would be read back as an exponent, so the
/// `e` is escaped.
fn serialize_unit(out: &mut String, unit: &str) {
    let mut chars = unit.chars();
    let Some(first) = chars.next() else {
        return;
    };
    let second = chars.next();
    let third = chars.next();

    let digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
    let looks_like_exponent = matches!(first, 'e' | 'E')
        && (digit(second) || (matches!(second, Some('+' | '-')) && digit(third)));

    if looks_like_exponent {
        push_hex_escape(out, first, second);
        serialize_name(out, &unit[first.len_utf8()..]);
    } else {
        serialize_identifier(out, unit);
    }
}

/// Write a number with the shortest representation that reads back as the
/// same value.
fn write_number(out: &mut String, n: Number) {
    match n {
        Number::Integer(i) => {
            let _ = write!(out, "{i}");
        }
        Number::Float(f) if f.is_finite() => {
            let _ = write!(out, "{f}");
        }
        Number::Float(f) => panic!("unsupported token kind: non-finite number {f}"),
    }
}

/// Write `\` followed by the lowercase hex code of `c`. A space terminates the
/// escape when the following character would otherwise be absorbed into it.
fn push_hex_escape(out: &mut String, c: char, next: Option<char>) {
    let hex = format!("{:x}", u32::from(c));
    out.push('\\');
    out.push_str(&hex);
    let absorbs_next =
        next.is_some_and(|n| is_whitespace(n) || (hex.len() < 6 && n.is_ascii_hexdigit()));
    if absorbs_next {
        out.push(' ');
    }
}

/// Characters written literally inside identifiers and names.
const fn is_plain_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}
