use super::token::{HashType, Number, SourceSpan, Token, TokenKind};

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// CSS tokenizer following the CSS Syntax Module Level 3 specification.
/// Every token records its span and line; comments are consumed and dropped.
pub struct CssTokenizer {
    /// The input string being tokenized
    input: Vec<char>,
    /// Current position in the input
    position: usize,
    /// Line of the next input code point, starting at 1
    line: usize,
    /// Collected tokens
    tokens: Vec<Token>,
}

impl CssTokenizer {
    /// Create a new CSS tokenizer with the given input.
    ///
    /// Spans count characters of the preprocessed input, where a CR LF pair
    /// is a single newline.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: preprocess(&input.into()),
            position: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    ///
    /// "This section describes how to consume a token from a stream of code points.
    /// It will return a single token of any type."
    ///
    /// Tokenizes the whole input. The last collected token is always EOF.
    pub fn run(&mut self) {
        loop {
            // "Consume comments."
            self.consume_comments();

            let start = self.position;
            let line = self.line;
            let kind = self.consume_token();
            let span = SourceSpan::new(start, self.position, line);

            // A string token starts with the quote it was written with.
            let quote = match kind {
                TokenKind::String(_) => self.input.get(start).copied(),
                _ => None,
            };
            let mut token = Token::new(kind, span);
            if let Some(quote) = quote {
                token = token.with_quote(quote);
            }

            let is_eof = token.is_eof();
            self.tokens.push(token);
            if is_eof {
                break;
            }
        }
    }

    /// Return the collected tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Return a reference to the collected tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> TokenKind {
        // "Consume the next input code point."
        let Some(c) = self.consume() else {
            return TokenKind::Eof;
        };
        if let Some(kind) = punctuation(c) {
            return kind;
        }

        match c {
            // "Consume as much whitespace as possible. Return a <whitespace-token>."
            c if is_whitespace(c) => {
                self.consume_whitespace();
                TokenKind::Whitespace
            }

            '"' | '\'' => self.consume_string_token(c),

            // "If the next input code point is an ident code point or the next
            // two input code points are a valid escape..."
            '#' if self.peek().is_some_and(is_ident_code_point)
                || is_valid_escape(self.peek(), self.peek_at(1)) =>
            {
                // "If the next 3 input code points would start an ident sequence,
                // set the <hash-token>'s type flag to 'id'."
                let hash_type = if self.next_would_start_ident_sequence() {
                    HashType::Id
                } else {
                    HashType::Unrestricted
                };
                TokenKind::Hash {
                    value: self.consume_ident_sequence(),
                    hash_type,
                }
            }

            // [§ 6.1 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-representation)
            // `~=` `|=` `^=` `$=` `*=`, and `||`
            '|' if self.peek() == Some('|') => {
                self.skip(1);
                TokenKind::Column
            }
            '$' | '*' | '^' | '|' | '~' if self.peek() == Some('=') => {
                self.skip(1);
                match c {
                    '$' => TokenKind::SuffixMatch,
                    '*' => TokenKind::SubstringMatch,
                    '^' => TokenKind::PrefixMatch,
                    '|' => TokenKind::DashMatch,
                    _ => TokenKind::IncludeMatch,
                }
            }

            '+' | '-' | '.' if self.current_would_start_number(c) => {
                self.reconsume();
                self.consume_numeric_token()
            }
            '-' if self.next_is("->") => {
                self.skip(2);
                TokenKind::Cdc
            }
            '-' if would_start_ident_sequence(Some('-'), self.peek(), self.peek_at(1)) => {
                self.reconsume();
                self.consume_ident_like_token()
            }
            '<' if self.next_is("!--") => {
                self.skip(3);
                TokenKind::Cdo
            }

            // "If the next 3 input code points would start an ident sequence,
            // consume an ident sequence, create an <at-keyword-token> with its
            // value set to the returned value, and return it."
            '@' if self.next_would_start_ident_sequence() => {
                TokenKind::AtKeyword(self.consume_ident_sequence())
            }

            // A backslash that does not start a valid escape is a parse error
            // and falls through to a delim.
            '\\' if is_valid_escape(Some('\\'), self.peek()) => {
                self.reconsume();
                self.consume_ident_like_token()
            }

            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()
            }
            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token()
            }

            // "Return a <delim-token> with its value set to the current input code point."
            c => TokenKind::Delim(c),
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// Everything from `/*` through the next `*/`, or to the end of input.
    fn consume_comments(&mut self) {
        while self.next_is("/*") {
            self.skip(2);
            while !self.next_is("*/") && self.consume().is_some() {}
            self.skip(2);
        }
    }

    /// Consume whitespace characters.
    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    ///
    /// An unescaped newline ends the string as a bad string and is left in
    /// the input. End of input ends it normally.
    fn consume_string_token(&mut self, quote: char) -> TokenKind {
        let mut value = String::new();

        while let Some(c) = self.consume() {
            match c {
                c if c == quote => break,
                '\n' => {
                    self.reconsume();
                    return TokenKind::BadString;
                }
                // an escaped newline is a line continuation
                '\\' if self.peek() == Some('\n') => self.skip(1),
                '\\' if self.peek().is_some() => value.push(self.consume_escaped_code_point()),
                '\\' => {}
                c => value.push(c),
            }
        }

        TokenKind::String(value)
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> TokenKind {
        let value = self.consume_number();

        if self.next_would_start_ident_sequence() {
            TokenKind::Dimension {
                value,
                unit: self.consume_ident_sequence(),
            }
        } else if self.peek() == Some('%') {
            self.skip(1);
            TokenKind::Percentage(value)
        } else {
            TokenKind::Number(value)
        }
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    ///
    /// `url(` followed by a quote stays a function token so the string inside
    /// is tokenized normally; an unquoted `url(` becomes a single url token.
    fn consume_ident_like_token(&mut self) -> TokenKind {
        let name = self.consume_ident_sequence();

        if self.peek() != Some('(') {
            return TokenKind::Ident(name);
        }
        self.skip(1);

        if !name.eq_ignore_ascii_case("url") {
            return TokenKind::Function(name);
        }

        // "While the next two input code points are whitespace, consume the
        // next input code point."
        while self.peek().is_some_and(is_whitespace) && self.peek_at(1).is_some_and(is_whitespace)
        {
            self.skip(1);
        }

        let is_quote = |c: Option<char>| matches!(c, Some('"' | '\''));
        let quoted = match self.peek() {
            Some(c) if is_whitespace(c) => is_quote(self.peek_at(1)),
            next => is_quote(next),
        };
        if quoted {
            TokenKind::Function(name)
        } else {
            self.consume_url_token()
        }
    }

    /// [§ 4.3.6 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    ///
    /// Whitespace is only allowed around the url. Quotes, `(`, non-printable
    /// code points and invalid escapes make it a bad url, after which the
    /// rest up to `)` is discarded.
    fn consume_url_token(&mut self) -> TokenKind {
        let mut value = String::new();
        self.consume_whitespace();

        loop {
            match self.consume() {
                Some(')') | None => return TokenKind::Url(value),
                Some(c) if is_whitespace(c) => {
                    self.consume_whitespace();
                    if matches!(self.peek(), Some(')') | None) {
                        self.skip(1);
                        return TokenKind::Url(value);
                    }
                    break;
                }
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    value.push(self.consume_escaped_code_point());
                }
                Some(c) if matches!(c, '"' | '\'' | '(' | '\\') || is_non_printable(c) => break,
                Some(c) => value.push(c),
            }
        }

        self.consume_bad_url_remnants();
        TokenKind::BadUrl
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_bad_url_remnants(&mut self) {
        while let Some(c) = self.consume() {
            match c {
                ')' => return,
                '\\' if is_valid_escape(Some('\\'), self.peek()) => {
                    let _ = self.consume_escaped_code_point();
                }
                _ => {}
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        let mut name = String::new();

        loop {
            match self.peek() {
                Some(c) if is_ident_code_point(c) => self.consume_into(&mut name),
                Some('\\') if is_valid_escape(Some('\\'), self.peek_at(1)) => {
                    self.skip(1);
                    name.push(self.consume_escaped_code_point());
                }
                _ => return name,
            }
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    ///
    /// The number is an integer unless it has a fraction or an exponent.
    /// Integers that do not fit an `i64` keep their value as a float, and
    /// values beyond the range of `f64` are clamped to its largest finite
    /// magnitude.
    fn consume_number(&mut self) -> Number {
        let mut repr = String::new();
        let mut is_integer = true;

        if matches!(self.peek(), Some('+' | '-')) {
            self.consume_into(&mut repr);
        }
        self.consume_digits_into(&mut repr);

        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.consume_into(&mut repr);
            self.consume_digits_into(&mut repr);
            is_integer = false;
        }

        // e, E, e+, e-, E+ or E- followed by a digit
        if matches!(self.peek(), Some('e' | 'E')) {
            let sign = usize::from(matches!(self.peek_at(1), Some('+' | '-')));
            if self.peek_at(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..=sign {
                    self.consume_into(&mut repr);
                }
                self.consume_digits_into(&mut repr);
                is_integer = false;
            }
        }

        match repr.parse::<i64>() {
            Ok(integer) if is_integer => Number::Integer(integer),
            _ => Number::Float(
                repr.parse::<f64>()
                    .map_or(0.0, |float| float.clamp(f64::MIN, f64::MAX)),
            ),
        }
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// Called after the backslash. Up to six hex digits and one following
    /// whitespace are consumed; zero, surrogates and values past U+10FFFF
    /// become U+FFFD, as does a backslash at the end of input.
    fn consume_escaped_code_point(&mut self) -> char {
        let Some(first) = self.consume() else {
            return '\u{FFFD}';
        };
        if !first.is_ascii_hexdigit() {
            return first;
        }

        let mut hex = String::from(first);
        while hex.len() < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            self.consume_into(&mut hex);
        }
        if self.peek().is_some_and(is_whitespace) {
            self.skip(1);
        }

        u32::from_str_radix(&hex, 16)
            .ok()
            .filter(|&code_point| code_point != 0)
            .and_then(char::from_u32)
            .unwrap_or('\u{FFFD}')
    }

    /// Check whether the current input code point (already consumed) and the
    /// next two would start a number.
    fn current_would_start_number(&self, current: char) -> bool {
        would_start_number(Some(current), self.peek(), self.peek_at(1))
    }

    /// Check whether the next three input code points would start an ident
    /// sequence.
    fn next_would_start_ident_sequence(&self) -> bool {
        would_start_ident_sequence(self.peek(), self.peek_at(1), self.peek_at(2))
    }

    /// Consume the next character and append it to `buf`.
    fn consume_into(&mut self, buf: &mut String) {
        if let Some(c) = self.consume() {
            buf.push(c);
        }
    }

    /// Consume digits while they last, appending them to `buf`.
    fn consume_digits_into(&mut self, buf: &mut String) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.consume_into(buf);
        }
    }

    /// Whether the upcoming input is exactly `text`.
    fn next_is(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(offset, c)| self.peek_at(offset) == Some(c))
    }

    /// Consume `count` characters, fewer at the end of input.
    fn skip(&mut self, count: usize) {
        for _ in 0..count {
            let _ = self.consume();
        }
    }

    /// Consume and return the next character.
    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Put back the last consumed character.
    fn reconsume(&mut self) {
        if self.position > 0 {
            self.position -= 1;
            if self.input[self.position] == '\n' {
                self.line -= 1;
            }
        }
    }

    /// Peek at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    /// Peek at a character at an offset from current position.
    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    first == Some('\\') && second != Some('\n')
}

/// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
fn would_start_ident_sequence(
    first: Option<char>,
    second: Option<char>,
    third: Option<char>,
) -> bool {
    match first {
        Some('-') => {
            second.is_some_and(|c| c == '-' || is_ident_start_code_point(c))
                || is_valid_escape(second, third)
        }
        Some('\\') => is_valid_escape(first, second),
        Some(c) => is_ident_start_code_point(c),
        None => false,
    }
}

/// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
fn would_start_number(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
    match first {
        Some('+' | '-') => is_digit(second) || (second == Some('.') && is_digit(third)),
        Some('.') => is_digit(second),
        c => is_digit(c),
    }
}

/// [§ 3.3 Preprocessing the input stream](https://www.w3.org/TR/css-syntax-3/#input-preprocessing)
///
/// CR LF pairs, lone CRs and form feeds become LF; NUL becomes U+FFFD.
fn preprocess(input: &str) -> Vec<char> {
    let mut chars = Vec::with_capacity(input.len());
    let mut rest = input.chars().peekable();
    while let Some(c) = rest.next() {
        chars.push(match c {
            '\r' => {
                let _ = rest.next_if_eq(&'\n');
                '\n'
            }
            '\x0C' => '\n',
            '\0' => '\u{FFFD}',
            c => c,
        });
    }
    chars
}

/// Code points that always form a token of their own.
fn punctuation(c: char) -> Option<TokenKind> {
    Some(match c {
        '(' => TokenKind::LeftParen,
        ')' => TokenKind::RightParen,
        ',' => TokenKind::Comma,
        ':' => TokenKind::Colon,
        ';' => TokenKind::Semicolon,
        '[' => TokenKind::LeftBracket,
        ']' => TokenKind::RightBracket,
        '{' => TokenKind::LeftBrace,
        '}' => TokenKind::RightBrace,
        _ => return None,
    })
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
///
/// "A newline, U+0009 CHARACTER TABULATION, or U+0020 SPACE."
/// Carriage returns and form feeds count as newlines.
pub(crate) const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ' | '\r' | '\x0C')
}

/// [§ 4.2 Definitions - non-printable code point](https://www.w3.org/TR/css-syntax-3/#non-printable-code-point)
const fn is_non_printable(c: char) -> bool {
    matches!(c, '\0'..='\x08' | '\x0B' | '\x0E'..='\x1F' | '\x7F')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
///
/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
///
/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}
