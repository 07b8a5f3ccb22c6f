use crate::diagnostic::Diagnostic;
use crate::span::{Span, Spanned};
use crate::syntax::lexeme::Lexeme;

/// Default cap on identifier length.
pub const MAX_IDENTIFIER_LENGTH: usize = 32;

pub struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    max_identifier_length: usize,
    /// Whether the previous token can end an operand (decides if a sign
    /// starts a literal or is an operator).
    after_operand: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
            diagnostics: Vec::new(),
            max_identifier_length: MAX_IDENTIFIER_LENGTH,
            after_operand: false,
        }
    }

    pub fn with_max_identifier_length(mut self, max: usize) -> Self {
        self.max_identifier_length = max;
        self
    }

    pub fn tokenize(mut self) -> (Vec<Spanned<Lexeme>>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.node == Lexeme::Eof;
            self.after_operand = tok.node.ends_operand();
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tracing::debug!(
            tokens = tokens.len(),
            errors = self.diagnostics.len(),
            "lexed source"
        );
        (tokens, self.diagnostics)
    }

    fn next_token(&mut self) -> Spanned<Lexeme> {
        loop {
            self.skip_whitespace_and_comments();

            if self.pos >= self.source.len() {
                return self.make_token(Lexeme::Eof, self.pos, self.pos);
            }

            let start = self.pos;
            let ch = self.source[self.pos];

            if is_ident_start(ch) {
                if let Some(tok) = self.scan_ident_or_keyword() {
                    return tok;
                }
                continue;
            }

            if self.starts_number(ch) {
                if let Some(tok) = self.scan_number() {
                    return tok;
                }
                continue;
            }

            let scanned = match ch {
                b'^' => self.scan_character(),
                b'"' => self.scan_string(),
                _ => self.scan_symbol(start),
            };
            if let Some(tok) = scanned {
                return tok;
            }
            // error was recorded, try again
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }

            // `# ... #` or `# ...` to end of line
            if self.peek() == Some(b'#') {
                self.pos += 1;
                while let Some(c) = self.peek() {
                    self.pos += 1;
                    if c == b'#' || c == b'\n' {
                        break;
                    }
                }
                continue;
            }

            break;
        }
    }

    fn starts_number(&self, ch: u8) -> bool {
        let next = self.peek_at(1);
        let next_is_digit = next.is_some_and(|c| c.is_ascii_digit());
        match ch {
            b'0'..=b'9' => true,
            b'.' => next_is_digit,
            b'+' | b'-' if !self.after_operand => {
                next_is_digit
                    || (next == Some(b'.') && self.peek_at(2).is_some_and(|c| c.is_ascii_digit()))
            }
            _ => false,
        }
    }

    fn scan_ident_or_keyword(&mut self) -> Option<Spanned<Lexeme>> {
        let start = self.pos;
        while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
            self.pos += 1;
        }
        let text = self.text(start, self.pos);
        if text.len() > self.max_identifier_length {
            self.diagnostics.push(
                Diagnostic::error(
                    format!(
                        "identifier '{}' is longer than {} characters",
                        text, self.max_identifier_length
                    ),
                    Span::new(start as u32, self.pos as u32),
                )
                .with_help("use a shorter name".to_string()),
            );
            return None;
        }
        let token = Lexeme::from_keyword(&text).unwrap_or(Lexeme::Ident(text));
        Some(self.make_token(token, start, self.pos))
    }

    fn scan_number(&mut self) -> Option<Spanned<Lexeme>> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        self.skip_digits();

        let is_float = self.peek() == Some(b'.')
            && self.peek_at(1).is_some_and(|c| c.is_ascii_digit());
        if !is_float {
            let text = self.text(start, self.pos);
            return match text.parse::<i32>() {
                Ok(n) => Some(self.make_token(Lexeme::Integer(n), start, self.pos)),
                Err(_) => {
                    self.diagnostics.push(
                        Diagnostic::error(
                            format!("integer literal '{}' does not fit in 32 bits", text),
                            Span::new(start as u32, self.pos as u32),
                        )
                        .with_help(format!(
                            "integer literals range from {} to {}",
                            i32::MIN,
                            i32::MAX
                        )),
                    );
                    None
                }
            };
        }

        self.pos += 1; // '.'
        self.skip_digits();
        self.scan_exponent();

        let text = self.text(start, self.pos);
        match text.parse::<f64>() {
            Ok(x) if x.is_finite() => Some(self.make_token(Lexeme::Floating(x), start, self.pos)),
            _ => {
                self.diagnostics.push(Diagnostic::error(
                    format!("floating literal '{}' is out of range", text),
                    Span::new(start as u32, self.pos as u32),
                ));
                None
            }
        }
    }

    /// Consume `E[+-]digits` if well-formed. A malformed exponent is
    /// reported and left unconsumed.
    fn scan_exponent(&mut self) {
        if self.peek() != Some(b'E') {
            return;
        }
        let after = self.peek_at(1);
        let well_formed = match after {
            Some(c) if c.is_ascii_digit() => true,
            Some(b'+' | b'-') => self.peek_at(2).is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        };
        if well_formed {
            self.pos += 2;
            self.skip_digits();
        } else {
            self.diagnostics.push(
                Diagnostic::error(
                    "malformed exponent in floating literal".to_string(),
                    Span::new(self.pos as u32, self.pos as u32 + 1),
                )
                .with_help("exponents are written `E5`, `E+5` or `E-5`".to_string()),
            );
        }
    }

    fn scan_character(&mut self) -> Option<Spanned<Lexeme>> {
        let start = self.pos;
        self.pos += 1; // opening '^'
        let ch = self.peek();
        let close = self.peek_at(1);
        match (ch, close) {
            (Some(c), Some(b'^')) if (0x20..=0x7e).contains(&c) => {
                self.pos += 2;
                Some(self.make_token(Lexeme::Character(c), start, self.pos))
            }
            _ => {
                if ch.is_some_and(|c| c != b'\n') {
                    self.pos += 1;
                }
                self.diagnostics.push(
                    Diagnostic::error(
                        "malformed character literal".to_string(),
                        Span::new(start as u32, self.pos as u32),
                    )
                    .with_help("character literals are one printable character: `^a^`".to_string()),
                );
                None
            }
        }
    }

    fn scan_string(&mut self) -> Option<Spanned<Lexeme>> {
        let start = self.pos;
        self.pos += 1; // opening quote
        let body_start = self.pos;
        let mut unprintable = None;
        loop {
            match self.peek() {
                Some(b'"') => {
                    let body = self.text(body_start, self.pos);
                    self.pos += 1;
                    if let Some(at) = unprintable {
                        self.diagnostics.push(
                            Diagnostic::error(
                                "string literal contains a non-printable or non-ASCII character"
                                    .to_string(),
                                Span::new(at as u32, at as u32 + 1),
                            )
                            .with_help("strings hold printable ASCII characters only".to_string()),
                        );
                        return None;
                    }
                    return Some(self.make_token(Lexeme::Str(body), start, self.pos));
                }
                Some(b'\n') | None => {
                    self.diagnostics.push(
                        Diagnostic::error(
                            "unterminated string literal".to_string(),
                            Span::new(start as u32, self.pos as u32),
                        )
                        .with_help("strings must close on the line they start".to_string()),
                    );
                    return None;
                }
                Some(c) => {
                    if !(0x20..=0x7e).contains(&c) && unprintable.is_none() {
                        unprintable = Some(self.pos);
                    }
                    self.pos += 1;
                }
            }
        }
    }

    fn scan_symbol(&mut self, start: usize) -> Option<Spanned<Lexeme>> {
        let ch = self.source[self.pos];
        self.pos += 1;

        let token = match ch {
            b'+' => Lexeme::Plus,
            b'-' => Lexeme::Minus,
            b'*' => Lexeme::Star,
            b'/' => Lexeme::Slash,
            b',' => Lexeme::Comma,
            b';' => Lexeme::Semicolon,
            b'.' => Lexeme::Dot,
            b'{' => Lexeme::LBrace,
            b'}' => Lexeme::RBrace,
            b'(' => Lexeme::LParen,
            b')' => Lexeme::RParen,
            b'[' => Lexeme::LBracket,
            b']' => Lexeme::RBracket,
            b'>' => self.one_or_two(b'=', Lexeme::GtEq, Lexeme::Gt),
            b'<' => self.one_or_two(b'=', Lexeme::LtEq, Lexeme::Lt),
            b'!' => self.one_or_two(b'=', Lexeme::NotEq, Lexeme::Bang),
            b'|' => self.one_or_two(b'|', Lexeme::OrOr, Lexeme::Pipe),
            b'=' if self.peek() == Some(b'=') => {
                self.pos += 1;
                Lexeme::EqEq
            }
            b':' if self.peek() == Some(b'=') => {
                self.pos += 1;
                Lexeme::Assign
            }
            b'&' if self.peek() == Some(b'&') => {
                self.pos += 1;
                Lexeme::AndAnd
            }
            b'=' | b':' | b'&' => {
                let (found, help) = match ch {
                    b'=' => ("'='", "use `:=` to assign and `==` to compare"),
                    b':' => ("':'", "use `:=` to assign"),
                    _ => ("'&'", "use `&&` for logical and"),
                };
                self.diagnostics.push(
                    Diagnostic::error(
                        format!("unexpected {}", found),
                        Span::new(start as u32, self.pos as u32),
                    )
                    .with_help(help.to_string()),
                );
                return None;
            }
            _ => {
                // skip the rest of a multi-byte character
                while self.peek().is_some_and(|c| (c & 0xc0) == 0x80) {
                    self.pos += 1;
                }
                let text = self.text(start, self.pos);
                self.diagnostics.push(
                    Diagnostic::error(
                        format!("invalid character '{}'", text),
                        Span::new(start as u32, self.pos as u32),
                    )
                    .with_help("this character is not part of Pika syntax".to_string()),
                );
                return None;
            }
        };

        Some(self.make_token(token, start, self.pos))
    }

    fn one_or_two(&mut self, second: u8, two: Lexeme, one: Lexeme) -> Lexeme {
        if self.peek() == Some(second) {
            self.pos += 1;
            two
        } else {
            one
        }
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn text(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.source[start..end]).into_owned()
    }

    fn make_token(&self, token: Lexeme, start: usize, end: usize) -> Spanned<Lexeme> {
        Spanned::new(token, Span::new(start as u32, end as u32))
    }
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_ident_continue(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'$'
}

#[cfg(test)]
mod tests;
