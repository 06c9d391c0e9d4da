//! Lexer for GML source text.
//!
//! Produces the full token stream, hidden channel included: whitespace, line
//! terminators and comments come out as ordinary tokens so the trivia
//! collector can replay them after parsing. Template strings are lexed with a
//! small mode stack; `$"a {b} c"` yields start/text/brace-delimited code
//! tokens rather than one opaque literal.

use std::ops::Range;

use gml_syntax::SyntaxKind;
use gml_syntax::SyntaxKind::*;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: SyntaxKind,
    /// The text of the token.
    pub text: String,
    /// The span of the token in the source text.
    pub span: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexMode {
    /// Inside a template string, between interpolations.
    TemplateText,
    /// Inside a `{…}` interpolation; counts nested braces.
    Interpolation { braces: usize },
}

/// Lexer for GML source text.
///
/// Converts a string into a sequence of tokens.
pub(crate) struct Lexer<'a> {
    source: &'a str,
    position: usize,
    modes: Vec<LexMode>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self { source, position: 0, modes: Vec::new() }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.position += c.len_utf8();
        }
    }

    fn token_from(&self, kind: SyntaxKind, start: usize) -> Token {
        Token { kind, text: self.source[start..self.position].to_string(), span: start..self.position }
    }

    /// Emit a token for the next `len` bytes.
    fn take(&mut self, kind: SyntaxKind, len: usize) -> Token {
        let start = self.position;
        self.position += len;
        self.token_from(kind, start)
    }

    fn tokenize_whitespace(&mut self) -> Token {
        let start = self.position;
        while let Some(c) = self.peek() {
            if c.is_whitespace() && c != '\n' && c != '\r' {
                self.advance();
            } else {
                break;
            }
        }
        self.token_from(WHITESPACE, start)
    }

    fn tokenize_line_terminator(&mut self) -> Token {
        let start = self.position;
        if self.peek() == Some('\r') {
            self.advance();
            if self.peek() == Some('\n') {
                self.advance();
            }
        } else {
            self.advance();
        }
        self.token_from(LINE_TERMINATOR, start)
    }

    fn tokenize_line_comment(&mut self) -> Token {
        let start = self.position;
        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' {
                break;
            }
            self.advance();
        }
        self.token_from(SINGLE_LINE_COMMENT, start)
    }

    fn tokenize_block_comment(&mut self) -> Token {
        let start = self.position;
        self.advance(); // '/'
        self.advance(); // '*'
        while let Some(c) = self.peek() {
            if c == '*' && self.peek_at(1) == Some(b'/') {
                self.advance();
                self.advance();
                break;
            }
            self.advance();
        }
        self.token_from(MULTI_LINE_COMMENT, start)
    }

    fn tokenize_number(&mut self) -> Token {
        let start = self.position;

        if self.peek() == Some('0') {
            match self.peek_at(1) {
                Some(b'x' | b'X') => {
                    self.advance();
                    self.advance();
                    while self.peek().is_some_and(|c| c.is_ascii_hexdigit() || c == '_') {
                        self.advance();
                    }
                    return self.token_from(HEX, start);
                }
                Some(b'b' | b'B') => {
                    self.advance();
                    self.advance();
                    while self.peek().is_some_and(|c| c == '0' || c == '1' || c == '_') {
                        self.advance();
                    }
                    return self.token_from(BINARY_LIT, start);
                }
                _ => {}
            }
        }

        let mut is_decimal = false;
        if self.peek() == Some('.') {
            is_decimal = true;
            self.advance();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if !is_decimal && self.peek() == Some('.') {
            is_decimal = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        self.token_from(if is_decimal { DECIMAL } else { INTEGER }, start)
    }

    fn tokenize_identifier(&mut self) -> Token {
        let start = self.position;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        let text = &self.source[start..self.position];
        let kind = SyntaxKind::from_keyword(text).unwrap_or(IDENTIFIER);
        self.token_from(kind, start)
    }

    /// Quoted string, any of the three quote characters. Double- and
    /// single-quoted strings stop at an unescaped line break, which makes the
    /// token an error; backtick strings may span lines.
    fn tokenize_string(&mut self, quote: char) -> Token {
        let start = self.position;
        self.advance(); // opening quote
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.advance();
                    if self.peek().is_some() {
                        self.advance();
                    }
                }
                '\n' | '\r' if quote != '`' => {
                    return self.token_from(ERROR_TOKEN, start);
                }
                _ if c == quote => {
                    self.advance();
                    return self.token_from(STRING, start);
                }
                _ => self.advance(),
            }
        }
        self.token_from(ERROR_TOKEN, start)
    }

    /// A directive marker, `#macro` and friends.
    fn tokenize_directive(&mut self) -> Token {
        let start = self.position;
        self.advance(); // '#'
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.advance();
        }
        let kind = match &self.source[start..self.position] {
            "#macro" => MACRO_DIRECTIVE,
            "#region" => REGION_DIRECTIVE,
            "#endregion" => END_REGION_DIRECTIVE,
            "#define" => DEFINE_DIRECTIVE,
            "#event" => EVENT_DIRECTIVE,
            "#target" => TARGET_DIRECTIVE,
            "#include" => INCLUDE_DIRECTIVE,
            _ => ERROR_TOKEN,
        };
        self.token_from(kind, start)
    }

    /// Raw payload of a to-end-of-line directive (`#region`, `#define`, …).
    fn tokenize_directive_body(&mut self) -> Option<Token> {
        let start = self.position;
        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' {
                break;
            }
            self.advance();
        }
        (self.position > start).then(|| self.token_from(DIRECTIVE_BODY, start))
    }

    /// Next chunk while inside a template string: raw text, an interpolation
    /// opener, or the closing quote.
    fn tokenize_template_chunk(&mut self) -> Token {
        let start = self.position;
        while let Some(c) = self.peek() {
            match c {
                '{' | '"' => break,
                '\\' => {
                    self.advance();
                    if self.peek().is_some() {
                        self.advance();
                    }
                }
                _ => self.advance(),
            }
        }
        if self.position > start {
            return self.token_from(TEMPLATE_TEXT, start);
        }
        match self.peek() {
            Some('{') => {
                self.modes.push(LexMode::Interpolation { braces: 0 });
                self.take(LBRACE, 1)
            }
            Some('"') => {
                self.modes.pop();
                self.take(TEMPLATE_END, 1)
            }
            // Unterminated template string.
            _ => {
                self.modes.pop();
                self.token_from(ERROR_TOKEN, start)
            }
        }
    }

    fn tokenize_punct(&mut self) -> Token {
        let c = self.peek().unwrap_or('\0');
        let next = self.peek_at(1);
        let next2 = self.peek_at(2);

        match c {
            '(' => self.take(LPAREN, 1),
            ')' => self.take(RPAREN, 1),
            '{' => {
                if let Some(LexMode::Interpolation { braces }) = self.modes.last_mut() {
                    *braces += 1;
                }
                self.take(LBRACE, 1)
            }
            '}' => {
                match self.modes.last_mut() {
                    Some(LexMode::Interpolation { braces: 0 }) => {
                        self.modes.pop();
                    }
                    Some(LexMode::Interpolation { braces }) => *braces -= 1,
                    _ => {}
                }
                self.take(RBRACE, 1)
            }
            '[' => match next {
                Some(b'@') => self.take(LBRACKET_AT, 2),
                Some(b'#') => self.take(LBRACKET_HASH, 2),
                Some(b'|') => self.take(LBRACKET_PIPE, 2),
                Some(b'?') => self.take(LBRACKET_QUESTION, 2),
                Some(b'$') => self.take(LBRACKET_DOLLAR, 2),
                _ => self.take(LBRACKET, 1),
            },
            ']' => self.take(RBRACKET, 1),
            ',' => self.take(COMMA, 1),
            ';' => self.take(SEMICOLON, 1),
            '@' => self.take(AT, 1),
            '\\' => self.take(BACKSLASH, 1),
            '.' => self.take(DOT, 1),
            ':' => match next {
                Some(b'=') => self.take(COLON_EQ, 2),
                _ => self.take(COLON, 1),
            },
            '?' => match (next, next2) {
                (Some(b'?'), Some(b'=')) => self.take(QUESTION2_EQ, 3),
                (Some(b'?'), _) => self.take(QUESTION2, 2),
                _ => self.take(QUESTION, 1),
            },
            '+' => match next {
                Some(b'+') => self.take(PLUS2, 2),
                Some(b'=') => self.take(PLUS_EQ, 2),
                _ => self.take(PLUS, 1),
            },
            '-' => match next {
                Some(b'-') => self.take(MINUS2, 2),
                Some(b'=') => self.take(MINUS_EQ, 2),
                _ => self.take(MINUS, 1),
            },
            '*' => match next {
                Some(b'=') => self.take(STAR_EQ, 2),
                _ => self.take(STAR, 1),
            },
            '/' => match next {
                Some(b'=') => self.take(SLASH_EQ, 2),
                _ => self.take(SLASH, 1),
            },
            '%' => match next {
                Some(b'=') => self.take(PERCENT_EQ, 2),
                _ => self.take(PERCENT, 1),
            },
            '^' => match next {
                Some(b'=') => self.take(CARET_EQ, 2),
                _ => self.take(CARET, 1),
            },
            '&' => match next {
                Some(b'&') => self.take(AMP2, 2),
                Some(b'=') => self.take(AMP_EQ, 2),
                _ => self.take(AMP, 1),
            },
            '|' => match next {
                Some(b'|') => self.take(PIPE2, 2),
                Some(b'=') => self.take(PIPE_EQ, 2),
                _ => self.take(PIPE, 1),
            },
            '~' => self.take(TILDE, 1),
            '!' => match next {
                Some(b'=') => self.take(BANG_EQ, 2),
                _ => self.take(BANG, 1),
            },
            '=' => match next {
                Some(b'=') => self.take(EQ2, 2),
                _ => self.take(EQ, 1),
            },
            '<' => match (next, next2) {
                (Some(b'<'), Some(b'=')) => self.take(SHL_EQ, 3),
                (Some(b'<'), _) => self.take(SHL, 2),
                (Some(b'='), _) => self.take(LT_EQ, 2),
                (Some(b'>'), _) => self.take(LT_GT, 2),
                _ => self.take(LT, 1),
            },
            '>' => match (next, next2) {
                (Some(b'>'), Some(b'=')) => self.take(SHR_EQ, 3),
                (Some(b'>'), _) => self.take(SHR, 2),
                (Some(b'='), _) => self.take(GT_EQ, 2),
                _ => self.take(GT, 1),
            },
            _ => {
                let start = self.position;
                self.advance();
                self.token_from(ERROR_TOKEN, start)
            }
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        if self.position >= self.source.len() {
            return None;
        }

        if matches!(self.modes.last(), Some(LexMode::TemplateText)) {
            return Some(self.tokenize_template_chunk());
        }

        let token = match self.peek()? {
            '\n' | '\r' => self.tokenize_line_terminator(),
            c if c.is_whitespace() => self.tokenize_whitespace(),
            '/' if self.peek_at(1) == Some(b'/') => self.tokenize_line_comment(),
            '/' if self.peek_at(1) == Some(b'*') => self.tokenize_block_comment(),
            '#' => {
                let token = self.tokenize_directive();
                return Some(token);
            }
            '$' if self.peek_at(1) == Some(b'"') => {
                self.modes.push(LexMode::TemplateText);
                self.take(TEMPLATE_START, 2)
            }
            c @ ('"' | '\'' | '`') => self.tokenize_string(c),
            c if c.is_ascii_digit() => self.tokenize_number(),
            '.' if self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) => self.tokenize_number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.tokenize_identifier(),
            _ => self.tokenize_punct(),
        };
        Some(token)
    }

    /// Tokenize the entire source text.
    pub(crate) fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while self.position < self.source.len() {
            let Some(token) = self.next_token() else { break };
            // To-end-of-line directives carry a raw payload token so region
            // names and old-style define bodies never hit the main tokenizer.
            let wants_body = matches!(
                token.kind,
                REGION_DIRECTIVE
                    | END_REGION_DIRECTIVE
                    | DEFINE_DIRECTIVE
                    | EVENT_DIRECTIVE
                    | TARGET_DIRECTIVE
                    | INCLUDE_DIRECTIVE
            );
            tokens.push(token);
            if wants_body {
                if let Some(body) = self.tokenize_directive_body() {
                    tokens.push(body);
                }
            }
        }

        tokens
    }
}

/// Tokenizes `source`, hidden channel included.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}
