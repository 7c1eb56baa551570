//! Lexer for shard files.
//!
//! Tokenizes the subset of JavaScript the generator emits: an optional
//! `var searchData=` declaration wrapping one array literal of strings,
//! integers and nested arrays.

use crate::error::ParseError;

/// Token types for shard parsing
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Quoted string literal with escapes resolved
    Str(String),
    /// Integer literal
    Number(i64),
    /// Bare identifier (`var`, `searchData`, `null`, ...)
    Ident(String),

    LeftBracket,
    RightBracket,
    Comma,
    Equals,
    Semicolon,

    /// End of input
    Eof,
}

impl Token {
    /// Short human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Str(_) => "string".to_string(),
            Token::Number(n) => format!("number {}", n),
            Token::Ident(name) => format!("'{}'", name),
            Token::LeftBracket => "'['".to_string(),
            Token::RightBracket => "']'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Equals => "'='".to_string(),
            Token::Semicolon => "';'".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

/// 1-based source position of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

/// Lexer for tokenizing shard sources
pub struct Lexer<'a> {
    shard: &'a str,
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer; `shard` names the source in error messages.
    pub fn new(shard: &'a str, input: &str) -> Self {
        Self {
            shard,
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Get the next token and the position it starts at.
    pub fn next_token(&mut self) -> Result<(Token, Pos), ParseError> {
        self.skip_trivia()?;
        let pos = self.pos();

        let Some(ch) = self.peek() else {
            return Ok((Token::Eof, pos));
        };

        let token = match ch {
            '[' => {
                self.advance();
                Token::LeftBracket
            }
            ']' => {
                self.advance();
                Token::RightBracket
            }
            ',' => {
                self.advance();
                Token::Comma
            }
            '=' => {
                self.advance();
                Token::Equals
            }
            ';' => {
                self.advance();
                Token::Semicolon
            }
            '\'' | '"' => Token::Str(self.read_string(ch)?),
            '-' | '0'..='9' => Token::Number(self.read_number()?),
            c if is_ident_start(c) => Token::Ident(self.read_ident()),
            other => {
                return Err(self.error_at(pos, format!("unexpected character '{}'", other)));
            }
        };

        Ok((token, pos))
    }

    /// Tokenize the whole input, including the trailing `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<(Token, Pos)>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let (token, pos) = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push((token, pos));
            if done {
                return Ok(tokens);
            }
        }
    }

    fn pos(&self) -> Pos {
        Pos {
            line: self.line,
            column: self.column,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Skip whitespace, `// line` and `/* block */` comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match (self.peek(), self.peek_next()) {
                (Some(c), _) if c.is_whitespace() || c == '\u{feff}' => {
                    self.advance();
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.advance() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.pos();
                    self.advance();
                    self.advance();
                    loop {
                        match self.advance() {
                            Some('*') if self.peek() == Some('/') => {
                                self.advance();
                                break;
                            }
                            Some(_) => {}
                            None => {
                                return Err(self.error_at(start, "unterminated comment"));
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn read_string(&mut self, quote: char) -> Result<String, ParseError> {
        let start = self.pos();
        self.advance();
        let mut out = String::new();

        loop {
            match self.advance() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => {
                    let esc_pos = self.pos();
                    match self.advance() {
                        Some('n') => out.push('\n'),
                        Some('r') => out.push('\r'),
                        Some('t') => out.push('\t'),
                        Some('b') => out.push('\u{8}'),
                        Some('f') => out.push('\u{c}'),
                        Some('0') => out.push('\0'),
                        Some('x') => out.push(self.read_hex_escape(2, esc_pos)?),
                        Some('u') => out.push(self.read_hex_escape(4, esc_pos)?),
                        // Line continuation
                        Some('\n') => {}
                        Some(c) => out.push(c),
                        None => return Err(self.error_at(start, "unterminated string")),
                    }
                }
                Some('\n') | None => return Err(self.error_at(start, "unterminated string")),
                Some(c) => out.push(c),
            }
        }
    }

    fn read_hex_escape(&mut self, digits: usize, pos: Pos) -> Result<char, ParseError> {
        let mut value = 0u32;
        for _ in 0..digits {
            let digit = self
                .advance()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error_at(pos, "invalid escape sequence"))?;
            value = value * 16 + digit;
        }
        char::from_u32(value).ok_or_else(|| self.error_at(pos, "invalid escape sequence"))
    }

    fn read_number(&mut self) -> Result<i64, ParseError> {
        let start = self.pos();
        let mut text = String::new();
        if self.peek() == Some('-') {
            text.push('-');
            self.advance();
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        text.parse()
            .map_err(|_| self.error_at(start, format!("invalid number '{}'", text)))
    }

    fn read_ident(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if is_ident_start(c) || c.is_ascii_digit() {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }
        ident
    }

    fn error_at(&self, pos: Pos, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            shard: self.shard.to_string(),
            line: pos.line,
            column: pos.column,
            message: message.into(),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}
