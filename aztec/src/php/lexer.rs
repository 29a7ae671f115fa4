//! Tokenizer for PHP source files
//!
//! Produces just enough token structure for declaration-level parsing:
//! inline HTML and comments are dropped, attributes (`#[...]`) are skipped,
//! and string literals are decoded so the parser can tell a literal default
//! apart from an expression.

use std::fmt;

/// Multi-character punctuation, longest first
const PUNCTUATION: &[&str] = &[
    "<=>", "**=", "...", "<<=", ">>=", "===", "!==", "??=", "?->", "::", "->", "=>", "==",
    "!=", "<>", "<=", ">=", "&&", "||", "??", "++", "--", "+=", "-=", "*=", "/=", ".=", "%=",
    "&=", "|=", "^=", "<<", ">>", "**",
];

/// A lexical token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `$name` (stored without the sigil)
    Variable(String),
    /// Keyword, identifier or (qualified) name such as `Foo\Bar`
    Ident(String),
    /// String literal; `interpolated` is set when it embeds variables
    Str {
        /// Decoded value
        value: String,
        /// Whether the literal contains `$var` / `{$...}` interpolation
        interpolated: bool,
    },
    /// Numeric literal, kept verbatim
    Number(String),
    /// Operator or delimiter; `?>` is reported as `;`
    Punct(String),
}

/// Token plus the line it starts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token payload
    pub kind: TokenKind,
    /// 1-based source line
    pub line: usize,
}

impl Token {
    /// Whether this is the given punctuation
    #[must_use]
    pub fn is_punct(&self, punct: &str) -> bool {
        matches!(&self.kind, TokenKind::Punct(p) if p == punct)
    }

    /// Whether this is the given keyword (case-insensitive, as in PHP)
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(name) if name.eq_ignore_ascii_case(keyword))
    }

    /// Identifier text, if any
    #[must_use]
    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Variable(name) => write!(f, "${name}"),
            TokenKind::Ident(name) | TokenKind::Number(name) | TokenKind::Punct(name) => {
                f.write_str(name)
            }
            TokenKind::Str {
                value,
                interpolated: false,
            } => write!(f, "'{value}'"),
            TokenKind::Str { value, .. } => write!(f, "\"{value}\""),
        }
    }
}

/// Tokenizer failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// 1-based line where the problem starts
    pub line: usize,
    /// Description of the problem
    pub message: String,
}

/// Tokenize a complete PHP file
///
/// # Errors
///
/// Returns an error for unterminated strings, comments, heredocs or attributes.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
}

const fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

const fn is_ident_char(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        loop {
            if !self.skip_inline_html() {
                break;
            }
            self.lex_php()?;
            if self.pos >= self.bytes.len() {
                break;
            }
        }
        Ok(self.tokens)
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn starts_with(&self, needle: &str) -> bool {
        self.bytes[self.pos..].starts_with(needle.as_bytes())
    }

    fn starts_with_ignore_case(&self, needle: &str) -> bool {
        self.bytes
            .get(self.pos..self.pos + needle.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(needle.as_bytes()))
    }

    fn advance(&mut self, n: usize) {
        for _ in 0..n {
            if self.peek(0) == Some(b'\n') {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    fn error(&self, line: usize, message: impl Into<String>) -> LexError {
        LexError {
            line,
            message: message.into(),
        }
    }

    fn push(&mut self, kind: TokenKind, line: usize) {
        self.tokens.push(Token { kind, line });
    }

    /// Skip to the next open tag; returns false when the file ends first
    fn skip_inline_html(&mut self) -> bool {
        while self.pos < self.bytes.len() {
            if self.starts_with_ignore_case("<?php") {
                self.advance(5);
                return true;
            }
            if self.starts_with("<?=") {
                self.advance(3);
                return true;
            }
            if self.starts_with("<?") {
                self.advance(2);
                return true;
            }
            self.advance(1);
        }
        false
    }

    fn lex_php(&mut self) -> Result<(), LexError> {
        while let Some(b) = self.peek(0) {
            let line = self.line;
            match b {
                b' ' | b'\t' | b'\r' | b'\n' => self.advance(1),
                b'?' if self.peek(1) == Some(b'>') => {
                    self.advance(2);
                    if self.peek(0) == Some(b'\n') {
                        self.advance(1);
                    }
                    self.push(TokenKind::Punct(";".to_string()), line);
                    return Ok(());
                }
                b'#' if self.peek(1) == Some(b'[') => self.skip_attribute()?,
                b'#' => self.skip_line_comment(),
                b'/' if self.peek(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment()?,
                b'$' if self.peek(1).is_some_and(is_ident_start) => {
                    self.advance(1);
                    let name = self.read_ident();
                    self.push(TokenKind::Variable(name), line);
                }
                b'\\' if self.peek(1).is_some_and(is_ident_start) => {
                    let name = self.read_name();
                    self.push(TokenKind::Ident(name), line);
                }
                _ if is_ident_start(b) => {
                    let name = self.read_name();
                    self.push(TokenKind::Ident(name), line);
                }
                _ if b.is_ascii_digit()
                    || (b == b'.' && self.peek(1).is_some_and(|n| n.is_ascii_digit())) =>
                {
                    let number = self.read_number();
                    self.push(TokenKind::Number(number), line);
                }
                b'\'' => {
                    let value = self.read_single_quoted()?;
                    self.push(
                        TokenKind::Str {
                            value,
                            interpolated: false,
                        },
                        line,
                    );
                }
                b'"' | b'`' => {
                    let (value, interpolated) = self.read_double_quoted(b)?;
                    self.push(
                        TokenKind::Str {
                            value,
                            interpolated: interpolated || b == b'`',
                        },
                        line,
                    );
                }
                b'<' if self.starts_with("<<<") => {
                    let (value, interpolated) = self.read_heredoc()?;
                    self.push(TokenKind::Str { value, interpolated }, line);
                }
                _ => {
                    let punct = PUNCTUATION
                        .iter()
                        .find(|p| self.starts_with(p))
                        .map_or_else(|| (b as char).to_string(), |p| (*p).to_string());
                    self.advance(punct.len());
                    self.push(TokenKind::Punct(punct), line);
                }
            }
        }
        Ok(())
    }

    fn read_ident(&mut self) -> String {
        let start = self.pos;
        while self.peek(0).is_some_and(is_ident_char) {
            self.pos += 1;
        }
        self.src[start..self.pos].to_string()
    }

    /// Identifier or qualified name (`Foo\Bar`, `\Foo`)
    fn read_name(&mut self) -> String {
        let start = self.pos;
        loop {
            match self.peek(0) {
                Some(b) if is_ident_char(b) => self.pos += 1,
                Some(b'\\') if self.peek(1).is_some_and(is_ident_start) => self.pos += 1,
                _ => break,
            }
        }
        self.src[start..self.pos].to_string()
    }

    fn read_number(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek(0) {
            let exponent_sign = (b == b'+' || b == b'-')
                && matches!(self.bytes.get(self.pos.wrapping_sub(1)), Some(b'e' | b'E'))
                && !self.src[start..self.pos].starts_with("0x");
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || exponent_sign {
                if b == b'.' && self.peek(1) == Some(b'.') {
                    break;
                }
                self.pos += 1;
            } else {
                break;
            }
        }
        self.src[start..self.pos].to_string()
    }

    fn skip_line_comment(&mut self) {
        while let Some(b) = self.peek(0) {
            if b == b'\n' || (b == b'?' && self.peek(1) == Some(b'>')) {
                break;
            }
            self.advance(1);
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let line = self.line;
        self.advance(2);
        while self.pos < self.bytes.len() {
            if self.starts_with("*/") {
                self.advance(2);
                return Ok(());
            }
            self.advance(1);
        }
        Err(self.error(line, "unterminated comment"))
    }

    fn skip_attribute(&mut self) -> Result<(), LexError> {
        let line = self.line;
        self.advance(2);
        let mut depth = 1usize;
        while let Some(b) = self.peek(0) {
            match b {
                b'[' => {
                    depth += 1;
                    self.advance(1);
                }
                b']' => {
                    depth -= 1;
                    self.advance(1);
                    if depth == 0 {
                        return Ok(());
                    }
                }
                b'\'' => {
                    self.read_single_quoted()?;
                }
                b'"' => {
                    self.read_double_quoted(b'"')?;
                }
                _ => self.advance(1),
            }
        }
        Err(self.error(line, "unterminated attribute"))
    }

    fn read_single_quoted(&mut self) -> Result<String, LexError> {
        let line = self.line;
        self.advance(1);
        let mut value = String::new();
        let mut segment = self.pos;
        while let Some(b) = self.peek(0) {
            match b {
                b'\\' if matches!(self.peek(1), Some(b'\'' | b'\\')) => {
                    value.push_str(&self.src[segment..self.pos]);
                    value.push(self.bytes[self.pos + 1] as char);
                    self.advance(2);
                    segment = self.pos;
                }
                b'\'' => {
                    value.push_str(&self.src[segment..self.pos]);
                    self.advance(1);
                    return Ok(value);
                }
                _ => self.advance(1),
            }
        }
        Err(self.error(line, "unterminated string literal"))
    }

    fn read_double_quoted(&mut self, quote: u8) -> Result<(String, bool), LexError> {
        let line = self.line;
        self.advance(1);
        let mut value = String::new();
        let mut interpolated = false;
        let mut segment = self.pos;
        while let Some(b) = self.peek(0) {
            if b == quote {
                value.push_str(&self.src[segment..self.pos]);
                self.advance(1);
                return Ok((value, interpolated));
            }
            match b {
                b'\\' => {
                    value.push_str(&self.src[segment..self.pos]);
                    let decoded = match self.peek(1) {
                        Some(b'n') => Some('\n'),
                        Some(b't') => Some('\t'),
                        Some(b'r') => Some('\r'),
                        Some(b'v') => Some('\u{0b}'),
                        Some(b'e') => Some('\u{1b}'),
                        Some(b'f') => Some('\u{0c}'),
                        Some(b'0') => Some('\0'),
                        Some(e @ (b'\\' | b'$' | b'"' | b'`')) => Some(e as char),
                        _ => None,
                    };
                    if let Some(c) = decoded {
                        value.push(c);
                        self.advance(2);
                    } else {
                        value.push('\\');
                        self.advance(1);
                    }
                    segment = self.pos;
                }
                b'$' if self.peek(1).is_some_and(is_ident_start) || self.peek(1) == Some(b'{') => {
                    interpolated = true;
                    self.advance(1);
                }
                b'{' if self.peek(1) == Some(b'$') => {
                    interpolated = true;
                    self.advance(1);
                }
                _ => self.advance(1),
            }
        }
        Err(self.error(line, "unterminated string literal"))
    }

    fn read_heredoc(&mut self) -> Result<(String, bool), LexError> {
        let line = self.line;
        self.advance(3);
        while matches!(self.peek(0), Some(b' ' | b'\t')) {
            self.advance(1);
        }

        let nowdoc = self.peek(0) == Some(b'\'');
        let quoted = nowdoc || self.peek(0) == Some(b'"');
        if quoted {
            self.advance(1);
        }
        let label = self.read_ident();
        if label.is_empty() {
            return Err(self.error(line, "invalid heredoc label"));
        }
        if quoted {
            self.advance(1);
        }
        while let Some(b) = self.peek(0) {
            self.advance(1);
            if b == b'\n' {
                break;
            }
        }

        let mut lines = Vec::new();
        while self.pos < self.bytes.len() {
            let line_end = self.src[self.pos..]
                .find('\n')
                .map_or(self.bytes.len(), |i| self.pos + i);
            let text = &self.src[self.pos..line_end];
            let trimmed = text.trim_start();
            let closes = trimmed.starts_with(label.as_str())
                && !trimmed[label.len()..]
                    .bytes()
                    .next()
                    .is_some_and(is_ident_char);
            if closes {
                let indent = text.len() - trimmed.len();
                self.advance(indent + label.len());
                let body = lines
                    .iter()
                    .map(|l: &&str| l.get(indent..).unwrap_or_else(|| l.trim_start()))
                    .collect::<Vec<_>>()
                    .join("\n");
                let interpolated = !nowdoc && contains_interpolation(&body);
                return Ok((body, interpolated));
            }
            lines.push(text);
            let consumed = line_end - self.pos;
            self.advance(consumed);
            if self.peek(0) == Some(b'\n') {
                self.advance(1);
            }
        }
        Err(self.error(line, format!("unterminated heredoc <<<{label}")))
    }
}

fn contains_interpolation(body: &str) -> bool {
    let bytes = body.as_bytes();
    bytes.windows(2).enumerate().any(|(i, w)| {
        let escaped = i > 0 && bytes[i - 1] == b'\\';
        !escaped && ((w[0] == b'$' && (is_ident_start(w[1]) || w[1] == b'{')) || (w[0] == b'{' && w[1] == b'$'))
    })
}
