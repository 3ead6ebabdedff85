//! Lexical analysis: convert transformation expression source into tokens.

use std::ops::Range;

/// A span in the annotation source, represented as a byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub range: Range<usize>,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { range: start..end }
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    NumberLiteral(f64),
    StringLiteral(String),
    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    FatArrow, // =>
    /// A lexical problem the parser reports: an unterminated string or an
    /// unexpected character.
    Error(String),
    // End of input
    Eof,
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Simple lexer over a UTF-8 string.
pub struct Lexer<'src> {
    src: &'src str,
    chars: std::str::CharIndices<'src>,
    peeked: Option<(usize, char)>,
    end: usize,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        let end = src.len();
        Self {
            src,
            chars: src.char_indices(),
            peeked: None,
            end,
            finished: false,
        }
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        if let Some(p) = self.peeked.take() {
            Some(p)
        } else {
            self.chars.next()
        }
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        if self.peeked.is_none() {
            self.peeked = self.chars.next();
        }
        self.peeked
    }

    fn consume_while<F>(&mut self, start: usize, mut pred: F) -> (Span, &'src str)
    where
        F: FnMut(char) -> bool,
    {
        let mut last = start;
        let mut saw_any = false;
        while let Some((idx, ch)) = self.peek() {
            if !pred(ch) {
                break;
            }
            saw_any = true;
            last = idx;
            self.bump();
        }
        let end = if saw_any { last + 1 } else { start + 1 };
        let span = Span::new(start, end);
        let lexeme = &self.src[span.range.clone()];
        (span, lexeme)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            let mut progressed = false;
            while let Some((_, ch)) = self.peek() {
                if ch.is_whitespace() {
                    progressed = true;
                    self.bump();
                } else {
                    break;
                }
            }
            // Line comment: //
            if let Some((_, '/')) = self.peek() {
                let mut clone = self.chars.clone();
                if let Some((_, '/')) = clone.next() {
                    self.bump();
                    self.bump();
                    while let Some((_, ch)) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.bump();
                    }
                    continue;
                }
            }
            if !progressed {
                break;
            }
        }
    }

    fn lex_ident(&mut self, start: usize) -> Token {
        let (span, text) = self.consume_while(start, |c| c.is_ascii_alphanumeric() || c == '_');
        Token {
            kind: TokenKind::Ident(text.to_string()),
            span,
        }
    }

    fn lex_number(&mut self, start: usize) -> Token {
        let (span, _) = self.consume_while(start, |c| c.is_ascii_digit());
        let mut end = span.range.end;

        // Optional fraction: a dot directly followed by digits.
        if let Some((dot_idx, '.')) = self.peek() {
            let after_dot = self.src[dot_idx + 1..].chars().next();
            if matches!(after_dot, Some(c) if c.is_ascii_digit()) {
                self.bump();
                let (frac_span, _) = self.consume_while(dot_idx + 1, |c| c.is_ascii_digit());
                end = frac_span.range.end;
            }
        }

        let full_span = Span::new(start, end);
        let lexeme = &self.src[full_span.range.clone()];
        match lexeme.parse::<f64>() {
            Ok(value) => Token {
                kind: TokenKind::NumberLiteral(value),
                span: full_span,
            },
            Err(_) => Token {
                kind: TokenKind::Error(format!("malformed number literal `{lexeme}`")),
                span: full_span,
            },
        }
    }

    fn lex_string(&mut self, start: usize, quote: char) -> Token {
        // Assumes the opening quote has already been consumed. Both single
        // and double quotes are accepted, matching annotation source.
        let mut terminated = false;
        let mut end = start + 1;
        while let Some((idx, ch)) = self.bump() {
            end = idx + ch.len_utf8();
            if ch == quote {
                terminated = true;
                break;
            }
        }
        let span = Span::new(start, end);
        if !terminated {
            return Token {
                kind: TokenKind::Error("unterminated string literal".to_string()),
                span,
            };
        }
        let value = self.src[start + 1..end - 1].to_string();
        Token {
            kind: TokenKind::StringLiteral(value),
            span,
        }
    }

    fn punct(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            span: Span::new(start, start + 1),
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        self.skip_whitespace_and_comments();
        let (start, ch) = match self.bump() {
            Some(pair) => pair,
            None => {
                self.finished = true;
                return Some(Token {
                    kind: TokenKind::Eof,
                    span: Span::new(self.end, self.end),
                });
            }
        };

        let token = match ch {
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_ident(start),
            c if c.is_ascii_digit() => self.lex_number(start),
            '"' | '\'' => self.lex_string(start, ch),
            '(' => self.punct(TokenKind::LParen, start),
            ')' => self.punct(TokenKind::RParen, start),
            '{' => self.punct(TokenKind::LBrace, start),
            '}' => self.punct(TokenKind::RBrace, start),
            '[' => self.punct(TokenKind::LBracket, start),
            ']' => self.punct(TokenKind::RBracket, start),
            ',' => self.punct(TokenKind::Comma, start),
            ':' => self.punct(TokenKind::Colon, start),
            '=' => {
                if let Some((idx2, '>')) = self.peek() {
                    self.bump();
                    Token {
                        kind: TokenKind::FatArrow,
                        span: Span::new(start, idx2 + 1),
                    }
                } else {
                    Token {
                        kind: TokenKind::Error("unexpected character `=`".to_string()),
                        span: Span::new(start, start + 1),
                    }
                }
            }
            other => Token {
                kind: TokenKind::Error(format!("unexpected character `{other}`")),
                span: Span::new(start, start + other.len_utf8()),
            },
        };

        Some(token)
    }
}
