use std::{iter::Peekable, str::CharIndices};

use super::token::{DataType, Keyword, Location, Token, TokenKind};

pub(crate) struct Lexer<'src> {
    src: &'src str,
    chars: Peekable<CharIndices<'src>>,
    line: u32,
    column: u32,
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Token {
                kind: TokenKind::Eof,
                ..
            } => None,
            token => Some(token),
        }
    }
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Scans one token. Keeps returning `Eof` once the input is exhausted.
    pub fn next_token(&mut self) -> Token<'src> {
        loop {
            while let Some(&(_, c)) = self.chars.peek() {
                if !c.is_whitespace() {
                    break;
                }
                self.bump();
            }

            let loc = self.location();
            let (off, c) = match self.bump() {
                None => return Token::new(TokenKind::Eof, loc),
                Some(next) => next,
            };

            if c.is_ascii_alphabetic() {
                return Token::new(self.read_word(off), loc);
            }
            if c.is_ascii_digit() {
                return Token::new(self.read_number(off), loc);
            }
            if c == '/' && matches!(self.chars.peek(), Some(&(_, '/'))) {
                self.skip_line();
                continue;
            }

            return Token::new(TokenKind::Punct(c), loc);
        }
    }

    fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((_, c)) = next {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        next
    }

    fn slice_until<P>(&mut self, from_off: usize, predicate: P) -> &'src str
    where
        P: Fn(char) -> bool,
    {
        while let Some(&(off, c)) = self.chars.peek() {
            if predicate(c) {
                return &self.src[from_off..off];
            }
            self.bump();
        }
        &self.src[from_off..self.src.len()]
    }

    fn skip_line(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c == '\n' || c == '\r' {
                break;
            }
            self.bump();
        }
    }

    fn read_number(&mut self, from_off: usize) -> TokenKind<'src> {
        let s = self.slice_until(from_off, |c| !(c.is_ascii_digit() || c == '.'));
        // `str::parse` also takes `1.`; a fraction needs at least one digit.
        if s.ends_with('.') {
            return TokenKind::Invalid(s);
        }
        match s.parse::<f64>() {
            Ok(v) => TokenKind::Number(v),
            Err(_) => TokenKind::Invalid(s),
        }
    }

    fn read_word(&mut self, from_off: usize) -> TokenKind<'src> {
        let s = self.slice_until(from_off, |c| !c.is_ascii_alphanumeric());
        match s {
            "fun" => TokenKind::Kw(Keyword::Fun),
            "extern" => TokenKind::Kw(Keyword::Extern),
            "void" => TokenKind::Type(DataType::Void),
            "bool" => TokenKind::Type(DataType::Bool),
            "int" => TokenKind::Type(DataType::Int),
            "float" => TokenKind::Type(DataType::Float),
            _ => TokenKind::Id(s),
        }
    }
}
