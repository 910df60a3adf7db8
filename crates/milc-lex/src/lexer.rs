//! Single-pass lexer driving the [`Cursor`] (spec.md §4.2).

use crate::cursor::{Cursor, NumKind, EOF_CHAR};
use crate::error::LexError;
use crate::token::{lookup_keyword, Token, TokenKind};
use milc_util::Pos;

/// Token kinds that trigger automatic semicolon insertion when followed by
/// a newline. spec.md §4.2 "Automatic Semicolon Insertion".
const ASI_KINDS: [TokenKind; 5] =
    [TokenKind::RParen, TokenKind::Ident, TokenKind::Int, TokenKind::Float, TokenKind::Return];

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    tokens: Vec<Token>,
    comments: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { cursor: Cursor::new(input), tokens: Vec::new(), comments: Vec::new() }
    }

    /// Drives the cursor to completion, returning the token and comment
    /// vectors. On a lexical error, an error token is appended to `tokens`
    /// and lexing stops (spec.md §5).
    pub fn run(mut self) -> (Vec<Token>, Vec<Token>, Option<LexError>) {
        loop {
            let c = self.cursor.read();
            if c == EOF_CHAR {
                self.emit(TokenKind::Eof);
                return (self.tokens, self.comments, None);
            }

            let result = self.lex_one(c);
            if let Err(e) = result {
                let tok = Token::new(TokenKind::Error, e.pos(), e.to_string());
                log::warn!("lex error at {}: {}", e.pos(), e);
                self.tokens.push(tok);
                return (self.tokens, self.comments, Some(e));
            }
        }
    }

    fn lex_one(&mut self, c: char) -> Result<(), LexError> {
        match c {
            '\n' => {
                self.cursor.ignore_token();
                if let Some(last) = self.tokens.last() {
                    if ASI_KINDS.contains(&last.kind) {
                        self.emit(TokenKind::Semicolon);
                    }
                }
            }
            ' ' | '\t' | '\r' => self.cursor.ignore_token(),
            c if is_ident_start(c) => {
                self.cursor.unread();
                loop {
                    let r = self.cursor.read();
                    if !is_ident_continue(r) {
                        self.cursor.unread();
                        self.emit(TokenKind::Ident);
                        break;
                    }
                }
            }
            '0'..='9' => {
                self.cursor.unread();
                let kind = self.cursor.accept_run("0123456789");
                self.emit(match kind {
                    NumKind::Float => TokenKind::Float,
                    _ => TokenKind::Int,
                });
            }
            '+' => self.emit(TokenKind::Add),
            '-' => self.emit(TokenKind::Sub),
            '*' => self.emit(TokenKind::Mul),
            '/' => self.lex_slash()?,
            '%' => self.emit(TokenKind::Mod),
            '=' => {
                if self.cursor.accept("=") {
                    self.emit(TokenKind::Eql);
                } else {
                    self.emit(TokenKind::Assign);
                }
            }
            '!' => {
                if self.cursor.accept("=") {
                    self.emit(TokenKind::Neq);
                } else {
                    self.emit(TokenKind::Not);
                }
            }
            '<' => {
                if self.cursor.accept("=") {
                    self.emit(TokenKind::Leq);
                } else {
                    self.emit(TokenKind::Lss);
                }
            }
            '>' => {
                if self.cursor.accept("=") {
                    self.emit(TokenKind::Geq);
                } else {
                    self.emit(TokenKind::Gtr);
                }
            }
            ':' => {
                if self.cursor.accept("=") {
                    self.emit(TokenKind::Define);
                } else {
                    self.emit(TokenKind::Colon);
                }
            }
            '&' => {
                if self.cursor.accept("&") {
                    self.emit(TokenKind::And);
                } else {
                    return Err(LexError::StrayLogicalOperator { ch: '&', pos: self.start_pos() });
                }
            }
            '|' => {
                if self.cursor.accept("|") {
                    self.emit(TokenKind::Or);
                } else {
                    return Err(LexError::StrayLogicalOperator { ch: '|', pos: self.start_pos() });
                }
            }
            '"' => self.lex_string()?,
            '\'' => {
                if self.cursor.read() == '\\' {
                    self.cursor.read();
                }
                self.cursor.read();
                self.emit(TokenKind::Char);
            }
            '.' => self.emit(TokenKind::Period),
            '(' => self.emit(TokenKind::LParen),
            '[' => self.emit(TokenKind::LBrack),
            '{' => self.emit(TokenKind::LBrace),
            ')' => self.emit(TokenKind::RParen),
            ']' => self.emit(TokenKind::RBrack),
            '}' => self.emit(TokenKind::RBrace),
            ',' => self.emit(TokenKind::Comma),
            ';' => self.emit(TokenKind::Semicolon),
            other => return Err(LexError::UnrecognizedChar { ch: other, pos: self.start_pos() }),
        }
        Ok(())
    }

    fn lex_slash(&mut self) -> Result<(), LexError> {
        match self.cursor.peek() {
            '/' => {
                loop {
                    let t = self.cursor.read();
                    if t == '\n' {
                        self.cursor.unread();
                        self.emit_comment();
                        break;
                    }
                    if t == EOF_CHAR {
                        self.emit_comment();
                        break;
                    }
                }
                Ok(())
            }
            '*' => {
                loop {
                    let t = self.cursor.read();
                    if t == '*' && self.cursor.peek() == '/' {
                        self.cursor.read();
                        self.emit_comment();
                        return Ok(());
                    }
                    if t == EOF_CHAR {
                        return Err(LexError::UnterminatedComment { pos: self.start_pos() });
                    }
                }
            }
            _ => {
                self.emit(TokenKind::Div);
                Ok(())
            }
        }
    }

    fn lex_string(&mut self) -> Result<(), LexError> {
        loop {
            match self.cursor.read() {
                EOF_CHAR => return Err(LexError::UnterminatedString { pos: self.start_pos() }),
                '\\' => {
                    self.cursor.read();
                }
                '"' => {
                    self.emit(TokenKind::String);
                    return Ok(());
                }
                _ => {}
            }
        }
    }

    fn emit(&mut self, kind: TokenKind) {
        let (lit, offset) = self.cursor.emit_token();
        let kind = if kind == TokenKind::Ident { lookup_keyword(lit) } else { kind };
        log::trace!("token {:?} {:?} at {}", kind, lit, offset + 1);
        self.tokens.push(Token::new(kind, Pos::new((offset + 1) as u32), lit));
    }

    fn emit_comment(&mut self) {
        let (lit, offset) = self.cursor.emit_token();
        self.comments.push(Token::new(TokenKind::Comment, Pos::new((offset + 1) as u32), lit));
    }

    fn start_pos(&self) -> Pos {
        Pos::new(self.cursor.pos() as u32)
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Lexes `input`, returning the token vector (always ending in exactly one
/// `Eof` token), the separate comment vector, and the first lexical error
/// encountered, if any.
pub fn lex(input: &str) -> (Vec<Token>, Vec<Token>, Option<LexError>) {
    log::debug!("lexing {} bytes", input.len());
    Lexer::new(input).run()
}
