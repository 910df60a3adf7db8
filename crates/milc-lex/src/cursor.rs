//! Unicode-aware source character cursor (spec.md §4.1).
//!
//! Mirrors the shape of `original_source/lexer/stream.go`'s `SourceStream`:
//! a start/end marker pair plus one level of pushback, tracked via the byte
//! width of the last character read so `unread` is exact across multi-byte
//! UTF-8 sequences.

pub struct Cursor<'a> {
    input: &'a str,
    start: usize,
    pos: usize,
    width: usize,
}

/// Sentinel returned by `read` at end of input, matching Go's `rune(0)`.
pub const EOF_CHAR: char = '\0';

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Cursor { input, start: 0, pos: 0, width: 0 }
    }

    pub fn read(&mut self) -> char {
        if self.pos >= self.input.len() {
            self.width = 0;
            return EOF_CHAR;
        }
        let c = self.input[self.pos..].chars().next().unwrap();
        self.width = c.len_utf8();
        self.pos += self.width;
        c
    }

    /// Restores the last-read character. Only one level of pushback is
    /// supported, matching spec.md's invariant.
    pub fn unread(&mut self) {
        self.pos -= self.width;
    }

    pub fn peek(&mut self) -> char {
        let c = self.read();
        self.unread();
        c
    }

    pub fn accept(&mut self, valid: &str) -> bool {
        let c = self.read();
        if valid.contains(c) {
            true
        } else {
            self.unread();
            false
        }
    }

    /// Greedily consumes a run from `valid`; if followed by `.` and more of
    /// `valid`, promotes the observed kind from int to float. Used only by
    /// numeric lexing.
    pub fn accept_run(&mut self, valid: &str) -> NumKind {
        let mut kind = NumKind::None;
        while self.accept(valid) {
            kind = NumKind::Int;
        }
        self.unread();
        if self.accept(".") {
            while self.accept(valid) {
                kind = NumKind::Float;
            }
        }
        self.unread();
        kind
    }

    /// Returns `[start, pos)` and the start offset, then advances `start`.
    pub fn emit_token(&mut self) -> (&'a str, usize) {
        let lit = &self.input[self.start..self.pos];
        let start = self.start;
        self.start = self.pos;
        (lit, start)
    }

    pub fn ignore_token(&mut self) {
        self.start = self.pos;
    }

    pub fn pos(&self) -> usize {
        self.pos
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumKind {
    None,
    Int,
    Float,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_advances_and_unread_rewinds() {
        let mut c = Cursor::new("ab");
        assert_eq!(c.read(), 'a');
        c.unread();
        assert_eq!(c.read(), 'a');
        assert_eq!(c.read(), 'b');
        assert_eq!(c.read(), EOF_CHAR);
    }

    #[test]
    fn unread_is_exact_across_multibyte() {
        let mut c = Cursor::new("é");
        let r = c.read();
        assert_eq!(r, 'é');
        c.unread();
        assert_eq!(c.pos(), 0);
    }

    #[test]
    fn accept_run_promotes_to_float() {
        let mut c = Cursor::new("12.5x");
        let kind = c.accept_run("0123456789");
        assert_eq!(kind, NumKind::Float);
        let (lit, _) = c.emit_token();
        assert_eq!(lit, "12.5");
    }

    #[test]
    fn accept_run_stays_int_without_dot() {
        let mut c = Cursor::new("12x");
        let kind = c.accept_run("0123456789");
        assert_eq!(kind, NumKind::Int);
        let (lit, _) = c.emit_token();
        assert_eq!(lit, "12");
    }
}
