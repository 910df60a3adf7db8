//! Resolves a [`Pos`] to a `(line, column)` pair.
//!
//! spec.md §3 describes resolution as "scanning prefix bytes for newlines".
//! Doing that scan on every call would make diagnostics quadratic in the
//! worst case (one error per line of a large file); instead we precompute the
//! byte offset of every line start once per file and binary-search it, which
//! produces identical `(line, column)` results. spec.md §9 "Position storage"
//! explicitly endorses this: "a single integer offset plus lazy (line,column)
//! computation suffices".

use crate::{Pos, Position};

#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    content: String,
    /// Byte offset (0-based) of the first character of each line.
    /// `line_starts[0]` is always 0.
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let line_starts = compute_line_starts(&content);
        SourceFile { name: name.into(), content, line_starts }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Resolves a 1-based byte offset to a 1-based `(line, column)` pair.
    /// `Pos::NONE` resolves to an invalid `Position` carrying only the
    /// filename, matching the sentinel semantics of spec.md §3.
    pub fn resolve(&self, pos: Pos) -> Position {
        if !pos.is_valid() {
            return Position::invalid(self.name.clone());
        }
        let offset = (pos.0 as usize).saturating_sub(1).min(self.content.len());

        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_at) => insert_at - 1,
        };
        let column = offset - self.line_starts[line_idx] + 1;

        Position { filename: self.name.clone(), line: (line_idx + 1) as u32, column: column as u32 }
    }
}

fn compute_line_starts(content: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, b) in content.bytes().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_first_column() {
        let f = SourceFile::new("x.mi", "package main\n");
        assert_eq!(f.resolve(Pos::new(1)), Position { filename: "x.mi".into(), line: 1, column: 1 });
    }

    #[test]
    fn resolves_across_lines() {
        let f = SourceFile::new("x.mi", "ab\ncd\nef");
        // offsets: a=1 b=2 \n=3 c=4 d=5 \n=6 e=7 f=8
        assert_eq!(f.resolve(Pos::new(4)), Position { filename: "x.mi".into(), line: 2, column: 1 });
        assert_eq!(f.resolve(Pos::new(8)), Position { filename: "x.mi".into(), line: 3, column: 2 });
    }

    #[test]
    fn none_pos_is_invalid() {
        let f = SourceFile::new("x.mi", "abc");
        let p = f.resolve(Pos::NONE);
        assert!(!p.is_valid());
    }
}
