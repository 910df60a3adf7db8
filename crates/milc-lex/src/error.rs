use milc_util::Pos;
use thiserror::Error;

/// Lexical error taxonomy, spec.md §7 tier 1. The lexer records one of
/// these as an error token and stops (§5 "limited recovery").
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexError {
    #[error("unterminated quoted string")]
    UnterminatedString { pos: Pos },

    #[error("unterminated block comment")]
    UnterminatedComment { pos: Pos },

    #[error("unrecognized character: {ch:?}")]
    UnrecognizedChar { ch: char, pos: Pos },

    #[error("stray logical operator, expected doubled '{ch}{ch}'")]
    StrayLogicalOperator { ch: char, pos: Pos },
}

impl LexError {
    pub fn pos(&self) -> Pos {
        match self {
            LexError::UnterminatedString { pos }
            | LexError::UnterminatedComment { pos }
            | LexError::UnrecognizedChar { pos, .. }
            | LexError::StrayLogicalOperator { pos, .. } => *pos,
        }
    }
}
