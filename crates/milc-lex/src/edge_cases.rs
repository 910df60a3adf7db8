//! Boundary conditions for lexing and ASI, kept separate from the inline
//! unit tests in `lib.rs` (spec.md ambient test tooling).

use crate::{lex, TokenKind};

#[test]
fn empty_source_yields_only_eof() {
    let (tokens, _, err) = lex("");
    assert!(err.is_none());
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}

#[test]
fn asi_skips_after_rbrace_so_no_double_semicolon() {
    let (tokens, _, _) = lex("{}\n");
    assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Semicolon).count(), 0);
}

#[test]
fn consecutive_newlines_insert_one_semicolon() {
    let (tokens, _, _) = lex("x\n\n\ny\n");
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,
            TokenKind::Semicolon,
            TokenKind::Ident,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn unterminated_block_comment_is_fatal() {
    let (_, _, err) = lex("/* never closed\npackage main\n");
    assert!(matches!(err, Some(crate::LexError::UnterminatedComment { .. })));
}

#[test]
fn doubled_ampersand_is_not_stray() {
    let (_, _, err) = lex("a && b\n");
    assert!(err.is_none());
}

#[test]
fn zero_is_a_valid_int_literal() {
    let (tokens, _, _) = lex("0\n");
    assert_eq!(tokens[0].kind, TokenKind::Int);
    assert_eq!(tokens[0].literal, "0");
}
