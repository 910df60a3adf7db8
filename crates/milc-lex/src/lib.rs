//! milc-lex - lexical analysis: character stream to tokens with automatic
//! semicolon insertion (spec.md §4.1, §4.2).

mod cursor;
mod error;
mod lexer;
mod token;

pub use error::LexError;
pub use lexer::lex;
pub use token::{lookup_keyword, Token, TokenKind};

#[cfg(test)]
mod edge_cases;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eof_is_always_last_and_unique() {
        let (tokens, _, err) = lex("package main\n");
        assert!(err.is_none());
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
    }

    #[test]
    fn comments_are_separated_from_tokens() {
        let (tokens, comments, _) = lex("// hi\npackage main\n/* block */\n");
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Comment));
        assert_eq!(comments.len(), 2);
    }

    #[test]
    fn asi_inserts_semicolon_after_ident() {
        let (tokens, _, _) = lex("x\n");
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[1].kind, TokenKind::Semicolon);
    }

    #[test]
    fn asi_skips_after_operator() {
        let (tokens, _, _) = lex("x +\ny\n");
        // no semicolon inserted right after '+'
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[1].kind, TokenKind::Add);
        assert_eq!(tokens[2].kind, TokenKind::Ident);
        assert_eq!(tokens[3].kind, TokenKind::Semicolon);
    }

    #[test]
    fn keyword_rewrite_after_emit() {
        let (tokens, _, _) = lex("return\n");
        assert_eq!(tokens[0].kind, TokenKind::Return);
    }

    #[test]
    fn int_then_dot_then_digits_is_float() {
        let (tokens, _, _) = lex("3.14\n");
        assert_eq!(tokens[0].kind, TokenKind::Float);
        assert_eq!(tokens[0].literal, "3.14");
    }

    #[test]
    fn positions_are_strictly_non_decreasing() {
        let src = "package main\nfunc main() { }\n";
        let (tokens, _, _) = lex(src);
        let mut last = 0u32;
        for t in &tokens {
            assert!(t.pos.0 >= last);
            last = t.pos.0;
        }
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let (tokens, _, err) = lex("\"abc");
        assert!(err.is_some());
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Error);
    }

    #[test]
    fn stray_ampersand_is_fatal() {
        let (_, _, err) = lex("a & b");
        assert!(matches!(err, Some(LexError::StrayLogicalOperator { ch: '&', .. })));
    }

    #[test]
    fn char_literal_with_escape() {
        let (tokens, _, _) = lex("'\\n'\n");
        assert_eq!(tokens[0].kind, TokenKind::Char);
        assert_eq!(tokens[0].literal, "'\\n'");
    }
}
