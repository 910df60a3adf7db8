//! Parser boundary conditions, kept separate from the inline grammar
//! tests in `parser.rs` (spec.md ambient test tooling).

use crate::{parse, ParseError, Stmt};

fn parse_src(src: &str) -> Result<crate::File, ParseError> {
    let (tokens, _, _) = milc_lex::lex(src);
    parse(&tokens)
}

#[test]
fn break_immediately_before_closing_brace_parses() {
    let src = "package main\nfunc f() {\n for {\n  break\n }\n}\n";
    let file = parse_src(src).expect("break before `}` must parse (no ASI after keyword)");
    assert_eq!(file.funcs.len(), 1);
}

#[test]
fn import_immediately_before_next_decl_parses() {
    let src = "package main\nimport \"fmt\"\nfunc f() {\n}\n";
    let file = parse_src(src).expect("import string literal gets no auto-semicolon");
    assert_eq!(file.imports.len(), 1);
}

#[test]
fn defer_before_closing_brace_parses() {
    let src = "package main\nfunc f() {\n defer g()\n}\n";
    let file = parse_src(src).expect("defer call must parse with no trailing semicolon");
    assert_eq!(file.funcs.len(), 1);
}

#[test]
fn bare_for_loop_has_no_clauses() {
    let src = "package main\nfunc f() {\n for {\n  break\n }\n}\n";
    let file = parse_src(src).unwrap();
    match &file.funcs[0].body.as_ref().unwrap().list[0] {
        Stmt::For(f) => {
            assert!(f.init.is_none());
            assert!(f.cond.is_none());
            assert!(f.post.is_none());
        }
        other => panic!("expected a for statement, got {other:?}"),
    }
}

#[test]
fn missing_package_name_is_a_parse_error() {
    let err = parse_src("package\n").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn func_forward_decl_without_body_parses() {
    let src = "package main\nfunc external() i32\n";
    let file = parse_src(src).unwrap();
    assert!(file.funcs[0].body.is_none());
}
