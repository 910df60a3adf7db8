//! milc-lir - single-pass AST-to-LLIR emitter (spec.md §4.5). Consumes the
//! AST straight from milc-par; there is no separate MIR stage.

mod cond;
mod emitter;
mod error;
mod expr;
mod names;
mod stmt;
mod types;

pub use emitter::emit;
pub use error::EmitError;

#[cfg(test)]
mod edge_cases;

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(src: &str) -> String {
        let (tokens, _, lex_err) = milc_lex::lex(src);
        assert!(lex_err.is_none(), "lex error: {:?}", lex_err);
        let file = milc_par::parse(&tokens).expect("parse error");
        emit(&file, src).expect("emit error")
    }

    #[test]
    fn emits_header_and_init_for_minimal_package() {
        let ir = compile("package main\n");
        assert!(ir.contains("; package main"));
        assert!(ir.contains("define void @milc_main_init()"));
    }

    #[test]
    fn emits_main_trampoline_when_main_func_present() {
        let ir = compile("package main\nfunc main() i32 {\n return 0\n}\n");
        assert!(ir.contains("define i32 @main()"));
        assert!(ir.contains("define i32 @milc_main_main()"));
        assert!(ir.contains("ret i32 0") || ir.contains("ret i32 %t"));
    }

    #[test]
    fn no_main_trampoline_without_main_func() {
        let ir = compile("package util\nfunc helper() {\n return\n}\n");
        assert!(!ir.contains("define i32 @main()"));
    }

    #[test]
    fn int_literal_uses_materialization_idiom() {
        let ir = compile("package main\nfunc f() i32 {\n return 5\n}\n");
        assert!(ir.contains("add i32 0, 5"));
    }

    #[test]
    fn float_literal_uses_hex_bit_pattern() {
        let ir = compile("package main\nfunc f() float {\n return 1.5\n}\n");
        let bits = 1.5f64.to_bits();
        assert!(ir.contains(&format!("0x{bits:016X}")));
    }

    #[test]
    fn if_else_emits_five_line_disambiguated_labels() {
        let src = "package main\nfunc f(x i32) i32 {\n if x < 0 {\n  return 0\n } else {\n  return 1\n }\n}\n";
        let ir = compile(src);
        assert!(ir.contains("if.init.line2"));
        assert!(ir.contains("if.cond.line2"));
        assert!(ir.contains("if.body.line2"));
        assert!(ir.contains("if.else.line2"));
        assert!(ir.contains("if.end.line2"));
    }

    #[test]
    fn for_loop_break_jumps_to_end_label() {
        let src =
            "package main\nfunc f() {\n for i := 0; i < 10; i = i + 1 {\n  break\n }\n}\n";
        let ir = compile(src);
        assert!(ir.contains("for.end.line2"));
        let end_label = ir
            .lines()
            .find(|l| l.starts_with("for.end.line2") && l.ends_with(':'))
            .expect("for.end label line")
            .trim_end_matches(':');
        assert!(ir.contains(&format!("br label %{end_label}")));
    }

    #[test]
    fn char_to_int_widening_sign_extends() {
        let src = "package main\nfunc f() i32 {\n var c i8 = 'A'\n return c\n}\n";
        let ir = compile(src);
        assert!(ir.contains("add i8 0, 65"));
        assert!(ir.contains("sext i8"));
    }

    #[test]
    fn local_names_are_mangled_with_position() {
        let src = "package main\nfunc f() {\n var x i32 = 1\n}\n";
        let ir = compile(src);
        assert!(ir.contains("%local_x.pos."));
    }

    #[test]
    fn undefined_name_is_an_emit_error() {
        let src = "package main\nfunc f() i32 {\n return y\n}\n";
        let (tokens, _, _) = milc_lex::lex(src);
        let file = milc_par::parse(&tokens).unwrap();
        let err = emit(&file, src).unwrap_err();
        assert!(matches!(err, EmitError::Scope(_)));
    }

    #[test]
    fn break_outside_loop_is_an_emit_error() {
        let src = "package main\nfunc f() {\n break\n}\n";
        let (tokens, _, _) = milc_lex::lex(src);
        let file = milc_par::parse(&tokens).unwrap();
        let err = emit(&file, src).unwrap_err();
        assert!(matches!(err, EmitError::BranchOutsideLoop { .. }));
    }

    #[test]
    fn local_reassignment_stores_to_the_same_alloca() {
        let src = "package main\nfunc f() i32 {\n var i i32 = 0\n i = i + 1\n return i\n}\n";
        let ir = compile(src);
        let alloca_line = ir.lines().find(|l| l.contains("alloca i32")).expect("alloca for i");
        let ptr = alloca_line.split_whitespace().next().unwrap();
        assert!(ir.contains(&format!("store i32 0, i32* {ptr}")));
        assert!(ir.matches(&format!("i32* {ptr}")).count() >= 2);
    }

    #[test]
    fn escaped_char_literal_evaluates_to_zero() {
        let src = "package main\nfunc f() i8 {\n return '\\n'\n}\n";
        let ir = compile(src);
        assert!(ir.contains("add i8 0, 0"));
    }
}
