use crate::error::EmitError;
use milc_lex::TokenKind;
use milc_util::Pos;

pub fn is_float(ty: &str) -> bool {
    ty == "float"
}

/// Arithmetic mnemonic for `op` at type `ty`, spec.md §4.5 "operator
/// lowering table": int arithmetic splits from float arithmetic, `%` has
/// no float form.
pub fn arith_mnemonic(op: TokenKind, ty: &str, pos: Pos) -> Result<&'static str, EmitError> {
    use TokenKind::*;
    if is_float(ty) {
        match op {
            Add => Ok("fadd"),
            Sub => Ok("fsub"),
            Mul => Ok("fmul"),
            Div => Ok("fdiv"),
            Mod => Err(EmitError::FloatModulo(pos)),
            _ => Err(EmitError::Unsupported("non-arithmetic operator", pos)),
        }
    } else {
        match op {
            Add => Ok("add"),
            Sub => Ok("sub"),
            Mul => Ok("mul"),
            Div => Ok("sdiv"),
            Mod => Ok("srem"),
            _ => Err(EmitError::Unsupported("non-arithmetic operator", pos)),
        }
    }
}

/// Comparison instruction and predicate for `op` at type `ty`: signed int
/// predicates or ordered float predicates, spec.md §4.5.
pub fn cmp_instr(op: TokenKind, ty: &str, pos: Pos) -> Result<(&'static str, &'static str), EmitError> {
    use TokenKind::*;
    if is_float(ty) {
        let pred = match op {
            Eql => "oeq",
            Neq => "une",
            Gtr => "ogt",
            Geq => "oge",
            Lss => "olt",
            Leq => "ole",
            _ => return Err(EmitError::Unsupported("non-comparison operator", pos)),
        };
        Ok(("fcmp", pred))
    } else {
        let pred = match op {
            Eql => "eq",
            Neq => "ne",
            Gtr => "sgt",
            Geq => "sge",
            Lss => "slt",
            Leq => "sle",
            _ => return Err(EmitError::Unsupported("non-comparison operator", pos)),
        };
        Ok(("icmp", pred))
    }
}

pub fn is_comparison(op: TokenKind) -> bool {
    use TokenKind::*;
    matches!(op, Eql | Neq | Lss | Leq | Gtr | Geq)
}

pub fn is_logical(op: TokenKind) -> bool {
    matches!(op, TokenKind::And | TokenKind::Or)
}

/// Zero-value literal for a locally declared variable with no initializer.
pub fn zero_literal(ty: &str) -> &'static str {
    if is_float(ty) {
        "0x0000000000000000"
    } else {
        "0"
    }
}

/// `alloca` alignment for a `var`/`:=`-declared local: 1 byte for `i8`, 4
/// otherwise. Function parameters do not use this — their alloca is always
/// `align 4` regardless of type, an inconsistency
/// `original_source/compiler/compiler.go`'s `compileFunc` hardcodes and
/// spec.md §9 flags as ambiguous rather than a bug to silently fix.
pub fn align_of(ty: &str) -> u32 {
    if ty == "i8" {
        1
    } else {
        4
    }
}
