//! Short-circuit boolean lowering (spec.md §4.5).
//!
//! `original_source/compiler/compiler.go` flattens a condition into a list
//! of atoms with a per-atom true/false jump-target flag (`compileStmtCondTree`
//! / `findFLag` / `compileStmtCond`), guaranteeing each atomic comparison
//! evaluates at most once. Swapping the true/false target labels on `!`
//! and threading a fresh intermediate label through `&&`/`||` produces the
//! same observable jump structure without materializing the atom list, so
//! that's the approach taken here.

use crate::emitter::Emitter;
use crate::error::EmitError;
use crate::expr::common_type;
use crate::types::{cmp_instr, is_comparison};
use milc_lex::TokenKind;
use milc_par::Expr;

impl Emitter {
    /// Emits a branch to `true_label` or `false_label` depending on
    /// `expr`, without ever materializing a boolean value for `&&`/`||`/`!`
    /// themselves.
    pub(crate) fn compile_cond(&mut self, expr: &Expr, true_label: &str, false_label: &str) -> Result<(), EmitError> {
        match expr {
            Expr::Paren(p) => self.compile_cond(&p.x, true_label, false_label),
            Expr::Unary(u) if u.op == TokenKind::Not => {
                self.compile_cond(&u.x, false_label, true_label)
            }
            Expr::Binary(b) if b.op == TokenKind::And => {
                let mid = self.names.fresh_label("and.rhs");
                self.compile_cond(&b.x, &mid, false_label)?;
                self.emit_line(format!("{mid}:"));
                self.compile_cond(&b.y, true_label, false_label)
            }
            Expr::Binary(b) if b.op == TokenKind::Or => {
                let mid = self.names.fresh_label("or.rhs");
                self.compile_cond(&b.x, true_label, &mid)?;
                self.emit_line(format!("{mid}:"));
                self.compile_cond(&b.y, true_label, false_label)
            }
            Expr::Binary(b) if is_comparison(b.op) => {
                let pos = expr.pos();
                let (xr, xt) = self.emit_expr(&b.x)?;
                let (yr, yt) = self.emit_expr(&b.y)?;
                let common = common_type(&xt, &yt).to_string();
                let xr = self.coerce(&xr, &xt, &common, pos)?;
                let yr = self.coerce(&yr, &yt, &common, pos)?;
                let (instr, pred) = cmp_instr(b.op, &common, pos)?;
                let cmp_reg = self.names.fresh_reg();
                self.emit_line(format!("  {cmp_reg} = {instr} {pred} {common} {xr}, {yr}"));
                self.emit_line(format!("  br i1 {cmp_reg}, label %{true_label}, label %{false_label}"));
                Ok(())
            }
            other => self.compile_cond_fallback(other, true_label, false_label),
        }
    }

    /// Any other expression used as a condition (a plain `i8`-valued
    /// variable or call result) is compared against zero.
    fn compile_cond_fallback(&mut self, expr: &Expr, true_label: &str, false_label: &str) -> Result<(), EmitError> {
        let pos = expr.pos();
        let (r, t) = self.emit_expr(expr)?;
        if t == "void" {
            return Err(EmitError::UnsupportedCondition(pos));
        }
        let r8 = self.coerce(&r, &t, "i8", pos)?;
        let cmp_reg = self.names.fresh_reg();
        self.emit_line(format!("  {cmp_reg} = icmp ne i8 {r8}, 0"));
        self.emit_line(format!("  br i1 {cmp_reg}, label %{true_label}, label %{false_label}"));
        Ok(())
    }
}
