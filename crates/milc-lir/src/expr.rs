use crate::emitter::Emitter;
use crate::error::EmitError;
use crate::names::mangle_global;
use crate::types::{arith_mnemonic, cmp_instr, is_comparison, is_float, is_logical};
use milc_lex::TokenKind;
use milc_par::{CallExpr, Expr};
use milc_sem::Scope;

/// `(register, type)` pair: every expression is materialized into a
/// virtual register before use, spec.md §4.5's literal materialization
/// idiom (`add i32 0, 5`, `fadd float 0.0, 0x...`).
pub type Operand = (String, String);

impl Emitter {
    pub(crate) fn emit_expr(&mut self, expr: &Expr) -> Result<Operand, EmitError> {
        match expr {
            Expr::Int(i) => {
                let reg = self.names.fresh_reg();
                self.emit_line(format!("  {reg} = add i32 0, {}", i.value));
                Ok((reg, "i32".to_string()))
            }
            Expr::Char(c) => {
                let reg = self.names.fresh_reg();
                self.emit_line(format!("  {reg} = add i8 0, {}", c.value));
                Ok((reg, "i8".to_string()))
            }
            Expr::Float(f) => {
                let reg = self.names.fresh_reg();
                self.emit_line(format!("  {reg} = fadd float 0.0, 0x{:016X}", f.value.to_bits()));
                Ok((reg, "float".to_string()))
            }
            Expr::Ident(id) => self.load_ident(&id.name, expr.pos()),
            Expr::Paren(p) => self.emit_expr(&p.x),
            Expr::Unary(u) => self.emit_unary(u.op, &u.x, expr.pos()),
            Expr::Binary(b) => self.emit_binary(b.op, &b.x, &b.y, expr.pos()),
            Expr::Call(c) => self.emit_call(c, expr.pos()),
            // `sel.name` was set (at parse time) to the receiver's own
            // literal name rather than the selector token's; evaluating a
            // selector therefore resolves to whatever the receiver itself
            // names. Faithful to the quirk in
            // `original_source/parser/parse_expr.go` (spec.md §9).
            Expr::Selector(s) => self.load_ident(&s.sel.name, expr.pos()),
        }
    }

    /// Every variable binding (global, parameter, or local) is an `alloca`
    /// pointer by the time it reaches the scope graph, so reading one is
    /// always a `load` — there is no direct-register fast path anymore
    /// (spec.md §4.5's `alloca`/`store`/`load` model, SPEC_FULL.md §8).
    fn load_ident(&mut self, name: &str, pos: milc_util::Pos) -> Result<Operand, EmitError> {
        let obj = Scope::lookup(&self.scope, name)
            .ok_or_else(|| milc_sem::ScopeError::Undefined { name: name.to_string(), pos })?;
        let ty = obj.ty.unwrap_or_else(|| "i32".to_string());
        let reg = self.names.fresh_reg();
        self.emit_line(format!("  {reg} = load {ty}, {ty}* {}", obj.mangled));
        Ok((reg, ty))
    }

    fn emit_unary(&mut self, op: TokenKind, x: &Expr, pos: milc_util::Pos) -> Result<Operand, EmitError> {
        let (xr, xt) = self.emit_expr(x)?;
        match op {
            TokenKind::Add => Ok((xr, xt)), // unary plus is transparent
            TokenKind::Sub => {
                let mnem = if is_float(&xt) { "fsub" } else { "sub" };
                let zero = if is_float(&xt) { "0.0" } else { "0" };
                let reg = self.names.fresh_reg();
                self.emit_line(format!("  {reg} = {mnem} {xt} {zero}, {xr}"));
                Ok((reg, xt))
            }
            TokenKind::Not => {
                let xr8 = self.coerce(&xr, &xt, "i8", pos)?;
                let reg = self.names.fresh_reg();
                self.emit_line(format!("  {reg} = xor i8 {xr8}, 1"));
                Ok((reg, "i8".to_string()))
            }
            _ => Err(EmitError::Unsupported("unary operator", pos)),
        }
    }

    fn emit_binary(&mut self, op: TokenKind, x: &Expr, y: &Expr, pos: milc_util::Pos) -> Result<Operand, EmitError> {
        if is_logical(op) {
            return Err(EmitError::Unsupported("'&&'/'||' outside a condition", pos));
        }
        let (xr, xt) = self.emit_expr(x)?;
        let (yr, yt) = self.emit_expr(y)?;
        let common = common_type(&xt, &yt);
        let xr = self.coerce(&xr, &xt, common, pos)?;
        let yr = self.coerce(&yr, &yt, common, pos)?;

        if is_comparison(op) {
            let (instr, pred) = cmp_instr(op, common, pos)?;
            let cmp_reg = self.names.fresh_reg();
            self.emit_line(format!("  {cmp_reg} = {instr} {pred} {common} {xr}, {yr}"));
            let reg = self.names.fresh_reg();
            self.emit_line(format!("  {reg} = zext i1 {cmp_reg} to i8"));
            Ok((reg, "i8".to_string()))
        } else {
            let mnem = arith_mnemonic(op, common, pos)?;
            let reg = self.names.fresh_reg();
            self.emit_line(format!("  {reg} = {mnem} {common} {xr}, {yr}"));
            Ok((reg, common.to_string()))
        }
    }

    fn emit_call(&mut self, call: &CallExpr, pos: milc_util::Pos) -> Result<Operand, EmitError> {
        let (mangled, ret_ty) = if let Some(pkg) = &call.pkg {
            if pkg.name == self.pkg {
                let obj = Scope::lookup(&self.scope, &call.func_name.name).ok_or_else(|| {
                    EmitError::UnknownCallee { name: call.func_name.name.clone(), pos }
                })?;
                (obj.mangled, obj.ty)
            } else {
                // Cross-package return type is unknown without whole-program
                // linking; defaults to i32 (spec.md §9 open question on
                // qualified calls, same area as the single-argument limit).
                (mangle_global(&pkg.name, &call.func_name.name), Some("i32".to_string()))
            }
        } else {
            let obj = Scope::lookup(&self.scope, &call.func_name.name)
                .ok_or_else(|| EmitError::UnknownCallee { name: call.func_name.name.clone(), pos })?;
            (obj.mangled, obj.ty)
        };

        let mut arg_regs = Vec::with_capacity(call.args.len());
        for a in &call.args {
            arg_regs.push(self.emit_expr(a)?);
        }
        let args = arg_regs
            .iter()
            .map(|(r, t)| format!("{t} {r}"))
            .collect::<Vec<_>>()
            .join(", ");

        match ret_ty {
            None => {
                self.emit_line(format!("  call void {mangled}({args})"));
                Ok((String::new(), "void".to_string()))
            }
            Some(ty) => {
                let reg = self.names.fresh_reg();
                self.emit_line(format!("  {reg} = call {ty} {mangled}({args})"));
                Ok((reg, ty))
            }
        }
    }

    /// Converts `reg` of type `from` to `to`, emitting the matching
    /// widen/truncate/int-float conversion. A no-op when the types already
    /// match.
    pub(crate) fn coerce(&mut self, reg: &str, from: &str, to: &str, _pos: milc_util::Pos) -> Result<String, EmitError> {
        if from == to {
            return Ok(reg.to_string());
        }
        let out = self.names.fresh_reg();
        let line = match (from, to) {
            ("i8", "i32") => format!("  {out} = sext i8 {reg} to i32"),
            ("i8", "float") => format!("  {out} = sitofp i8 {reg} to float"),
            ("i32", "i8") => format!("  {out} = trunc i32 {reg} to i8"),
            ("i32", "float") => format!("  {out} = sitofp i32 {reg} to float"),
            ("float", "i32") => format!("  {out} = fptosi float {reg} to i32"),
            ("float", "i8") => format!("  {out} = fptosi float {reg} to i8"),
            _ => return Ok(reg.to_string()),
        };
        self.emit_line(line);
        Ok(out)
    }
}

pub(crate) fn common_type<'a>(a: &'a str, b: &'a str) -> &'a str {
    if a == "float" || b == "float" {
        "float"
    } else if a == "i32" || b == "i32" {
        "i32"
    } else {
        a
    }
}
