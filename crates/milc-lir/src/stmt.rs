use crate::emitter::Emitter;
use crate::error::EmitError;
use crate::names::{mangle_global, mangle_local};
use crate::types::{align_of, is_float};
use milc_lex::TokenKind;
use milc_par::{
    AssignStmt, BlockStmt, BranchStmt, ForStmt, FuncDecl, IfStmt, LabeledStmt, ReturnStmt, Stmt,
    VarSpec,
};

use milc_sem::{lookup_for_labels, push_for_labels, Object, Scope};

impl Emitter {
    /// `body` is passed separately so the caller proves (by construction)
    /// that this is only called for functions with a body.
    pub(crate) fn emit_func(&mut self, f: &FuncDecl, body: &BlockStmt) -> Result<(), EmitError> {
        self.scope = Scope::new_enclosed(&self.root);
        let mangled = mangle_global(&self.pkg, &f.name);
        let ret = f.ty.result.as_ref().map(|r| r.name.as_str()).unwrap_or("void");
        self.ret_ty = ret.to_string();

        // The function signature binds each parameter to a distinct
        // `.argN` register; the body then allocas a separate pointer and
        // stores the argument into it, so every in-body read/write goes
        // through `load`/`store` like any other local (spec.md §4.5).
        let mut param_sig = Vec::new();
        let mut param_allocas = Vec::new();
        for (i, p) in f.ty.params.list.iter().enumerate() {
            let ptr = mangle_local(&p.name.name, p.name.name_pos);
            let arg_reg = format!("{ptr}.arg{i}");
            param_sig.push(format!("{} {}", p.ty.name, arg_reg));
            param_allocas.push((ptr, p.ty.name.clone(), arg_reg, p.name.name.clone(), p.name.name_pos));
        }

        self.emit_line(format!("define {ret} {mangled}({}) {{", param_sig.join(", ")));
        for (ptr, ty, arg_reg, name, pos) in param_allocas {
            // Parameter allocas always use `align 4`, even for `i8`,
            // matching `original_source/compiler/compiler.go`'s
            // hardcoded width (spec.md §9 open question).
            self.emit_line(format!("  {ptr} = alloca {ty}, align 4"));
            self.emit_line(format!("  store {ty} {arg_reg}, {ty}* {ptr}"));
            self.scope.borrow_mut().insert(Object::new(name, ptr, Some(ty), pos));
        }
        for stmt in &body.list {
            self.emit_stmt(stmt)?;
        }
        let ends_in_return = matches!(body.list.last(), Some(Stmt::Return(_)));
        if ret == "void" && !ends_in_return {
            self.emit_line("  ret void");
        }
        self.emit_line("}");
        self.emit_line("");
        Ok(())
    }

    pub(crate) fn emit_stmt(&mut self, stmt: &Stmt) -> Result<(), EmitError> {
        match stmt {
            Stmt::Block(b) => self.emit_block(b),
            Stmt::Var(v) => self.emit_var(v),
            Stmt::Assign(a) => self.emit_assign(a),
            Stmt::If(i) => self.emit_if(i),
            Stmt::For(f) => self.emit_for(f),
            Stmt::Return(r) => self.emit_return(r),
            Stmt::Branch(b) => self.emit_branch(b),
            Stmt::Labeled(l) => self.emit_labeled(l),
            Stmt::Expr(e) => {
                self.emit_expr(&e.x)?;
                Ok(())
            }
            // Parsed but never emitted, spec.md §1 Non-goals.
            Stmt::Defer(d) => {
                self.emit_line(format!("  ; defer {} not emitted", d.call.func_name.name));
                Ok(())
            }
        }
    }

    fn emit_block(&mut self, b: &BlockStmt) -> Result<(), EmitError> {
        self.push_scope();
        for s in &b.list {
            self.emit_stmt(s)?;
        }
        self.pop_scope();
        Ok(())
    }

    /// `alloca`s `mangled` at `ty`'s local-declaration width and stores
    /// `src` into it (spec.md §4.5; SPEC_FULL.md §8's `for i<10 { i = i+1 }`
    /// scenario requires a real store in the loop body, not an SSA rebind).
    fn alloca_and_store(&mut self, mangled: &str, ty: &str, src: &str) {
        self.emit_line(format!("  {mangled} = alloca {ty}, align {}", align_of(ty)));
        self.emit_line(format!("  store {ty} {src}, {ty}* {mangled}"));
    }

    fn emit_var(&mut self, v: &VarSpec) -> Result<(), EmitError> {
        let declared_ty = v.ty.as_ref().map(|t| t.name.clone());
        let mangled = mangle_local(&v.name.name, v.name.name_pos);
        let ty = match &v.value {
            Some(expr) => {
                let (r, t) = self.emit_expr(expr)?;
                let target_ty = declared_ty.unwrap_or_else(|| t.clone());
                let r = self.coerce(&r, &t, &target_ty, v.var_pos)?;
                self.alloca_and_store(&mangled, &target_ty, &r);
                target_ty
            }
            None => {
                let ty = declared_ty.unwrap_or_else(|| "i32".to_string());
                let zero = if is_float(&ty) { "0.0" } else { "0" };
                self.alloca_and_store(&mangled, &ty, zero);
                ty
            }
        };
        self.scope.borrow_mut().insert(Object::new(v.name.name.clone(), mangled, Some(ty), v.var_pos));
        Ok(())
    }

    fn emit_assign(&mut self, a: &AssignStmt) -> Result<(), EmitError> {
        if a.target.len() != a.value.len() {
            return Err(EmitError::ArityMismatch {
                targets: a.target.len(),
                values: a.value.len(),
                pos: a.op_pos,
            });
        }

        for (target, value) in a.target.iter().zip(a.value.iter()) {
            let (r, t) = self.emit_expr(value)?;
            match a.op {
                TokenKind::Define => {
                    let mangled = mangle_local(&target.name, target.name_pos);
                    self.alloca_and_store(&mangled, &t, &r);
                    self.scope.borrow_mut().insert(Object::new(
                        target.name.clone(),
                        mangled,
                        Some(t),
                        target.name_pos,
                    ));
                }
                TokenKind::Assign => {
                    let obj = Scope::lookup(&self.scope, &target.name).ok_or_else(|| {
                        milc_sem::ScopeError::Undefined { name: target.name.clone(), pos: target.name_pos }
                    })?;
                    let ty = obj.ty.clone().unwrap_or_else(|| t.clone());
                    let r = self.coerce(&r, &t, &ty, target.name_pos)?;
                    self.emit_line(format!("  store {ty} {r}, {ty}* {}", obj.mangled));
                }
                _ => return Err(EmitError::Unsupported("assignment operator", a.op_pos)),
            }
        }
        Ok(())
    }

    /// Five labels, line-disambiguated: `if.init.line{L}`, `if.cond.line{L}`,
    /// `if.body.line{L}`, `if.else.line{L}`, `if.end.line{L}` (spec.md §4.5).
    /// All five are always emitted, even when there is no `else` arm — the
    /// else label is then simply unreachable, matching
    /// `original_source/compiler/compiler.go`'s `compileStmtIf`, which emits
    /// its `ifElse` block unconditionally and only skips *jumping* to it.
    fn emit_if(&mut self, i: &IfStmt) -> Result<(), EmitError> {
        self.push_scope();
        let line = self.line_of(i.if_pos);
        let init_label = self.names.fresh_label_at_line("if.init", line);
        let cond_label = self.names.fresh_label_at_line("if.cond", line);
        let body_label = self.names.fresh_label_at_line("if.body", line);
        let else_label = self.names.fresh_label_at_line("if.else", line);
        let end_label = self.names.fresh_label_at_line("if.end", line);
        let after_cond_or_body = if i.else_.is_some() { &else_label } else { &end_label };

        self.emit_line(format!("  br label %{init_label}"));

        self.emit_line(format!("{init_label}:"));
        if let Some(init) = &i.init {
            self.emit_stmt(init)?;
        }
        self.emit_line(format!("  br label %{cond_label}"));

        self.emit_line(format!("{cond_label}:"));
        self.compile_cond(&i.cond, &body_label, after_cond_or_body)?;

        self.emit_line(format!("{body_label}:"));
        self.emit_block(&i.body)?;
        self.emit_line(format!("  br label %{after_cond_or_body}"));

        self.emit_line(format!("{else_label}:"));
        if let Some(else_stmt) = &i.else_ {
            self.emit_stmt(else_stmt)?;
        }
        self.emit_line(format!("  br label %{end_label}"));

        self.emit_line(format!("{end_label}:"));
        self.pop_scope();
        Ok(())
    }

    /// Five labels, line-disambiguated: `for.init.line{L}`, `for.cond.line{L}`,
    /// `for.body.line{L}`, `for.post.line{L}`, `for.end.line{L}` (spec.md
    /// §4.5, SPEC_FULL.md §8's five-label `for` scenario).
    fn emit_for(&mut self, f: &ForStmt) -> Result<(), EmitError> {
        self.push_scope();
        let line = self.line_of(f.for_pos);
        let init_label = self.names.fresh_label_at_line("for.init", line);
        let cond_label = self.names.fresh_label_at_line("for.cond", line);
        let body_label = self.names.fresh_label_at_line("for.body", line);
        let post_label = self.names.fresh_label_at_line("for.post", line);
        let end_label = self.names.fresh_label_at_line("for.end", line);
        push_for_labels(&self.scope, &post_label, &end_label);

        self.emit_line(format!("  br label %{init_label}"));

        self.emit_line(format!("{init_label}:"));
        if let Some(init) = &f.init {
            self.emit_stmt(init)?;
        }
        self.emit_line(format!("  br label %{cond_label}"));

        self.emit_line(format!("{cond_label}:"));
        match &f.cond {
            Some(cond) => self.compile_cond(cond, &body_label, &end_label)?,
            None => self.emit_line(format!("  br label %{body_label}")),
        }

        self.emit_line(format!("{body_label}:"));
        self.emit_block(&f.body)?;
        self.emit_line(format!("  br label %{post_label}"));

        self.emit_line(format!("{post_label}:"));
        if let Some(post) = &f.post {
            self.emit_stmt(post)?;
        }
        self.emit_line(format!("  br label %{cond_label}"));

        self.emit_line(format!("{end_label}:"));
        self.pop_scope();
        Ok(())
    }

    fn emit_return(&mut self, r: &ReturnStmt) -> Result<(), EmitError> {
        match &r.result {
            Some(expr) => {
                let pos = expr.pos();
                let (reg, ty) = self.emit_expr(expr)?;
                let ret_ty = self.ret_ty.clone();
                let reg = self.coerce(&reg, &ty, &ret_ty, pos)?;
                self.emit_line(format!("  ret {ret_ty} {reg}"));
            }
            None => self.emit_line("  ret void"),
        }
        Ok(())
    }

    fn emit_branch(&mut self, b: &BranchStmt) -> Result<(), EmitError> {
        match b.tok_kind {
            TokenKind::Break => {
                let (_, exit) = lookup_for_labels(&self.scope)
                    .ok_or(EmitError::BranchOutsideLoop { construct: "break", pos: b.tok_pos })?;
                self.emit_line(format!("  br label %{exit}"));
                Ok(())
            }
            TokenKind::Continue => {
                let (cont, _) = lookup_for_labels(&self.scope)
                    .ok_or(EmitError::BranchOutsideLoop { construct: "continue", pos: b.tok_pos })?;
                self.emit_line(format!("  br label %{cont}"));
                Ok(())
            }
            // Parsed but never emitted, spec.md §9 open question.
            TokenKind::Goto => Err(EmitError::Unsupported("goto", b.tok_pos)),
            _ => Err(EmitError::Unsupported("branch kind", b.tok_pos)),
        }
    }

    fn emit_labeled(&mut self, l: &LabeledStmt) -> Result<(), EmitError> {
        let label = self.names.fresh_label(&format!("label.{}", l.label.name));
        self.emit_line(format!("{label}:"));
        if let Some(stmt) = &l.stmt {
            self.emit_stmt(stmt)?;
        }
        Ok(())
    }
}
