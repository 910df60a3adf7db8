//! The single-pass AST-to-LLIR emitter (spec.md §4.5), the largest
//! component of the compiler. Ported conceptually from
//! `original_source/compiler/compiler.go`; the textual IR itself is
//! authored fresh since the original targets a different backend surface.

use crate::error::EmitError;
use crate::names::{mangle_global, NameGen};
use milc_par::{Expr, File, FuncDecl, VarSpec};
use milc_sem::{universe, Object, Scope, ScopeRef};
use milc_util::{Pos, SourceFile};

pub struct Emitter {
    pub(crate) pkg: String,
    pub(crate) buf: String,
    pub(crate) names: NameGen,
    /// Universe scope extended with every global and function in the
    /// file, fixed once [`Emitter::register_decls`] runs.
    pub(crate) root: ScopeRef,
    /// Current working scope; reset to a fresh child of `root` at the
    /// start of each function body.
    pub(crate) scope: ScopeRef,
    pub(crate) global_inits: Vec<(String, String, Option<Expr>)>,
    /// The enclosing function's declared return type, set for the duration
    /// of `emit_func`; `return` coerces its value to this type (spec.md §8
    /// scenario: a `char` local returned from an `int`-returning function
    /// must sign-extend before `ret`).
    pub(crate) ret_ty: String,
    /// Used only to resolve a `Pos` to a line number for the `if`/`for`
    /// label infix (spec.md §4.5); never rendered into diagnostics, so the
    /// filename passed in is irrelevant.
    lines: SourceFile,
}

impl Emitter {
    pub(crate) fn new(pkg: &str, source: &str) -> Self {
        let root = universe();
        Emitter {
            pkg: pkg.to_string(),
            buf: String::new(),
            names: NameGen::new(),
            scope: root.clone(),
            root,
            global_inits: Vec::new(),
            ret_ty: "void".to_string(),
            lines: SourceFile::new("", source),
        }
    }

    /// Source line (1-based) a statement's position falls on, for the
    /// `if.cond.line{L}`/`for.init.line{L}` label disambiguators.
    pub(crate) fn line_of(&self, pos: Pos) -> u32 {
        self.lines.resolve(pos).line
    }

    pub(crate) fn emit_line(&mut self, line: impl AsRef<str>) {
        self.buf.push_str(line.as_ref());
        self.buf.push('\n');
    }

    pub(crate) fn push_scope(&mut self) {
        self.scope = Scope::new_enclosed(&self.scope);
    }

    pub(crate) fn pop_scope(&mut self) {
        // The outer link is the only way back up; dropping this Rc leaves
        // the parent scope (held by every sibling clone) untouched.
        if let Some(outer) = self.scope.borrow().outer() {
            self.scope = outer;
        }
    }
}

/// Compiles a parsed file to its textual LLIR, spec.md §6's sole pipeline
/// contribution from this crate. `source` is the exact text that was
/// lexed/parsed into `file`; the emitter never re-reads it for anything but
/// line-number resolution.
pub fn emit(file: &File, source: &str) -> Result<String, EmitError> {
    log::debug!("emitting package {:?}", file.pkg.name);
    let mut e = Emitter::new(&file.pkg.name, source);
    e.register_decls(file)?;
    e.emit_header(file);
    e.emit_global_decls();
    e.emit_forward_decls(file);
    e.emit_init_func()?;
    for func in &file.funcs {
        if let Some(body) = &func.body {
            e.emit_func(func, body)?;
        }
    }
    e.emit_main_trampoline(file);
    Ok(e.buf.clone())
}

impl Emitter {
    /// First pass: registers every global and function name into the
    /// package scope before any body is emitted, so forward references
    /// (a function calling one declared later in the file) resolve.
    fn register_decls(&mut self, file: &File) -> Result<(), EmitError> {
        for g in &file.globals {
            self.register_global(g)?;
        }
        for f in &file.funcs {
            self.register_func(f);
        }
        Ok(())
    }

    fn register_global(&mut self, g: &VarSpec) -> Result<(), EmitError> {
        let mangled = mangle_global(&self.pkg, &g.name.name);
        let ty = g.ty.as_ref().map(|t| t.name.clone()).unwrap_or_else(|| "i32".to_string());
        self.scope.borrow_mut().insert(Object::new(g.name.name.clone(), mangled.clone(), Some(ty.clone()), g.var_pos));
        self.global_inits.push((mangled, ty, g.value.clone()));
        Ok(())
    }

    fn register_func(&mut self, f: &FuncDecl) {
        let mangled = mangle_global(&self.pkg, &f.name);
        let ty = f.ty.result.as_ref().map(|r| r.name.clone());
        self.scope.borrow_mut().insert(Object::new(f.name.clone(), mangled, ty, f.name_pos));
    }

    fn emit_header(&mut self, file: &File) {
        self.emit_line(format!("; package {}", file.pkg.name));
        self.emit_line("declare void @println(i32)");
        self.emit_line("declare void @exit(i32)");
        for imp in &file.imports {
            let alias = imp.name.as_ref().map(|n| n.name.as_str()).unwrap_or("_");
            self.emit_line(format!("; import {} \"{}\"", alias, imp.path));
        }
        self.emit_line("");
    }

    fn emit_global_decls(&mut self) {
        for (mangled, ty, _) in self.global_inits.clone() {
            self.emit_line(format!("{mangled} = global {ty} {}", crate::types::zero_literal(&ty)));
        }
        if !self.global_inits.is_empty() {
            self.emit_line("");
        }
    }

    fn emit_forward_decls(&mut self, file: &File) {
        for f in &file.funcs {
            if f.body.is_none() {
                let mangled = mangle_global(&self.pkg, &f.name);
                let ret = f.ty.result.as_ref().map(|r| r.name.as_str()).unwrap_or("void");
                let params: Vec<String> =
                    f.ty.params.list.iter().map(|p| p.ty.name.clone()).collect();
                self.emit_line(format!("declare {ret} {mangled}({})", params.join(", ")));
            }
        }
    }

    /// `@<pkg>_init` stores every global's initializer, spec.md §4.5 file
    /// emission order.
    fn emit_init_func(&mut self) -> Result<(), EmitError> {
        let inits = self.global_inits.clone();
        self.emit_line(format!("define void @milc_{}_init() {{", self.pkg));
        for (mangled, ty, value) in inits {
            if let Some(expr) = value {
                let (reg, vty) = self.emit_expr(&expr)?;
                let reg = self.coerce(&reg, &vty, &ty, Pos::NONE)?;
                self.emit_line(format!("  store {ty} {reg}, {ty}* {mangled}"));
            }
        }
        self.emit_line("  ret void");
        self.emit_line("}");
        self.emit_line("");
        Ok(())
    }

    fn emit_main_trampoline(&mut self, file: &File) {
        if file.pkg.name != "main" || !file.funcs.iter().any(|f| f.name == "main" && f.body.is_some()) {
            return;
        }
        self.emit_line("define i32 @main() {");
        self.emit_line(format!("  call void @milc_{}_init()", self.pkg));
        self.emit_line(format!("  %ret = call i32 @milc_{}_main()", self.pkg));
        self.emit_line("  ret i32 %ret");
        self.emit_line("}");
    }
}
