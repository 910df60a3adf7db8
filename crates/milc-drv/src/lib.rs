//! milc-drv - driver glue orchestrating lex -> parse -> emit (spec.md §2
//! item 8). This is *not* the out-of-scope external driver that shells out
//! to an assembler/linker; it never spawns a process and never touches
//! disk. [`compile_file`] is the sole entry point exercising the full
//! pipeline; callers that only need an earlier phase can call
//! `milc_lex::lex`/`milc_par::parse`/`milc_lir::emit` directly.

use milc_lir::EmitError;
use milc_par::ParseError;
use milc_util::{Pos, SourceFile};
use thiserror::Error;

/// Aggregates every phase's error taxonomy tier (spec.md §7) behind one
/// type, so a caller handling a single file needs only one `Result`.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] milc_lex::LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Emit(#[from] EmitError),
}

impl CompileError {
    pub fn pos(&self) -> Pos {
        match self {
            CompileError::Lex(e) => e.pos(),
            CompileError::Parse(e) => e.pos(),
            CompileError::Emit(e) => e.pos(),
        }
    }

    /// Renders `file:line:column: message`, spec.md §7's diagnostic format.
    pub fn render(&self, file: &SourceFile) -> String {
        format!("{}: {}", file.resolve(self.pos()), self)
    }
}

/// Runs the full lex -> parse -> emit pipeline over one in-memory source
/// file and returns its LLIR text. `name` is only used for diagnostics; no
/// file I/O happens here (spec.md §1 Non-goals).
///
/// Single-pass, single-threaded, no shared state across calls: every
/// invocation constructs a fresh lexer, parser, scope stack and fresh-name
/// counter (spec.md §5).
pub fn compile_file(name: &str, source: &str) -> Result<String, CompileError> {
    log::debug!("compiling {name} ({} bytes)", source.len());

    let (tokens, _comments, lex_err) = milc_lex::lex(source);
    if let Some(err) = lex_err {
        log::warn!("{name}: lex error at {}", err.pos());
        return Err(CompileError::Lex(err));
    }

    let file = milc_par::parse(&tokens)?;
    let ir = milc_lir::emit(&file, source)?;
    Ok(ir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_minimal_package() {
        let ir = compile_file("main.mi", "package main\n").unwrap();
        assert!(ir.contains("; package main"));
    }

    #[test]
    fn surfaces_lex_error() {
        let err = compile_file("main.mi", "package main\nvar x = \"unterminated\n").unwrap_err();
        assert!(matches!(err, CompileError::Lex(_)));
    }

    #[test]
    fn surfaces_parse_error() {
        let err = compile_file("main.mi", "package\n").unwrap_err();
        assert!(matches!(err, CompileError::Parse(_)));
    }

    #[test]
    fn surfaces_emit_error() {
        let src = "package main\nfunc f() i32 {\n return y\n}\n";
        let err = compile_file("main.mi", src).unwrap_err();
        assert!(matches!(err, CompileError::Emit(_)));
    }

    #[test]
    fn render_includes_filename_and_line() {
        let err = compile_file("main.mi", "package\n").unwrap_err();
        let file = SourceFile::new("main.mi", "package\n");
        let rendered = err.render(&file);
        assert!(rendered.starts_with("main.mi:"));
    }
}
