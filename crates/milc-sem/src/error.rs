use milc_util::Pos;
use thiserror::Error;

/// Semantic-at-emission error taxonomy, spec.md §7 tier 3: these surface
/// while milc-lir walks the AST and consults the scope graph, rather than
/// during a separate analysis pass (the teacher's `hir`/`infer`/`analysis`
/// stages have no counterpart here; see DESIGN.md).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScopeError {
    #[error("undefined name: {name}")]
    Undefined { name: String, pos: Pos },

    #[error("name already declared in this scope: {name}")]
    Redeclared { name: String, pos: Pos },
}

impl ScopeError {
    pub fn pos(&self) -> Pos {
        match self {
            ScopeError::Undefined { pos, .. } | ScopeError::Redeclared { pos, .. } => *pos,
        }
    }
}
