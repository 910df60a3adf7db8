use milc_sem::ScopeError;
use milc_util::Pos;
use thiserror::Error;

/// Semantic-at-emission and internal error taxonomy, spec.md §7 tiers 3-4.
/// Raised while milc-lir walks the AST; there is no separate check pass.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EmitError {
    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error("'{0}' is not supported by the emitter")]
    Unsupported(&'static str, Pos),

    #[error("'{construct}' is only valid inside a loop")]
    BranchOutsideLoop { construct: &'static str, pos: Pos },

    #[error("condition expression has no boolean form")]
    UnsupportedCondition(Pos),

    #[error("'%' is not defined for float operands")]
    FloatModulo(Pos),

    #[error("call to '{name}' has no matching declaration")]
    UnknownCallee { name: String, pos: Pos },

    #[error("assignment has {targets} target(s) but {values} value(s)")]
    ArityMismatch { targets: usize, values: usize, pos: Pos },
}

impl EmitError {
    pub fn pos(&self) -> Pos {
        match self {
            EmitError::Scope(e) => e.pos(),
            EmitError::Unsupported(_, pos) => *pos,
            EmitError::BranchOutsideLoop { pos, .. } => *pos,
            EmitError::UnsupportedCondition(pos) => *pos,
            EmitError::FloatModulo(pos) => *pos,
            EmitError::UnknownCallee { pos, .. } => *pos,
            EmitError::ArityMismatch { pos, .. } => *pos,
        }
    }
}
