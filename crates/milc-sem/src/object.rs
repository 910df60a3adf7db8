use milc_util::Pos;

/// A single named binding: a variable, parameter, or function.
///
/// Ported from `original_source/compiler/scope.go`'s `Object`. The `for`
/// sentinel object (see [`crate::scope::Scope::for_labels`]) reuses this
/// same struct, stashing its two loop labels space-separated in `mangled`
/// rather than in `name` or a dedicated field, matching the original.
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub mangled: String,
    pub ty: Option<String>,
    pub pos: Pos,
}

impl Object {
    pub fn new(name: impl Into<String>, mangled: impl Into<String>, ty: Option<String>, pos: Pos) -> Self {
        Object { name: name.into(), mangled: mangled.into(), ty, pos }
    }
}
