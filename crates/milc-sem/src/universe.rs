use crate::object::Object;
use crate::scope::{Scope, ScopeRef};
use milc_util::Pos;

/// Builds the universe scope: the outermost scope, pre-populated with the
/// builtins every package sees without importing anything. Ported from
/// `original_source/compiler/universe.go`.
pub fn universe() -> ScopeRef {
    let scope = Scope::new_global();
    {
        let mut s = scope.borrow_mut();
        s.insert(Object::new("println", "@println", None, Pos::NONE));
        s.insert(Object::new("exit", "@exit", None, Pos::NONE));
    }
    scope
}
