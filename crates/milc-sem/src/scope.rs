use crate::object::Object;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// A lexical scope: a layer of name bindings plus a link to its enclosing
/// scope. Ported from `original_source/compiler/scope.go`'s `Scope`.
///
/// Bindings use an `IndexMap` rather than a plain hash map so that a
/// scope's global variables iterate in declaration order — `milc-lir`
/// relies on this for deterministic `@<pkg>_init` emission order.
pub struct Scope {
    outer: Option<ScopeRef>,
    objects: IndexMap<String, Object>,
}

pub type ScopeRef = Rc<RefCell<Scope>>;

impl Scope {
    pub fn new_global() -> ScopeRef {
        Rc::new(RefCell::new(Scope { outer: None, objects: IndexMap::new() }))
    }

    pub fn new_enclosed(outer: &ScopeRef) -> ScopeRef {
        Rc::new(RefCell::new(Scope { outer: Some(Rc::clone(outer)), objects: IndexMap::new() }))
    }

    /// True if `name` is bound directly in this scope (not an outer one).
    pub fn has_name(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    /// Inserts `object` under its own name. First binding wins: if the name
    /// is already bound in this scope, the existing object is kept and
    /// `false` is returned (matching the original's `Insert`, which never
    /// overwrites).
    pub fn insert(&mut self, object: Object) -> bool {
        if self.objects.contains_key(&object.name) {
            return false;
        }
        self.objects.insert(object.name.clone(), object);
        true
    }

    /// Walks outward from this scope looking for `name`.
    pub fn lookup(this: &ScopeRef, name: &str) -> Option<Object> {
        let inner = this.borrow();
        if let Some(obj) = inner.objects.get(name) {
            return Some(obj.clone());
        }
        match &inner.outer {
            Some(outer) => Scope::lookup(outer, name),
            None => None,
        }
    }

    /// Global variables bound directly in this scope, in declaration order.
    pub fn globals(&self) -> impl Iterator<Item = &Object> {
        self.objects.values()
    }

    /// The enclosing scope, if any.
    pub fn outer(&self) -> Option<ScopeRef> {
        self.outer.clone()
    }
}

/// Stashes the continuation/exit labels of the innermost enclosing `for`
/// loop under the sentinel name `"for"`, with both labels packed
/// space-separated into `Object::mangled` — the same encoding
/// `original_source/compiler/compiler.go` uses for `break`/`continue`
/// target resolution.
pub fn push_for_labels(scope: &ScopeRef, continue_label: &str, exit_label: &str) {
    scope.borrow_mut().insert(Object::new(
        "for",
        format!("{continue_label} {exit_label}"),
        None,
        milc_util::Pos::NONE,
    ));
}

/// Looks up the nearest enclosing `for` loop's `(continue, exit)` labels.
pub fn lookup_for_labels(scope: &ScopeRef) -> Option<(String, String)> {
    let obj = Scope::lookup(scope, "for")?;
    let mut parts = obj.mangled.splitn(2, ' ');
    let cont = parts.next()?.to_string();
    let exit = parts.next()?.to_string();
    Some((cont, exit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use milc_util::Pos;

    #[test]
    fn lookup_walks_outward() {
        let global = Scope::new_global();
        global.borrow_mut().insert(Object::new("x", "x.1", Some("i32".into()), Pos::new(1)));
        let inner = Scope::new_enclosed(&global);
        assert!(Scope::lookup(&inner, "x").is_some());
        assert!(Scope::lookup(&inner, "y").is_none());
    }

    #[test]
    fn first_binding_wins() {
        let global = Scope::new_global();
        assert!(global.borrow_mut().insert(Object::new("x", "x.1", None, Pos::new(1))));
        assert!(!global.borrow_mut().insert(Object::new("x", "x.2", None, Pos::new(5))));
        assert_eq!(Scope::lookup(&global, "x").unwrap().mangled, "x.1");
    }

    #[test]
    fn for_labels_round_trip() {
        let global = Scope::new_global();
        let body = Scope::new_enclosed(&global);
        push_for_labels(&body, "for.0.cont", "for.0.exit");
        let (cont, exit) = lookup_for_labels(&body).unwrap();
        assert_eq!(cont, "for.0.cont");
        assert_eq!(exit, "for.0.exit");
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let global = Scope::new_global();
        global.borrow_mut().insert(Object::new("x", "x.outer", None, Pos::NONE));
        let inner = Scope::new_enclosed(&global);
        inner.borrow_mut().insert(Object::new("x", "x.inner", None, Pos::NONE));
        assert_eq!(Scope::lookup(&inner, "x").unwrap().mangled, "x.inner");
        assert_eq!(Scope::lookup(&global, "x").unwrap().mangled, "x.outer");
    }
}
