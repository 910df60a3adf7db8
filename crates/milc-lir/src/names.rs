use milc_util::Pos;

/// One monotonic counter shared by virtual registers (`%t{n}`) and label
/// disambiguators (`name.{n}`), matching `original_source/compiler/compiler.go`'s
/// single fresh-name counter per compilation.
#[derive(Default)]
pub struct NameGen {
    next: u32,
}

impl NameGen {
    pub fn new() -> Self {
        NameGen { next: 0 }
    }

    pub fn fresh_reg(&mut self) -> String {
        let n = self.next;
        self.next += 1;
        format!("%t{n}")
    }

    pub fn fresh_label(&mut self, prefix: &str) -> String {
        let n = self.next;
        self.next += 1;
        format!("{prefix}.{n}")
    }

    /// Label disambiguated by the statement's source line, matching
    /// `original_source/compiler/compiler.go`'s `if.init.line{L}`/
    /// `for.cond.line{L}` naming for `if`/`for` control-flow labels.
    pub fn fresh_label_at_line(&mut self, prefix: &str, line: u32) -> String {
        let n = self.next;
        self.next += 1;
        format!("{prefix}.line{line}.{n}")
    }
}

/// `@milc_<pkg>_<name>` package-qualified mangling, spec.md §8.
pub fn mangle_global(pkg: &str, name: &str) -> String {
    format!("@milc_{pkg}_{name}")
}

/// `%local_<name>.pos.<pos>` local mangling, disambiguated by the
/// identifier's own declaration byte offset so that two same-named locals
/// in sibling blocks never collide.
pub fn mangle_local(name: &str, pos: Pos) -> String {
    format!("%local_{name}.pos.{}", pos.0)
}
