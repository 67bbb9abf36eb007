//! Jack symbol table (§4.7, §3)
//!
//! Two stacked scopes, mirroring `SymbolTable.py`'s `class_scope`/
//! `sub_scope` dicts and `index_count` counters, but as a struct of
//! `HashMap` fields with an explicit [`Kind`] enum in place of Python's
//! bare kind strings.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Static,
    Field,
    Argument,
    Var,
}

impl Kind {
    /// Kind → VM segment mapping (§3).
    #[must_use]
    pub fn segment(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Field => "this",
            Self::Argument => "argument",
            Self::Var => "local",
        }
    }

    fn is_class_scoped(self) -> bool {
        matches!(self, Self::Static | Self::Field)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    type_name: String,
    kind: Kind,
    index: u16,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    class_scope: HashMap<String, Entry>,
    sub_scope: HashMap<String, Entry>,
    static_count: u16,
    field_count: u16,
    argument_count: u16,
    var_count: u16,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the subroutine scope and resets argument/var counters,
    /// called at the start of compiling each subroutine (§4.7).
    pub fn start_subroutine(&mut self) {
        self.sub_scope.clear();
        self.argument_count = 0;
        self.var_count = 0;
    }

    fn counter_mut(&mut self, kind: Kind) -> &mut u16 {
        match kind {
            Kind::Static => &mut self.static_count,
            Kind::Field => &mut self.field_count,
            Kind::Argument => &mut self.argument_count,
            Kind::Var => &mut self.var_count,
        }
    }

    /// Inserts `name` in the scope its kind belongs to, at the next
    /// index for that kind, and increments the counter.
    pub fn define(&mut self, name: &str, type_name: &str, kind: Kind) {
        let index = *self.counter_mut(kind);
        let entry = Entry {
            type_name: type_name.to_string(),
            kind,
            index,
        };
        if kind.is_class_scoped() {
            self.class_scope.insert(name.to_string(), entry);
        } else {
            self.sub_scope.insert(name.to_string(), entry);
        }
        *self.counter_mut(kind) += 1;
    }

    #[must_use]
    pub fn var_count(&self, kind: Kind) -> u16 {
        match kind {
            Kind::Static => self.static_count,
            Kind::Field => self.field_count,
            Kind::Argument => self.argument_count,
            Kind::Var => self.var_count,
        }
    }

    fn lookup(&self, name: &str) -> Option<&Entry> {
        // subroutine scope shadows class scope (§3 invariant, §8 property 5)
        self.sub_scope.get(name).or_else(|| self.class_scope.get(name))
    }

    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<Kind> {
        self.lookup(name).map(|e| e.kind)
    }

    #[must_use]
    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(|e| e.type_name.as_str())
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.lookup(name).map(|e| e.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_increment_independently_per_kind() {
        let mut st = SymbolTable::new();
        st.define("a", "int", Kind::Field);
        st.define("b", "int", Kind::Field);
        st.define("c", "int", Kind::Static);
        assert_eq!(st.var_count(Kind::Field), 2);
        assert_eq!(st.var_count(Kind::Static), 1);
        assert_eq!(st.index_of("b"), Some(1));
    }

    #[test]
    fn subroutine_scope_shadows_class_scope() {
        let mut st = SymbolTable::new();
        st.define("x", "int", Kind::Field);
        st.define("x", "boolean", Kind::Var);
        assert_eq!(st.kind_of("x"), Some(Kind::Var));
        assert_eq!(st.type_of("x"), Some("boolean"));
    }

    #[test]
    fn start_subroutine_clears_sub_scope_and_resets_counters() {
        let mut st = SymbolTable::new();
        st.define("field_one", "int", Kind::Field);
        st.define("arg_one", "int", Kind::Argument);
        st.define("local_one", "int", Kind::Var);
        st.start_subroutine();
        assert_eq!(st.kind_of("arg_one"), None);
        assert_eq!(st.kind_of("local_one"), None);
        assert_eq!(st.var_count(Kind::Argument), 0);
        assert_eq!(st.var_count(Kind::Var), 0);
        // class scope survives
        assert_eq!(st.kind_of("field_one"), Some(Kind::Field));
    }

    #[test]
    fn undefined_name_resolves_to_absence() {
        let st = SymbolTable::new();
        assert_eq!(st.kind_of("nope"), None);
    }
}
