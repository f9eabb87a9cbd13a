//! The lexical scope stack.

use rlox_core::intern::InternedString;
use rlox_core::text::TextRange;
use rustc_hash::FxHashMap;

/// Whether a binding may be read yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// Declared, initializer still being resolved.
    Declared,
    /// Fully defined and safe to read.
    Defined,
}

/// What introduced a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Variable,
    Parameter,
    Function,
    Class,
    /// `this` and `super`, bound by the class itself.
    Implicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub state: BindingState,
    pub kind: BindingKind,
    /// Where the name was declared.
    pub range: TextRange,
    /// Set once a read resolves to this binding.
    pub read: bool,
}

impl Binding {
    pub fn is_defined(&self) -> bool {
        self.state == BindingState::Defined
    }
}

/// One lexical region: a block, a function's parameters and body, or one
/// of the scopes a class introduces for `super` and `this`.
#[derive(Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<InternedString, Binding>,
    /// Bindings replaced by a later declaration of the same name.
    displaced: Vec<(InternedString, Binding)>,
}

impl Scope {
    pub fn get(&self, name: InternedString) -> Option<&Binding> {
        self.bindings.get(&name)
    }

    pub fn contains(&self, name: InternedString) -> bool {
        self.bindings.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (InternedString, &Binding)> {
        self.bindings.iter().map(|(name, binding)| (*name, binding))
    }

    /// Earlier bindings that a redeclaration in this scope replaced, in the
    /// order they were replaced.
    pub fn displaced(&self) -> impl Iterator<Item = (InternedString, &Binding)> {
        self.displaced.iter().map(|(name, binding)| (*name, binding))
    }
}

/// How a reference uses the name it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Innermost scope last. The global scope is never on the stack.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// True at the top level, where names are left to dynamic lookup.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn begin_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Pop the innermost scope and hand it back.
    ///
    /// # Panics
    /// If no scope is open. Pushes and pops are paired by construction, so
    /// this only fires on a bug in the resolver itself.
    pub fn end_scope(&mut self) -> Scope {
        match self.scopes.pop() {
            Some(scope) => scope,
            None => panic!("end_scope called with no open scope"),
        }
    }

    /// Reserve `name` in the innermost scope as not yet readable.
    ///
    /// An earlier entry for the same name in that scope stops being visible
    /// to lookups. It is returned, and also kept on the scope's
    /// [`displaced`](Scope::displaced) list.
    pub fn declare(&mut self, name: InternedString, kind: BindingKind, range: TextRange) -> Option<Binding> {
        let scope = self.scopes.last_mut()?;
        let previous = scope.bindings.insert(
            name,
            Binding {
                state: BindingState::Declared,
                kind,
                range,
                read: false,
            },
        );
        if let Some(binding) = previous {
            scope.displaced.push((name, binding));
        }
        previous
    }

    /// Mark `name` in the innermost scope as readable.
    pub fn define(&mut self, name: InternedString) {
        if let Some(scope) = self.scopes.last_mut() {
            match scope.bindings.get_mut(&name) {
                Some(binding) => binding.state = BindingState::Defined,
                None => debug_assert!(false, "define without a matching declare"),
            }
        }
    }

    /// Bind an already-defined name in the innermost scope. Used for
    /// `this` and `super`, which have exactly one binder each.
    pub fn bind_implicit(&mut self, name: InternedString, range: TextRange) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.insert(
                name,
                Binding {
                    state: BindingState::Defined,
                    kind: BindingKind::Implicit,
                    range,
                    read: false,
                },
            );
        }
    }

    /// True if the innermost scope has declared `name` but not defined it.
    pub fn is_declared_but_undefined(&self, name: InternedString) -> bool {
        self.scopes
            .last()
            .and_then(|scope| scope.get(name))
            .is_some_and(|binding| !binding.is_defined())
    }

    /// Find `name`, innermost scope first, and return how many scopes out
    /// it was found. `None` means it is not a local.
    pub fn resolve(&mut self, name: InternedString, access: Access) -> Option<usize> {
        let innermost = self.scopes.len().checked_sub(1)?;
        for (index, scope) in self.scopes.iter_mut().enumerate().rev() {
            if let Some(binding) = scope.bindings.get_mut(&name) {
                if access == Access::Read {
                    binding.read = true;
                }
                return Some(innermost - index);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rlox_core::intern::StringInterner;

    fn range(pos: u32) -> TextRange {
        TextRange::new(pos, pos + 1)
    }

    #[test]
    fn test_top_level_is_not_tracked() {
        let interner = StringInterner::new();
        let a = interner.intern("a");
        let mut stack = ScopeStack::new();

        stack.declare(a, BindingKind::Variable, range(0));
        stack.define(a);
        assert!(stack.is_empty());
        assert_eq!(stack.resolve(a, Access::Read), None);
    }

    #[test]
    fn test_declare_then_define() {
        let interner = StringInterner::new();
        let a = interner.intern("a");
        let mut stack = ScopeStack::new();
        stack.begin_scope();

        stack.declare(a, BindingKind::Variable, range(0));
        assert!(stack.is_declared_but_undefined(a));
        stack.define(a);
        assert!(!stack.is_declared_but_undefined(a));
    }

    #[test]
    fn test_redeclare_resets_to_declared() {
        let interner = StringInterner::new();
        let a = interner.intern("a");
        let mut stack = ScopeStack::new();
        stack.begin_scope();

        stack.declare(a, BindingKind::Variable, range(0));
        stack.define(a);
        stack.declare(a, BindingKind::Variable, range(5));
        assert!(stack.is_declared_but_undefined(a));

        let scope = stack.end_scope();
        assert_eq!(scope.len(), 1);
        assert_eq!(scope.get(a).map(|b| b.range), Some(range(5)));
    }

    #[test]
    fn test_redeclare_keeps_displaced_binding() {
        let interner = StringInterner::new();
        let a = interner.intern("a");
        let mut stack = ScopeStack::new();
        stack.begin_scope();

        assert_eq!(stack.declare(a, BindingKind::Variable, range(0)), None);
        stack.define(a);
        let previous = stack.declare(a, BindingKind::Variable, range(5));
        assert_eq!(previous.map(|b| (b.range, b.state)), Some((range(0), BindingState::Defined)));
        stack.define(a);
        stack.resolve(a, Access::Read);

        let scope = stack.end_scope();
        let displaced: Vec<_> = scope.displaced().map(|(name, b)| (name, b.range, b.read)).collect();
        assert_eq!(displaced, vec![(a, range(0), false)]);
        assert_eq!(scope.get(a).map(|b| b.read), Some(true));
    }

    #[test]
    fn test_resolve_innermost_first() {
        let interner = StringInterner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        let mut stack = ScopeStack::new();

        stack.begin_scope();
        stack.declare(a, BindingKind::Variable, range(0));
        stack.define(a);
        stack.declare(b, BindingKind::Variable, range(2));
        stack.define(b);
        stack.begin_scope();
        stack.begin_scope();
        stack.declare(a, BindingKind::Variable, range(4));
        stack.define(a);

        assert_eq!(stack.resolve(a, Access::Read), Some(0));
        assert_eq!(stack.resolve(b, Access::Read), Some(2));
        assert_eq!(stack.resolve(interner.intern("c"), Access::Read), None);
    }

    #[test]
    fn test_only_reads_mark_binding_read() {
        let interner = StringInterner::new();
        let a = interner.intern("a");
        let mut stack = ScopeStack::new();
        stack.begin_scope();
        stack.declare(a, BindingKind::Variable, range(0));
        stack.define(a);

        stack.resolve(a, Access::Write);
        assert!(!stack.scopes[0].get(a).unwrap().read);
        stack.resolve(a, Access::Read);
        assert!(stack.scopes[0].get(a).unwrap().read);
    }

    #[test]
    fn test_bind_implicit_is_defined() {
        let interner = StringInterner::new();
        let this = interner.intern("this");
        let mut stack = ScopeStack::new();
        stack.begin_scope();
        stack.bind_implicit(this, range(0));

        assert!(!stack.is_declared_but_undefined(this));
        let scope = stack.end_scope();
        assert_eq!(scope.get(this).map(|b| b.kind), Some(BindingKind::Implicit));
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    #[should_panic(expected = "no open scope")]
    fn test_unbalanced_end_scope_panics() {
        let mut stack = ScopeStack::new();
        stack.end_scope();
    }
}
