//! What kind of function and class body the walk is inside.

/// Validates `return`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    None,
    Function,
    Method,
    Initializer,
}

/// Validates `this` and `super`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    None,
    Class,
    Subclass,
}

/// Passed by value down the recursion. Entering a function or class makes
/// a new context for that subtree; the caller's copy is untouched, so the
/// enclosing context is back in effect as soon as the call returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub function: FunctionKind,
    pub class: ClassKind,
}

impl Context {
    pub const TOP_LEVEL: Context = Context {
        function: FunctionKind::None,
        class: ClassKind::None,
    };

    pub fn in_function(self, function: FunctionKind) -> Self {
        Self { function, ..self }
    }

    pub fn in_class(self, class: ClassKind) -> Self {
        Self { class, ..self }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::TOP_LEVEL
    }
}
