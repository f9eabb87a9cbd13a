//! rlox_resolver: Static name resolution for the Lox tree-walking interpreter.
//!
//! The resolver walks a parsed program once, before anything runs, and
//! works out for every local variable reference how many scopes out its
//! declaration lives. Those hop counts go to a [`BindingRegistry`] owned by
//! the interpreter. Along the way it reports the static errors that are
//! visible from lexical structure alone: reading a variable in its own
//! initializer, misplaced `return`, `this`/`super` outside a class, and a
//! class inheriting from itself.
//!
//! Names at the top level are never tracked. A reference with no recorded
//! hop count is a global and is looked up dynamically at run time.

mod context;
mod locals;
mod resolver;
mod scope;

pub use context::{ClassKind, Context, FunctionKind};
pub use locals::{BindingRegistry, Locals};
pub use resolver::{resolve_program, Resolver};
pub use scope::{Access, Binding, BindingKind, BindingState, Scope, ScopeStack};
