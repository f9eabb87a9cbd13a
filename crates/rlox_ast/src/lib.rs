//! rlox_ast: Abstract Syntax Tree definitions for Lox.
//!
//! Nodes are arena-allocated and borrow their children with lifetime `'a`.
//! Every node carries a [`NodeId`] that later passes use as its identity.

pub mod node;
pub mod types;

// Re-export key types
pub use node::*;
pub use types::*;
