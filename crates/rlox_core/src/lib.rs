//! rlox_core: Core utilities shared by the rlox front end.
//!
//! Provides source positions, identifier interning and the arena that
//! AST nodes are allocated from.

pub mod arena;
pub mod intern;
pub mod text;

// Re-export commonly used types
pub use arena::AstArena;
pub use intern::{InternedString, StringInterner};
pub use text::{LineAndColumn, LineMap, TextRange, TextSpan};
