//! Arena allocation for syntax trees.
//!
//! A whole program's AST lives in one bump arena and is dropped at once.
//! Nodes borrow from the arena with lifetime `'a`, so child links are plain
//! references and node lists are plain slices.

use bumpalo::Bump;

/// Owns the bump allocator that AST nodes are placed in.
///
/// Values allocated here never have their destructors run, so nodes must
/// not own heap data. Strings go through [`AstArena::alloc_str`].
#[derive(Default)]
pub struct AstArena {
    bump: Bump,
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bump: Bump::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn bump(&self) -> &Bump {
        &self.bump
    }

    #[inline]
    pub fn alloc<T>(&self, val: T) -> &T {
        self.bump.alloc(val)
    }

    #[inline]
    pub fn alloc_str(&self, s: &str) -> &str {
        self.bump.alloc_str(s)
    }

    /// Move the items of `iter` into a contiguous arena slice.
    #[inline]
    pub fn alloc_slice<T, I>(&self, iter: I) -> &[T]
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        self.bump.alloc_slice_fill_iter(iter)
    }

    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_slice_keeps_order() {
        let arena = AstArena::new();
        let slice = arena.alloc_slice(vec![3, 1, 2]);
        assert_eq!(slice, &[3, 1, 2]);
        assert!(arena.allocated_bytes() > 0);
    }

    #[test]
    fn test_alloc_str() {
        let arena = AstArena::with_capacity(64);
        let s = arena.alloc_str("fib");
        assert_eq!(s, "fib");
    }
}
