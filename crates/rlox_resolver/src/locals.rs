//! Where resolved hop counts go.

use indexmap::IndexMap;
use rlox_ast::types::NodeId;
use rustc_hash::FxBuildHasher;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Receives one hop count per reference site that resolved to a local.
///
/// The interpreter owns the implementation and later uses the hop count to
/// walk exactly that many environments outward. A site that is never
/// recorded is a global.
pub trait BindingRegistry {
    fn record_resolution(&mut self, site: NodeId, hops: usize);
}

impl<S: BuildHasher> BindingRegistry for HashMap<NodeId, usize, S> {
    fn record_resolution(&mut self, site: NodeId, hops: usize) {
        self.insert(site, hops);
    }
}

/// The stock registry: reference site to hop count, in resolution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locals {
    table: IndexMap<NodeId, usize, FxBuildHasher>,
}

impl Locals {
    pub fn new() -> Self {
        Self::default()
    }

    /// The hop count for `site`, or `None` if it is a global.
    pub fn depth_of(&self, site: NodeId) -> Option<usize> {
        self.table.get(&site).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Entries in the order the resolver recorded them.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, usize)> + '_ {
        self.table.iter().map(|(site, hops)| (*site, *hops))
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }
}

/// A site recorded twice keeps its first position and its latest hop count.
/// That happens when one node is placed in the tree more than once.
impl BindingRegistry for Locals {
    fn record_resolution(&mut self, site: NodeId, hops: usize) {
        self.table.insert(site, hops);
    }
}
