//! Node store collaborator
//!
//! The resolver layer only needs five primitives from a store: query
//! execution, identifier lookups (single and batched), a scan by type, and
//! an ancestor walk. `MemoryNodeStore` is a complete in-process
//! implementation used by the command line front end and the tests.

mod errors;
mod filters;
mod memory;
mod sorter;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::node::Node;
use crate::query::QueryDescriptor;

pub use errors::{StoreError, StoreResult};
pub use filters::{FilterOperator, NodeFilter};
pub use memory::MemoryNodeStore;
pub use sorter::ResultSorter;

/// Future returned by every store primitive
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Predicate applied during an ancestor walk
pub type NodePredicate<'a> = &'a (dyn Fn(&Node) -> bool + Send + Sync);

/// Result of `run_query`, shaped by `first_only`
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    /// `first_only = false`: ordered, possibly empty
    Many(Vec<Arc<Node>>),
    /// `first_only = true`
    One(Option<Arc<Node>>),
}

impl QueryOutput {
    /// All nodes, whatever the shape
    pub fn into_nodes(self) -> Vec<Arc<Node>> {
        match self {
            QueryOutput::Many(nodes) => nodes,
            QueryOutput::One(node) => node.into_iter().collect(),
        }
    }

    /// The first node, whatever the shape
    pub fn into_first(self) -> Option<Arc<Node>> {
        match self {
            QueryOutput::Many(nodes) => nodes.into_iter().next(),
            QueryOutput::One(node) => node,
        }
    }
}

/// Store primitives consumed by the resolver layer
pub trait NodeStore: Send + Sync {
    /// Executes a query descriptor
    fn run_query<'a>(&'a self, query: &'a QueryDescriptor) -> StoreFuture<'a, QueryOutput>;

    /// Looks up one node by identifier
    fn get_node_by_id<'a>(&'a self, id: &'a str, node_type: &'a str) -> StoreFuture<'a, Option<Arc<Node>>>;

    /// Looks up nodes by identifier, preserving order, `None` for misses
    fn get_nodes_by_ids<'a>(
        &'a self,
        ids: &'a [String],
        node_type: &'a str,
    ) -> StoreFuture<'a, Vec<Option<Arc<Node>>>>;

    /// Every node of a type
    fn get_all_nodes<'a>(&'a self, node_type: &'a str) -> StoreFuture<'a, Vec<Arc<Node>>>;

    /// Walks from `node` up its `parent` chain.
    ///
    /// With a predicate: the nearest node (self included) satisfying it, or
    /// `None`. Without: the root of the chain.
    fn find_root_node_ancestor<'a>(
        &'a self,
        node: &'a Node,
        predicate: Option<NodePredicate<'a>>,
    ) -> StoreFuture<'a, Option<Arc<Node>>>;
}
