//! In-memory node store
//!
//! Nodes are kept in insertion order, which is also the result order of
//! unsorted queries. Every primitive call is counted so callers can check
//! whether a resolution reached the store at all.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::filters::NodeFilter;
use super::sorter::ResultSorter;
use super::{NodePredicate, NodeStore, QueryOutput, StoreFuture};
use crate::node::Node;
use crate::query::QueryDescriptor;

/// A `NodeStore` over an in-process node table
#[derive(Debug, Default)]
pub struct MemoryNodeStore {
    nodes: Vec<Arc<Node>>,
    by_id: HashMap<String, usize>,
    calls: AtomicU64,
}

impl MemoryNodeStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from nodes, rejecting duplicate identifiers
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> StoreResult<Self> {
        let mut store = Self::new();
        for node in nodes {
            store.insert(node)?;
        }
        Ok(store)
    }

    /// Builds a store from a JSON array of node objects
    pub fn from_json(value: Value) -> StoreResult<Self> {
        match value {
            Value::Array(items) => {
                let nodes = items.into_iter().map(Node::from_json).collect::<StoreResult<Vec<_>>>()?;
                Self::from_nodes(nodes)
            }
            other => Err(StoreError::InvalidNode(format!(
                "expected an array of nodes, found {}",
                other
            ))),
        }
    }

    /// Loads a JSON node dump from disk
    pub fn load_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let contents = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&contents)?;
        Self::from_json(value)
    }

    /// Adds a node
    pub fn insert(&mut self, node: Node) -> StoreResult<()> {
        if self.by_id.contains_key(node.id()) {
            return Err(StoreError::DuplicateNode(node.id().to_string()));
        }
        self.by_id.insert(node.id().to_string(), self.nodes.len());
        self.nodes.push(Arc::new(node));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of primitive calls served so far
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    fn lookup(&self, id: &str) -> Option<&Arc<Node>> {
        self.by_id.get(id).map(|index| &self.nodes[*index])
    }

    fn lookup_typed(&self, id: &str, node_type: &str) -> Option<Arc<Node>> {
        self.lookup(id)
            .filter(|node| node.node_type() == node_type)
            .cloned()
    }

    fn query(&self, descriptor: &QueryDescriptor) -> StoreResult<QueryOutput> {
        NodeFilter::validate(&descriptor.filter)?;

        let mut matched = Vec::new();
        for node in self.nodes.iter().filter(|n| n.node_type() == descriptor.node_type) {
            if NodeFilter::matches(node, &descriptor.filter)? {
                matched.push(Arc::clone(node));
            }
        }

        if let Some(sort) = &descriptor.sort {
            ResultSorter::sort(&mut matched, sort);
        }

        if descriptor.first_only {
            Ok(QueryOutput::One(matched.into_iter().next()))
        } else {
            Ok(QueryOutput::Many(matched))
        }
    }

    fn ancestor(&self, node: &Node, predicate: Option<NodePredicate<'_>>) -> Option<Arc<Node>> {
        let satisfies = |n: &Node| predicate.map_or(false, |p| p(n));

        let mut current = self
            .lookup(node.id())
            .cloned()
            .unwrap_or_else(|| Arc::new(node.clone()));
        // parent cycles terminate the walk
        let mut visited = HashSet::new();
        visited.insert(current.id().to_string());

        while !satisfies(&*current) {
            let parent = match current.parent().and_then(|id| self.lookup(id)) {
                Some(parent) if visited.insert(parent.id().to_string()) => Arc::clone(parent),
                _ => break,
            };
            current = parent;
        }

        match predicate {
            Some(_) if !satisfies(&*current) => None,
            _ => Some(current),
        }
    }
}

impl NodeStore for MemoryNodeStore {
    fn run_query<'a>(&'a self, query: &'a QueryDescriptor) -> StoreFuture<'a, QueryOutput> {
        Box::pin(async move {
            self.record_call();
            self.query(query)
        })
    }

    fn get_node_by_id<'a>(&'a self, id: &'a str, node_type: &'a str) -> StoreFuture<'a, Option<Arc<Node>>> {
        Box::pin(async move {
            self.record_call();
            Ok(self.lookup_typed(id, node_type))
        })
    }

    fn get_nodes_by_ids<'a>(
        &'a self,
        ids: &'a [String],
        node_type: &'a str,
    ) -> StoreFuture<'a, Vec<Option<Arc<Node>>>> {
        Box::pin(async move {
            self.record_call();
            Ok(ids.iter().map(|id| self.lookup_typed(id, node_type)).collect())
        })
    }

    fn get_all_nodes<'a>(&'a self, node_type: &'a str) -> StoreFuture<'a, Vec<Arc<Node>>> {
        Box::pin(async move {
            self.record_call();
            Ok(self
                .nodes
                .iter()
                .filter(|n| n.node_type() == node_type)
                .cloned()
                .collect())
        })
    }

    fn find_root_node_ancestor<'a>(
        &'a self,
        node: &'a Node,
        predicate: Option<NodePredicate<'a>>,
    ) -> StoreFuture<'a, Option<Arc<Node>>> {
        Box::pin(async move {
            self.record_call();
            Ok(self.ancestor(node, predicate))
        })
    }
}
