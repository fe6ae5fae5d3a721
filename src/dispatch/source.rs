//! The parent value a field is read from

use std::sync::Arc;

use serde_json::Value;

use crate::node::{extract_uncached, extract_value, FieldValue, Node};
use crate::pagination::Page;

/// Parent value of a field access
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Null,
    /// A node from the store
    Node(Arc<Node>),
    /// A value nested inside a node, with the node that owns it
    Embedded { value: Value, owner: Option<Arc<Node>> },
    /// A connection page, parent of `group` / `distinct`
    Connection(Page<Arc<Node>>),
}

impl Source {
    pub fn embedded(value: Value, owner: Option<Arc<Node>>) -> Self {
        Source::Embedded { value, owner }
    }

    /// True for structured values
    pub fn is_object(&self) -> bool {
        match self {
            Source::Null => false,
            Source::Node(_) | Source::Connection(_) => true,
            Source::Embedded { value, .. } => value.is_object(),
        }
    }

    /// The node this value belongs to
    pub fn owner(&self) -> Option<&Arc<Node>> {
        match self {
            Source::Node(node) => Some(node),
            Source::Embedded { owner, .. } => owner.as_ref(),
            Source::Null | Source::Connection(_) => None,
        }
    }

    /// Dotted-path read on the raw value
    pub fn extract(&self, path: &str) -> FieldValue {
        match self {
            Source::Node(node) => extract_uncached(node, path),
            Source::Embedded { value, .. } => extract_value(value, path),
            Source::Null | Source::Connection(_) => FieldValue::Null,
        }
    }

    /// Literal top-level key read
    pub fn field(&self, name: &str) -> FieldValue {
        let value = match self {
            Source::Node(node) => node.get(name),
            Source::Embedded { value, .. } => value.get(name),
            Source::Null | Source::Connection(_) => None,
        };
        value.cloned().map(FieldValue::from_json).unwrap_or_default()
    }
}
