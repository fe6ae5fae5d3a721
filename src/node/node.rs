//! Node records
//!
//! A node is a JSON object with an `id`, an `internal.type` tag and an
//! optional `parent` id, plus a side-channel cache of values already
//! produced by earlier resolvers.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::value::FieldValue;
use crate::store::{StoreError, StoreResult};

/// Field holding the node identifier
pub const ID_FIELD: &str = "id";
/// Field holding the owning node identifier
pub const PARENT_FIELD: &str = "parent";
/// Object holding bookkeeping fields such as the type tag
pub const INTERNAL_FIELD: &str = "internal";
/// Type tag key inside [`INTERNAL_FIELD`]
pub const TYPE_FIELD: &str = "type";

/// Resolved values keyed by dotted field path
pub type ResolvedCache = BTreeMap<String, FieldValue>;

/// A structured record in the node store
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    data: Map<String, Value>,
    node_type: String,
    resolved: ResolvedCache,
}

impl Node {
    /// Creates a node with only its identifier and type
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        let node_type = node_type.into();
        let mut internal = Map::new();
        internal.insert(TYPE_FIELD.to_string(), Value::String(node_type.clone()));

        let mut data = Map::new();
        data.insert(ID_FIELD.to_string(), Value::String(id.into()));
        data.insert(INTERNAL_FIELD.to_string(), Value::Object(internal));

        Self {
            data,
            node_type,
            resolved: ResolvedCache::new(),
        }
    }

    /// Builds a node from a JSON object carrying `id` and `internal.type`
    pub fn from_json(value: Value) -> StoreResult<Self> {
        let data = match value {
            Value::Object(map) => map,
            other => {
                return Err(StoreError::InvalidNode(format!(
                    "expected an object, found {}",
                    other
                )))
            }
        };

        if !matches!(data.get(ID_FIELD), Some(Value::String(_))) {
            return Err(StoreError::InvalidNode("missing string `id`".to_string()));
        }

        let node_type = data
            .get(INTERNAL_FIELD)
            .and_then(|internal| internal.get(TYPE_FIELD))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StoreError::InvalidNode("missing string `internal.type`".to_string()))?;

        Ok(Self {
            data,
            node_type,
            resolved: ResolvedCache::new(),
        })
    }

    /// Sets a raw field
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Sets the owning node
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.data
            .insert(PARENT_FIELD.to_string(), Value::String(parent_id.into()));
        self
    }

    /// Records a value already resolved for `path`
    pub fn with_resolved(mut self, path: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.resolved.insert(path.into(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        self.data
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn parent(&self) -> Option<&str> {
        self.data.get(PARENT_FIELD).and_then(Value::as_str)
    }

    /// Raw top-level field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Raw field map
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Cached resolved value for a dotted path
    pub fn resolved(&self, path: &str) -> Option<&FieldValue> {
        self.resolved.get(path)
    }

    /// Copy of the raw record as a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(self.data.clone())
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}
