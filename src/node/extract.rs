//! Dotted-path value extraction
//!
//! `a.b.c` descends nested objects. When a segment yields an array, the
//! remaining path is mapped over every element and the results are
//! flattened one level; elements where the path is missing or null are
//! dropped.

use serde_json::{Map, Value};

use super::node::Node;
use super::value::FieldValue;

/// Reads `path` from a node, preferring the node's resolved cache.
///
/// A cached value wins whenever it is present and not null.
pub fn extract(node: &Node, path: &str) -> FieldValue {
    if let Some(cached) = node.resolved(path) {
        if !cached.is_null() {
            return cached.clone();
        }
    }
    extract_uncached(node, path)
}

/// Reads `path` from the node's raw fields, ignoring the resolved cache
pub fn extract_uncached(node: &Node, path: &str) -> FieldValue {
    let segments: Vec<&str> = path.split('.').collect();
    lookup(node.data(), &segments)
        .map(FieldValue::from_json)
        .unwrap_or_default()
}

/// Reads `path` from any JSON value
pub fn extract_value(value: &Value, path: &str) -> FieldValue {
    let segments: Vec<&str> = path.split('.').collect();
    value
        .as_object()
        .and_then(|map| lookup(map, &segments))
        .map(FieldValue::from_json)
        .unwrap_or_default()
}

fn lookup(map: &Map<String, Value>, segments: &[&str]) -> Option<Value> {
    let (first, rest) = segments.split_first()?;
    let value = map.get(*first)?;

    if rest.is_empty() {
        return Some(value.clone());
    }

    match value {
        Value::Array(items) => Some(Value::Array(collect_array(items, rest))),
        Value::Object(inner) => lookup(inner, rest),
        _ => None,
    }
}

fn collect_array(items: &[Value], rest: &[&str]) -> Vec<Value> {
    let mut out = Vec::new();
    for item in items {
        let found = match item {
            Value::Array(inner) => Some(Value::Array(collect_array(inner, rest))),
            Value::Object(map) => lookup(map, rest),
            _ => None,
        };
        match found {
            Some(Value::Array(values)) => out.extend(values),
            Some(Value::Null) | None => {}
            Some(value) => out.push(value),
        }
    }
    out
}
