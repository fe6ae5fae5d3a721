//! Result sorting for the in-memory store
//!
//! Stable, multi-field, deterministic.

use std::cmp::Ordering;
use std::sync::Arc;

use serde_json::Value;

use crate::node::{extract, FieldValue, Node};
use crate::query::{SortDirection, SortSpec};

/// Sorts store results
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts nodes according to the sort specification.
    ///
    /// Fields are compared in order; ties fall through to the next field
    /// and finally keep their original relative order.
    pub fn sort(nodes: &mut [Arc<Node>], spec: &SortSpec) {
        nodes.sort_by(|a, b| {
            for (index, field) in spec.fields.iter().enumerate() {
                let ordering = Self::compare_values(&Self::sort_key(a, field), &Self::sort_key(b, field));
                let ordering = match spec.direction(index) {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    /// First value of the field; sequences sort by their first element
    fn sort_key(node: &Node, field: &str) -> Value {
        match extract(node, field) {
            FieldValue::Null => Value::Null,
            FieldValue::Scalar(scalar) => scalar.to_json(),
            FieldValue::Sequence(items) => items.first().map(|s| s.to_json()).unwrap_or(Value::Null),
        }
    }

    /// Compares two JSON values for sorting.
    ///
    /// Ordering rules:
    /// - null < bool < number < string < array < object
    /// - For same types, natural ordering
    fn compare_values(a: &Value, b: &Value) -> Ordering {
        let type_order = |v: &Value| -> u8 {
            match v {
                Value::Null => 0,
                Value::Bool(_) => 1,
                Value::Number(_) => 2,
                Value::String(_) => 3,
                Value::Array(_) => 4,
                Value::Object(_) => 5,
            }
        };

        let a_type = type_order(a);
        let b_type = type_order(b);
        if a_type != b_type {
            return a_type.cmp(&b_type);
        }

        match (a, b) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => {
                let a = a.as_f64().unwrap_or(0.0);
                let b = b.as_f64().unwrap_or(0.0);
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
            (Value::String(a), Value::String(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}
