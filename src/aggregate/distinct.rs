//! Distinct field values over a connection page

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::node::{extract, Node};
use crate::observability::{log_event_with_fields, Event};
use crate::pagination::Page;

/// Unique values of `field` across the page's nodes, in ascending order.
///
/// Sequences contribute every element, dates become ISO-8601 strings and
/// nulls are skipped. Ordering compares the string rendering of each value,
/// so `10` sorts before `9`.
pub fn distinct(page: &Page<Arc<Node>>, field: &str) -> Vec<Value> {
    let mut seen = HashSet::new();
    let mut values: Vec<(String, Value)> = Vec::new();

    for node in page.items() {
        let extracted = extract(node, field);
        for scalar in extracted.scalars() {
            let value = scalar.to_json();
            if seen.insert(value.to_string()) {
                values.push((scalar.key(), value));
            }
        }
    }

    values.sort_by(|(a, _), (b, _)| a.cmp(b));

    let count = values.len().to_string();
    log_event_with_fields(Event::DistinctComplete, &[("field", field), ("count", &count)]);

    values.into_iter().map(|(_, value)| value).collect()
}
