//! Grouping a connection page by field value

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::node::{extract, Node};
use crate::observability::{log_event_with_fields, Event};
use crate::pagination::{paginate, Page, PaginationArgs};

/// One group: a page of the nodes sharing `field_value`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResult {
    #[serde(flatten)]
    pub page: Page<Arc<Node>>,
    pub field: String,
    pub field_value: String,
}

/// Partitions the page's nodes by the value of `field`.
///
/// Every element of a sequence value is its own membership, dates key by
/// their ISO-8601 string and nulls are skipped. Keys live in a `BTreeMap`,
/// so any string (`constructor`, `__proto__`, ...) is an ordinary key and
/// groups come out in sorted key order. Each group is paginated with `args`.
pub fn group(page: &Page<Arc<Node>>, field: &str, args: &PaginationArgs) -> Vec<GroupResult> {
    let mut groups: BTreeMap<String, Vec<Arc<Node>>> = BTreeMap::new();

    for node in page.items() {
        let extracted = extract(node, field);
        for scalar in extracted.scalars() {
            groups
                .entry(scalar.key())
                .or_default()
                .push(Arc::clone(node));
        }
    }

    let count = groups.len().to_string();
    log_event_with_fields(Event::GroupComplete, &[("field", field), ("groups", &count)]);

    groups
        .into_iter()
        .map(|(field_value, nodes)| GroupResult {
            page: paginate(Some(nodes), args),
            field: field.to_string(),
            field_value,
        })
        .collect()
}
