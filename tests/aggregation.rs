//! Aggregation Tests
//!
//! `group` and `distinct` over connection pages produced by the query
//! translator and the in-memory store.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use nodelink::aggregate::{distinct, group, DistinctResolver, GroupResolver};
use nodelink::dispatch::{Args, FieldResolver, ResolveInfo, Resolved, ResolverContext, Source, TypeRef};
use nodelink::node::{FieldValue, Node};
use nodelink::pagination::{paginate, Page, PaginationArgs};
use nodelink::query::find_many_paginated;
use nodelink::store::MemoryNodeStore;

fn shirts() -> MemoryNodeStore {
    let colors = [Some("red"), Some("blue"), None, Some("red"), Some("blue")];
    MemoryNodeStore::from_nodes(colors.iter().enumerate().map(|(i, color)| {
        let node = Node::new(format!("shirt-{}", i), "Shirt");
        match color {
            Some(color) => node.with_field("color", json!(color)),
            None => node,
        }
    }))
    .unwrap()
}

fn page_of(nodes: Vec<Node>) -> Page<Arc<Node>> {
    paginate(Some(nodes.into_iter().map(Arc::new).collect()), &PaginationArgs::default())
}

fn args(value: Value) -> Args {
    value.as_object().cloned().unwrap_or_default()
}

// =============================================================================
// GROUP
// =============================================================================

/// Five shirts, one without a color: two groups of two, each a single page.
#[tokio::test]
async fn test_group_by_color() {
    let ctx = ResolverContext::new(Arc::new(shirts()));
    let info = ResolveInfo::new("allShirt", TypeRef::named("ShirtConnection"));

    let page = find_many_paginated("Shirt", &Args::new(), &ctx, &info).await.unwrap();
    assert_eq!(page.total_count, 5);

    let groups = group(&page, "color", &PaginationArgs::default());
    assert_eq!(groups.len(), 2);

    assert_eq!(groups[0].field, "color");
    assert_eq!(groups[0].field_value, "blue");
    assert_eq!(groups[0].page.total_count, 2);
    assert_eq!(groups[0].page.page_info.page_count, 1);

    assert_eq!(groups[1].field_value, "red");
    assert_eq!(groups[1].page.total_count, 2);
    assert_eq!(groups[1].page.page_info.page_count, 1);

    let red: Vec<&str> = groups[1].page.nodes.iter().map(|n| n.id()).collect();
    assert_eq!(red, vec!["shirt-0", "shirt-3"]);
}

/// Every element of a sequence joins its own group.
#[test]
fn test_group_sequence_membership() {
    let page = page_of(vec![
        Node::new("1", "Post").with_field("tags", json!(["rust", "cli"])),
        Node::new("2", "Post").with_field("tags", json!(["rust", null])),
        Node::new("3", "Post").with_field("tags", json!([])),
    ]);

    let groups = group(&page, "tags", &PaginationArgs::default());
    let summary: Vec<(String, usize)> = groups
        .iter()
        .map(|g| (g.field_value.clone(), g.page.total_count))
        .collect();
    assert_eq!(summary, vec![("cli".to_string(), 1), ("rust".to_string(), 2)]);
}

/// Groups serialize flat: page fields next to `field` / `fieldValue`.
#[tokio::test]
async fn test_group_resolver_output_shape() {
    let ctx = ResolverContext::new(Arc::new(shirts()));
    let info = ResolveInfo::new("allShirt", TypeRef::named("ShirtConnection"));
    let page = find_many_paginated("Shirt", &Args::new(), &ctx, &info).await.unwrap();

    let group_info = ResolveInfo::new("group", TypeRef::named("ShirtGroupConnection"));
    let resolved = GroupResolver
        .resolve(&Source::Connection(page), &args(json!({"field": "color"})), &ctx, &group_info)
        .await
        .unwrap();

    let json = resolved.to_json().unwrap();
    assert_eq!(json[0]["field"], "color");
    assert_eq!(json[0]["fieldValue"], "blue");
    assert_eq!(json[0]["totalCount"], 2);
    assert_eq!(json[0]["pageInfo"]["currentPage"], 1);
    assert_eq!(json[0]["nodes"][0]["id"], "shirt-1");
}

// =============================================================================
// DISTINCT
// =============================================================================

/// Values are unique and ascending.
#[tokio::test]
async fn test_distinct_colors() {
    let ctx = ResolverContext::new(Arc::new(shirts()));
    let info = ResolveInfo::new("allShirt", TypeRef::named("ShirtConnection"));
    let page = find_many_paginated("Shirt", &Args::new(), &ctx, &info).await.unwrap();

    let distinct_info = ResolveInfo::new("distinct", TypeRef::named("String"));
    let resolved = DistinctResolver
        .resolve(&Source::Connection(page), &args(json!({"field": "color"})), &ctx, &distinct_info)
        .await
        .unwrap();

    assert_eq!(resolved, Resolved::Distinct(vec![json!("blue"), json!("red")]));
}

/// Resolved dates take precedence over raw strings and render as ISO-8601.
#[test]
fn test_distinct_prefers_resolved_dates() {
    let date = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let page = page_of(vec![
        Node::new("1", "Post")
            .with_field("date", json!("January 1st, 2020"))
            .with_resolved("date", date),
        Node::new("2", "Post")
            .with_field("date", json!("2020-01-01"))
            .with_resolved("date", FieldValue::dates([date])),
    ]);

    assert_eq!(distinct(&page, "date"), vec![json!("2020-01-01T00:00:00.000Z")]);

    let groups = group(&page, "date", &PaginationArgs::default());
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].field_value, "2020-01-01T00:00:00.000Z");
    assert_eq!(groups[0].page.total_count, 2);
}

/// Numbers order by their text.
#[test]
fn test_distinct_numeric_text_order() {
    let page = page_of(vec![
        Node::new("1", "Post").with_field("n", json!(9)),
        Node::new("2", "Post").with_field("n", json!(10)),
        Node::new("3", "Post").with_field("n", json!(9)),
    ]);

    assert_eq!(distinct(&page, "n"), vec![json!(10), json!(9)]);
}
