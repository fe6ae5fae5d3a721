//! Link Resolution Tests
//!
//! Foreign-key links by id and by field path, and relative file links,
//! against the in-memory store.

use std::sync::Arc;

use serde_json::json;

use nodelink::dispatch::{Args, FieldResolver, ResolveInfo, Resolved, ResolverContext, Source, TypeRef};
use nodelink::link::{FileByPath, Link, LinkSpec};
use nodelink::node::{FieldValue, Node};
use nodelink::store::MemoryNodeStore;

fn authors() -> Vec<Node> {
    vec![
        Node::new("author-1", "Author").with_field("slug", json!("ada")),
        Node::new("author-2", "Author").with_field("slug", json!("brian")),
        Node::new("author-3", "Author").with_field("slug", json!("grace")),
    ]
}

fn setup(extra: Vec<Node>) -> (Arc<MemoryNodeStore>, ResolverContext) {
    let store = Arc::new(MemoryNodeStore::from_nodes(authors().into_iter().chain(extra)).unwrap());
    let ctx = ResolverContext::new(store.clone());
    (store, ctx)
}

fn post_with(field: &str, value: serde_json::Value) -> Source {
    Source::Node(Arc::new(Node::new("post-1", "Post").with_field(field, value)))
}

fn node_ids(resolved: &Resolved) -> Vec<Option<String>> {
    match resolved {
        Resolved::Nodes(nodes) => nodes.iter().map(|n| n.as_ref().map(|n| n.id().to_string())).collect(),
        other => panic!("expected a node list, got {:?}", other),
    }
}

// =============================================================================
// LINK BY ID
// =============================================================================

/// Three ids give three results in input order, `None` for the miss.
#[tokio::test]
async fn test_by_id_preserves_order() {
    let (_, ctx) = setup(vec![]);
    let link = Link::new(LinkSpec::by_id());
    let info = ResolveInfo::new("authors", TypeRef::list(TypeRef::named("Author")));

    let source = post_with("authors", json!(["author-3", "author-9", "author-1"]));
    let resolved = link.resolve(&source, &Args::new(), &ctx, &info).await.unwrap();

    assert_eq!(
        node_ids(&resolved),
        vec![Some("author-3".to_string()), None, Some("author-1".to_string())]
    );
}

/// A single id on a non-list field resolves to one node.
#[tokio::test]
async fn test_by_id_single() {
    let (_, ctx) = setup(vec![]);
    let link = Link::new(LinkSpec::by_id());
    let info = ResolveInfo::new("author", TypeRef::non_null(TypeRef::named("Author")));

    let resolved = link
        .resolve(&post_with("author", json!("author-2")), &Args::new(), &ctx, &info)
        .await
        .unwrap();
    assert!(matches!(resolved, Resolved::Node(Some(ref n)) if n.id() == "author-2"));
}

// =============================================================================
// LINK BY PATH
// =============================================================================

/// An empty reference list comes back as is, without a store call.
#[tokio::test]
async fn test_empty_sequence_short_circuits() {
    let (store, ctx) = setup(vec![]);
    let link = Link::new(LinkSpec::by_path("slug"));
    let info = ResolveInfo::new("authors", TypeRef::list(TypeRef::named("Author")));

    let resolved = link
        .resolve(&post_with("authors", json!([])), &Args::new(), &ctx, &info)
        .await
        .unwrap();

    assert_eq!(resolved, Resolved::Value(FieldValue::Sequence(vec![])));
    assert_eq!(store.call_count(), 0);
    assert_eq!(ctx.stats.as_ref().unwrap().total_run_query(), 0);
}

/// A non-list return type yields one node even when several match.
#[tokio::test]
async fn test_non_list_field_returns_single_node() {
    let (_, ctx) = setup(vec![Node::new("author-4", "Author").with_field("slug", json!("ada"))]);
    let link = Link::new(LinkSpec::by_path("slug"));
    let info = ResolveInfo::new("author", TypeRef::named("Author"));

    let resolved = link
        .resolve(&post_with("author", json!("ada")), &Args::new(), &ctx, &info)
        .await
        .unwrap();
    assert!(matches!(resolved, Resolved::Node(Some(ref n)) if n.id() == "author-1"));

    // singular link queries count towards the plural counter
    let stats = ctx.stats.as_ref().unwrap();
    assert_eq!(stats.total_run_query(), 1);
    assert_eq!(stats.total_plural_run_query(), 1);
}

/// List links realign results with the references.
#[tokio::test]
async fn test_list_link_realigns() {
    let (_, ctx) = setup(vec![]);
    let link = Link::new(LinkSpec::by_path("slug"));
    let info = ResolveInfo::new("authors", TypeRef::list(TypeRef::named("Author")));

    let resolved = link
        .resolve(&post_with("authors", json!(["grace", "ada", "nobody"])), &Args::new(), &ctx, &info)
        .await
        .unwrap();

    assert_eq!(
        node_ids(&resolved),
        vec![Some("author-3".to_string()), Some("author-1".to_string()), None]
    );
    let stats = ctx.stats.as_ref().unwrap();
    assert_eq!(stats.total_run_query(), 1);
    assert_eq!(stats.total_plural_run_query(), 0);
}

/// Nested target paths build nested filters.
#[tokio::test]
async fn test_nested_path() {
    let (_, ctx) = setup(vec![
        Node::new("tag-1", "Tag").with_field("fields", json!({"slug": "rust"})),
        Node::new("tag-2", "Tag").with_field("fields", json!({"slug": "go"})),
    ]);
    let link = Link::new(LinkSpec::by_path("fields.slug"));
    let info = ResolveInfo::new("tag", TypeRef::named("Tag"));

    let resolved = link
        .resolve(&post_with("tag", json!("go")), &Args::new(), &ctx, &info)
        .await
        .unwrap();
    assert!(matches!(resolved, Resolved::Node(Some(ref n)) if n.id() == "tag-2"));
}

/// `from` reads the reference from another path of the source.
#[tokio::test]
async fn test_link_from_path() {
    let (_, ctx) = setup(vec![]);
    let link = Link::new(LinkSpec::by_path("slug").with_from("frontmatter.author", false));
    let info = ResolveInfo::new("author", TypeRef::named("Author"));

    let resolved = link
        .resolve(&post_with("frontmatter", json!({"author": "brian"})), &Args::new(), &ctx, &info)
        .await
        .unwrap();
    assert!(matches!(resolved, Resolved::Node(Some(ref n)) if n.id() == "author-2"));
}

// =============================================================================
// FILE LINKS
// =============================================================================

fn file(id: &str, dir: &str, name: &str) -> Node {
    Node::new(id, "File")
        .with_field("dir", json!(dir))
        .with_field("absolutePath", json!(format!("{}/{}", dir, name)))
}

/// Relative paths resolve against the owning file's directory.
#[tokio::test]
async fn test_file_by_path() {
    let (_, ctx) = setup(vec![
        file("file-post", "/site/content/posts", "hello.md"),
        file("file-cover", "/site/content/images", "cover.png"),
        file("file-logo", "/site/static", "logo.svg"),
        Node::new("post-1", "MarkdownRemark")
            .with_parent("file-post")
            .with_field("cover", json!("../images/cover.png"))
            .with_field("gallery", json!(["../images/cover.png", "missing.png", "/site/static/logo.svg"])),
    ]);
    let post = ctx.store.get_node_by_id("post-1", "MarkdownRemark").await.unwrap().unwrap();
    let source = Source::Node(post);

    let cover = FileByPath::new()
        .resolve(&source, &Args::new(), &ctx, &ResolveInfo::new("cover", TypeRef::named("File")))
        .await
        .unwrap();
    assert!(matches!(cover, Resolved::Node(Some(ref n)) if n.id() == "file-cover"));

    let gallery = FileByPath::new()
        .resolve(
            &source,
            &Args::new(),
            &ctx,
            &ResolveInfo::new("gallery", TypeRef::list(TypeRef::named("File"))),
        )
        .await
        .unwrap();
    assert_eq!(
        node_ids(&gallery),
        vec![Some("file-cover".to_string()), None, Some("file-logo".to_string())]
    );
}

/// Without an owning file every lookup misses.
#[tokio::test]
async fn test_file_by_path_without_file_ancestor() {
    let (_, ctx) = setup(vec![file("file-cover", "/site/images", "cover.png")]);
    let source = post_with("cover", json!("cover.png"));

    let resolved = FileByPath::new()
        .resolve(&source, &Args::new(), &ctx, &ResolveInfo::new("cover", TypeRef::named("File")))
        .await
        .unwrap();
    assert_eq!(resolved, Resolved::Node(None));
}
