//! Link resolver

use std::fmt;
use std::sync::Arc;

use super::filter::build_link_filter;
use super::resolve_raw;
use crate::dispatch::{Args, FieldResolver, ResolveFuture, ResolveInfo, Resolved, ResolverContext, Source, TypeRef};
use crate::errors::ResolveResult;
use crate::node::{extract_uncached, FieldValue, Scalar};
use crate::observability::{log_event_with_fields, Event};
use crate::query::QueryDescriptor;
use crate::store::QueryOutput;

/// Field of the target node a link matches against
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LinkBy {
    /// Identifier lookup
    #[default]
    Id,
    /// Dotted path, matched with a store query
    Path(String),
}

impl LinkBy {
    /// `"id"` is the identifier, anything else a dotted path
    pub fn parse(by: &str) -> Self {
        if by == "id" {
            LinkBy::Id
        } else {
            LinkBy::Path(by.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LinkBy::Id => "id",
            LinkBy::Path(path) => path,
        }
    }
}

/// Link configuration of a field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkSpec {
    pub by: LinkBy,
    /// Path holding the reference, instead of the field itself
    pub from: Option<String>,
    /// Read `from` on the root ancestor node
    pub from_node: bool,
    /// Target type, instead of the field's return type
    pub node_type: Option<TypeRef>,
}

impl LinkSpec {
    pub fn by_id() -> Self {
        Self::default()
    }

    pub fn by_path(path: impl Into<String>) -> Self {
        Self {
            by: LinkBy::Path(path.into()),
            ..Self::default()
        }
    }

    pub fn with_from(mut self, from: impl Into<String>, from_node: bool) -> Self {
        self.from = Some(from.into());
        self.from_node = from_node;
        self
    }

    pub fn with_type(mut self, node_type: TypeRef) -> Self {
        self.node_type = Some(node_type);
        self
    }
}

/// Resolves a foreign-key field to the node(s) it references
#[derive(Clone)]
pub struct Link {
    spec: LinkSpec,
    inner: Option<Arc<dyn FieldResolver>>,
}

impl Link {
    pub fn new(spec: LinkSpec) -> Self {
        Self { spec, inner: None }
    }

    /// Reads the raw reference through `resolver` instead of the default one
    pub fn with_resolver(mut self, resolver: Arc<dyn FieldResolver>) -> Self {
        self.inner = Some(resolver);
        self
    }

    pub fn spec(&self) -> &LinkSpec {
        &self.spec
    }

    async fn link(
        &self,
        source: &Source,
        args: &Args,
        ctx: &ResolverContext,
        info: &ResolveInfo,
    ) -> ResolveResult<Resolved> {
        let raw = resolve_raw(
            self.inner.as_ref(),
            self.spec.from.as_deref(),
            self.spec.from_node,
            source,
            args,
            ctx,
            info,
        )
        .await?;
        if raw.is_null() {
            return Ok(Resolved::Null);
        }

        let return_type = self.spec.node_type.as_ref().unwrap_or(&info.return_type).nullable();
        let node_type = return_type.named_type();

        let path = match &self.spec.by {
            LinkBy::Id => return by_id(raw, node_type, ctx).await,
            LinkBy::Path(path) => path,
        };

        if matches!(&raw, FieldValue::Sequence(items) if items.is_empty()) {
            log_event_with_fields(Event::LinkEmptyShortCircuit, &[("by", path), ("type", node_type)]);
            return Ok(Resolved::Value(raw));
        }

        let mut query_args = args.clone();
        query_args.insert("filter".to_string(), build_link_filter(path, &raw));

        let first_only = !return_type.is_list();
        // the plural counter follows `first_only` here, unlike root queries
        ctx.count_query(first_only);

        let first_only_str = first_only.to_string();
        log_event_with_fields(
            Event::LinkResolve,
            &[("by", path), ("first_only", &first_only_str), ("type", node_type)],
        );

        let query = QueryDescriptor::from_args(node_type, &query_args, first_only);
        let output = ctx.run_query(&query).await?;

        match (return_type.is_list(), raw, output) {
            (true, FieldValue::Sequence(items), QueryOutput::Many(nodes)) => {
                let aligned = items
                    .into_iter()
                    .map(|item| {
                        let wanted = FieldValue::Scalar(item);
                        nodes
                            .iter()
                            .find(|node| extract_uncached(node, path) == wanted)
                            .cloned()
                    })
                    .collect();
                Ok(Resolved::Nodes(aligned))
            }
            (_, _, output) => Ok(output.into()),
        }
    }
}

/// Identifier links: one lookup per reference, order kept, misses `None`
async fn by_id(raw: FieldValue, node_type: &str, ctx: &ResolverContext) -> ResolveResult<Resolved> {
    match raw {
        FieldValue::Sequence(items) => {
            let ids: Vec<String> = items.iter().map(Scalar::key).collect();
            let nodes = ctx.store.get_nodes_by_ids(&ids, node_type).await?;
            Ok(Resolved::Nodes(nodes))
        }
        FieldValue::Scalar(id) => {
            let node = ctx.store.get_node_by_id(&id.key(), node_type).await?;
            Ok(Resolved::Node(node))
        }
        FieldValue::Null => Ok(Resolved::Null),
    }
}

impl FieldResolver for Link {
    fn resolve<'a>(
        &'a self,
        source: &'a Source,
        args: &'a Args,
        ctx: &'a ResolverContext,
        info: &'a ResolveInfo,
    ) -> ResolveFuture<'a> {
        Box::pin(self.link(source, args, ctx, info))
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("spec", &self.spec)
            .field("custom_resolver", &self.inner.is_some())
            .finish()
    }
}
