//! Field resolvers
//!
//! A field resolver turns `(source, args, context, info)` into a
//! [`Resolved`] value. Every resolver in the crate implements
//! [`FieldResolver`], so links can wrap any of them.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use super::context::ResolverContext;
use super::info::ResolveInfo;
use super::source::Source;
use crate::aggregate::GroupResult;
use crate::errors::ResolveResult;
use crate::node::{extract_uncached, FieldValue, Node};
use crate::pagination::Page;
use crate::store::QueryOutput;

/// Field arguments
pub type Args = Map<String, Value>;

/// Future returned by [`FieldResolver::resolve`]
pub type ResolveFuture<'a> = Pin<Box<dyn Future<Output = ResolveResult<Resolved>> + Send + 'a>>;

/// Resolves one field access
pub trait FieldResolver: Send + Sync {
    fn resolve<'a>(
        &'a self,
        source: &'a Source,
        args: &'a Args,
        ctx: &'a ResolverContext,
        info: &'a ResolveInfo,
    ) -> ResolveFuture<'a>;
}

/// Value produced by a resolver
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resolved {
    Null,
    /// A plain field value
    Value(FieldValue),
    /// A single linked node
    Node(Option<Arc<Node>>),
    /// Linked nodes, aligned with the input; misses are `None`
    Nodes(Vec<Option<Arc<Node>>>),
    /// An unpaginated result list
    List(Vec<Arc<Node>>),
    Page(Page<Arc<Node>>),
    Groups(Vec<GroupResult>),
    Distinct(Vec<Value>),
}

impl Resolved {
    /// Wraps a field value, mapping absence to `Null`
    pub fn value(value: FieldValue) -> Self {
        match value {
            FieldValue::Null => Resolved::Null,
            other => Resolved::Value(other),
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            Resolved::Null => true,
            Resolved::Value(value) => value.is_null(),
            _ => false,
        }
    }

    /// The resolved value as a field value; structured results go through
    /// their JSON form.
    pub fn into_field_value(self) -> ResolveResult<FieldValue> {
        match self {
            Resolved::Null => Ok(FieldValue::Null),
            Resolved::Value(value) => Ok(value),
            other => Ok(FieldValue::from_json(other.to_json()?)),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    pub fn as_page(&self) -> Option<&Page<Arc<Node>>> {
        match self {
            Resolved::Page(page) => Some(page),
            _ => None,
        }
    }
}

impl From<QueryOutput> for Resolved {
    fn from(output: QueryOutput) -> Self {
        match output {
            QueryOutput::Many(nodes) => Resolved::List(nodes),
            QueryOutput::One(node) => Resolved::Node(node),
        }
    }
}

/// Reads the field straight off its source.
///
/// - a source that is not a structured object resolves to `Null`
/// - with `info.from` and `info.from_node`, the path is read on the root
///   ancestor of the owning node
/// - with `info.from` alone, the path is read on the source
/// - otherwise the literal field name is read
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFieldResolver;

impl DefaultFieldResolver {
    async fn resolve_source(
        &self,
        source: &Source,
        ctx: &ResolverContext,
        info: &ResolveInfo,
    ) -> ResolveResult<Resolved> {
        if !source.is_object() {
            return Ok(Resolved::Null);
        }

        let from = match &info.from {
            Some(from) => from,
            None => return Ok(Resolved::value(source.field(&info.field_name))),
        };

        if !info.from_node {
            return Ok(Resolved::value(source.extract(from)));
        }

        let owner = match source.owner() {
            Some(owner) => owner,
            None => return Ok(Resolved::Null),
        };
        let root = ctx.store.find_root_node_ancestor(owner, None).await?;
        Ok(match root {
            Some(root) => Resolved::value(extract_uncached(&root, from)),
            None => Resolved::Null,
        })
    }
}

impl FieldResolver for DefaultFieldResolver {
    fn resolve<'a>(
        &'a self,
        source: &'a Source,
        _args: &'a Args,
        ctx: &'a ResolverContext,
        info: &'a ResolveInfo,
    ) -> ResolveFuture<'a> {
        Box::pin(self.resolve_source(source, ctx, info))
    }
}
