//! Root query fields
//!
//! Translates the arguments of `allX` / `x` style fields into store query
//! descriptors, counts the queries and post-processes the results.

use std::sync::Arc;

use serde_json::Value;

use super::descriptor::QueryDescriptor;
use super::selection::projected_field;
use crate::dispatch::{Args, FieldResolver, ResolveFuture, ResolveInfo, Resolved, ResolverContext, Source};
use crate::errors::ResolveResult;
use crate::node::Node;
use crate::pagination::{paginate, Page, PaginationArgs};

/// Every node of `node_type` matching `args.filter`, sorted by `args.sort`.
///
/// Counts as a plural query.
pub async fn find_many(node_type: &str, args: &Args, ctx: &ResolverContext) -> ResolveResult<Vec<Arc<Node>>> {
    ctx.count_query(true);
    let query = QueryDescriptor::from_args(node_type, args, false);
    Ok(ctx.run_query(&query).await?.into_nodes())
}

/// The first node of `node_type` matching the arguments, which are the
/// filter as a whole.
pub async fn find_one(node_type: &str, args: &Args, ctx: &ResolverContext) -> ResolveResult<Option<Arc<Node>>> {
    ctx.count_query(false);
    let query = QueryDescriptor::one(node_type, Value::Object(args.clone()));
    Ok(ctx.run_query(&query).await?.into_first())
}

/// `find_many` as a connection page.
///
/// The `field:` arguments of `group` and `distinct` selections under this
/// field are passed to the store so it can prepare those paths.
pub async fn find_many_paginated(
    node_type: &str,
    args: &Args,
    ctx: &ResolverContext,
    info: &ResolveInfo,
) -> ResolveResult<Page<Arc<Node>>> {
    let group = projected_field(info, "group")?;
    let distinct = projected_field(info, "distinct")?;

    let mut extended = args.clone();
    extended.insert("group".to_string(), Value::from(group));
    extended.insert("distinct".to_string(), Value::from(distinct));

    let nodes = find_many(node_type, &extended, ctx).await?;
    Ok(paginate(Some(nodes), &PaginationArgs::from_args(args)))
}

/// Plural list field
#[derive(Debug, Clone)]
pub struct FindMany {
    node_type: String,
}

impl FindMany {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
        }
    }
}

impl FieldResolver for FindMany {
    fn resolve<'a>(
        &'a self,
        _source: &'a Source,
        args: &'a Args,
        ctx: &'a ResolverContext,
        _info: &'a ResolveInfo,
    ) -> ResolveFuture<'a> {
        Box::pin(async move { Ok(Resolved::List(find_many(&self.node_type, args, ctx).await?)) })
    }
}

/// Singular field
#[derive(Debug, Clone)]
pub struct FindOne {
    node_type: String,
}

impl FindOne {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
        }
    }
}

impl FieldResolver for FindOne {
    fn resolve<'a>(
        &'a self,
        _source: &'a Source,
        args: &'a Args,
        ctx: &'a ResolverContext,
        _info: &'a ResolveInfo,
    ) -> ResolveFuture<'a> {
        Box::pin(async move { Ok(Resolved::Node(find_one(&self.node_type, args, ctx).await?)) })
    }
}

/// Connection field
#[derive(Debug, Clone)]
pub struct FindManyPaginated {
    node_type: String,
}

impl FindManyPaginated {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
        }
    }
}

impl FieldResolver for FindManyPaginated {
    fn resolve<'a>(
        &'a self,
        _source: &'a Source,
        args: &'a Args,
        ctx: &'a ResolverContext,
        info: &'a ResolveInfo,
    ) -> ResolveFuture<'a> {
        Box::pin(async move {
            let page = find_many_paginated(&self.node_type, args, ctx, info).await?;
            Ok(Resolved::Page(page))
        })
    }
}
