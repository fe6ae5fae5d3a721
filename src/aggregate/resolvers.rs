//! `distinct` and `group` fields of a connection

use crate::dispatch::{Args, FieldResolver, ResolveFuture, ResolveInfo, Resolved, ResolverContext, Source};
use crate::pagination::PaginationArgs;

use super::{distinct, group};

fn field_arg(args: &Args) -> Option<&str> {
    args.get("field").and_then(|v| v.as_str())
}

/// Resolves `distinct(field: ...)` on a connection page
#[derive(Debug, Clone, Copy, Default)]
pub struct DistinctResolver;

impl FieldResolver for DistinctResolver {
    fn resolve<'a>(
        &'a self,
        source: &'a Source,
        args: &'a Args,
        _ctx: &'a ResolverContext,
        _info: &'a ResolveInfo,
    ) -> ResolveFuture<'a> {
        Box::pin(async move {
            let page = match source {
                Source::Connection(page) => page,
                _ => return Ok(Resolved::Null),
            };
            Ok(Resolved::Distinct(match field_arg(args) {
                Some(field) => distinct(page, field),
                None => Vec::new(),
            }))
        })
    }
}

/// Resolves `group(field: ..., skip: ..., limit: ...)` on a connection page
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupResolver;

impl FieldResolver for GroupResolver {
    fn resolve<'a>(
        &'a self,
        source: &'a Source,
        args: &'a Args,
        _ctx: &'a ResolverContext,
        _info: &'a ResolveInfo,
    ) -> ResolveFuture<'a> {
        Box::pin(async move {
            let page = match source {
                Source::Connection(page) => page,
                _ => return Ok(Resolved::Null),
            };
            Ok(Resolved::Groups(match field_arg(args) {
                Some(field) => group(page, field, &PaginationArgs::from_args(args)),
                None => Vec::new(),
            }))
        })
    }
}
