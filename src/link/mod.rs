//! Foreign-key links
//!
//! A link field holds a reference (an id, a slug, a relative path) and
//! resolves to the node(s) it points at. The raw reference is first read
//! through the field's own resolver, or the context's default resolver,
//! then looked up in the store.

mod filter;
mod path;
mod resolver;

use std::sync::Arc;

use crate::dispatch::{Args, FieldResolver, ResolveInfo, ResolverContext, Source};
use crate::errors::ResolveResult;
use crate::node::FieldValue;

pub use filter::build_link_filter;
pub use path::{normalize_path, resolve_path, FileByPath};
pub use resolver::{Link, LinkBy, LinkSpec};

/// Reads the raw reference, with `from` / `from_node` overridden when the
/// link configures its own `from`.
async fn resolve_raw(
    inner: Option<&Arc<dyn FieldResolver>>,
    from: Option<&str>,
    from_node: bool,
    source: &Source,
    args: &Args,
    ctx: &ResolverContext,
    info: &ResolveInfo,
) -> ResolveResult<FieldValue> {
    let info = info.overriding_from(from, from_node);
    let resolved = match inner {
        Some(resolver) => resolver.resolve(source, args, ctx, &info).await?,
        None => ctx.default_resolver().resolve(source, args, ctx, &info).await?,
    };
    resolved.into_field_value()
}
