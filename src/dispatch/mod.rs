//! Field dispatch
//!
//! The resolver trait, the value it produces, the parent value it reads
//! from, the per-field metadata and the request context. The default
//! resolver handles plain property reads; the query, link and aggregate
//! modules provide the other resolvers.

mod context;
mod info;
mod resolver;
mod source;

pub use context::ResolverContext;
pub use info::{ResolveInfo, TypeRef};
pub use resolver::{Args, DefaultFieldResolver, FieldResolver, ResolveFuture, Resolved};
pub use source::Source;
