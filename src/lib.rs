//! nodelink - relational field resolution over an abstract node store
//!
//! Resolves foreign-key links, relative file links, connection pages and
//! `group` / `distinct` aggregations for a declarative schema layer.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod link;
pub mod node;
pub mod observability;
pub mod pagination;
pub mod query;
pub mod store;

pub use dispatch::{FieldResolver, Resolved, ResolverContext, Source};
pub use errors::{ResolveError, ResolveResult};
