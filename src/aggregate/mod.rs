//! Aggregation engine
//!
//! Summary views derived from an already fetched connection page:
//! - `distinct`: the sorted set of values of one field
//! - `group`: one paginated sub-page per field value
//!
//! Both read values through the cache-aware extractor. The resolvers
//! expose them as fields of a connection.

mod distinct;
mod group;
mod resolvers;

pub use distinct::distinct;
pub use group::{group, GroupResult};
pub use resolvers::{DistinctResolver, GroupResolver};
