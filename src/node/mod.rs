//! Node records and value extraction
//!
//! Nodes are shared as `Arc<Node>` between result sets, pages and groups;
//! nothing in the resolver layer mutates a node after it leaves the store.

mod extract;
#[allow(clippy::module_inception)]
mod node;
mod value;

pub use extract::{extract, extract_uncached, extract_value};
pub use node::{Node, ResolvedCache, ID_FIELD, INTERNAL_FIELD, PARENT_FIELD, TYPE_FIELD};
pub use value::{iso_string, FieldValue, Scalar};
