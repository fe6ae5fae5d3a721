//! Query translation
//!
//! Turns root field arguments into [`QueryDescriptor`]s for the node
//! store, and reads the selection set to find the `group` / `distinct`
//! paths a connection will be asked for.

mod descriptor;
mod selection;
mod translator;

pub use descriptor::{QueryDescriptor, SortDirection, SortSpec};
pub use selection::{projected_field, Argument, FieldEnum, FieldNode, Fragments, Selection, SelectionSet};
pub use translator::{find_many, find_many_paginated, find_one, FindMany, FindManyPaginated, FindOne};
