//! Pagination engine
//!
//! Turns an ordered result set into a connection page: the slice selected
//! by `skip` / `limit`, neighbour links for every edge, and page metadata.

mod page;

pub use page::{paginate, Edge, Page, PageInfo, PaginationArgs};
