//! Connection pages
//!
//! Slices an ordered result set and computes page metadata using the
//! legacy counting rules: without a limit there is one page, or two when
//! anything was skipped.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::node::Node;

/// `skip` / `limit` arguments of a connection field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationArgs {
    /// Number of items to skip
    pub skip: usize,
    /// Page size; `None` means unlimited. A zero limit yields an empty
    /// slice but counts pages as if unset.
    pub limit: Option<usize>,
}

impl PaginationArgs {
    pub fn new(skip: usize, limit: Option<usize>) -> Self {
        Self { skip, limit }
    }

    /// Reads `skip` and `limit` from a resolver argument object.
    ///
    /// Anything that is not a non-negative integer is treated as absent.
    pub fn from_args(args: &Map<String, Value>) -> Self {
        let read = |key: &str| {
            args.get(key)
                .and_then(Value::as_u64)
                .and_then(|n| usize::try_from(n).ok())
        };
        Self {
            skip: read("skip").unwrap_or(0),
            limit: read("limit"),
        }
    }

    /// Limit used for page counting, with zero treated as unset
    fn counting_limit(&self) -> Option<usize> {
        self.limit.filter(|limit| *limit > 0)
    }
}

/// An item with its neighbours in the current slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge<T> {
    pub node: T,
    pub next: Option<T>,
    pub previous: Option<T>,
}

/// Page metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: usize,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub item_count: usize,
    /// Signed: the legacy formula goes to zero or below when `skip`
    /// runs past the end of the result set.
    pub page_count: i64,
    pub per_page: Option<usize>,
}

/// A paginated slice of a result set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T = Arc<Node>> {
    pub total_count: usize,
    pub edges: Vec<Edge<T>>,
    pub nodes: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    /// Items of the slice in order
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    (numerator as f64 / denominator as f64).ceil() as i64
}

/// Slices `items` according to `args` and computes page metadata.
///
/// `None` is treated as an empty result set. Never fails.
pub fn paginate<T: Clone>(items: Option<Vec<T>>, args: &PaginationArgs) -> Page<T> {
    let items = items.unwrap_or_default();
    let count = items.len();
    let skip = args.skip;

    let start = skip.min(count);
    let end = match args.limit {
        Some(limit) => skip.saturating_add(limit).min(count).max(start),
        None => count,
    };
    let slice: Vec<T> = items[start..end].to_vec();

    let (page_count, current_page) = match args.counting_limit() {
        Some(limit) => {
            let (skip, limit, count) = (skip as i64, limit as i64, count as i64);
            let skipped_pages = ceil_div(skip, limit);
            (
                skipped_pages + ceil_div(count - skip, limit),
                (skipped_pages + 1) as usize,
            )
        }
        None if skip > 0 => (2, 2),
        None => (1, 1),
    };

    let has_next_page = match args.limit {
        Some(limit) => skip.saturating_add(limit) < count,
        None => false,
    };

    let edges = slice
        .iter()
        .enumerate()
        .map(|(i, item)| Edge {
            node: item.clone(),
            next: slice.get(i + 1).cloned(),
            previous: i.checked_sub(1).and_then(|prev| slice.get(prev)).cloned(),
        })
        .collect();

    Page {
        total_count: count,
        edges,
        page_info: PageInfo {
            current_page,
            has_previous_page: current_page > 1,
            has_next_page,
            item_count: slice.len(),
            page_count,
            per_page: args.limit,
        },
        nodes: slice,
    }
}
