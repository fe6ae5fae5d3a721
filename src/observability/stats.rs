//! Query statistics counters
//!
//! - Counters only
//! - Monotonic increase, owned by the calling request context
//! - Thread-safe but lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Running totals of store queries issued while resolving one request.
///
/// All counters use `Relaxed` atomics; concurrent sibling resolutions may
/// increment them without coordination.
#[derive(Debug, Default)]
pub struct QueryStats {
    /// Every `run_query` issued
    total_run_query: AtomicU64,
    /// Queries counted as plural
    total_plural_run_query: AtomicU64,
}

impl QueryStats {
    /// Create a stats block with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment total queries
    pub fn increment_run_query(&self) {
        self.total_run_query.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment plural queries
    pub fn increment_plural_run_query(&self) {
        self.total_plural_run_query.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total queries
    pub fn total_run_query(&self) -> u64 {
        self.total_run_query.load(Ordering::Relaxed)
    }

    /// Get plural queries
    pub fn total_plural_run_query(&self) -> u64 {
        self.total_plural_run_query.load(Ordering::Relaxed)
    }

    /// Get all counters as a snapshot
    pub fn snapshot(&self) -> QueryStatsSnapshot {
        QueryStatsSnapshot {
            total_run_query: self.total_run_query(),
            total_plural_run_query: self.total_plural_run_query(),
        }
    }
}

/// A point-in-time copy of [`QueryStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStatsSnapshot {
    pub total_run_query: u64,
    pub total_plural_run_query: u64,
}
