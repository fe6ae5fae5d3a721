//! Resolver Context
//!
//! Request-scoped state shared by every resolver of one operation: the
//! node store, optional query counters, configuration and the fallback
//! field resolver.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use super::resolver::{DefaultFieldResolver, FieldResolver};
use crate::config::ResolverConfig;
use crate::errors::ResolveResult;
use crate::observability::{log_event_with_fields, Event, QueryStats};
use crate::query::QueryDescriptor;
use crate::store::{NodeStore, QueryOutput};

/// Context carried through one resolution
#[derive(Clone)]
pub struct ResolverContext {
    /// Request ID for tracing
    pub request_id: Uuid,

    pub store: Arc<dyn NodeStore>,

    /// Query counters, absent when stats are disabled
    pub stats: Option<Arc<QueryStats>>,

    pub config: Arc<ResolverConfig>,

    default_resolver: Arc<dyn FieldResolver>,
}

impl ResolverContext {
    /// Creates a context with the default configuration
    pub fn new(store: Arc<dyn NodeStore>) -> Self {
        Self::with_config(store, ResolverConfig::default())
    }

    /// Creates a context; counters are allocated when `collect_stats` is set
    pub fn with_config(store: Arc<dyn NodeStore>, config: ResolverConfig) -> Self {
        let stats = config.collect_stats.then(|| Arc::new(QueryStats::new()));
        Self {
            request_id: Uuid::new_v4(),
            store,
            stats,
            config: Arc::new(config),
            default_resolver: Arc::new(DefaultFieldResolver),
        }
    }

    /// Shares an existing set of counters
    pub fn with_stats(mut self, stats: Arc<QueryStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn without_stats(mut self) -> Self {
        self.stats = None;
        self
    }

    /// Replaces the fallback resolver used by links
    pub fn with_default_resolver(mut self, resolver: Arc<dyn FieldResolver>) -> Self {
        self.default_resolver = resolver;
        self
    }

    pub fn default_resolver(&self) -> &dyn FieldResolver {
        self.default_resolver.as_ref()
    }

    /// Bumps `total_run_query`, and `total_plural_run_query` when `plural`
    pub fn count_query(&self, plural: bool) {
        if let Some(stats) = &self.stats {
            stats.increment_run_query();
            if plural {
                stats.increment_plural_run_query();
            }
        }
    }

    /// Runs a query against the store, logging the call and any failure
    pub async fn run_query(&self, query: &QueryDescriptor) -> ResolveResult<QueryOutput> {
        let request_id = self.request_id.to_string();
        let first_only = query.first_only.to_string();
        log_event_with_fields(
            Event::RunQuery,
            &[
                ("first_only", &first_only),
                ("request_id", &request_id),
                ("type", &query.node_type),
            ],
        );

        match self.store.run_query(query).await {
            Ok(output) => Ok(output),
            Err(err) => {
                let reason = err.to_string();
                log_event_with_fields(
                    Event::StoreQueryFailed,
                    &[
                        ("code", err.code()),
                        ("reason", &reason),
                        ("request_id", &request_id),
                        ("type", &query.node_type),
                    ],
                );
                Err(err.into())
            }
        }
    }
}

impl fmt::Debug for ResolverContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverContext")
            .field("request_id", &self.request_id)
            .field("stats", &self.stats)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
