//! Observable resolution events
//!
//! Every log line emitted by the resolver layer names one of these events.
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events in nodelink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Store queries
    /// A query descriptor was sent to the node store
    RunQuery,
    /// The node store rejected or failed a query
    StoreQueryFailed,

    // Link resolution
    /// A foreign-key link is being resolved
    LinkResolve,
    /// An empty key sequence short-circuited a link lookup
    LinkEmptyShortCircuit,
    /// A file-path link found no owning file node
    FileLinkNoAncestor,

    // Aggregation
    /// Grouping finished
    GroupComplete,
    /// Distinct extraction finished
    DistinctComplete,

    // Command line
    /// Configuration loaded
    ConfigLoaded,
    /// Node dump loaded into the in-memory store
    NodesLoaded,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RunQuery => "RUN_QUERY",
            Event::StoreQueryFailed => "STORE_QUERY_FAILED",

            Event::LinkResolve => "LINK_RESOLVE",
            Event::LinkEmptyShortCircuit => "LINK_EMPTY_SHORT_CIRCUIT",
            Event::FileLinkNoAncestor => "FILE_LINK_NO_ANCESTOR",

            Event::GroupComplete => "GROUP_COMPLETE",
            Event::DistinctComplete => "DISTINCT_COMPLETE",

            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::NodesLoaded => "NODES_LOADED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::StoreQueryFailed => Severity::Error,
            Event::FileLinkNoAncestor => Severity::Warn,
            Event::ConfigLoaded | Event::NodesLoaded => Severity::Info,
            _ => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
