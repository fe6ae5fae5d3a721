//! CLI argument definitions using clap
//!
//! Commands:
//! - nodelink query --nodes <path> --type <T> [--filter <json>] [--skip N] [--limit N]
//! - nodelink group --nodes <path> --type <T> --field <path> [--skip N] [--limit N]
//! - nodelink distinct --nodes <path> --type <T> --field <path>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// nodelink - field resolution, linking and aggregation over a node dump
#[derive(Parser, Debug)]
#[command(name = "nodelink")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where the nodes come from and which of them to select
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// JSON array of nodes
    #[arg(long)]
    pub nodes: PathBuf,

    /// Node type to query
    #[arg(long = "type")]
    pub node_type: String,

    /// Filter tree as JSON, e.g. '{"frontmatter":{"draft":{"eq":false}}}'
    #[arg(long)]
    pub filter: Option<String>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct PageArgs {
    /// Items to skip
    #[arg(long)]
    pub skip: Option<usize>,

    /// Page size
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print one page of matching nodes
    Query {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Group matching nodes by a field, one page per value
    Group {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        page: PageArgs,
        /// Dotted field path
        #[arg(long)]
        field: String,
    },

    /// Print the distinct values of a field
    Distinct {
        #[command(flatten)]
        source: SourceArgs,
        /// Dotted field path
        #[arg(long)]
        field: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
