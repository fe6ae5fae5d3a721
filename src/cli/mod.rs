//! CLI module for nodelink
//!
//! Provides command-line interface for:
//! - query: One page of nodes matching a filter
//! - group: Matching nodes grouped by a field
//! - distinct: Distinct values of a field

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, PageArgs, SourceArgs};
pub use commands::{distinct, execute, group, query, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_json_arg, write_error, write_response};
