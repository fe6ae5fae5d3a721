//! CLI command implementations
//!
//! Each command loads a node dump into the in-memory store, builds a
//! resolver context and resolves the connection field the command
//! stands for. Output is the resolved value plus the query counters.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::aggregate::{DistinctResolver, GroupResolver};
use crate::config::ResolverConfig;
use crate::dispatch::{Args, FieldResolver, ResolveInfo, Resolved, ResolverContext, Source, TypeRef};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::query::{find_many_paginated, FieldEnum, FieldNode, Selection};
use crate::store::MemoryNodeStore;

use super::args::{Command, PageArgs, SourceArgs};
use super::errors::{CliError, CliResult};
use super::io::{parse_json_arg, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Runs a command on a fresh runtime and prints its result
pub fn run_command(cmd: Command) -> CliResult<()> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime_failed(format!("Failed to create tokio runtime: {}", e)))?;

    let data = rt.block_on(execute(cmd))?;
    write_response(data)
}

/// Executes a command and returns the `data` payload
pub async fn execute(cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::Query { source, page } => query(&source, page).await,
        Command::Group { source, page, field } => group(&source, page, &field).await,
        Command::Distinct { source, field } => distinct(&source, &field).await,
    }
}

/// One page of the nodes matching the filter
pub async fn query(source: &SourceArgs, page: PageArgs) -> CliResult<Value> {
    let ctx = context(source)?;
    let mut args = filter_args(source)?;
    insert_page_args(&mut args, page);

    let info = connection_info(&source.node_type, None);
    let result = find_many_paginated(&source.node_type, &args, &ctx, &info).await?;
    output(&ctx, Resolved::Page(result))
}

/// Matching nodes grouped by `field`
pub async fn group(source: &SourceArgs, page: PageArgs, field: &str) -> CliResult<Value> {
    let ctx = context(source)?;
    let mut group_args = Args::new();
    group_args.insert("field".to_string(), json!(field));
    insert_page_args(&mut group_args, page);

    let resolved = aggregate(&ctx, source, "group", field, &GroupResolver, &group_args).await?;
    output(&ctx, resolved)
}

/// Distinct values of `field` among the matching nodes
pub async fn distinct(source: &SourceArgs, field: &str) -> CliResult<Value> {
    let ctx = context(source)?;
    let mut distinct_args = Args::new();
    distinct_args.insert("field".to_string(), json!(field));

    let resolved = aggregate(&ctx, source, "distinct", field, &DistinctResolver, &distinct_args).await?;
    output(&ctx, resolved)
}

/// Resolves the connection with `sub_field(field: ...)` selected, then the
/// sub-field itself on the resulting page.
async fn aggregate(
    ctx: &ResolverContext,
    source: &SourceArgs,
    sub_field: &str,
    field: &str,
    resolver: &dyn FieldResolver,
    sub_args: &Args,
) -> CliResult<Resolved> {
    let args = filter_args(source)?;
    let info = connection_info(&source.node_type, Some((sub_field, field)));
    let page = find_many_paginated(&source.node_type, &args, ctx, &info).await?;

    let sub_info = ResolveInfo::new(sub_field, TypeRef::named("JSON"))
        .with_path(vec![info.field_name.clone(), sub_field.to_string()]);
    Ok(resolver
        .resolve(&Source::Connection(page), sub_args, ctx, &sub_info)
        .await?)
}

fn context(source: &SourceArgs) -> CliResult<ResolverContext> {
    let config = match &source.config {
        Some(path) => {
            let config = ResolverConfig::load(path)?;
            Logger::set_min_severity(config.log_severity()?);
            let path = path.display().to_string();
            log_event_with_fields(Event::ConfigLoaded, &[("path", &path)]);
            config
        }
        None => ResolverConfig::default(),
    };

    let store = MemoryNodeStore::load_file(&source.nodes)?;
    let count = store.len().to_string();
    let path = source.nodes.display().to_string();
    log_event_with_fields(Event::NodesLoaded, &[("count", &count), ("path", &path)]);

    Ok(ResolverContext::with_config(Arc::new(store), config))
}

fn filter_args(source: &SourceArgs) -> CliResult<Args> {
    let mut args = Args::new();
    if let Some(filter) = &source.filter {
        args.insert("filter".to_string(), parse_json_arg("filter", filter)?);
    }
    Ok(args)
}

fn insert_page_args(args: &mut Map<String, Value>, page: PageArgs) {
    if let Some(skip) = page.skip {
        args.insert("skip".to_string(), json!(skip));
    }
    if let Some(limit) = page.limit {
        args.insert("limit".to_string(), json!(limit));
    }
}

/// `allT` field metadata, optionally with one `group`/`distinct` selection
fn connection_info(node_type: &str, selected: Option<(&str, &str)>) -> ResolveInfo {
    let field_name = format!("all{}", node_type);
    let mut field_node = FieldNode::new(field_name.clone());
    let return_type = TypeRef::non_null(TypeRef::named(format!("{}Connection", node_type)));
    let mut info = ResolveInfo::new(field_name, return_type);

    if let Some((sub_field, path)) = selected {
        let field_enum = FieldEnum::from_paths([path]);
        let key = path.replace('.', "___");
        let selection = FieldNode::new(sub_field).with_argument("field", json!(key));
        field_node = field_node.with_selection(Selection::Field(selection));
        info = info.with_field_enum(sub_field, field_enum);
    }

    info.with_field_node(field_node)
}

fn output(ctx: &ResolverContext, resolved: Resolved) -> CliResult<Value> {
    let stats = match &ctx.stats {
        Some(stats) => serde_json::to_value(stats.snapshot())?,
        None => Value::Null,
    };
    Ok(json!({
        "result": resolved.to_json()?,
        "stats": stats,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_info_selects_sub_field() {
        let info = connection_info("MarkdownRemark", Some(("group", "frontmatter.tags")));
        assert_eq!(info.field_name, "allMarkdownRemark");
        assert_eq!(info.return_type.named_type(), "MarkdownRemarkConnection");
        assert_eq!(
            crate::query::projected_field(&info, "group").unwrap(),
            vec!["frontmatter.tags"]
        );
    }

    #[test]
    fn test_insert_page_args() {
        let mut args = Args::new();
        insert_page_args(&mut args, PageArgs { skip: Some(2), limit: None });
        assert_eq!(args.get("skip"), Some(&json!(2)));
        assert!(args.get("limit").is_none());
    }
}
