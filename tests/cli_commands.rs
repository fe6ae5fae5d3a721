//! CLI Command Tests
//!
//! Commands run against node dumps and config files written to temporary
//! files.

use std::io::Write;

use serde_json::json;
use tempfile::NamedTempFile;

use nodelink::cli::{execute, Command, PageArgs, SourceArgs};

fn nodes_file() -> NamedTempFile {
    let nodes = json!([
        {"id": "s1", "internal": {"type": "Shirt"}, "color": "red", "size": 3},
        {"id": "s2", "internal": {"type": "Shirt"}, "color": "blue", "size": 1},
        {"id": "s3", "internal": {"type": "Shirt"}, "size": 2},
        {"id": "s4", "internal": {"type": "Shirt"}, "color": "red", "size": 5},
        {"id": "s5", "internal": {"type": "Shirt"}, "color": "blue", "size": 4}
    ]);
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", nodes).unwrap();
    file
}

fn source(file: &NamedTempFile, filter: Option<&str>) -> SourceArgs {
    SourceArgs {
        nodes: file.path().to_path_buf(),
        node_type: "Shirt".to_string(),
        filter: filter.map(str::to_string),
        config: None,
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// `query` prints one page and the counters.
#[tokio::test]
async fn test_query_command() {
    let file = nodes_file();
    let data = execute(Command::Query {
        source: source(&file, Some(r#"{"size": {"gte": 2}}"#)),
        page: PageArgs { skip: Some(1), limit: Some(2) },
    })
    .await
    .unwrap();

    let result = &data["result"];
    assert_eq!(result["totalCount"], 4);
    assert_eq!(result["nodes"][0]["id"], "s3");
    assert_eq!(result["nodes"][1]["id"], "s4");
    assert_eq!(result["pageInfo"]["currentPage"], 2);
    assert_eq!(data["stats"]["totalRunQuery"], 1);
}

/// `group` paginates each group.
#[tokio::test]
async fn test_group_command() {
    let file = nodes_file();
    let data = execute(Command::Group {
        source: source(&file, None),
        page: PageArgs::default(),
        field: "color".to_string(),
    })
    .await
    .unwrap();

    let groups = data["result"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["fieldValue"], "blue");
    assert_eq!(groups[0]["totalCount"], 2);
    assert_eq!(groups[0]["pageInfo"]["pageCount"], 1);
    assert_eq!(groups[1]["fieldValue"], "red");
}

/// `distinct` lists values in order.
#[tokio::test]
async fn test_distinct_command() {
    let file = nodes_file();
    let data = execute(Command::Distinct {
        source: source(&file, None),
        field: "color".to_string(),
    })
    .await
    .unwrap();

    assert_eq!(data["result"], json!(["blue", "red"]));
}

// =============================================================================
// FAILURES
// =============================================================================

/// A malformed filter argument is rejected before any query runs.
#[tokio::test]
async fn test_bad_filter_argument() {
    let file = nodes_file();
    let err = execute(Command::Query {
        source: source(&file, Some("{not json")),
        page: PageArgs::default(),
    })
    .await
    .unwrap_err();

    assert_eq!(err.code_str(), "NODELINK_CLI_INVALID_ARGUMENT");
}

/// A missing node dump is a load failure.
#[tokio::test]
async fn test_missing_nodes_file() {
    let err = execute(Command::Distinct {
        source: SourceArgs {
            nodes: "/nonexistent/nodes.json".into(),
            node_type: "Shirt".to_string(),
            filter: None,
            config: None,
        },
        field: "color".to_string(),
    })
    .await
    .unwrap_err();

    assert_eq!(err.code_str(), "NODELINK_CLI_LOAD_FAILED");
}

/// Config files switch counters off.
#[tokio::test]
async fn test_config_disables_stats() {
    let file = nodes_file();
    let mut config = NamedTempFile::new().unwrap();
    write!(config, r#"{{"collect_stats": false, "log_level": "error"}}"#).unwrap();

    let mut args = source(&file, None);
    args.config = Some(config.path().to_path_buf());

    let data = execute(Command::Query {
        source: args,
        page: PageArgs::default(),
    })
    .await
    .unwrap();

    assert_eq!(data["stats"], json!(null));
    assert_eq!(data["result"]["totalCount"], 5);
}
