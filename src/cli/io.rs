//! JSON in and out of the CLI
//!
//! Every command prints exactly one JSON line on stdout. Logs go to stderr.

use std::io::{self, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Parses a JSON command line value
pub fn parse_json_arg(name: &str, text: &str) -> CliResult<Value> {
    serde_json::from_str(text)
        .map_err(|e| CliError::invalid_argument(format!("--{} is not valid JSON: {}", name, e)))
}

/// Prints `{"status":"ok","data":...}`
pub fn write_response(data: Value) -> CliResult<()> {
    print_line(&json!({ "status": "ok", "data": data }))
}

/// Prints `{"status":"error","code":...,"message":...}`
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    print_line(&json!({ "status": "error", "code": code, "message": message }))
}

fn print_line(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, response)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}
