//! nodelink CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`. Failures are
//! reported as a JSON error object and a non-zero exit status.

use nodelink::cli;

fn main() {
    if let Err(e) = cli::run() {
        if cli::write_error(e.code_str(), e.message()).is_err() {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}
