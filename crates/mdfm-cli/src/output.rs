//! Rendering command results as JSON on stdout.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use serde_json::{json, Value as Json};
use tracing::debug;

use mdfm_core::{ErrorKind, FrontmatterError, Result};

/// Print a command outcome and pick the exit code.
///
/// Failures are printed as `{"error": ..., "kind": ...}`. Not-found
/// failures still exit successfully; callers read the JSON to tell them
/// apart from results.
pub fn emit(outcome: Result<Json>) -> anyhow::Result<ExitCode> {
    let (body, code) = match outcome {
        Ok(body) => (body, ExitCode::SUCCESS),
        Err(err) => {
            debug!(error = %err, "command failed");
            let code = if fails_process(err.kind()) {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            (error_body(&err), code)
        }
    };

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &body).context("failed to write output")?;
    writeln!(stdout).context("failed to write output")?;
    Ok(code)
}

fn fails_process(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::InvalidInput | ErrorKind::Io)
}

fn error_body(err: &FrontmatterError) -> Json {
    let mut body = json!({
        "error": err.to_string(),
        "kind": err.kind(),
    });
    if let FrontmatterError::FileNotFound(path) = err {
        body["path"] = json!(path.display().to_string());
    }
    body
}
