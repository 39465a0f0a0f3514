// AgentView - app/headless.rs
//
// One-shot terminal modes behind `--query` and `--fetch-logs`. Same backend
// handling as the window; output goes to the supplied writer (stdout in the
// binary).

use crate::app::logs::fetch_collection;
use crate::app::query::resolve_query;
use crate::core::backend::Backend;
use crate::core::format::collection_json;
use crate::core::model::FetchProgress;
use std::io::{self, Write};

/// Run one query and print the displayed response, fallback included.
///
/// Returns `Ok(false)` when the backend call failed.
pub fn run_query(backend: &dyn Backend, query: &str, out: &mut impl Write) -> io::Result<bool> {
    let outcome = resolve_query(backend, query);
    writeln!(out, "\nResponse:\n{}\n", outcome.text)?;
    out.flush()?;
    Ok(!outcome.failed)
}

/// Print the log collection as pretty JSON. Nothing is written on failure.
///
/// Returns `Ok(false)` when the backend call failed.
pub fn run_fetch_logs(backend: &dyn Backend, out: &mut impl Write) -> io::Result<bool> {
    match fetch_collection(backend) {
        FetchProgress::Fetched { records } => {
            writeln!(out, "{}", collection_json(&records))?;
            out.flush()?;
            Ok(true)
        }
        FetchProgress::Failed => Ok(false),
    }
}
