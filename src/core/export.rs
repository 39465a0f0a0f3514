// AgentView - core/export.rs
//
// JSON export of the fetched log collection.
// Core layer: writes to any Write trait object, or straight to a file.

use crate::core::model::LogRecord;
use crate::util::error::{self, ExportError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Export records as a pretty-printed JSON array.
///
/// Returns the number of records written.
pub fn export_json<W: Write>(
    records: &[LogRecord],
    mut writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(&mut writer, records).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|e| ExportError::Io {
            path: export_path.to_path_buf(),
            source: e,
        })?;

    tracing::info!(
        path = %export_path.display(),
        records = records.len(),
        "Exported log collection"
    );

    Ok(records.len())
}

/// Create (or truncate) `path` and export the records into it.
pub fn export_json_file(records: &[LogRecord], path: &Path) -> error::Result<usize> {
    let file = File::create(path).map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(export_json(records, BufWriter::new(file), path)?)
}
