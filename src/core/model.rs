// AgentView - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers: the wire shapes
// exchanged with the backend, the phases of each view operation, and the
// messages background workers send back to the UI thread.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// =============================================================================
// Wire types
// =============================================================================

/// One named log source plus its captured lines.
///
/// Produced by the backend, both in the `/api/logs` array and as the payload
/// of each live `log_update` event. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Log file name as reported by the backend (not a local path).
    pub file: String,
    /// Captured lines. Lines may keep their trailing newline.
    pub lines: Vec<String>,
}

impl LogRecord {
    pub fn new(file: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            file: file.into(),
            lines,
        }
    }
}

/// Ordered sequence of log records.
pub type LogCollection = Vec<LogRecord>;

/// Request body for the query endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
}

/// Response body from the query endpoint. Any extra keys are ignored; a
/// missing `response` key is a decode failure.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub response: String,
}

// =============================================================================
// Live log entries
// =============================================================================

/// A record received over the live stream, stamped with its local arrival time.
#[derive(Debug, Clone)]
pub struct LiveLogEntry {
    pub record: LogRecord,
    pub received_at: DateTime<Local>,
}

impl LiveLogEntry {
    pub fn received_now(record: LogRecord) -> Self {
        Self {
            record,
            received_at: Local::now(),
        }
    }
}

// =============================================================================
// Operation phases
// =============================================================================

/// Submit cycle: `Idle -> Submitting -> (ShowingResponse | ShowingError)`.
/// Either terminal phase goes back to `Submitting` on the next submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
    ShowingResponse,
    ShowingError,
}

impl SubmitPhase {
    pub fn label(&self) -> &'static str {
        match self {
            SubmitPhase::Idle => "Idle",
            SubmitPhase::Submitting => "Submitting",
            SubmitPhase::ShowingResponse => "Response received",
            SubmitPhase::ShowingError => "Query failed",
        }
    }
}

/// Log list fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Fetching,
}

/// Live subscription connection status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiveStatus {
    #[default]
    Disconnected,
    Connected,
}

// =============================================================================
// Worker -> UI messages
// =============================================================================

/// Outcome of one submit, already converted to display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    /// Text to display as the response (the fallback message on failure).
    pub text: String,
    /// Whether the call failed.
    pub failed: bool,
}

/// Message sent by a log-list fetch worker.
#[derive(Debug)]
pub enum FetchProgress {
    /// The backend returned a collection; it replaces the displayed one.
    Fetched { records: LogCollection },
    /// The call failed; displayed state is left unchanged.
    Failed,
}

/// Message sent by the live subscription worker.
#[derive(Debug)]
pub enum LiveProgress {
    /// The stream connection is open.
    Connected,
    /// A `log_update` event arrived.
    Record { record: LogRecord },
    /// The connection ended. `reason` is `None` when the server closed it cleanly.
    Disconnected { reason: Option<String> },
}
