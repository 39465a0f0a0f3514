// AgentView - app/state.rs
//
// View state. Holds the query/response pair, the fetched log collection, the
// live log entries, and the phase of each operation.
// Owned by `QueryView`; panels read it and set request flags on it.

use crate::core::model::{
    FetchPhase, FetchProgress, LiveLogEntry, LiveProgress, LiveStatus, LogCollection,
    QueryOutcome, SubmitPhase,
};

/// Complete state of one view instance. Nothing here is persisted.
#[derive(Debug)]
pub struct ViewState {
    /// Query text as typed by the user.
    pub query: String,

    /// Displayed response (backend text or the fallback message).
    pub response: String,

    /// Phase of the submit cycle.
    pub submit_phase: SubmitPhase,

    /// Collection from the most recent successful fetch.
    pub logs: LogCollection,

    /// Phase of the fetch cycle.
    pub fetch_phase: FetchPhase,

    /// Records received over the live stream, in arrival order.
    pub live_logs: Vec<LiveLogEntry>,

    /// Live connection status.
    pub live_status: LiveStatus,

    /// Whether this view subscribes to live updates at all.
    pub live_enabled: bool,

    /// Reason the live connection last dropped, if it failed.
    pub live_error: Option<String>,

    /// Backend address, shown in the status bar.
    pub base_url: String,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal warnings (config problems, export failures).
    pub warnings: Vec<String>,

    /// Whether the warnings window is open.
    pub show_warnings: bool,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,

    // ---- Requests raised by panels, handled by `QueryView::handle_requests` ----
    /// Submit the current `query`.
    pub request_submit: bool,
    /// Fetch the log collection.
    pub request_fetch_logs: bool,
    /// Re-open the live subscription.
    pub request_reconnect: bool,
    /// Empty the live entry list.
    pub request_clear_live: bool,
}

impl ViewState {
    pub fn new(base_url: impl Into<String>, live_enabled: bool, debug_mode: bool) -> Self {
        Self {
            query: String::new(),
            response: String::new(),
            submit_phase: SubmitPhase::Idle,
            logs: Vec::new(),
            fetch_phase: FetchPhase::Idle,
            live_logs: Vec::new(),
            live_status: LiveStatus::Disconnected,
            live_enabled,
            live_error: None,
            base_url: base_url.into(),
            status_message: "Ready.".to_string(),
            warnings: Vec::new(),
            show_warnings: false,
            debug_mode,
            request_submit: false,
            request_fetch_logs: false,
            request_reconnect: false,
            request_clear_live: false,
        }
    }

    /// Apply a completed submit.
    pub fn apply_query_outcome(&mut self, outcome: QueryOutcome) {
        self.submit_phase = if outcome.failed {
            SubmitPhase::ShowingError
        } else {
            SubmitPhase::ShowingResponse
        };
        self.status_message = if outcome.failed {
            "Query failed. See the log for details.".to_string()
        } else {
            "Response received.".to_string()
        };
        self.response = outcome.text;
    }

    /// Apply a completed fetch. A failed fetch leaves `logs` untouched.
    pub fn apply_fetch_progress(&mut self, progress: FetchProgress) {
        self.fetch_phase = FetchPhase::Idle;
        match progress {
            FetchProgress::Fetched { records } => {
                self.status_message = format!("Fetched {} log record(s).", records.len());
                self.logs = records;
            }
            FetchProgress::Failed => {
                self.status_message = "Log fetch failed. See the log for details.".to_string();
            }
        }
    }

    /// Apply one live subscription message. Records are always appended,
    /// even when the file name repeats.
    pub fn apply_live_progress(&mut self, progress: LiveProgress) {
        match progress {
            LiveProgress::Connected => {
                self.live_status = LiveStatus::Connected;
                self.live_error = None;
                self.status_message = "Live logs connected.".to_string();
            }
            LiveProgress::Record { record } => {
                self.live_logs.push(LiveLogEntry::received_now(record));
            }
            LiveProgress::Disconnected { reason } => {
                self.live_status = LiveStatus::Disconnected;
                self.status_message = match reason {
                    Some(_) => "Live logs disconnected after an error.".to_string(),
                    None => "Live logs closed by the backend.".to_string(),
                };
                self.live_error = reason;
            }
        }
    }

    /// Remove all live entries.
    pub fn clear_live_logs(&mut self) {
        self.live_logs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::LogRecord;

    fn state() -> ViewState {
        ViewState::new("http://localhost:5000", true, false)
    }

    #[test]
    fn test_new_state_is_idle_and_empty() {
        let s = state();
        assert_eq!(s.submit_phase, SubmitPhase::Idle);
        assert_eq!(s.fetch_phase, FetchPhase::Idle);
        assert_eq!(s.live_status, LiveStatus::Disconnected);
        assert!(s.query.is_empty() && s.response.is_empty());
        assert!(s.logs.is_empty() && s.live_logs.is_empty());
    }

    #[test]
    fn test_query_outcome_sets_terminal_phase() {
        let mut s = state();
        s.apply_query_outcome(QueryOutcome {
            text: "bar".to_string(),
            failed: false,
        });
        assert_eq!(s.response, "bar");
        assert_eq!(s.submit_phase, SubmitPhase::ShowingResponse);

        s.apply_query_outcome(QueryOutcome {
            text: "fallback".to_string(),
            failed: true,
        });
        assert_eq!(s.response, "fallback");
        assert_eq!(s.submit_phase, SubmitPhase::ShowingError);
    }

    #[test]
    fn test_failed_fetch_keeps_previous_collection() {
        let mut s = state();
        let records = vec![LogRecord::new("a.log", vec!["x".into()])];
        s.apply_fetch_progress(FetchProgress::Fetched {
            records: records.clone(),
        });
        s.apply_fetch_progress(FetchProgress::Failed);
        assert_eq!(s.logs, records);
        assert_eq!(s.fetch_phase, FetchPhase::Idle);
    }

    #[test]
    fn test_successful_fetch_replaces_collection_wholesale() {
        let mut s = state();
        s.apply_fetch_progress(FetchProgress::Fetched {
            records: vec![
                LogRecord::new("a.log", vec![]),
                LogRecord::new("b.log", vec![]),
            ],
        });
        s.apply_fetch_progress(FetchProgress::Fetched {
            records: vec![LogRecord::new("c.log", vec![])],
        });
        assert_eq!(s.logs, vec![LogRecord::new("c.log", vec![])]);
    }

    #[test]
    fn test_live_records_with_same_file_accumulate() {
        let mut s = state();
        s.apply_live_progress(LiveProgress::Connected);
        for line in ["one", "two"] {
            s.apply_live_progress(LiveProgress::Record {
                record: LogRecord::new("same.log", vec![line.to_string()]),
            });
        }
        assert_eq!(s.live_logs.len(), 2);
        assert_eq!(s.live_logs[0].record.lines, vec!["one".to_string()]);
        assert_eq!(s.live_logs[1].record.lines, vec!["two".to_string()]);
    }

    #[test]
    fn test_disconnect_keeps_entries_and_records_reason() {
        let mut s = state();
        s.apply_live_progress(LiveProgress::Connected);
        s.apply_live_progress(LiveProgress::Record {
            record: LogRecord::new("a.log", vec![]),
        });
        s.apply_live_progress(LiveProgress::Disconnected {
            reason: Some("reset".to_string()),
        });
        assert_eq!(s.live_status, LiveStatus::Disconnected);
        assert_eq!(s.live_error.as_deref(), Some("reset"));
        assert_eq!(s.live_logs.len(), 1);

        s.clear_live_logs();
        assert!(s.live_logs.is_empty());
    }
}
