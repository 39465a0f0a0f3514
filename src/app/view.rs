// AgentView - app/view.rs
//
// QueryView: the single view component. Translates user actions into
// backend calls on background workers and folds their results into
// `ViewState`.
//
// The UI thread calls `handle_requests()` then `poll()` once per frame.
// Submit, fetch and the live subscription are independent; each only ever
// touches its own slice of state, so their completions may interleave in
// any order.
//
// Lifecycle: `mount()` opens the live subscription, `unmount()` releases it.
// Dropping the view unmounts it.

use crate::app::live::LiveLogManager;
use crate::app::logs::LogsManager;
use crate::app::query::QueryManager;
use crate::app::state::ViewState;
use crate::core::backend::Backend;
use crate::core::model::{FetchPhase, LiveProgress, LiveStatus, SubmitPhase};
use std::sync::Arc;

pub struct QueryView {
    pub state: ViewState,
    backend: Arc<dyn Backend>,
    query_manager: QueryManager,
    logs_manager: LogsManager,
    live_manager: LiveLogManager,
}

impl QueryView {
    pub fn new(backend: Arc<dyn Backend>, state: ViewState) -> Self {
        Self {
            state,
            backend,
            query_manager: QueryManager::new(),
            logs_manager: LogsManager::new(),
            live_manager: LiveLogManager::new(),
        }
    }

    /// Open the live subscription. No-op when live logs are disabled or a
    /// subscription is already attached.
    pub fn mount(&mut self) {
        if !self.state.live_enabled || self.live_manager.is_active() {
            return;
        }
        self.live_manager.start(Arc::clone(&self.backend));
        self.state.live_error = None;
        self.state.status_message = "Connecting to live logs...".to_string();
    }

    /// Release the live subscription. Events that have not been applied by
    /// the time this returns are never applied.
    pub fn unmount(&mut self) {
        self.live_manager.stop();
        self.state.live_status = LiveStatus::Disconnected;
    }

    /// Whether a live subscription worker is attached.
    pub fn is_mounted(&self) -> bool {
        self.live_manager.is_active()
    }

    /// Manual recovery for a dropped live connection.
    pub fn reconnect(&mut self) {
        tracing::info!("Reconnecting live logs");
        self.unmount();
        self.mount();
    }

    /// Send `query` to the backend. Empty queries are sent as-is.
    pub fn submit(&mut self, query: &str) {
        tracing::debug!(query_len = query.len(), "Submit");
        self.state.submit_phase = SubmitPhase::Submitting;
        self.state.status_message = "Submitting query...".to_string();
        self.query_manager
            .start_submit(Arc::clone(&self.backend), query.to_string());
    }

    /// Submit whatever is currently in the query box.
    pub fn submit_current(&mut self) {
        let query = self.state.query.clone();
        self.submit(&query);
    }

    /// Request the full log collection.
    pub fn fetch_logs(&mut self) {
        self.state.fetch_phase = FetchPhase::Fetching;
        self.state.status_message = "Fetching logs...".to_string();
        self.logs_manager.start_fetch(Arc::clone(&self.backend));
    }

    pub fn clear_live_logs(&mut self) {
        self.state.clear_live_logs();
    }

    /// Whether a submit or fetch is still in flight.
    pub fn is_busy(&self) -> bool {
        self.query_manager.is_pending() || self.logs_manager.is_pending()
    }

    /// Act on request flags raised by the panels.
    pub fn handle_requests(&mut self) {
        if std::mem::take(&mut self.state.request_submit) {
            self.submit_current();
        }
        if std::mem::take(&mut self.state.request_fetch_logs) {
            self.fetch_logs();
        }
        if std::mem::take(&mut self.state.request_reconnect) {
            self.reconnect();
        }
        if std::mem::take(&mut self.state.request_clear_live) {
            self.clear_live_logs();
        }
    }

    /// Drain worker results into state. Returns `true` if anything changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        if let Some(outcome) = self.query_manager.poll_outcome() {
            self.state.apply_query_outcome(outcome);
            changed = true;
        }

        if let Some(progress) = self.logs_manager.poll_progress() {
            self.state.apply_fetch_progress(progress);
            changed = true;
        }

        for msg in self.live_manager.poll_progress() {
            let ended = matches!(msg, LiveProgress::Disconnected { .. });
            self.state.apply_live_progress(msg);
            if ended {
                self.live_manager.detach();
            }
            changed = true;
        }

        changed
    }
}

impl Drop for QueryView {
    fn drop(&mut self) {
        self.unmount();
    }
}
