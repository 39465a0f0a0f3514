// AgentView - app/query.rs
//
// Query submission lifecycle. Each submit runs on its own background thread
// and delivers a single `QueryOutcome` over an mpsc channel that the UI
// thread polls each frame.
//
// A new submit replaces the receiver of the previous one, so a superseded
// request's result is discarded when it eventually arrives. Failures are
// converted to the fallback message here; nothing propagates to the caller.

use crate::core::backend::Backend;
use crate::core::model::QueryOutcome;
use crate::util::constants::QUERY_FALLBACK_MESSAGE;
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;

/// Run one query against `backend` and convert the result to display form.
///
/// Shared by the view's worker thread and the headless `--query` mode.
pub fn resolve_query(backend: &dyn Backend, query: &str) -> QueryOutcome {
    match backend.submit_query(query) {
        Ok(text) => {
            tracing::info!(response_len = text.len(), "Query completed");
            QueryOutcome {
                text,
                failed: false,
            }
        }
        Err(e) => {
            tracing::error!(endpoint = %e.endpoint(), error = %e, "Query failed");
            fallback_outcome()
        }
    }
}

fn fallback_outcome() -> QueryOutcome {
    QueryOutcome {
        text: QUERY_FALLBACK_MESSAGE.to_string(),
        failed: true,
    }
}

/// Manages in-flight query submissions.
pub struct QueryManager {
    /// Receiver for the most recent submit, `None` when nothing is pending.
    outcome_rx: Option<mpsc::Receiver<QueryOutcome>>,
}

impl QueryManager {
    pub fn new() -> Self {
        Self { outcome_rx: None }
    }

    /// Start a submit on a background thread, superseding any pending one.
    pub fn start_submit(&mut self, backend: Arc<dyn Backend>, query: String) {
        if self.outcome_rx.is_some() {
            tracing::debug!("Superseding pending query");
        }

        let (tx, rx) = mpsc::channel();
        self.outcome_rx = Some(rx);

        std::thread::spawn(move || {
            let outcome = resolve_query(backend.as_ref(), &query);
            // The receiver is gone if this submit was superseded.
            let _ = tx.send(outcome);
        });
    }

    /// Whether a submit is still awaiting its outcome.
    pub fn is_pending(&self) -> bool {
        self.outcome_rx.is_some()
    }

    /// Take the outcome of the pending submit if it has arrived.
    pub fn poll_outcome(&mut self) -> Option<QueryOutcome> {
        let rx = self.outcome_rx.as_ref()?;
        match rx.try_recv() {
            Ok(outcome) => {
                self.outcome_rx = None;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                // Worker died without reporting (panic inside the backend).
                tracing::error!("Query worker exited without a result");
                self.outcome_rx = None;
                Some(fallback_outcome())
            }
        }
    }
}

impl Default for QueryManager {
    fn default() -> Self {
        Self::new()
    }
}
