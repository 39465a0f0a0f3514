// AgentView - app/logs.rs
//
// Log-list fetch lifecycle. Same shape as the query manager: one background
// thread per fetch, one message back, latest fetch wins.

use crate::core::backend::Backend;
use crate::core::model::FetchProgress;
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;

/// Fetch the collection from `backend`, logging any failure.
pub fn fetch_collection(backend: &dyn Backend) -> FetchProgress {
    match backend.fetch_logs() {
        Ok(records) => {
            tracing::info!(records = records.len(), "Log collection fetched");
            FetchProgress::Fetched { records }
        }
        Err(e) => {
            tracing::error!(endpoint = %e.endpoint(), error = %e, "Log fetch failed");
            FetchProgress::Failed
        }
    }
}

/// Manages in-flight log-list fetches.
pub struct LogsManager {
    progress_rx: Option<mpsc::Receiver<FetchProgress>>,
}

impl LogsManager {
    pub fn new() -> Self {
        Self { progress_rx: None }
    }

    /// Start a fetch on a background thread, superseding any pending one.
    pub fn start_fetch(&mut self, backend: Arc<dyn Backend>) {
        let (tx, rx) = mpsc::channel();
        self.progress_rx = Some(rx);

        std::thread::spawn(move || {
            let _ = tx.send(fetch_collection(backend.as_ref()));
        });

        tracing::debug!("Log fetch started");
    }

    pub fn is_pending(&self) -> bool {
        self.progress_rx.is_some()
    }

    /// Take the result of the pending fetch if it has arrived.
    pub fn poll_progress(&mut self) -> Option<FetchProgress> {
        let rx = self.progress_rx.as_ref()?;
        match rx.try_recv() {
            Ok(progress) => {
                self.progress_rx = None;
                Some(progress)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::error!("Log fetch worker exited without a result");
                self.progress_rx = None;
                Some(FetchProgress::Failed)
            }
        }
    }
}

impl Default for LogsManager {
    fn default() -> Self {
        Self::new()
    }
}
