// AgentView - core/backend.rs
//
// The service boundary the view talks to. The HTTP implementation lives in
// `platform::http`; tests substitute in-memory fakes.
//
// All methods block. They are only ever called from worker threads, never
// from the UI thread.

use crate::core::model::{LogCollection, LogRecord};
use crate::util::error::BackendError;
use tokio::sync::watch;

/// An open live-log connection.
///
/// Yields one item per `log_update` event in arrival order. `None` means the
/// connection ended or was cancelled; an `Err` item reports a failure after
/// which the stream yields nothing further. Dropping the stream releases the
/// connection.
pub type LogStream = Box<dyn Iterator<Item = Result<LogRecord, BackendError>> + Send>;

/// External backend collaborator.
pub trait Backend: Send + Sync {
    /// Send a query and return the backend's textual response.
    fn submit_query(&self, query: &str) -> Result<String, BackendError>;

    /// Fetch the full current log collection.
    fn fetch_logs(&self) -> Result<LogCollection, BackendError>;

    /// Open the persistent live-log connection.
    ///
    /// Once `cancel` fires, a blocked `next()` on the returned stream must
    /// return `None` promptly instead of waiting for the next event.
    fn open_log_stream(&self, cancel: CancelSignal) -> Result<LogStream, BackendError>;
}

// =============================================================================
// Cancellation
// =============================================================================

/// Create a linked cancel handle and signal.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

/// Owning side of a live-stream cancellation. Dropping it cancels too.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Observing side, handed to the stream worker and the backend.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolve once the handle cancels (or is gone).
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}
