// AgentView - app/live.rs
//
// Live log subscription: holds the single persistent event-stream connection
// and streams each `log_update` record to the UI as it arrives.
//
// Architecture:
//   - `LiveLogManager` lives on the UI thread; `run_live_subscription` runs on
//     a background thread that owns the connection.
//   - `stop()` fires a `CancelHandle`; the backend's stream wakes from its
//     blocked read, returns `None`, and the worker drops it, closing the
//     connection without waiting for another event.
//   - Records are sent as `LiveProgress::Record` over an mpsc channel that
//     the UI thread drains each frame.
//
// Teardown guarantee: `stop()` drops the receiver as well as cancelling, so
// anything the worker sends afterwards is discarded and can never reach
// view state.
//
// There is no automatic reconnect. A dropped connection is reported once as
// `Disconnected` and recovery is a manual reconnect.

use crate::core::backend::{cancel_pair, Backend, CancelHandle, CancelSignal};
use crate::core::model::LiveProgress;
use std::sync::{mpsc, Arc};

/// Manages the live subscription thread.
pub struct LiveLogManager {
    /// Channel receiver for the UI to poll live progress messages.
    progress_rx: Option<mpsc::Receiver<LiveProgress>>,
    /// Cancels the background thread's connection.
    cancel: Option<CancelHandle>,
}

impl LiveLogManager {
    pub fn new() -> Self {
        Self {
            progress_rx: None,
            cancel: None,
        }
    }

    /// Open the subscription on a background thread.
    ///
    /// If one is already running it is stopped first.
    pub fn start(&mut self, backend: Arc<dyn Backend>) {
        self.stop();

        let (tx, rx) = mpsc::channel();
        let (handle, signal) = cancel_pair();

        self.progress_rx = Some(rx);
        self.cancel = Some(handle);

        std::thread::spawn(move || {
            run_live_subscription(backend, tx, signal);
        });

        tracing::info!("Live log subscription starting");
    }

    /// Tear down the subscription. No message from the current worker is
    /// delivered after this returns.
    pub fn stop(&mut self) {
        if let Some(handle) = self.cancel.take() {
            handle.cancel();
            tracing::info!("Live log subscription stopped");
        }
        self.progress_rx = None;
    }

    /// Returns `true` while a subscription worker is attached.
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Drain all currently queued messages without blocking.
    pub fn poll_progress(&self) -> Vec<LiveProgress> {
        let mut messages = Vec::new();
        if let Some(ref rx) = self.progress_rx {
            while let Ok(msg) = rx.try_recv() {
                messages.push(msg);
            }
        }
        messages
    }

    /// Forget a worker that has reported `Disconnected`.
    pub(crate) fn detach(&mut self) {
        self.cancel = None;
        self.progress_rx = None;
    }
}

impl Default for LiveLogManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Background loop: open the stream, forward every record, report the end.
fn run_live_subscription(
    backend: Arc<dyn Backend>,
    tx: mpsc::Sender<LiveProgress>,
    cancel: CancelSignal,
) {
    macro_rules! send {
        ($msg:expr) => {
            if tx.send($msg).is_err() {
                // Subscription torn down; exit silently.
                return;
            }
        };
    }

    let stream = match backend.open_log_stream(cancel.clone()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!(endpoint = %e.endpoint(), error = %e, "Live log stream failed to open");
            send!(LiveProgress::Disconnected {
                reason: Some(e.to_string()),
            });
            return;
        }
    };

    if cancel.is_cancelled() {
        return;
    }
    send!(LiveProgress::Connected);

    let mut received: u64 = 0;
    for item in stream {
        if cancel.is_cancelled() {
            break;
        }
        match item {
            Ok(record) => {
                received += 1;
                tracing::debug!(file = %record.file, lines = record.lines.len(), "Live stream: log update");
                send!(LiveProgress::Record { record });
            }
            Err(e) => {
                tracing::error!(endpoint = %e.endpoint(), error = %e, "Live log stream failed");
                send!(LiveProgress::Disconnected {
                    reason: Some(e.to_string()),
                });
                return;
            }
        }
    }

    if cancel.is_cancelled() {
        tracing::debug!(received, "Live stream: cancelled, connection released");
        return;
    }
    tracing::info!(received, "Live log stream closed by server");
    send!(LiveProgress::Disconnected { reason: None });
}
