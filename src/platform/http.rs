// AgentView - platform/http.rs
//
// HTTP implementation of the `Backend` seam.
//
// Query and log-list requests use reqwest's blocking client, bounded by the
// configured request timeout. Response bodies are decoded with serde_json
// directly rather than through reqwest's `json()`, so a malformed body is
// reported as `Decode` and a dropped connection as `Transport`.
//
// The live event stream runs on reqwest's async client instead, driven by a
// single-threaded tokio runtime owned by the stream itself. Every wait on
// the connection races the cancel signal, so cancelling wakes a blocked
// reader at once; dropping the stream then drops the runtime and with it
// the socket. There is no overall timeout on that connection.

use crate::core::backend::{Backend, CancelSignal, LogStream};
use crate::core::event_stream::{decode_log_update, EventStreamDecoder, SseEvent};
use crate::core::model::{LogCollection, LogRecord, QueryRequest, QueryResponse};
use crate::util::constants::{LOGS_PATH, LOG_STREAM_PATH, QUERY_PATH};
use crate::util::error::BackendError;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use std::collections::VecDeque;
use std::io;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Backend reached over HTTP at a fixed base address.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

impl HttpBackend {
    /// Build a backend for `base_url` (e.g. `http://localhost:5000`).
    ///
    /// A trailing slash on the base address is ignored.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, BackendError> {
        let base_url = base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| transport(&base_url, e))?;

        tracing::debug!(base_url = %base_url, timeout_secs = request_timeout.as_secs(), "HTTP backend ready");

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Backend for HttpBackend {
    fn submit_query(&self, query: &str) -> Result<String, BackendError> {
        let endpoint = self.endpoint(QUERY_PATH);
        tracing::debug!(endpoint = %endpoint, query_len = query.len(), "POST query");

        let response = self
            .client
            .post(&endpoint)
            .json(&QueryRequest { query })
            .send()
            .map_err(|e| transport(&endpoint, e))?;

        let body = success_body(&endpoint, response)?;
        let parsed: QueryResponse =
            serde_json::from_slice(&body).map_err(|e| BackendError::Decode {
                endpoint: endpoint.clone(),
                source: e,
            })?;
        Ok(parsed.response)
    }

    fn fetch_logs(&self) -> Result<LogCollection, BackendError> {
        let endpoint = self.endpoint(LOGS_PATH);
        tracing::debug!(endpoint = %endpoint, "GET logs");

        let response = self
            .client
            .get(&endpoint)
            .send()
            .map_err(|e| transport(&endpoint, e))?;

        let body = success_body(&endpoint, response)?;
        serde_json::from_slice(&body).map_err(|e| BackendError::Decode { endpoint, source: e })
    }

    fn open_log_stream(&self, mut cancel: CancelSignal) -> Result<LogStream, BackendError> {
        let endpoint = self.endpoint(LOG_STREAM_PATH);
        tracing::debug!(endpoint = %endpoint, "Opening live log stream");

        let stream_error = |source: io::Error| BackendError::Stream {
            endpoint: endpoint.clone(),
            source,
        };
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(stream_error)?;
        // One client per connection: its pool belongs to this runtime.
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| transport(&endpoint, e))?;

        let request = client
            .get(&endpoint)
            .header(ACCEPT, "text/event-stream")
            .send();
        let sent = runtime.block_on(async {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = request => Some(result),
            }
        });
        let response = match sent {
            Some(result) => result.map_err(|e| transport(&endpoint, e))?,
            None => {
                tracing::debug!(endpoint = %endpoint, "Live stream cancelled while connecting");
                return Ok(Box::new(std::iter::empty()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(io::Error::other))
            .boxed();
        Ok(Box::new(SseLogStream::new(endpoint, runtime, chunks, cancel)))
    }
}

fn transport(endpoint: &str, source: reqwest::Error) -> BackendError {
    BackendError::Transport {
        endpoint: endpoint.to_string(),
        source,
    }
}

/// Check the status and read the whole body of a finished request.
fn success_body(endpoint: &str, response: Response) -> Result<Vec<u8>, BackendError> {
    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }
    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|e| transport(endpoint, e))
}

// =============================================================================
// Live stream reader
// =============================================================================

/// Body of an open event stream, as raw chunks.
pub type ChunkStream = BoxStream<'static, io::Result<Bytes>>;

/// Decodes an event stream chunk by chunk and yields `log_update` records.
///
/// Other event names are skipped. A `log_update` whose payload does not
/// decode is logged and skipped; the connection stays open. `next()` returns
/// `None` as soon as the cancel signal fires, releasing the body.
pub struct SseLogStream {
    endpoint: String,
    chunks: Option<ChunkStream>,
    decoder: EventStreamDecoder,
    pending: VecDeque<SseEvent>,
    cancel: CancelSignal,
    // Declared last: the body must drop before the runtime driving it.
    runtime: Runtime,
}

impl SseLogStream {
    pub fn new(
        endpoint: String,
        runtime: Runtime,
        chunks: ChunkStream,
        cancel: CancelSignal,
    ) -> Self {
        Self {
            endpoint,
            chunks: Some(chunks),
            decoder: EventStreamDecoder::new(),
            pending: VecDeque::new(),
            cancel,
            runtime,
        }
    }

    fn release(&mut self) {
        self.chunks = None;
        self.pending.clear();
    }
}

impl Iterator for SseLogStream {
    type Item = Result<LogRecord, BackendError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.cancel.is_cancelled() {
                self.release();
                return None;
            }

            if let Some(event) = self.pending.pop_front() {
                match decode_log_update(&event) {
                    Some(Ok(record)) => return Some(Ok(record)),
                    Some(Err(e)) => {
                        tracing::warn!(
                            endpoint = %self.endpoint,
                            error = %e,
                            "Live stream: malformed log_update payload skipped"
                        );
                    }
                    None => {
                        tracing::debug!(event = %event.event, "Live stream: ignoring event");
                    }
                }
                continue;
            }

            let chunks = self.chunks.as_mut()?;
            let cancel = &mut self.cancel;
            let next = self.runtime.block_on(async {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    chunk = chunks.next() => Some(chunk),
                }
            });

            match next {
                // Cancelled: checked again at the top of the loop.
                None => continue,
                Some(None) => {
                    self.release();
                    return None;
                }
                Some(Some(Err(e))) => {
                    self.release();
                    return Some(Err(BackendError::Stream {
                        endpoint: self.endpoint.clone(),
                        source: e,
                    }));
                }
                Some(Some(Ok(chunk))) => {
                    let events = self.decoder.push_chunk(&chunk);
                    self.pending.extend(events);
                }
            }
        }
    }
}
