// AgentView - tests/e2e_backend.rs
//
// End-to-end tests for the HTTP backend and the QueryView.
//
// These tests run a real HTTP server (axum on its own tokio runtime thread)
// that speaks the backend contract: JSON query and log endpoints plus a
// text/event-stream live log endpoint. The client side is the production
// `HttpBackend` over real sockets; no mocks. One test uses a bare TCP server
// instead, to watch the connection itself.

use agentview::app::state::ViewState;
use agentview::app::view::QueryView;
use agentview::core::backend::{cancel_pair, Backend};
use agentview::core::model::{LiveStatus, LogRecord, SubmitPhase};
use agentview::platform::http::HttpBackend;
use agentview::util::constants::QUERY_FALLBACK_MESSAGE;
use agentview::util::error::BackendError;
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::stream::{self, Stream};
use serde_json::json;
use std::convert::Infallible;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

// =============================================================================
// Test server
// =============================================================================

async fn handle_query(Json(body): Json<serde_json::Value>) -> Response {
    let query = body
        .get("query")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    match query.as_str() {
        "" => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Query is required" })),
        )
            .into_response(),
        "foo" => Json(json!({ "response": "bar" })).into_response(),
        "garbage" => (StatusCode::OK, "this is not json").into_response(),
        other => Json(json!({ "response": format!("echo: {other}") })).into_response(),
    }
}

async fn handle_logs() -> Json<serde_json::Value> {
    Json(json!([{ "file": "a.log", "lines": ["x", "y"] }]))
}

async fn handle_logs_failing() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Emits a comment, two updates for the same file around an unrelated event,
/// then ends the response.
async fn handle_stream() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = vec![
        Event::default().comment("keep-alive"),
        Event::default()
            .event("log_update")
            .data(r#"{"file":"a.log","lines":["x\n"]}"#),
        Event::default().event("heartbeat").data("{}"),
        Event::default()
            .event("log_update")
            .data(r#"{"file":"a.log","lines":["y\n"]}"#),
    ];
    Sse::new(stream::iter(events.into_iter().map(Ok)))
}

fn healthy_router() -> Router {
    Router::new()
        .route("/api/query", post(handle_query))
        .route("/api/logs", get(handle_logs))
        .route("/api/logs/stream", get(handle_stream))
}

fn failing_router() -> Router {
    Router::new()
        .route("/api/query", post(handle_query))
        .route("/api/logs", get(handle_logs_failing))
}

/// Logs succeed on the first call and fail with 500 afterwards.
fn flaky_logs_router() -> Router {
    let calls = Arc::new(AtomicUsize::new(0));
    Router::new()
        .route("/api/query", post(handle_query))
        .route(
            "/api/logs",
            get(move || {
                let calls = Arc::clone(&calls);
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        handle_logs().await.into_response()
                    } else {
                        StatusCode::INTERNAL_SERVER_ERROR.into_response()
                    }
                }
            }),
        )
}

/// Start `router` on an ephemeral port and return its base address.
///
/// The listener is bound before this returns, so requests made immediately
/// afterwards queue rather than being refused.
fn spawn_server(router: Router) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, router).await.unwrap();
        });
    });

    format!("http://{addr}")
}

/// Accept one connection, answer with event-stream headers, and never send
/// an event. The receiver gets a message once the client closes its end.
fn spawn_idle_stream_server() -> (String, mpsc::Receiver<()>) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (closed_tx, closed_rx) = mpsc::channel();

    std::thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf) {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\n\
                  Content-Type: text/event-stream\r\n\
                  Cache-Control: no-cache\r\n\
                  Transfer-Encoding: chunked\r\n\r\n",
            )
            .unwrap();
        socket.flush().unwrap();

        loop {
            match socket.read(&mut buf) {
                Ok(0) | Err(_) => {
                    let _ = closed_tx.send(());
                    return;
                }
                Ok(_) => {}
            }
        }
    });

    (format!("http://{addr}"), closed_rx)
}

/// An address nothing listens on.
fn unreachable_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn backend(base_url: &str) -> HttpBackend {
    HttpBackend::new(base_url, Duration::from_secs(5)).unwrap()
}

fn wait_until(view: &mut QueryView, done: impl Fn(&QueryView) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        view.poll();
        if done(view) {
            return;
        }
        assert!(Instant::now() < deadline, "timed out waiting for view state");
        std::thread::sleep(Duration::from_millis(10));
    }
}

// =============================================================================
// HttpBackend E2E
// =============================================================================

#[test]
fn e2e_query_returns_response_text() {
    let base = spawn_server(healthy_router());
    assert_eq!(backend(&base).submit_query("foo").unwrap(), "bar");
    assert_eq!(backend(&base).submit_query("hello").unwrap(), "echo: hello");
}

#[test]
fn e2e_query_non_success_status_is_status_error() {
    let base = spawn_server(healthy_router());
    let result = backend(&base).submit_query("");
    assert!(
        matches!(result, Err(BackendError::Status { status: 400, .. })),
        "expected 400 Status error, got {result:?}"
    );
}

#[test]
fn e2e_query_malformed_body_is_decode_error() {
    let base = spawn_server(healthy_router());
    let result = backend(&base).submit_query("garbage");
    assert!(
        matches!(result, Err(BackendError::Decode { .. })),
        "expected Decode error, got {result:?}"
    );
}

#[test]
fn e2e_unreachable_backend_is_transport_error() {
    let base = unreachable_address();
    let result = backend(&base).submit_query("foo");
    assert!(
        matches!(result, Err(BackendError::Transport { .. })),
        "expected Transport error, got {result:?}"
    );
}

#[test]
fn e2e_fetch_logs_returns_collection() {
    let base = spawn_server(healthy_router());
    let records = backend(&base).fetch_logs().unwrap();
    assert_eq!(
        records,
        vec![LogRecord::new("a.log", vec!["x".to_string(), "y".to_string()])]
    );
}

#[test]
fn e2e_fetch_logs_server_error_is_status_error() {
    let base = spawn_server(failing_router());
    let result = backend(&base).fetch_logs();
    assert!(
        matches!(result, Err(BackendError::Status { status: 500, .. })),
        "expected 500 Status error, got {result:?}"
    );
}

#[test]
fn e2e_stream_yields_every_update_in_order() {
    let base = spawn_server(healthy_router());
    let (_handle, signal) = cancel_pair();
    let stream = backend(&base).open_log_stream(signal).unwrap();
    let records: Vec<LogRecord> = stream.map(|r| r.unwrap()).collect();
    assert_eq!(
        records,
        vec![
            LogRecord::new("a.log", vec!["x\n".to_string()]),
            LogRecord::new("a.log", vec!["y\n".to_string()]),
        ]
    );
}

#[test]
fn e2e_stream_missing_endpoint_is_status_error() {
    let base = spawn_server(failing_router());
    let (_handle, signal) = cancel_pair();
    let result = backend(&base).open_log_stream(signal);
    assert!(
        matches!(result, Err(BackendError::Status { status: 404, .. })),
        "expected 404 Status error"
    );
}

// =============================================================================
// QueryView E2E
// =============================================================================

#[test]
fn e2e_view_full_session() {
    let base = spawn_server(healthy_router());
    let mut view = QueryView::new(
        Arc::new(backend(&base)),
        ViewState::new(base.clone(), true, false),
    );

    view.mount();
    view.state.query = "foo".to_string();
    view.submit_current();
    view.fetch_logs();

    wait_until(&mut view, |v| {
        !v.is_busy()
            && v.state.live_logs.len() == 2
            && v.state.live_status == LiveStatus::Disconnected
    });

    assert_eq!(view.state.response, "bar");
    assert_eq!(view.state.submit_phase, SubmitPhase::ShowingResponse);
    assert_eq!(view.state.logs.len(), 1);
    assert_eq!(view.state.logs[0].file, "a.log");
    // Same file twice: both kept.
    assert_eq!(view.state.live_logs[0].record.file, "a.log");
    assert_eq!(view.state.live_logs[1].record.file, "a.log");
    // The server ended the stream cleanly.
    assert!(view.state.live_error.is_none());
}

#[test]
fn e2e_view_failures_degrade_gracefully() {
    let base = spawn_server(flaky_logs_router());
    let mut view = QueryView::new(
        Arc::new(backend(&base)),
        ViewState::new(base.clone(), false, false),
    );

    view.fetch_logs();
    wait_until(&mut view, |v| !v.is_busy());
    let loaded = view.state.logs.clone();
    assert_eq!(loaded.len(), 1);

    // Empty query is sent; the backend rejects it with 400. The second
    // fetch gets a 500.
    view.submit("");
    view.fetch_logs();
    wait_until(&mut view, |v| !v.is_busy());

    assert_eq!(view.state.response, QUERY_FALLBACK_MESSAGE);
    assert_eq!(view.state.submit_phase, SubmitPhase::ShowingError);
    assert_eq!(view.state.logs, loaded);
}

#[test]
fn e2e_unmount_closes_an_idle_stream_connection() {
    let (base, closed) = spawn_idle_stream_server();
    let mut view = QueryView::new(
        Arc::new(backend(&base)),
        ViewState::new(base.clone(), true, false),
    );
    view.mount();
    wait_until(&mut view, |v| v.state.live_status == LiveStatus::Connected);
    assert!(closed.try_recv().is_err());

    // The view stays alive; unmount alone must release the socket.
    view.unmount();
    assert!(
        closed.recv_timeout(Duration::from_secs(5)).is_ok(),
        "server still holds the stream connection after unmount"
    );
}

#[test]
fn e2e_view_unreachable_backend_shows_fallback() {
    let base = unreachable_address();
    let mut view = QueryView::new(
        Arc::new(backend(&base)),
        ViewState::new(base.clone(), true, false),
    );
    view.mount();
    view.submit("foo");

    wait_until(&mut view, |v| !v.is_busy() && v.state.live_error.is_some());
    assert_eq!(view.state.response, QUERY_FALLBACK_MESSAGE);
    assert_eq!(view.state.live_status, LiveStatus::Disconnected);
    assert!(view.state.live_logs.is_empty());
}
