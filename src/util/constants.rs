// AgentView - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "AgentView";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "AgentView";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Window title heading shown above the query box.
pub const VIEW_HEADING: &str = "Multi-Agent Assistant";

// =============================================================================
// Backend contract
// =============================================================================

/// Backend base address used when neither config nor CLI provide one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Query endpoint path (POST, JSON `{ "query": ... }`).
pub const QUERY_PATH: &str = "/api/query";

/// Log list endpoint path (GET, JSON array of records).
pub const LOGS_PATH: &str = "/api/logs";

/// Live log event stream path (GET, `text/event-stream`).
pub const LOG_STREAM_PATH: &str = "/api/logs/stream";

/// Event name carrying a `{ file, lines }` payload on the live stream.
pub const LOG_UPDATE_EVENT: &str = "log_update";

/// Event name assigned to SSE events that carry no `event:` field.
pub const DEFAULT_EVENT_NAME: &str = "message";

/// Text displayed in place of a response when a submit fails for any reason.
pub const QUERY_FALLBACK_MESSAGE: &str = "Error occurred while processing the query.";

// =============================================================================
// Network limits
// =============================================================================

/// Default timeout for query and log-list requests.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Minimum configurable request timeout.
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Maximum configurable request timeout.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

/// A single SSE event whose accumulated `data` exceeds this many bytes is
/// discarded instead of decoded.
pub const MAX_EVENT_BYTES: usize = 1024 * 1024;

// =============================================================================
// UI
// =============================================================================

/// Repaint interval while the live subscription is connected. Worker messages
/// are only drained during a frame, so an idle window must still wake up.
pub const LIVE_REPAINT_INTERVAL_MS: u64 = 250;

/// Default body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Minimum configurable font size.
pub const MIN_FONT_SIZE: f32 = 8.0;

/// Maximum configurable font size.
pub const MAX_FONT_SIZE: f32 = 32.0;

// =============================================================================
// Configuration & logging
// =============================================================================

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default tracing filter when nothing else is specified.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
