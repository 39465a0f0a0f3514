// AgentView - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every backend failure carries the endpoint it came from so the operator
// console shows where a call went wrong, never just "request failed".

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all AgentView operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum AgentViewError {
    /// A call to the backend failed.
    Backend(BackendError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Export of the log collection failed.
    Export(ExportError),
}

impl fmt::Display for AgentViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(e) => write!(f, "Backend error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
        }
    }
}

impl std::error::Error for AgentViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Backend(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Export(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Backend errors
// ---------------------------------------------------------------------------

/// Failures talking to the backend.
///
/// All variants are the same kind to the view: a network or server failure
/// that ends the call. The variants exist for diagnostics only.
#[derive(Debug)]
pub enum BackendError {
    /// Connection refused, DNS failure, timeout, TLS failure, etc.
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status code.
    Status { endpoint: String, status: u16 },

    /// The response body (or a stream event payload) did not decode.
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },

    /// Reading from the live event stream failed.
    Stream { endpoint: String, source: io::Error },
}

impl BackendError {
    /// Endpoint URL the failing call was made against.
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. }
            | Self::Stream { endpoint, .. } => endpoint,
        }
    }

    /// Whether this is a network or server failure. Always true: it is the
    /// only failure kind the view distinguishes.
    pub fn is_network_or_server_failure(&self) -> bool {
        true
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { endpoint, source } => {
                write!(f, "Request to '{endpoint}' failed: {source}")
            }
            Self::Status { endpoint, status } => {
                write!(f, "'{endpoint}' returned HTTP status {status}")
            }
            Self::Decode { endpoint, source } => {
                write!(f, "Malformed payload from '{endpoint}': {source}")
            }
            Self::Stream { endpoint, source } => {
                write!(f, "Event stream '{endpoint}' read error: {source}")
            }
        }
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::Stream { source, .. } => Some(source),
            Self::Status { .. } => None,
        }
    }
}

impl From<BackendError> for AgentViewError {
    fn from(e: BackendError) -> Self {
        Self::Backend(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range or not recognised.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for AgentViewError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to exporting the log collection.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for AgentViewError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

/// Convenience type alias for AgentView results.
pub type Result<T> = std::result::Result<T, AgentViewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display_names_endpoint_and_code() {
        let err = BackendError::Status {
            endpoint: "http://localhost:5000/api/query".to_string(),
            status: 400,
        };
        let text = err.to_string();
        assert!(text.contains("/api/query"), "{text}");
        assert!(text.contains("400"), "{text}");
        assert_eq!(err.endpoint(), "http://localhost:5000/api/query");
        assert!(err.is_network_or_server_failure());
    }

    #[test]
    fn test_stream_error_preserves_source() {
        use std::error::Error;
        let err = BackendError::Stream {
            endpoint: "http://localhost:5000/api/logs/stream".to_string(),
            source: io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"),
        };
        let source = err.source().expect("stream errors carry their io cause");
        assert!(source.to_string().contains("reset by peer"));

        let top: AgentViewError = err.into();
        assert!(top.to_string().starts_with("Backend error:"));
    }
}
