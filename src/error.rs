//! Error handling for the server_info dashboard.

use std::time::Duration;

/// A specialized `Result` type for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// The main error type for the fetch-parse-render cycle.
///
/// `Network`, `Timeout` and `MalformedResponse` abort a whole tick.
/// `MissingField` and `ParseError` only ever concern a single display slot.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The endpoint could not be reached or answered with an error status
    #[error("Network error: {0}")]
    Network(String),

    /// The fetch did not complete within the configured timeout
    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),

    /// The payload is not a JSON object
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A leaf field is absent from the snapshot
    #[error("Missing field: {0}")]
    MissingField(String),

    /// A field is present but could not be decoded
    #[error("Failed to parse field: {0}")]
    ParseError(String),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DashboardError {
    /// Create a new network error
    pub fn network_error(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new malformed-response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a new missing-field error
    pub fn missing_field(path: impl Into<String>) -> Self {
        Self::MissingField(path.into())
    }

    /// Create a new parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error discards the whole tick rather than a single slot.
    pub fn aborts_tick(&self) -> bool {
        !matches!(self, Self::MissingField(_) | Self::ParseError(_))
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_do_not_abort_tick() {
        assert!(!DashboardError::missing_field("os.kernel_version").aborts_tick());
        assert!(!DashboardError::parse_error("uptime").aborts_tick());
        assert!(DashboardError::network_error("refused").aborts_tick());
        assert!(DashboardError::Timeout(Duration::from_secs(1)).aborts_tick());
        assert!(DashboardError::malformed("eof").aborts_tick());
    }

    #[test]
    fn test_json_error_is_malformed_response() {
        let err: DashboardError = serde_json::from_str::<serde_json::Value>("{\"os\":")
            .unwrap_err()
            .into();
        assert!(matches!(err, DashboardError::MalformedResponse(_)));
    }
}
