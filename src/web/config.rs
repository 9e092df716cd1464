//! Web dashboard configuration.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Configuration for the web dashboard server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Host to bind the server to
    pub host: String,
    /// Port to bind the server to
    pub port: u16,
    /// Whether to send permissive CORS headers
    pub enable_cors: bool,
    /// Directory served under `/static`; icon assets live in `img/`
    pub static_path: Option<String>,
    /// Maximum number of concurrent WebSocket viewers
    pub max_websocket_connections: usize,
    /// Heading shown on the dashboard page
    pub title: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: crate::DEFAULT_WEB_PORT,
            enable_cors: true,
            static_path: None,
            max_websocket_connections: 100,
            title: "Linux Server Info".to_string(),
        }
    }
}

impl WebConfig {
    /// Create a web configuration with custom host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_cors(mut self, enable_cors: bool) -> Self {
        self.enable_cors = enable_cors;
        self
    }

    pub fn with_static_path(mut self, path: Option<String>) -> Self {
        self.static_path = path;
        self
    }

    pub fn with_max_websocket_connections(mut self, max: usize) -> Self {
        self.max_websocket_connections = max;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// `host:port` as shown in logs.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Bind the listener, resolving host names.
    pub async fn bind(&self) -> Result<TcpListener> {
        TcpListener::bind((self.host.as_str(), self.port))
            .await
            .map_err(|e| {
                DashboardError::web_server_error(format!(
                    "Failed to bind to {}: {}",
                    self.bind_address(),
                    e
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = WebConfig::new("127.0.0.1", 9090)
            .with_cors(false)
            .with_max_websocket_connections(5)
            .with_title("pi-hole");

        assert!(!config.enable_cors);
        assert_eq!(config.max_websocket_connections, 5);
        assert_eq!(config.title, "pi-hole");
        assert_eq!(config.bind_address(), "127.0.0.1:9090");
        assert_eq!(WebConfig::new("::1", 80).bind_address(), "[::1]:80");
    }

    #[tokio::test]
    async fn test_bind_resolves_host_names() {
        let listener = WebConfig::new("localhost", 0).bind().await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }

    #[tokio::test]
    async fn test_bind_reports_port_in_use() {
        let taken = WebConfig::new("127.0.0.1", 0).bind().await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let err = WebConfig::new("127.0.0.1", port).bind().await.unwrap_err();
        assert!(matches!(err, DashboardError::WebServer(_)));
    }
}
