//! Where snapshots come from: an HTTP endpoint or a local file.

use crate::error::{DashboardError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// A location publishing `system_info.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum Endpoint {
    /// An `http://` or `https://` URL
    Http(String),
    /// A file on the local filesystem, read on every tick
    File(PathBuf),
}

impl FromStr for Endpoint {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DashboardError::config_error("API address is empty"));
        }

        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = url::Url::parse(s)
                .map_err(|e| DashboardError::config_error(format!("Invalid API address {s:?}: {e}")))?;
            if url.host_str().is_none() {
                return Err(DashboardError::config_error(format!("API address {s:?} has no host")));
            }
            Ok(Endpoint::Http(s.to_string()))
        } else if lower.starts_with("file://") {
            Ok(Endpoint::File(PathBuf::from(&s["file://".len()..])))
        } else if s.contains("://") {
            Err(DashboardError::config_error(format!("Unsupported API address scheme in {s:?}")))
        } else {
            Ok(Endpoint::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Http(url) => f.write_str(url),
            Endpoint::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetches the raw payload published at an endpoint.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<String>;
}

/// Default source: HTTP GET via reqwest, or a file read via tokio.
#[derive(Debug, Clone)]
pub struct EndpointFetcher {
    client: reqwest::Client,
}

impl EndpointFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("server_info/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DashboardError::config_error(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SnapshotSource for EndpointFetcher {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<String> {
        match endpoint {
            Endpoint::Http(url) => {
                debug!("GET {}", url);
                let response = self.client.get(url).send().await?.error_for_status()?;
                Ok(response.text().await?)
            }
            Endpoint::File(path) => {
                debug!("Reading {}", path.display());
                Ok(tokio::fs::read_to_string(path).await?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_endpoint() {
        let endpoint: Endpoint = "http://10.0.1.1:9000/system_info.json".parse().unwrap();
        assert_eq!(endpoint, Endpoint::Http("http://10.0.1.1:9000/system_info.json".to_string()));
        assert_eq!(endpoint.to_string(), "http://10.0.1.1:9000/system_info.json");
    }

    #[test]
    fn test_parse_file_endpoint() {
        let endpoint: Endpoint = "api/system_info.json".parse().unwrap();
        assert_eq!(endpoint, Endpoint::File(PathBuf::from("api/system_info.json")));

        let endpoint: Endpoint = "file:///srv/www/api/system_info.json".parse().unwrap();
        assert_eq!(endpoint, Endpoint::File(PathBuf::from("/srv/www/api/system_info.json")));
    }

    #[test]
    fn test_parse_rejects_bad_addresses() {
        for raw in ["", "   ", "http://", "ftp://host/system_info.json"] {
            assert!(raw.parse::<Endpoint>().is_err(), "{raw:?} should be rejected");
        }
    }

    #[tokio::test]
    async fn test_fetch_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system_info.json");
        std::fs::write(&path, r#"{"os": {}}"#).unwrap();

        let fetcher = EndpointFetcher::new().unwrap();
        let raw = fetcher.fetch(&Endpoint::File(path)).await.unwrap();
        assert_eq!(raw, r#"{"os": {}}"#);
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_io_error() {
        let fetcher = EndpointFetcher::new().unwrap();
        let err = fetcher
            .fetch(&Endpoint::File(PathBuf::from("/nonexistent/system_info.json")))
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Io(_)));
        assert!(err.aborts_tick());
    }
}
