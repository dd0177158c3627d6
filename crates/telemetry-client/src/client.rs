//! Shared HTTP client

use crate::config::{ClientConfig, REQUEST_TIMEOUT};
use crate::error::ApiError;
use crate::status::ConnectionTracker;
use crate::uploader::TelemetryUploader;
use reqwest::{RequestBuilder, Response, Url};
use tracing::{debug, error};

/// Connection pool and base URL shared by the uploader and tracker
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.clone()));
        }
        // Url::join replaces the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        debug!("Telemetry API client for {}", base_url);
        Ok(Self { http, base_url })
    }

    /// Uploader sharing this client's pool
    pub fn uploader(&self) -> TelemetryUploader {
        TelemetryUploader::new(self.clone())
    }

    /// Status tracker sharing this client's pool
    pub fn tracker(&self) -> ConnectionTracker {
        ConnectionTracker::new(self.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Resolve an API path (without leading slash) against the base URL
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}{}: {}", self.base_url, path, e)))
    }

    /// Send once and turn non-2xx answers into `ApiError::Status`
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<Response, ApiError> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("{} failed: {}", operation, e);
                metrics::counter!("telemetry_api_failures_total", "operation" => operation)
                    .increment(1);
                return Err(ApiError::Transport(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("{} error body unreadable: {}", operation, e);
                    String::new()
                }
            };
            error!("{} rejected with HTTP {}: {}", operation, status, body);
            metrics::counter!("telemetry_api_failures_total", "operation" => operation)
                .increment(1);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!("{} -> {}", operation, status);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = ApiClient::new(&ClientConfig::new("https://api.example.com/v1")).unwrap();
        assert_eq!(client.base_url().as_str(), "https://api.example.com/v1/");
        assert_eq!(
            client.endpoint("telemetry/batch").unwrap().as_str(),
            "https://api.example.com/v1/telemetry/batch"
        );
    }

    #[test]
    fn test_bare_host() {
        let client = ApiClient::new(&ClientConfig::new("http://10.0.2.2:3000")).unwrap();
        assert_eq!(
            client.endpoint("telemetry/status/abc").unwrap().as_str(),
            "http://10.0.2.2:3000/telemetry/status/abc"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiClient::new(&ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl(_)));

        let err = ApiClient::new(&ClientConfig::new("mailto:fleet@example.com")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
    }
}
