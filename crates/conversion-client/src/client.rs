//! HTTP conversion service client
//!
//! Talks JSON over `POST` to the external points/performance lookup service
//! and normalises its responses and failures into [`ClientError`].

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::service::{
    BatchPerformances, BatchRequest, BatchResponse, ConversionService, PerformanceRequest,
    PerformanceResponse, PointsRequest, PointsResponse,
};
use crate::Result;

/// Environment variable holding the service API root.
pub const SERVICE_URL_ENV: &str = "RANKPOINTS_SERVICE_URL";
/// Environment variable holding the per-request timeout in seconds.
pub const TIMEOUT_ENV: &str = "RANKPOINTS_TIMEOUT_SECS";
/// Environment variable holding the attempt budget per request.
pub const MAX_ATTEMPTS_ENV: &str = "RANKPOINTS_MAX_ATTEMPTS";

/// Hard ceiling on attempts so a matrix expansion cannot amplify load.
pub const MAX_ATTEMPTS_CEILING: u32 = 3;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Conversion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// API root, e.g. `http://localhost:5001/api`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Attempts per request (1 = no retry), at most [`MAX_ATTEMPTS_CEILING`]
    pub max_attempts: u32,
}

impl ConversionConfig {
    /// Create config for a specific service root
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ClientError::NotConfigured(
                "service URL must not be empty".to_string(),
            ));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::NotConfigured(format!(
                "service URL must start with http:// or https://, got '{base_url}'"
            )));
        }

        Ok(ConversionConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: 1,
        })
    }

    /// Create config from environment variables.
    ///
    /// A missing `RANKPOINTS_SERVICE_URL` is a startup misconfiguration.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(SERVICE_URL_ENV).map_err(|_| {
            ClientError::NotConfigured(format!("{SERVICE_URL_ENV} is not set"))
        })?;
        Self::from_env_with_base_url(&base_url)
    }

    /// Like [`ConversionConfig::from_env`], with the service root supplied by
    /// the caller (e.g. a command-line flag).
    pub fn from_env_with_base_url(base_url: &str) -> Result<Self> {
        let mut config = Self::new(base_url)?;

        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ClientError::NotConfigured(format!("{TIMEOUT_ENV} must be whole seconds, got '{raw}'"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        if let Ok(raw) = std::env::var(MAX_ATTEMPTS_ENV) {
            let attempts: u32 = raw.trim().parse().map_err(|_| {
                ClientError::NotConfigured(format!("{MAX_ATTEMPTS_ENV} must be an integer, got '{raw}'"))
            })?;
            config = config.with_max_attempts(attempts);
        }

        Ok(config)
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the attempt budget, clamped to `1..=MAX_ATTEMPTS_CEILING`
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.clamp(1, MAX_ATTEMPTS_CEILING);
        self
    }
}

/// Error body returned by the service alongside a 4xx status
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// reqwest-backed [`ConversionService`]
pub struct HttpConversionClient {
    config: ConversionConfig,
    http_client: reqwest::Client,
}

impl HttpConversionClient {
    /// Create a new client
    pub fn new(config: ConversionConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("rankpoints-conversion-client/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;

        Ok(HttpConversionClient {
            config,
            http_client,
        })
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ConversionConfig::from_env()?)
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    /// POST `body` to `path`, retrying retryable failures within the budget
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let mut attempt = 1;

        loop {
            match self.send_once(&url, body).await {
                Ok(parsed) => return Ok(parsed),
                Err(err) if err.is_retryable() && attempt < self.config.max_attempts => {
                    warn!(url = %url, attempt, error = %err, "conversion request failed, retrying");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_once<B, R>(&self, url: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        debug!(url = %url, "POST conversion request");
        let response = self.http_client.post(url).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|b| b.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).trim().to_string());
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ConversionService for HttpConversionClient {
    async fn calculate_points(&self, request: &PointsRequest) -> Result<f64> {
        let response: PointsResponse = self.post_json("calculate-points", request).await?;
        if !response.points.is_finite() {
            return Err(ClientError::InvalidResponse(format!(
                "non-finite points value {}",
                response.points
            )));
        }
        Ok(response.points)
    }

    async fn calculate_performance(&self, request: &PerformanceRequest) -> Result<f64> {
        let response: PerformanceResponse =
            self.post_json("calculate-performance", request).await?;
        if !response.performance.is_finite() || response.performance < 0.0 {
            return Err(ClientError::InvalidResponse(format!(
                "invalid performance value {}",
                response.performance
            )));
        }
        Ok(response.performance)
    }

    async fn calculate_performances_batch(
        &self,
        request: &BatchRequest,
    ) -> Result<BatchPerformances> {
        let response: BatchResponse = self
            .post_json("calculate-performances-batch", request)
            .await?;
        Ok(response.performances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new_trims_trailing_slash() {
        let config = ConversionConfig::new("http://localhost:5001/api/").unwrap();
        assert_eq!(config.base_url, "http://localhost:5001/api");
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_config_rejects_empty_and_schemeless_urls() {
        assert!(matches!(
            ConversionConfig::new("   "),
            Err(ClientError::NotConfigured(_))
        ));
        assert!(matches!(
            ConversionConfig::new("localhost:5001"),
            Err(ClientError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_max_attempts_is_clamped() {
        let config = ConversionConfig::new("http://svc").unwrap();
        assert_eq!(config.clone().with_max_attempts(0).max_attempts, 1);
        assert_eq!(config.clone().with_max_attempts(2).max_attempts, 2);
        assert_eq!(config.with_max_attempts(10).max_attempts, MAX_ATTEMPTS_CEILING);
    }

    #[test]
    fn test_endpoint_joins_path() {
        let client = HttpConversionClient::new(ConversionConfig::new("http://svc/api").unwrap())
            .unwrap();
        assert_eq!(
            client.endpoint("calculate-points"),
            "http://svc/api/calculate-points"
        );
    }
}
