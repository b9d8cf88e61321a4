//! Configuration for the Graph drive client.

use crate::auth::AccessToken;
use crate::errors::{ConfigurationError, GraphDriveError, GraphDriveResult};
use crate::resilience::RetryConfig;
use std::time::Duration;
use url::Url;

/// Default Microsoft Graph base URL.
pub const BASE_GRAPH_URL: &str = "https://graph.microsoft.com/v1.0";

/// Default cutoff between the single-request and chunked upload paths (4 MiB).
pub const DEFAULT_SIMPLE_UPLOAD_THRESHOLD: u64 = 4 * 1024 * 1024;

/// Fragment alignment required by Graph upload sessions (320 KiB). Chunk
/// sizes must be a multiple of this.
pub const UPLOAD_FRAGMENT_ALIGNMENT: usize = 320 * 1024;

/// Default upload-session chunk size (10 MiB, 32 aligned fragments).
pub const DEFAULT_UPLOAD_CHUNK_SIZE: usize = 10 * 1024 * 1024;

/// Configuration for the Graph drive client.
#[derive(Clone)]
pub struct GraphDriveConfig {
    /// Pre-obtained bearer token.
    pub access_token: AccessToken,

    /// Base URL for the API.
    pub base_url: Url,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// User agent string.
    pub user_agent: String,

    /// Largest file uploaded with a single request; bigger files go through
    /// an upload session.
    pub simple_upload_threshold: u64,

    /// Byte-range size for upload-session chunks. Must be a positive
    /// multiple of [`UPLOAD_FRAGMENT_ALIGNMENT`].
    pub upload_chunk_size: usize,

    /// Retry policy for upload-session chunk requests.
    pub upload_retry: RetryConfig,

    /// Connection pool configuration.
    pub pool: PoolConfig,
}

/// Connection pool configuration.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Maximum idle connections per host.
    pub max_idle_per_host: usize,

    /// Idle timeout.
    pub idle_timeout: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 10,
            idle_timeout: Some(Duration::from_secs(90)),
        }
    }
}

impl GraphDriveConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> GraphDriveConfigBuilder {
        GraphDriveConfigBuilder::new()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> GraphDriveResult<()> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(GraphDriveError::Configuration(
                ConfigurationError::InvalidConfiguration(
                    "base URL must use http or https".to_string(),
                ),
            ));
        }

        if self.upload_chunk_size == 0 || self.upload_chunk_size % UPLOAD_FRAGMENT_ALIGNMENT != 0 {
            return Err(GraphDriveError::Configuration(
                ConfigurationError::InvalidConfiguration(format!(
                    "upload chunk size must be a positive multiple of {UPLOAD_FRAGMENT_ALIGNMENT} bytes (320 KiB)"
                )),
            ));
        }

        Ok(())
    }
}

/// Builder for [`GraphDriveConfig`].
pub struct GraphDriveConfigBuilder {
    access_token: Option<AccessToken>,
    base_url: Option<String>,
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: Option<String>,
    simple_upload_threshold: u64,
    upload_chunk_size: usize,
    upload_retry: RetryConfig,
    pool: PoolConfig,
}

impl GraphDriveConfigBuilder {
    /// Creates a new builder with defaults.
    pub fn new() -> Self {
        Self {
            access_token: None,
            base_url: None,
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(30),
            user_agent: None,
            simple_upload_threshold: DEFAULT_SIMPLE_UPLOAD_THRESHOLD,
            upload_chunk_size: DEFAULT_UPLOAD_CHUNK_SIZE,
            upload_retry: RetryConfig::default(),
            pool: PoolConfig::default(),
        }
    }

    /// Sets the bearer token.
    pub fn access_token(mut self, token: impl Into<AccessToken>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the single-request upload cutoff.
    pub fn simple_upload_threshold(mut self, bytes: u64) -> Self {
        self.simple_upload_threshold = bytes;
        self
    }

    /// Sets the upload-session chunk size (must be a multiple of 320 KiB).
    pub fn upload_chunk_size(mut self, bytes: usize) -> Self {
        self.upload_chunk_size = bytes;
        self
    }

    /// Sets the retry policy for upload-session chunks.
    pub fn upload_retry(mut self, retry: RetryConfig) -> Self {
        self.upload_retry = retry;
        self
    }

    /// Sets the connection pool configuration.
    pub fn pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> GraphDriveResult<GraphDriveConfig> {
        let access_token = self.access_token.ok_or(GraphDriveError::Configuration(
            ConfigurationError::MissingAccessToken,
        ))?;

        let base_url = self.base_url.as_deref().unwrap_or(BASE_GRAPH_URL);
        let base_url = Url::parse(base_url).map_err(|e| {
            GraphDriveError::Configuration(ConfigurationError::InvalidConfiguration(format!(
                "invalid base URL: {e}"
            )))
        })?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("msgraph-drive/{}", env!("CARGO_PKG_VERSION")));

        let config = GraphDriveConfig {
            access_token,
            base_url,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            user_agent,
            simple_upload_threshold: self.simple_upload_threshold,
            upload_chunk_size: self.upload_chunk_size,
            upload_retry: self.upload_retry,
            pool: self.pool,
        };

        config.validate()?;

        Ok(config)
    }
}

impl Default for GraphDriveConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = GraphDriveConfig::builder()
            .access_token("token123")
            .build()
            .unwrap();

        assert_eq!(config.base_url.as_str(), "https://graph.microsoft.com/v1.0");
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.simple_upload_threshold, 4 * 1024 * 1024);
        assert_eq!(config.upload_chunk_size, 10 * 1024 * 1024);
        assert_eq!(config.upload_retry.max_retries, 3);
        assert_eq!(config.upload_retry.retry_on, vec![500, 502, 503, 504]);
    }

    #[test]
    fn custom_config() {
        let config = GraphDriveConfig::builder()
            .access_token("token123")
            .timeout(Duration::from_secs(60))
            .upload_chunk_size(320 * 1024)
            .user_agent("test-agent/1.0")
            .build()
            .unwrap();

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.upload_chunk_size, 320 * 1024);
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[test]
    fn missing_access_token_is_rejected() {
        assert!(GraphDriveConfig::builder().build().is_err());
    }

    #[test]
    fn default_chunk_size_is_aligned() {
        assert_eq!(DEFAULT_UPLOAD_CHUNK_SIZE % UPLOAD_FRAGMENT_ALIGNMENT, 0);
    }

    #[test]
    fn misaligned_chunk_size_is_rejected() {
        // 1 MiB is not a multiple of 320 KiB
        let result = GraphDriveConfig::builder()
            .access_token("token123")
            .upload_chunk_size(1024 * 1024)
            .build();
        assert!(result.is_err());

        let result = GraphDriveConfig::builder()
            .access_token("token123")
            .upload_chunk_size(0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = GraphDriveConfig::builder()
            .access_token("token123")
            .base_url("not a url")
            .build();
        assert!(result.is_err());

        let result = GraphDriveConfig::builder()
            .access_token("token123")
            .base_url("ftp://example.com")
            .build();
        assert!(result.is_err());
    }
}
