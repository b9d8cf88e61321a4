//! Shared request execution: auth, dispatch, classification, decoding.

use crate::config::GraphDriveConfig;
use crate::errors::{
    classify_response, ArgumentError, ConfigurationError, GraphDriveError, GraphDriveResult,
    ResponseError,
};
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

/// Executes API requests against the configured base URL.
///
/// Every authenticated call goes through here: the executor resolves the
/// endpoint path, stamps the bearer and user-agent headers, sends the
/// request through the transport, and runs the post-request
/// check-and-classify step before handing the body back.
pub struct RequestExecutor {
    config: GraphDriveConfig,
    transport: Arc<dyn HttpTransport>,
}

impl RequestExecutor {
    pub(crate) fn new(config: GraphDriveConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    /// The configuration requests run under.
    pub fn config(&self) -> &GraphDriveConfig {
        &self.config
    }

    /// The underlying transport, for requests that bypass the base URL and
    /// auth headers (pre-signed download and upload-session URLs).
    pub(crate) fn transport(&self) -> Arc<dyn HttpTransport> {
        Arc::clone(&self.transport)
    }

    /// Executes a GET and deserializes the JSON response.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> GraphDriveResult<T> {
        self.execute_json(HttpMethod::Get, path, None).await
    }

    /// Executes a request and deserializes the JSON response.
    pub(crate) async fn execute_json<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Bytes>,
    ) -> GraphDriveResult<T> {
        let bytes = self.execute_raw(method, path, body).await?;

        serde_json::from_slice(&bytes)
            .map_err(|e| ResponseError::Deserialization(e.to_string()).into())
    }

    /// Executes a request and returns the raw response body after
    /// classification.
    pub(crate) async fn execute_raw(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Bytes>,
    ) -> GraphDriveResult<Bytes> {
        let url = self.resolve_url(path)?;

        tracing::debug!(%url, ?method, "dispatching graph request");

        let request = HttpRequest {
            method,
            url,
            headers: self.auth_headers()?,
            body,
            timeout: Some(self.config.timeout),
        };

        let response = self.transport.send(request).await?;

        classify_response(response.status, &response.body)?;

        Ok(response.body)
    }

    /// Joins an endpoint path (starting with `/`) onto the base URL.
    pub(crate) fn resolve_url(&self, path: &str) -> GraphDriveResult<Url> {
        let base = self.config.base_url.as_str().trim_end_matches('/');

        Url::parse(&format!("{base}{path}"))
            .map_err(|e| GraphDriveError::Argument(ArgumentError::InvalidUrl(e.to_string())))
    }

    /// Standard headers for authenticated requests.
    fn auth_headers(&self) -> GraphDriveResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        let bearer = self.config.access_token.bearer_header();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer).map_err(|_| {
                GraphDriveError::Configuration(ConfigurationError::InvalidConfiguration(
                    "access token contains invalid header characters".to_string(),
                ))
            })?,
        );

        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.config.user_agent).map_err(|_| {
                GraphDriveError::Configuration(ConfigurationError::InvalidConfiguration(
                    "user agent contains invalid header characters".to_string(),
                ))
            })?,
        );

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphDriveConfig;
    use crate::transport::ReqwestTransport;

    fn executor_with_base(base: &str) -> RequestExecutor {
        let config = GraphDriveConfig::builder()
            .access_token("token123")
            .base_url(base)
            .build()
            .unwrap();
        let transport = Arc::new(ReqwestTransport::with_settings(
            config.connect_timeout,
            &config.pool,
        )
        .unwrap());
        RequestExecutor::new(config, transport)
    }

    #[test]
    fn resolves_paths_against_the_base_url() {
        let executor = executor_with_base("https://graph.microsoft.com/v1.0");
        let url = executor.resolve_url("/me/drive/root/children").unwrap();
        assert_eq!(
            url.as_str(),
            "https://graph.microsoft.com/v1.0/me/drive/root/children"
        );
    }

    #[test]
    fn tolerates_trailing_slash_on_the_base_url() {
        let executor = executor_with_base("https://graph.microsoft.com/v1.0/");
        let url = executor.resolve_url("/me/followedSites").unwrap();
        assert_eq!(
            url.as_str(),
            "https://graph.microsoft.com/v1.0/me/followedSites"
        );
    }
}
