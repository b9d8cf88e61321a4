//! HTTP transport layer.
//!
//! The [`HttpTransport`] trait keeps request execution swappable for tests;
//! [`ReqwestTransport`] is the production implementation. Responses are
//! buffered except for [`HttpTransport::send_streaming`], which hands back a
//! chunk stream so downloads never hold a whole file in memory.

use crate::config::PoolConfig;
use crate::errors::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;
use pin_project::pin_project;
use reqwest::{header::HeaderMap, Client, Method, StatusCode};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use url::Url;

/// HTTP transport abstraction.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request and buffers the full response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Sends a request and streams the response body. Non-2xx responses are
    /// surfaced as [`TransportError::Status`].
    async fn send_streaming(&self, request: HttpRequest) -> Result<ByteStream, TransportError>;
}

/// HTTP request representation.
#[derive(Debug)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request URL.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Option<Bytes>,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Creates a request with no headers, body, or timeout.
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }
}

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET method.
    Get,
    /// POST method.
    Post,
    /// PUT method.
    Put,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
        }
    }
}

/// HTTP response representation.
pub struct HttpResponse {
    /// Response status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Creates a new HTTP response.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }
}

/// Byte stream for streaming response bodies.
#[pin_project]
pub struct ByteStream {
    #[pin]
    inner: Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>,
}

impl ByteStream {
    /// Wraps a stream of byte chunks.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, TransportError>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }
}

impl Stream for ByteStream {
    type Item = Result<Bytes, TransportError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        this.inner.poll_next(cx)
    }
}

/// Reqwest-based transport implementation.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Wraps an existing reqwest client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a transport with the given connection settings.
    pub fn with_settings(
        connect_timeout: Duration,
        pool: &PoolConfig,
    ) -> Result<Self, TransportError> {
        let mut builder = Client::builder()
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(pool.max_idle_per_host);

        if let Some(idle_timeout) = pool.idle_timeout {
            builder = builder.pool_idle_timeout(idle_timeout);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Http(format!("failed to build http client: {e}")))?;

        Ok(Self { client })
    }

    fn prepare(&self, request: HttpRequest) -> reqwest::RequestBuilder {
        let method: Method = request.method.into();
        let mut req = self.client.request(method, request.url);

        for (key, value) in request.headers.iter() {
            req = req.header(key, value);
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        if let Some(body) = request.body {
            req = req.body(body);
        }

        req
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self.prepare(request).send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(HttpResponse::new(status, headers, body))
    }

    async fn send_streaming(&self, request: HttpRequest) -> Result<ByteStream, TransportError> {
        let response = self.prepare(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let stream = response
            .bytes_stream()
            .map(|result| result.map_err(|e| TransportError::Network(format!("stream error: {e}"))));

        Ok(ByteStream::new(stream))
    }
}
